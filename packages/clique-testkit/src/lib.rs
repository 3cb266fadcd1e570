//! Throwaway Postgres databases for the `#[ignore]`d integration tests.
//!
//! Tests opt in by setting `CLIQUE_PG_DSN` to a server they may create databases on. Each
//! [`TestDatabase`] lives under a fresh `clique_test_*` name and must be released with
//! [`TestDatabase::cleanup`].

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use uuid::Uuid;

pub const DSN_ENV: &str = "CLIQUE_PG_DSN";
pub const DATABASE_PREFIX: &str = "clique_test_";

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];

pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	cleaned: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options = PgConnectOptions::from_str(base_dsn)
			.map_err(|source| Error::InvalidDsn { source })?;
		let (admin_options, mut admin_conn) = connect_admin(&base_options).await?;
		let name = database_name();

		admin_conn
			.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|source| Error::CreateDatabase { name: name.clone(), source })?;

		let dsn = base_options.database(&name).to_url_lossy().to_string();

		tracing::debug!(database = %name, "Created test database.");

		Ok(Self { name, dsn, admin_options, cleaned: false })
	}

	/// Creates a database under `CLIQUE_PG_DSN`, or returns `None` when it is not set.
	pub async fn from_env() -> Result<Option<Self>> {
		match env_dsn() {
			Some(base_dsn) => Self::new(&base_dsn).await.map(Some),
			None => Ok(None),
		}
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Terminates lingering sessions and drops the database.
	pub async fn cleanup(mut self) -> Result<()> {
		let mut conn = PgConnection::connect_with(&self.admin_options)
			.await
			.map_err(|source| Error::AdminUnavailable { source })?;

		// Pools held by the test may still be connected.
		let _ = sqlx::query(
			"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
		)
		.bind(&self.name)
		.fetch_all(&mut conn)
		.await;

		conn.execute(format!(r#"DROP DATABASE IF EXISTS "{}""#, self.name).as_str())
			.await
			.map_err(|source| Error::DropDatabase { name: self.name.clone(), source })?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if !self.cleaned {
			eprintln!("Test database {} was left behind; drop it manually.", self.name);
		}
	}
}

/// Base DSN for throwaway databases. Blank values count as unset.
pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().map(|dsn| dsn.trim().to_string()).filter(|dsn| !dsn.is_empty())
}

fn database_name() -> String {
	format!("{DATABASE_PREFIX}{}", Uuid::new_v4().simple())
}

async fn connect_admin(
	base_options: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let mut last_err = None;

	for database in ADMIN_DATABASES {
		let options = base_options.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => last_err = Some(err),
		}
	}

	let source = last_err.unwrap_or_else(|| sqlx::Error::Configuration("no admin database".into()));

	Err(Error::AdminUnavailable { source })
}
