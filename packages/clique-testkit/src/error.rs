pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("CLIQUE_PG_DSN is not a valid Postgres DSN: {source}")]
	InvalidDsn { source: sqlx::Error },
	#[error("Neither the postgres nor the template1 database accepted a connection: {source}")]
	AdminUnavailable { source: sqlx::Error },
	#[error("Failed to create test database {name}: {source}")]
	CreateDatabase { name: String, source: sqlx::Error },
	#[error("Failed to drop test database {name}: {source}")]
	DropDatabase { name: String, source: sqlx::Error },
}
