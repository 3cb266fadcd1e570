mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, MAX_SESSION_TTL_HOURS, Matching, Postgres, Security, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
	] {
		if value.is_empty() {
			return Err(Error::invalid(label, "must be non-empty"));
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns", "must be greater than zero"));
	}
	if cfg.matching.neutral_score > 100 {
		return Err(Error::invalid("matching.neutral_score", "must be in the range 0-100"));
	}
	if cfg.matching.max_title_chars == 0 {
		return Err(Error::invalid("matching.max_title_chars", "must be greater than zero"));
	}
	if cfg.security.session_ttl_hours <= 0 {
		return Err(Error::invalid("security.session_ttl_hours", "must be greater than zero"));
	}
	if cfg.security.session_ttl_hours > MAX_SESSION_TTL_HOURS {
		return Err(Error::invalid(
			"security.session_ttl_hours",
			&format!("must be at most {MAX_SESSION_TTL_HOURS}"),
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();
	cfg.service.admin_bind = cfg.service.admin_bind.trim().to_string();
	cfg.storage.postgres.dsn = cfg.storage.postgres.dsn.trim().to_string();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
