use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub matching: Matching,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Tuning for the quest matching pipeline.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Matching {
	/// Score assigned when a quest has no affinity rows overlapping the user's traits.
	pub neutral_score: u8,
	pub max_title_chars: u32,
}
impl Default for Matching {
	fn default() -> Self {
		Self { neutral_score: 50, max_title_chars: 120 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	#[serde(default = "default_session_ttl_hours")]
	pub session_ttl_hours: i64,
}

/// Ten years.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

fn default_session_ttl_hours() -> i64 {
	720
}
