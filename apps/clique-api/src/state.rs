use std::sync::Arc;

use clique_service::CliqueService;
use clique_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CliqueService>,
}
impl AppState {
	/// Connects to Postgres and brings the schema up to date.
	pub async fn new(config: clique_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(CliqueService::new(config, db)))
	}

	pub fn from_service(service: CliqueService) -> Self {
		Self { service: Arc::new(service) }
	}
}
