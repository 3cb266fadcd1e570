mod acceptance {
	mod matching;
	mod quest_lifecycle;
	mod sessions;

	use serde_json::Value;
	use time::OffsetDateTime;
	use uuid::Uuid;

	use clique_config::{Config, Matching, Postgres, Security, Service, Storage};
	use clique_domain::session::Role;
	use clique_service::{Caller, CliqueService};
	use clique_storage::{db::Db, queries};
	use clique_testkit::TestDatabase;

	pub async fn test_db() -> Option<TestDatabase> {
		TestDatabase::from_env().await.expect("Failed to create test database.")
	}

	pub fn test_config(dsn: String) -> Config {
		Config {
			service: Service {
				http_bind: "127.0.0.1:0".to_string(),
				admin_bind: "127.0.0.1:0".to_string(),
				log_level: "info".to_string(),
			},
			storage: Storage { postgres: Postgres { dsn, pool_max_conns: 2 } },
			matching: Matching::default(),
			security: Security { bind_localhost_only: true, session_ttl_hours: 24 },
		}
	}

	pub async fn build_service(cfg: Config) -> CliqueService {
		let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect to Postgres.");

		db.ensure_schema().await.expect("Failed to ensure schema.");

		CliqueService::new(cfg, db)
	}

	pub async fn seed_caller(service: &CliqueService, role: Role, preferences: Value) -> Caller {
		let user_id = Uuid::new_v4();

		queries::upsert_profile(
			&service.db.pool,
			user_id,
			role.as_str(),
			role.as_str(),
			&preferences,
			OffsetDateTime::now_utc(),
		)
		.await
		.expect("Failed to seed profile.");

		Caller { user_id, role }
	}
}
