use serde_json::json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use clique_domain::{preferences::AlcoholPreference, session::Role};
use clique_service::{Error, IssueSessionRequest, UpdatePreferencesRequest};
use clique_storage::queries;

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLIQUE_PG_DSN to run."]
async fn issued_tokens_authenticate_until_purged() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping issued_tokens_authenticate_until_purged; set CLIQUE_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let creator = super::seed_caller(&service, Role::Creator, json!({})).await;
	let issued = service
		.issue_session(IssueSessionRequest { user_id: creator.user_id })
		.await
		.expect("Failed to issue session.");
	let caller = service.authenticate(&issued.token).await.expect("Failed to authenticate.");

	assert_eq!(caller, creator);

	let now = OffsetDateTime::now_utc();

	queries::insert_session(
		&service.db.pool,
		"expired-token",
		creator.user_id,
		now - Duration::hours(2),
		now - Duration::hours(1),
	)
	.await
	.expect("Failed to insert expired session.");

	let err = service.authenticate("expired-token").await.expect_err("Expired tokens are rejected.");

	assert!(matches!(err, Error::Unauthorized { .. }), "Unexpected error: {err:?}");

	let report = service.purge_expired_sessions().await.expect("Failed to purge sessions.");

	assert_eq!(report.purged_sessions, 1);
	assert!(service.authenticate(&issued.token).await.is_ok());

	let err = service
		.issue_session(IssueSessionRequest { user_id: Uuid::new_v4() })
		.await
		.expect_err("Unknown users cannot get sessions.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLIQUE_PG_DSN to run."]
async fn preferences_round_trip_with_derived_inputs() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping preferences_round_trip_with_derived_inputs; set CLIQUE_PG_DSN to run this test."
		);

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let member = super::seed_caller(&service, Role::Member, json!({})).await;
	let updated = service
		.update_preferences(
			&member,
			UpdatePreferencesRequest {
				preferences: json!({
					"alcohol": "no_alcohol",
					"traits": { " Social ": 140, "calm": "very" }
				}),
			},
		)
		.await
		.expect("Failed to update preferences.");

	assert_eq!(updated.filters.alcohol_preference, Some(AlcoholPreference::NoAlcohol));
	assert_eq!(updated.traits.get("social"), Some(100));
	assert_eq!(updated.traits.get("calm"), None);

	let fetched = service.get_preferences(&member).await.expect("Failed to read preferences.");

	assert_eq!(fetched.preferences, updated.preferences);
	assert_eq!(fetched.traits, updated.traits);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
