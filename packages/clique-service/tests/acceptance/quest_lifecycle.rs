use serde_json::json;
use uuid::Uuid;

use clique_domain::{
	affinity::Affinity,
	constraints::{Accessibility, QuestConstraints},
	quest_status::{QuestStatus, ReviewStatus},
	session::Role,
};
use clique_service::{
	CreateQuestRequest, Error, ReviewQuestRequest, SetAffinitiesRequest, SetConstraintsRequest,
	TransitionQuestRequest,
};

fn create_request(title: &str) -> CreateQuestRequest {
	CreateQuestRequest {
		title: title.to_string(),
		description: Some("  Meet at the north gate.  ".to_string()),
		starts_at: None,
		ends_at: None,
		capacity: Some(4),
		constraints: None,
		affinities: Vec::new(),
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLIQUE_PG_DSN to run."]
async fn colliding_titles_get_numbered_slugs() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping colliding_titles_get_numbered_slugs; set CLIQUE_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let creator = super::seed_caller(&service, Role::Creator, json!({})).await;
	let first = service
		.create_quest(&creator, create_request("Sunset Kayak Tour!"))
		.await
		.expect("Failed to create first quest.");
	let second = service
		.create_quest(&creator, create_request("sunset kayak tour"))
		.await
		.expect("Failed to create second quest.");
	let third = service
		.create_quest(&creator, create_request("Sunset kayak tour"))
		.await
		.expect("Failed to create third quest.");

	assert_eq!(first.quest.slug, "sunset-kayak-tour");
	assert_eq!(second.quest.slug, "sunset-kayak-tour-2");
	assert_eq!(third.quest.slug, "sunset-kayak-tour-3");
	assert_eq!(first.quest.status, QuestStatus::Draft);
	assert_eq!(first.quest.review_status, ReviewStatus::Pending);
	assert_eq!(first.quest.description.as_deref(), Some("Meet at the north gate."));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLIQUE_PG_DSN to run."]
async fn lifecycle_rejects_illegal_transitions() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping lifecycle_rejects_illegal_transitions; set CLIQUE_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let admin = super::seed_caller(&service, Role::Admin, json!({})).await;
	let quest_id = service
		.create_quest(&admin, create_request("Pottery class"))
		.await
		.expect("Failed to create quest.")
		.quest
		.quest_id;
	let transition = |status| TransitionQuestRequest { status };
	let err = service
		.transition_quest(&admin, quest_id, transition(QuestStatus::Closed))
		.await
		.expect_err("Draft quests cannot close.");

	assert!(matches!(err, Error::Conflict { .. }), "Unexpected error: {err:?}");

	for status in [QuestStatus::Open, QuestStatus::Closed, QuestStatus::Completed] {
		let quest = service
			.transition_quest(&admin, quest_id, transition(status))
			.await
			.expect("Legal transition failed.");

		assert_eq!(quest.status, status);
	}

	let err = service
		.transition_quest(&admin, quest_id, transition(QuestStatus::Open))
		.await
		.expect_err("Completed quests are terminal.");

	assert!(matches!(err, Error::Conflict { .. }), "Unexpected error: {err:?}");

	let err = service
		.transition_quest(&admin, Uuid::new_v4(), transition(QuestStatus::Open))
		.await
		.expect_err("Unknown quest must not transition.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	let err = service
		.review_quest(
			&admin,
			Uuid::new_v4(),
			ReviewQuestRequest { review_status: ReviewStatus::Approved },
		)
		.await
		.expect_err("Unknown quest must not be reviewed.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLIQUE_PG_DSN to run."]
async fn companion_rows_are_replaced_and_hidden_from_members() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping companion_rows_are_replaced_and_hidden_from_members; set CLIQUE_PG_DSN to run this test."
		);

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let creator = super::seed_caller(&service, Role::Creator, json!({})).await;
	let member = super::seed_caller(&service, Role::Member, json!({})).await;
	let quest_id = service
		.create_quest(&creator, create_request("Harbor walk"))
		.await
		.expect("Failed to create quest.")
		.quest
		.quest_id;
	let constraints = QuestConstraints {
		accessibility: Some(Accessibility::WheelchairFriendly),
		..Default::default()
	};

	service
		.set_constraints(
			&creator,
			quest_id,
			SetConstraintsRequest { constraints: constraints.clone() },
		)
		.await
		.expect("Failed to set constraints.");
	service
		.set_affinities(
			&creator,
			quest_id,
			SetAffinitiesRequest {
				affinities: vec![Affinity {
					trait_key: "Outdoorsy".to_string(),
					weight: 70,
					explanation: None,
				}],
			},
		)
		.await
		.expect("Failed to set affinities.");

	let detail = service
		.set_affinities(
			&creator,
			quest_id,
			SetAffinitiesRequest {
				affinities: vec![Affinity {
					trait_key: "calm".to_string(),
					weight: 40,
					explanation: Some("A slow, quiet stroll".to_string()),
				}],
			},
		)
		.await
		.expect("Failed to replace affinities.");

	assert_eq!(detail.constraints, Some(constraints));
	assert_eq!(detail.affinities.len(), 1);
	assert_eq!(detail.affinities[0].trait_key, "calm");

	let err = service.get_quest(&member, quest_id).await.expect_err("Drafts are hidden.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
