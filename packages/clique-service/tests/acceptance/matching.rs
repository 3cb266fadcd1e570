use serde_json::json;
use uuid::Uuid;

use clique_domain::{
	affinity::Affinity,
	constraints::{AlcoholRole, PhysicalIntensity, QuestConstraints},
	quest_status::{QuestStatus, ReviewStatus},
	session::Role,
};
use clique_service::{
	Caller, CliqueService, CreateQuestRequest, MatchRequest, ReviewQuestRequest,
	TransitionQuestRequest,
};

async fn publish_quest(
	service: &CliqueService,
	admin: &Caller,
	title: &str,
	constraints: Option<QuestConstraints>,
	affinities: Vec<Affinity>,
) -> Uuid {
	let detail = service
		.create_quest(
			admin,
			CreateQuestRequest {
				title: title.to_string(),
				description: None,
				starts_at: None,
				ends_at: None,
				capacity: Some(8),
				constraints,
				affinities,
			},
		)
		.await
		.expect("Failed to create quest.");
	let quest_id = detail.quest.quest_id;

	service
		.transition_quest(admin, quest_id, TransitionQuestRequest { status: QuestStatus::Open })
		.await
		.expect("Failed to open quest.");
	service
		.review_quest(admin, quest_id, ReviewQuestRequest { review_status: ReviewStatus::Approved })
		.await
		.expect("Failed to approve quest.");

	quest_id
}

fn affinity(trait_key: &str, weight: u8) -> Affinity {
	Affinity { trait_key: trait_key.to_string(), weight, explanation: None }
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLIQUE_PG_DSN to run."]
async fn match_filters_and_ranks_open_quests() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping match_filters_and_ranks_open_quests; set CLIQUE_PG_DSN to run this test.");

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let admin = super::seed_caller(&service, Role::Admin, json!({})).await;
	let member = super::seed_caller(
		&service,
		Role::Member,
		json!({
			"alcohol": "no_alcohol",
			"physical_intensity": "medium",
			"traits": { "adventurous": 90, "social": 30 }
		}),
	)
	.await;
	let climbing = publish_quest(
		&service,
		&admin,
		"Rock climbing",
		Some(QuestConstraints {
			physical_intensity: Some(PhysicalIntensity::High),
			..Default::default()
		}),
		vec![affinity("adventurous", 100)],
	)
	.await;
	let wine = publish_quest(
		&service,
		&admin,
		"Wine tasting",
		Some(QuestConstraints { alcohol: Some(AlcoholRole::Primary), ..Default::default() }),
		vec![affinity("social", 100)],
	)
	.await;
	let book_club =
		publish_quest(&service, &admin, "Book club", None, vec![affinity("social", 100)]).await;

	service
		.create_quest(
			&admin,
			CreateQuestRequest {
				title: "Unpublished draft".to_string(),
				description: None,
				starts_at: None,
				ends_at: None,
				capacity: None,
				constraints: None,
				affinities: vec![affinity("adventurous", 100)],
			},
		)
		.await
		.expect("Failed to create draft quest.");

	let response =
		service.match_quests(&member, MatchRequest::default()).await.expect("Match failed.");
	let ids: Vec<Uuid> = response.items.iter().map(|item| item.quest.quest_id).collect();

	assert_eq!(ids, vec![climbing, book_club]);
	assert!(!ids.contains(&wine));
	assert_eq!(response.excluded_count, 1);
	assert_eq!(response.items[0].match_score, 90);
	assert_eq!(response.items[0].match_reason.as_deref(), Some("Matches your adventurous side"));
	assert_eq!(response.items[0].top_trait.as_deref(), Some("adventurous"));
	assert_eq!(response.items[1].match_score, 30);

	let by_user = service.match_for_user(member.user_id).await.expect("Match for user failed.");

	assert_eq!(by_user.items.len(), response.items.len());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLIQUE_PG_DSN to run."]
async fn explicit_inputs_override_stored_preferences() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping explicit_inputs_override_stored_preferences; set CLIQUE_PG_DSN to run this test."
		);

		return;
	};
	let service = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let admin = super::seed_caller(&service, Role::Admin, json!({})).await;
	let member = super::seed_caller(
		&service,
		Role::Member,
		json!({ "alcohol": "no_alcohol", "traits": { "calm": 100 } }),
	)
	.await;
	let wine = publish_quest(
		&service,
		&admin,
		"Wine tasting",
		Some(QuestConstraints { alcohol: Some(AlcoholRole::Primary), ..Default::default() }),
		Vec::new(),
	)
	.await;
	let kayak = publish_quest(
		&service,
		&admin,
		"Kayak tour",
		None,
		vec![affinity("adventurous", 100), affinity("social", 50)],
	)
	.await;
	let request: MatchRequest = serde_json::from_value(json!({
		"filters": {},
		"traits": { " Adventurous ": 80, "SOCIAL": 250 },
	}))
	.expect("Failed to parse match request.");
	let response = service.match_quests(&member, request).await.expect("Match failed.");
	let ids: Vec<_> = response.items.iter().map(|item| item.quest.quest_id).collect();

	assert_eq!(ids, vec![kayak, wine]);
	assert_eq!(response.excluded_count, 0);
	// (100 * 0.8 + 50 * 1.0) / 150 = 0.8667
	assert_eq!(response.items[0].match_score, 87);
	assert_eq!(
		response.items[0].match_reason.as_deref(),
		Some("Matches your adventurous side")
	);
	assert_eq!(response.items[1].match_score, 50);
	assert_eq!(response.items[1].match_reason, None);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
