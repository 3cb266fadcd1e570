use axum::{
	Json, Router,
	body::Bytes,
	extract::{Path, State},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	response::{IntoResponse, Response},
	routing::{get, post, put},
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use clique_domain::quest::Quest;
use clique_service::{
	Caller, CreateQuestRequest, Error as ServiceError, IssueSessionRequest, IssueSessionResponse,
	MatchRequest, MatchResponse, PreferencesResponse, PurgeReport, QuestDetail,
	ReviewQuestRequest, SetAffinitiesRequest, SetConstraintsRequest, TransitionQuestRequest,
	UpdatePreferencesRequest,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/quests", post(create_quest))
		.route("/v1/quests/match", post(match_quests))
		.route("/v1/quests/{quest_id}", get(get_quest))
		.route("/v1/quests/{quest_id}/constraints", put(set_constraints))
		.route("/v1/quests/{quest_id}/affinities", put(set_affinities))
		.route("/v1/quests/{quest_id}/status", post(transition_quest))
		.route("/v1/quests/{quest_id}/review", post(review_quest))
		.route("/v1/me/preferences", get(get_preferences).put(update_preferences))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/sessions", post(issue_session))
		.route("/v1/admin/sessions/purge", post(purge_sessions))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn match_quests(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Json<MatchResponse>, ApiError> {
	let caller = authenticate(&state, &headers).await?;
	let req: MatchRequest = if body.iter().all(u8::is_ascii_whitespace) {
		MatchRequest::default()
	} else {
		parse_body(&body)?
	};
	let response = state.service.match_quests(&caller, req).await?;

	Ok(Json(response))
}

async fn create_quest(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<(StatusCode, Json<QuestDetail>), ApiError> {
	let caller = authenticate(&state, &headers).await?;
	let req: CreateQuestRequest = parse_body(&body)?;
	let response = state.service.create_quest(&caller, req).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn get_quest(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(quest_id): Path<Uuid>,
) -> Result<Json<QuestDetail>, ApiError> {
	let caller = authenticate(&state, &headers).await?;
	let response = state.service.get_quest(&caller, quest_id).await?;

	Ok(Json(response))
}

async fn set_constraints(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(quest_id): Path<Uuid>,
	body: Bytes,
) -> Result<Json<QuestDetail>, ApiError> {
	let caller = authenticate(&state, &headers).await?;
	let req: SetConstraintsRequest = parse_body(&body)?;
	let response = state.service.set_constraints(&caller, quest_id, req).await?;

	Ok(Json(response))
}

async fn set_affinities(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(quest_id): Path<Uuid>,
	body: Bytes,
) -> Result<Json<QuestDetail>, ApiError> {
	let caller = authenticate(&state, &headers).await?;
	let req: SetAffinitiesRequest = parse_body(&body)?;
	let response = state.service.set_affinities(&caller, quest_id, req).await?;

	Ok(Json(response))
}

async fn transition_quest(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(quest_id): Path<Uuid>,
	body: Bytes,
) -> Result<Json<Quest>, ApiError> {
	let caller = authenticate(&state, &headers).await?;
	let req: TransitionQuestRequest = parse_body(&body)?;
	let response = state.service.transition_quest(&caller, quest_id, req).await?;

	Ok(Json(response))
}

async fn review_quest(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(quest_id): Path<Uuid>,
	body: Bytes,
) -> Result<Json<Quest>, ApiError> {
	let caller = authenticate(&state, &headers).await?;
	let req: ReviewQuestRequest = parse_body(&body)?;
	let response = state.service.review_quest(&caller, quest_id, req).await?;

	Ok(Json(response))
}

async fn get_preferences(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<PreferencesResponse>, ApiError> {
	let caller = authenticate(&state, &headers).await?;
	let response = state.service.get_preferences(&caller).await?;

	Ok(Json(response))
}

async fn update_preferences(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Json<PreferencesResponse>, ApiError> {
	let caller = authenticate(&state, &headers).await?;
	let req: UpdatePreferencesRequest = parse_body(&body)?;
	let response = state.service.update_preferences(&caller, req).await?;

	Ok(Json(response))
}

async fn issue_session(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<(StatusCode, Json<IssueSessionResponse>), ApiError> {
	let req: IssueSessionRequest = parse_body(&body)?;
	let response = state.service.issue_session(req).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn purge_sessions(State(state): State<AppState>) -> Result<Json<PurgeReport>, ApiError> {
	let response = state.service.purge_expired_sessions().await?;

	Ok(Json(response))
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Caller, ApiError> {
	let Some(token) = read_bearer_token(headers) else {
		return Err(json_error(
			StatusCode::UNAUTHORIZED,
			"unauthorized",
			"Authorization: Bearer <token> is required.",
			None,
		));
	};

	Ok(state.service.authenticate(token).await?)
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(AUTHORIZATION)?;
	let value = raw.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}

fn parse_body<T>(body: &Bytes) -> Result<T, ApiError>
where
	T: DeserializeOwned,
{
	serde_json::from_slice(body).map_err(|err| {
		json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("Request body is not valid JSON for this endpoint: {err}."),
			None,
		)
	})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Rejected { code } => json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				format!("{}: {}", code.as_str(), code.message()),
				Some(vec![code.field().to_string()]),
			),
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::Unauthorized { message } =>
				json_error(StatusCode::UNAUTHORIZED, "unauthorized", message, None),
			ServiceError::Forbidden { message } =>
				json_error(StatusCode::FORBIDDEN, "forbidden", message, None),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			ServiceError::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "conflict", message, None),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage failure while handling request.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Internal storage error.",
					None,
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
