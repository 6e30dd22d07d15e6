use axum::{
	Json, Router,
	extract::{
		Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::{HeaderValue, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{
	cors::{AllowOrigin, Any, CorsLayer},
	trace::TraceLayer,
};

use crate::state::AppState;
use tabplan_config::{Cors, Strategy};
use tabplan_domain::SelectionInput;
use tabplan_service::{Error as ServiceError, PlanOptions, PlanResponse};

pub fn router(state: AppState) -> Router {
	let cors = cors_layer(&state.service.cfg.service.cors);

	Router::new()
		.route("/health", get(health))
		.route("/v1/tabs", post(plan_tabs))
		.route("/v1/tabs/llm", post(plan_tabs_llm))
		.route("/v1/tabs/heuristic", post(plan_tabs_heuristic))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Query parameters shared by every planning route.
#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
	pub strategy: Option<Strategy>,
	pub limit: Option<i64>,
	pub model: Option<String>,
	pub temperature: Option<f32>,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn plan_tabs(
	State(state): State<AppState>,
	query: Result<Query<PlanQuery>, QueryRejection>,
	payload: Result<Json<SelectionInput>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
	let (Query(query), Json(payload)) = (query?, payload?);
	let strategy = query.strategy.unwrap_or(state.service.cfg.planner.default_strategy);

	plan_with(&state, strategy, query, payload).await
}

async fn plan_tabs_llm(
	State(state): State<AppState>,
	query: Result<Query<PlanQuery>, QueryRejection>,
	payload: Result<Json<SelectionInput>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
	let (Query(query), Json(payload)) = (query?, payload?);

	plan_with(&state, Strategy::Llm, query, payload).await
}

async fn plan_tabs_heuristic(
	State(state): State<AppState>,
	query: Result<Query<PlanQuery>, QueryRejection>,
	payload: Result<Json<SelectionInput>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
	let (Query(query), Json(payload)) = (query?, payload?);

	plan_with(&state, Strategy::Heuristic, query, payload).await
}

async fn plan_with(
	state: &AppState,
	strategy: Strategy,
	query: PlanQuery,
	payload: SelectionInput,
) -> Result<Json<PlanResponse>, ApiError> {
	let max_tabs = effective_max_tabs(
		strategy,
		query.limit,
		state.service.cfg.planner.default_max_tabs,
		payload.bookmarks.len(),
	);
	let options = PlanOptions { model: query.model, temperature: query.temperature };
	let response = state.service.plan(strategy, &payload, max_tabs, &options).await?;

	Ok(Json(response))
}

/// Applies the HTTP-layer limit defaults. An absent limit uses the configured default. A
/// non-positive limit also uses the default for the LLM path, and means "every bookmark" for the
/// heuristic path.
pub fn effective_max_tabs(
	strategy: Strategy,
	limit: Option<i64>,
	default_max_tabs: u32,
	bookmark_count: usize,
) -> i64 {
	match limit {
		Some(limit) if limit > 0 => limit,
		Some(_) if strategy == Strategy::Heuristic =>
			i64::try_from(bookmark_count).unwrap_or(i64::MAX),
		_ => i64::from(default_max_tabs),
	}
}

fn cors_layer(cfg: &Cors) -> CorsLayer {
	let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

	if cfg.allow_origins.iter().any(|origin| origin.trim() == "*") {
		return layer.allow_origin(Any);
	}

	let mut parsed = Vec::new();

	for origin in &cfg.allow_origins {
		match HeaderValue::from_str(origin.trim()) {
			Ok(value) => parsed.push(value),
			Err(err) => tracing::warn!(%origin, error = %err, "Ignoring invalid CORS origin."),
		}
	}

	layer.allow_origin(AllowOrigin::list(parsed))
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
		let message = err.to_string();

		match err {
			ServiceError::Validation { fields, .. } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message, Some(fields)),
			ServiceError::Configuration { .. } => ApiError::new(
				StatusCode::INTERNAL_SERVER_ERROR,
				"configuration_error",
				message,
				None,
			),
			ServiceError::Planning { .. } =>
				ApiError::new(StatusCode::BAD_GATEWAY, "planning_failed", message, None),
			ServiceError::EmptyResult { .. } =>
				ApiError::new(StatusCode::BAD_GATEWAY, "empty_result", message, None),
		}
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		ApiError::new(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("Invalid query string: {}", rejection.body_text()),
			Some(vec!["query".to_string()]),
		)
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		ApiError::new(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("Invalid request body: {}", rejection.body_text()),
			Some(vec!["body".to_string()]),
		)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
