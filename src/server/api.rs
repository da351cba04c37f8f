//! REST API routes.
//!
//! Handlers extract the request, hand it to the matching command and render
//! the result. Every failure leaves through [`ApiErr`], so clients always
//! see `{"error": {"code", "message"}}`.

use super::AppState;
use crate::commands::pull_request::{
    self, CreatePullRequestRequest, MergePullRequestRequest, PullRequestEnvelope,
    ReassignPullRequestRequest, ReassignResponse,
};
use crate::commands::statistics::{self, StatisticsResponse};
use crate::commands::team::{self, AddTeamRequest, TeamQuery, TeamResponse};
use crate::commands::user::{
    self, SetIsActiveRequest, UserResponse, UserReviewQuery, UserReviewsResponse,
};
use crate::error::{AppError, ErrorCode};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

// ── Error handling ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorBody {
    error: ApiError,
}

#[derive(Serialize)]
struct ApiError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// Wrapper to make AppError usable as an axum error response.
pub struct ApiErr(pub AppError);

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let err = self.0;
        let code = err.code();
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if err.is_internal() {
            match &err {
                AppError::Database {
                    message,
                    operation: Some(operation),
                } => log::error!("Database error during {}: {}", operation, message),
                other => log::error!("{}", other),
            }
            "Internal server error".to_string()
        } else {
            log::warn!("{}: {}", code, err);
            err.to_string()
        };

        let field = match err {
            AppError::ValidationFailed { field, .. } => field,
            _ => None,
        };

        let body = ErrorBody {
            error: ApiError {
                code,
                message,
                field,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiErr {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiErr {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::validation(rejection.body_text()))
    }
}

// ── Route builder ────────────────────────────────────────────────────────────

/// Build the API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/team/add", post(add_team))
        .route("/team/get", get(get_team))
        .route("/users/setIsActive", post(set_is_active))
        .route("/users/getReview", get(get_review))
        .route("/pullRequest/create", post(create_pull_request))
        .route("/pullRequest/merge", post(merge_pull_request))
        .route("/pullRequest/reassign", post(reassign_pull_request))
        .route("/statistic/users", get(user_statistics))
        .fallback(unknown_route)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// POST /team/add: create a team with its members.
async fn add_team(
    State(state): State<AppState>,
    payload: Result<Json<AddTeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiErr> {
    let Json(request) = payload?;
    let created = team::add_team(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /team/get?team_name=X
async fn get_team(
    State(state): State<AppState>,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> Result<Json<TeamResponse>, ApiErr> {
    let Query(query) = query?;
    Ok(Json(team::get_team(&state.db, query).await?))
}

/// POST /users/setIsActive
async fn set_is_active(
    State(state): State<AppState>,
    payload: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiErr> {
    let Json(request) = payload?;
    Ok(Json(user::set_is_active(&state.db, request).await?))
}

/// GET /users/getReview?user_id=X
async fn get_review(
    State(state): State<AppState>,
    query: Result<Query<UserReviewQuery>, QueryRejection>,
) -> Result<Json<UserReviewsResponse>, ApiErr> {
    let Query(query) = query?;
    Ok(Json(user::get_review(&state.db, query).await?))
}

/// POST /pullRequest/create: create a PR and assign reviewers.
async fn create_pull_request(
    State(state): State<AppState>,
    payload: Result<Json<CreatePullRequestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PullRequestEnvelope>), ApiErr> {
    let Json(request) = payload?;
    let created = pull_request::create_pull_request(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /pullRequest/merge
async fn merge_pull_request(
    State(state): State<AppState>,
    payload: Result<Json<MergePullRequestRequest>, JsonRejection>,
) -> Result<Json<PullRequestEnvelope>, ApiErr> {
    let Json(request) = payload?;
    Ok(Json(
        pull_request::merge_pull_request(&state.db, request).await?,
    ))
}

/// POST /pullRequest/reassign
async fn reassign_pull_request(
    State(state): State<AppState>,
    payload: Result<Json<ReassignPullRequestRequest>, JsonRejection>,
) -> Result<Json<ReassignResponse>, ApiErr> {
    let Json(request) = payload?;
    Ok(Json(
        pull_request::reassign_pull_request(&state.db, request).await?,
    ))
}

/// GET /statistic/users
async fn user_statistics(
    State(state): State<AppState>,
) -> Result<Json<StatisticsResponse>, ApiErr> {
    Ok(Json(statistics::user_statistics(&state.db).await?))
}

async fn unknown_route(uri: Uri) -> ApiErr {
    ApiErr(AppError::not_found("Route", uri.path()))
}
