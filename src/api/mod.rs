//! HTTP surface: bearer-token auth plus JSON endpoints over the workflow
//! layer. Every mutation endpoint responds with the reloaded lead detail so
//! clients always re-render a consistent post-mutation view.

use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use leadline_core::models::*;
use leadline_core::Database;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{AuthError, Session, SessionManager};
use crate::workflow::{self, Identity, LeadDetail};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionManager,
}

pub fn create_router(db: Database) -> Router {
    let state = AppState {
        sessions: SessionManager::new(db.clone()),
        db,
    };

    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/leads", get(list_leads).post(create_lead))
        .route("/api/leads/{id}", get(lead_detail))
        .route("/api/leads/{id}/conversations", post(add_conversation))
        .route("/api/leads/{id}/followups", post(add_followup))
        .route(
            "/api/leads/{id}/followups/{followup_id}/toggle",
            post(toggle_followup),
        )
        .route("/api/leads/{id}/ai-assists", post(save_ai_assist))
        .route("/api/leads/{id}/contracts", post(create_contract_draft))
        .route(
            "/api/leads/{id}/contracts/submit",
            post(submit_contract_for_approval),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    AuthRequired,
    Workflow(workflow::Error),
}

impl From<workflow::Error> for ApiError {
    fn from(err: workflow::Error) -> Self {
        Self::Workflow(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::AuthRequired => (StatusCode::UNAUTHORIZED, "authentication required".into()),
            Self::Workflow(err) => {
                let status = match &err {
                    workflow::Error::NotFound(_) => StatusCode::NOT_FOUND,
                    workflow::Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    workflow::Error::Precondition(_) => StatusCode::CONFLICT,
                    workflow::Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!(error = %err, "storage failure");
                }
                (status, err.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// The session guard. Runs before any data operation; an absent or revoked
/// token rejects the request with 401 before a handler is entered.
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::AuthRequired)?;
        state.sessions.resolve(token).ok_or(ApiError::AuthRequired)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Session>, Response> {
    match state.sessions.sign_in(&req.email, &req.password) {
        Ok(session) => Ok(Json(session)),
        Err(AuthError::InvalidCredentials) => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": AuthError::InvalidCredentials.to_string() })),
        )
            .into_response()),
        Err(AuthError::Storage(err)) => {
            tracing::error!(error = %err, "sign-in failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response())
        }
    }
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.sign_out(token);
    }
    StatusCode::NO_CONTENT
}

async fn list_leads(
    _identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    Ok(Json(workflow::list_leads(&state.db)?))
}

async fn create_lead(
    identity: Identity,
    State(state): State<AppState>,
    Json(input): Json<CreateLeadInput>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    let lead = workflow::create_lead(&state.db, &identity, input)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

async fn lead_detail(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeadDetail>, ApiError> {
    Ok(Json(workflow::load_lead_detail(&state.db, id)?))
}

async fn add_conversation(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateConversationInput>,
) -> Result<Json<LeadDetail>, ApiError> {
    Ok(Json(workflow::add_conversation(
        &state.db, &identity, id, input,
    )?))
}

async fn add_followup(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateFollowupInput>,
) -> Result<Json<LeadDetail>, ApiError> {
    Ok(Json(workflow::add_followup(&state.db, id, input)?))
}

async fn toggle_followup(
    _identity: Identity,
    State(state): State<AppState>,
    Path((id, followup_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<LeadDetail>, ApiError> {
    Ok(Json(workflow::toggle_followup(&state.db, id, followup_id)?))
}

async fn save_ai_assist(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateAiAssistInput>,
) -> Result<Json<LeadDetail>, ApiError> {
    Ok(Json(workflow::save_ai_assist(&state.db, id, input)?))
}

async fn create_contract_draft(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateContractInput>,
) -> Result<Json<LeadDetail>, ApiError> {
    Ok(Json(workflow::create_contract_draft(&state.db, id, input)?))
}

async fn submit_contract_for_approval(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeadDetail>, ApiError> {
    Ok(Json(workflow::submit_contract_for_approval(&state.db, id)?))
}
