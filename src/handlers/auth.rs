// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::SessionAuth,
    models::auth::{LoginPayload, LoginResponse, SessionUser},
    services::access::{evaluate_page_access, Capability, PageDecision},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão aberta", body = LoginResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "E-mail ou CPF inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginPayload>, AppError>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let response = app_state
        .auth_service
        .login_user(payload.email.trim(), &payload.cpf)
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::InvalidCredentials) {
                tracing::warn!("🔐 Tentativa de login recusada");
            }
        })?;

    tracing::info!(user_id = %response.user.id, "🔐 Login efetuado");
    Ok(Json(response))
}

// GET /api/auth/session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário da sessão", body = SessionUser),
        (status = 401, description = "Sessão ausente ou expirada")
    ),
    security(("session_jwt" = []))
)]
pub async fn get_session(SessionAuth(user): SessionAuth) -> Json<SessionUser> {
    Json(user)
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityEntry {
    pub capability: Capability,
    pub allowed_permissions: Vec<String>,
    pub granted: bool,
}

// GET /api/auth/capabilities
#[utoipa::path(
    get,
    path = "/api/auth/capabilities",
    tag = "Auth",
    responses(
        (status = 200, description = "Tabela de capacidades e o que a sessão pode acessar", body = Vec<CapabilityEntry>),
        (status = 401, description = "Sessão ausente ou expirada")
    ),
    security(("session_jwt" = []))
)]
pub async fn list_capabilities(session: SessionAuth) -> Json<Vec<CapabilityEntry>> {
    let ctx = session.auth_context();

    let entries = Capability::ALL
        .into_iter()
        .map(|capability| CapabilityEntry {
            capability,
            allowed_permissions: capability
                .allowed_permissions()
                .iter()
                .map(|p| p.to_string())
                .collect(),
            granted: ctx.can(capability),
        })
        .collect();

    Json(entries)
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageAccessResponse {
    pub capability: String,
    pub decision: PageDecision,
    pub redirect_to: Option<String>,
}

// GET /api/auth/access/{capability}
#[utoipa::path(
    get,
    path = "/api/auth/access/{capability}",
    tag = "Auth",
    params(("capability" = String, Path, description = "OBRAS, ADMIN, USERS ou VIDEO")),
    responses(
        (status = 200, description = "Decisão do guardião de página", body = PageAccessResponse),
        (status = 401, description = "Sessão ausente ou expirada")
    ),
    security(("session_jwt" = []))
)]
pub async fn check_page_access(
    session: SessionAuth,
    Path(capability): Path<String>,
) -> Json<PageAccessResponse> {
    let decision = evaluate_page_access(&session.auth_context(), &capability);

    Json(PageAccessResponse {
        capability,
        decision,
        redirect_to: decision.redirect_to().map(str::to_string),
    })
}
