// src/handlers/users.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, metadata::into_object},
    config::AppState,
    middleware::auth::ServiceContext,
    models::user::{
        CreateUserPayload, ListUsersQuery, UpdateUserMetadataPayload, User, UserPropertyGroup,
    },
};

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 400, description = "Campos obrigatórios faltando"),
        (status = 401, description = "Token ausente ou inválido"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("service_token" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    caller: ServiceContext,
    WithRejection(Json(payload), _): WithRejection<Json<CreateUserPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state.user_service.create_user(&payload).await?;
    tracing::debug!(by = %caller.permission, "Usuário criado via painel");

    Ok((StatusCode::CREATED, Json(user)))
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Usuários do papel pedido (padrão: clientes)", body = Vec<User>),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("service_token" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list_users(query.role.as_deref()).await?;
    Ok((StatusCode::OK, Json(users)))
}

// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("service_token" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.get_user(id).await?;
    Ok((StatusCode::OK, Json(user)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UpdateUserMetadataPayload,
    responses(
        (status = 200, description = "Metadata atualizada (merge)", body = User),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("service_token" = []))
)]
pub async fn update_user_metadata(
    State(app_state): State<AppState>,
    caller: ServiceContext,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateUserMetadataPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let patch = match payload.metadata {
        Some(metadata) if metadata.is_object() => into_object(metadata),
        _ => return Err(AppError::InvalidPayload("Dados inválidos".to_string())),
    };

    let user = app_state.user_service.merge_metadata(id, patch).await?;
    tracing::info!(user_id = %id, by = %caller.permission, "✏️ Metadata do usuário atualizada");

    Ok((StatusCode::OK, Json(user)))
}

// GET /api/users/{id}/properties
#[utoipa::path(
    get,
    path = "/api/users/{id}/properties",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Empreendimentos vinculados ao usuário", body = Vec<UserPropertyGroup>),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("service_token" = []))
)]
pub async fn get_user_properties(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let groups = app_state.user_service.user_properties(id).await?;
    Ok((StatusCode::OK, Json(groups)))
}
