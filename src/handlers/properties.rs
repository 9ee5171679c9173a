// src/handlers/properties.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::ServiceContext,
    models::property::{
        Property, PropertyTour, UpdateEvolutionPayload, UpdateTourPayload, UpdateTourResponse,
    },
};

// GET /api/properties
#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Properties",
    responses(
        (status = 200, description = "Todos os empreendimentos", body = Vec<Property>),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("service_token" = []))
)]
pub async fn list_properties(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let properties = app_state.property_service.list_properties().await?;
    Ok((StatusCode::OK, Json(properties)))
}

// GET /api/properties/obras
#[utoipa::path(
    get,
    path = "/api/properties/obras",
    tag = "Properties",
    responses(
        (status = 200, description = "Empreendimentos em construção, por título", body = Vec<Property>),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("service_token" = []))
)]
pub async fn list_obras(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let properties = app_state.property_service.list_obras().await?;
    Ok((StatusCode::OK, Json(properties)))
}

// GET /api/properties/{id}
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do empreendimento")),
    responses(
        (status = 200, description = "Empreendimento", body = Property),
        (status = 404, description = "Empreendimento não encontrado")
    ),
    security(("service_token" = []))
)]
pub async fn get_property(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let property = app_state.property_service.get_property(id).await?;
    Ok((StatusCode::OK, Json(property)))
}

// PUT /api/properties/{id}
#[utoipa::path(
    put,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do empreendimento")),
    request_body = UpdateEvolutionPayload,
    responses(
        (status = 200, description = "Evolução da obra atualizada", body = Property),
        (status = 400, description = "Percentuais inválidos"),
        (status = 404, description = "Empreendimento não encontrado")
    ),
    security(("service_token" = []))
)]
pub async fn update_project_evolution(
    State(app_state): State<AppState>,
    caller: ServiceContext,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateEvolutionPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let property = app_state
        .property_service
        .update_project_evolution(id, &payload.project_evolution)
        .await?;
    tracing::info!(property_id = %id, by = %caller.permission, "🏗️ Evolução da obra atualizada");

    Ok((StatusCode::OK, Json(property)))
}

// GET /api/properties/tour
#[utoipa::path(
    get,
    path = "/api/properties/tour",
    tag = "Tours",
    responses(
        (status = 200, description = "Até 100 empreendimentos com seus tours", body = Vec<PropertyTour>),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("service_token" = []))
)]
pub async fn list_tours(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tours = app_state.property_service.list_tours().await?;
    Ok((StatusCode::OK, Json(tours)))
}

// GET /api/properties/tour/{id}
#[utoipa::path(
    get,
    path = "/api/properties/tour/{id}",
    tag = "Tours",
    params(("id" = Uuid, Path, description = "ID do empreendimento")),
    responses(
        (status = 200, description = "Tour do empreendimento", body = PropertyTour),
        (status = 404, description = "Empreendimento não encontrado")
    ),
    security(("service_token" = []))
)]
pub async fn get_tour(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tour = app_state.property_service.get_tour(id).await?;
    Ok((StatusCode::OK, Json(tour)))
}

// PUT /api/properties/tour/{id}
#[utoipa::path(
    put,
    path = "/api/properties/tour/{id}",
    tag = "Tours",
    params(("id" = Uuid, Path, description = "ID do empreendimento")),
    request_body = UpdateTourPayload,
    responses(
        (status = 200, description = "Tour gravado em metadata.tour", body = UpdateTourResponse),
        (status = 400, description = "URL inválida"),
        (status = 404, description = "Empreendimento não encontrado")
    ),
    security(("service_token" = []))
)]
pub async fn update_tour(
    State(app_state): State<AppState>,
    caller: ServiceContext,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateTourPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let updated = app_state.property_service.update_tour(id, &payload.tour).await?;
    tracing::debug!(by = %caller.permission, "Tour editado via painel");

    Ok((StatusCode::OK, Json(UpdateTourResponse { success: true, updated })))
}
