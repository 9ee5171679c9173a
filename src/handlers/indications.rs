// src/handlers/indications.rs

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::ServiceContext,
    models::indication::{
        CreateIndicationPayload, CreateIndicationResponse, Indication, IndicationFilter,
        UpdateIndicationStatusPayload,
    },
};

// Toda resposta da rota pública leva o Allow-Origin do site institucional
fn cors_headers(allowed_origin: &str) -> [(HeaderName, HeaderValue); 1] {
    let origin = HeaderValue::from_str(allowed_origin).unwrap_or(HeaderValue::from_static("null"));
    [(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin)]
}

fn origin_allowed(headers: &HeaderMap, allowed_origin: &str) -> bool {
    headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|origin| origin == allowed_origin)
}

// OPTIONS /api/indicacao
pub async fn indication_preflight(State(app_state): State<AppState>) -> Response {
    let origin = &app_state.config.indication_allowed_origin;

    (
        StatusCode::OK,
        cors_headers(origin),
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS")),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type")),
        ],
        Json(json!({})),
    )
        .into_response()
}

// POST /api/indicacao
#[utoipa::path(
    post,
    path = "/api/indicacao",
    tag = "Indicações",
    request_body = CreateIndicationPayload,
    responses(
        (status = 201, description = "Indicação registrada com status new", body = CreateIndicationResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Origem não permitida")
    )
)]
pub async fn create_indication(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let allowed_origin = app_state.config.indication_allowed_origin.as_str();

    // A origem é checada antes de olhar o corpo: nada é gravado para origens estranhas
    if !origin_allowed(&headers, allowed_origin) {
        tracing::warn!(
            origin = ?headers.get(header::ORIGIN),
            "🚫 Indicação recusada por origem"
        );
        return (cors_headers(allowed_origin), AppError::ForbiddenOrigin).into_response();
    }

    match store_indication(&app_state, &body).await {
        Ok(indication) => (
            StatusCode::CREATED,
            cors_headers(allowed_origin),
            Json(CreateIndicationResponse { success: true, data: indication }),
        )
            .into_response(),
        Err(e) => (cors_headers(allowed_origin), e).into_response(),
    }
}

async fn store_indication(app_state: &AppState, body: &[u8]) -> Result<Indication, AppError> {
    let payload: CreateIndicationPayload = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidPayload(format!("Dados inválidos: {e}")))?;
    payload.validate()?;

    app_state.indication_service.create_indication(payload).await
}

// GET /api/indicacao
#[utoipa::path(
    get,
    path = "/api/indicacao",
    tag = "Indicações",
    params(IndicationFilter),
    responses(
        (status = 200, description = "Indicações, mais recentes primeiro", body = Vec<Indication>),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("service_token" = []))
)]
pub async fn list_indications(
    State(app_state): State<AppState>,
    Query(filter): Query<IndicationFilter>,
) -> Result<impl IntoResponse, AppError> {
    let indications = app_state.indication_service.list_indications(&filter).await?;
    Ok((StatusCode::OK, Json(indications)))
}

// PATCH /api/indicacao/{id}/status
#[utoipa::path(
    patch,
    path = "/api/indicacao/{id}/status",
    tag = "Indicações",
    params(("id" = Uuid, Path, description = "ID da indicação")),
    request_body = UpdateIndicationStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Indication),
        (status = 404, description = "Indicação não encontrada")
    ),
    security(("service_token" = []))
)]
pub async fn update_indication_status(
    State(app_state): State<AppState>,
    caller: ServiceContext,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateIndicationStatusPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let indication = app_state
        .indication_service
        .update_status(id, payload.status)
        .await?;
    tracing::info!(indication_id = %id, status = ?payload.status, by = %caller.permission, "📋 Status da indicação alterado");

    Ok((StatusCode::OK, Json(indication)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_origin_is_allowed() {
        let allowed = "https://www.metrocasa.com.br";
        let mut headers = HeaderMap::new();
        assert!(!origin_allowed(&headers, allowed));

        headers.insert(header::ORIGIN, HeaderValue::from_static("https://metrocasa.com.br"));
        assert!(!origin_allowed(&headers, allowed));

        headers.insert(header::ORIGIN, HeaderValue::from_static("https://www.metrocasa.com.br"));
        assert!(origin_allowed(&headers, allowed));
    }
}
