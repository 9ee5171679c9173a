// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::{api_fallback, service_guard},
};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (fora do gate do service token)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/session", get(handlers::auth::get_session))
        .route("/capabilities", get(handlers::auth::list_capabilities))
        .route("/access/{capability}", get(handlers::auth::check_page_access));

    let user_routes = Router::new()
        .route(
            "/",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route(
            "/{id}",
            get(handlers::users::get_user).put(handlers::users::update_user_metadata),
        )
        .route("/{id}/properties", get(handlers::users::get_user_properties))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            service_guard,
        ));

    let property_routes = Router::new()
        .route("/", get(handlers::properties::list_properties))
        .route("/obras", get(handlers::properties::list_obras))
        .route("/tour", get(handlers::properties::list_tours))
        .route(
            "/tour/{id}",
            get(handlers::properties::get_tour).put(handlers::properties::update_tour),
        )
        .route(
            "/{id}",
            get(handlers::properties::get_property)
                .put(handlers::properties::update_project_evolution),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            service_guard,
        ));

    // Listagem e triagem das indicações ficam atrás do gate...
    let indication_admin_routes = Router::new()
        .route("/api/indicacao", get(handlers::indications::list_indications))
        .route(
            "/api/indicacao/{id}/status",
            patch(handlers::indications::update_indication_status),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            service_guard,
        ));

    // ...já o envio vem do site público, protegido apenas pela origem
    let indication_public_routes = Router::new().route(
        "/api/indicacao",
        post(handlers::indications::create_indication)
            .options(handlers::indications::indication_preflight),
    );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/properties", property_routes)
        .merge(indication_admin_routes)
        .merge(indication_public_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(api_fallback)
        .with_state(app_state)
}
