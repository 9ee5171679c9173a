// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_session,
        handlers::auth::list_capabilities,
        handlers::auth::check_page_access,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user_metadata,
        handlers::users::get_user_properties,

        // --- Properties ---
        handlers::properties::list_properties,
        handlers::properties::list_obras,
        handlers::properties::get_property,
        handlers::properties::update_project_evolution,
        handlers::properties::list_tours,
        handlers::properties::get_tour,
        handlers::properties::update_tour,

        // --- Indicações ---
        handlers::indications::create_indication,
        handlers::indications::list_indications,
        handlers::indications::update_indication_status,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::LoginResponse,
            models::auth::SessionUser,
            services::access::Capability,
            services::access::PageDecision,
            handlers::auth::CapabilityEntry,
            handlers::auth::PageAccessResponse,

            // --- Users ---
            models::user::User,
            models::user::PropertyLink,
            models::user::CreateUserPayload,
            models::user::UpdateUserMetadataPayload,
            models::user::UserPropertyGroup,

            // --- Properties ---
            models::property::PropertyStatus,
            models::property::Property,
            models::property::PropertySummary,
            models::property::PropertyTour,
            models::property::UpdateTourPayload,
            models::property::UpdateTourResponse,
            models::property::UpdateEvolutionPayload,

            // --- Indicações ---
            models::indication::IndicationStatus,
            models::indication::IndicationAddress,
            models::indication::BankDetails,
            models::indication::Referrer,
            models::indication::Indication,
            models::indication::CreateIndicationPayload,
            models::indication::CreateIndicationResponse,
            models::indication::UpdateIndicationStatusPayload,
            models::indication::ClientFilter,
        )
    ),
    tags(
        (name = "Auth", description = "Login por e-mail + CPF, sessão e guardião de páginas"),
        (name = "Users", description = "Gestão de usuários e permissões"),
        (name = "Properties", description = "Empreendimentos e evolução das obras"),
        (name = "Tours", description = "Links de tour virtual"),
        (name = "Indicações", description = "Indicações de clientes")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "service_token",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
        components.add_security_scheme(
            "session_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_public_and_gated_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        assert!(paths.contains(&"/api/auth/login"));
        assert!(paths.contains(&"/api/properties/tour/{id}"));
        assert!(paths.contains(&"/api/indicacao"));
    }
}
