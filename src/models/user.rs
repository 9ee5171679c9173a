// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{common::cpf::validate_cpf, models::property::PropertySummary};

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: Option<String>,
    pub role: Option<String>,
    pub email_verified: bool,

    // Saco de dados aberto: `permission`, `properties`, `phone`, ...
    #[schema(value_type = Object)]
    pub metadata: Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vínculo de um usuário com uma unidade vendida num empreendimento.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PropertyLink {
    pub property_id: Option<String>,
    /// Número da venda
    pub num_ven: Option<i64>,
    pub obra_ven: Option<String>,
    pub status_ven: Option<i64>,
    /// Código da empresa
    pub empresa_ven: Option<i64>,
}

/// Visão tipada das chaves conhecidas de `users.metadata`.
#[derive(Debug, Default, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyLink>,
}

impl UserMetadata {
    // Metadata malformada é lida como vazia, nunca derruba a requisição.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Ana Souza")]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ana@metrocasa.com.br")]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_cpf"))]
    #[schema(example = "12345678909")]
    pub cpf: String,

    // Papel solicitado; o papel gravado é derivado dele
    #[serde(default)]
    #[validate(length(min = 1, message = "O papel é obrigatório."))]
    #[schema(example = "cac senior")]
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserMetadataPayload {
    #[schema(value_type = Object)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Papel a filtrar (padrão: `customer`).
    pub role: Option<String>,
}

/// Um empreendimento do usuário e as vendas vinculadas a ele.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPropertyGroup {
    pub property_id: Uuid,
    pub property: Option<PropertySummary>,
    pub links: Vec<PropertyLink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_permission_and_property_links() {
        let metadata = json!({
            "permission": "cac analyst",
            "phone": "11999990000",
            "properties": [
                { "property_id": "0b6f4a52-4c52-4d0e-9d7e-1a2b3c4d5e6f", "num_ven": 12, "status_ven": 1, "empresa_ven": 7 }
            ]
        });

        let parsed = UserMetadata::from_value(&metadata);
        assert_eq!(parsed.permission.as_deref(), Some("cac analyst"));
        assert_eq!(parsed.properties.len(), 1);
        assert_eq!(parsed.properties[0].num_ven, Some(12));
        assert_eq!(parsed.properties[0].obra_ven, None);
    }

    #[test]
    fn malformed_metadata_reads_as_empty() {
        let parsed = UserMetadata::from_value(&json!({ "properties": "nope" }));
        assert!(parsed.permission.is_none());
        assert!(parsed.properties.is_empty());

        assert!(UserMetadata::from_value(&Value::Null).properties.is_empty());
    }

    #[test]
    fn missing_fields_fail_validation() {
        let payload: CreateUserPayload =
            serde_json::from_value(json!({ "name": "Ana", "email": "ana@metrocasa.com.br" }))
                .unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("cpf"));
        assert!(fields.contains_key("role"));
        assert!(!fields.contains_key("name"));
    }
}
