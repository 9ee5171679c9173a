// src/models/auth.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Dados para login: e-mail + CPF (o CPF funciona como segredo compartilhado)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ana@metrocasa.com.br")]
    pub email: String,

    // Sem checagem de formato: CPF errado responde 401 como qualquer credencial inválida
    #[schema(example = "123.456.789-09")]
    pub cpf: String,
}

/// Identidade mínima guardada na sessão do cliente.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: String,
    #[schema(example = "cac")]
    pub role: String,
    #[schema(value_type = Object)]
    pub metadata: Value,
    /// Momento do login em milissegundos desde a época Unix.
    pub login_timestamp: i64,
}

impl SessionUser {
    pub fn permission(&self) -> Option<&str> {
        self.metadata
            .get("permission")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
    }
}

// Resposta do login com os dois tokens
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_token: String,
    /// Enviado como `Authorization: Bearer` em todas as chamadas a /api.
    pub service_token: String,
    pub user: SessionUser,
}

// Claims do token de sessão (assinado com JWT_SECRET)
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    #[serde(flatten)]
    pub user: SessionUser,
    pub iat: i64,
    pub exp: i64,
}

// Claims do service token (assinado com API_KEY)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceClaims {
    pub permission: String,
    pub iat: i64,
    pub exp: i64,
}
