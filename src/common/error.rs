use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Todos os erros da API passam por aqui e viram uma resposta JSON `{ "error": ... }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("Dados inválidos: {0}")]
    InvalidPayload(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token ausente")]
    MissingToken,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Origem não permitida")]
    ForbiddenOrigin,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Empreendimento não encontrado")]
    PropertyNotFound,

    #[error("Indicação não encontrada")]
    IndicationNotFound,

    #[error("Rota não encontrada")]
    RouteNotFound,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Qualquer outro erro inesperado, com o contexto do anyhow.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::JsonRejection(_)
            | AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::MissingToken | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ForbiddenOrigin => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::PropertyNotFound
            | AppError::IndicationNotFound
            | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::JwtError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Campos obrigatórios faltando ou inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::JsonRejection(rejection) => {
                tracing::debug!("Corpo rejeitado: {}", rejection.body_text());
                "Dados inválidos.".to_string()
            }
            AppError::InvalidPayload(reason) => reason,
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".to_string(),
            AppError::InvalidCredentials => "E-mail ou CPF inválidos.".to_string(),
            AppError::MissingToken => "Token ausente".to_string(),
            AppError::InvalidToken => "Token inválido".to_string(),
            AppError::ForbiddenOrigin => "Forbidden origin".to_string(),
            AppError::UserNotFound => "Usuário não encontrado".to_string(),
            AppError::PropertyNotFound => "Empreendimento não encontrado".to_string(),
            AppError::IndicationNotFound => "Indicação não encontrada".to_string(),
            AppError::RouteNotFound => "Rota não encontrada".to_string(),

            // Erros de banco, JWT e internos viram 500 com mensagem genérica.
            // O detalhe completo fica só no log do servidor.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
