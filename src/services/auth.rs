// src/services/auth.rs

use chrono::Utc;

use crate::{
    common::{cpf::normalize_cpf, error::AppError},
    db::UserRepository,
    models::{
        auth::{LoginResponse, SessionUser},
        user::User,
    },
    services::tokens::TokenKeys,
};

const CPF_DIGITS: usize = 11;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tokens: TokenKeys,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, tokens: TokenKeys) -> Self {
        Self { user_repo, tokens }
    }

    // Verificador de credenciais: e-mail exato + CPF comparado só pelos dígitos.
    pub async fn verify_credentials(&self, email: &str, cpf: &str) -> Result<SessionUser, AppError> {
        // CPF malformado é credencial errada (401), não erro de validação
        let cpf_digits = normalize_cpf(cpf);
        if cpf_digits.len() != CPF_DIGITS {
            return Err(AppError::InvalidCredentials);
        }

        let user = self
            .user_repo
            .find_by_credentials(email, &cpf_digits)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        session_user_from(user, Utc::now().timestamp_millis()).ok_or(AppError::InvalidCredentials)
    }

    pub async fn login_user(&self, email: &str, cpf: &str) -> Result<LoginResponse, AppError> {
        let user = self.verify_credentials(email, cpf).await?;
        self.issue_session(user)
    }

    /// Emite o token de sessão e o service token derivado da permissão do usuário.
    pub fn issue_session(&self, user: SessionUser) -> Result<LoginResponse, AppError> {
        let now = Utc::now();

        let session_token = self.tokens.issue_session_token(&user, now)?;
        let service_token = self
            .tokens
            .issue_service_token(user.permission().unwrap_or_default(), now)?;

        Ok(LoginResponse {
            session_token,
            service_token,
            user,
        })
    }
}

// Só usuários com CPF e papel preenchidos podem abrir sessão.
fn session_user_from(user: User, login_timestamp: i64) -> Option<SessionUser> {
    let cpf = user.cpf.filter(|c| !c.trim().is_empty())?;
    let role = user.role.filter(|r| !r.trim().is_empty())?;

    let metadata = if user.metadata.is_object() {
        user.metadata
    } else {
        serde_json::json!({})
    };

    Some(SessionUser {
        id: user.id,
        name: user.name,
        email: user.email,
        cpf,
        role,
        metadata,
        login_timestamp,
    })
}
