// src/services/tokens.rs

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{ServiceClaims, SessionClaims, SessionUser},
    services::access::is_allowed_permission,
};

// Folga para relógios levemente adiantados no cliente
const CLOCK_SKEW_SECS: i64 = 60;

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Emite e valida os dois tokens do painel:
/// o token de sessão (JWT_SECRET) e o service token (API_KEY) usado nas chamadas à API.
#[derive(Clone)]
pub struct TokenKeys {
    session: Arc<KeyPair>,
    service: Arc<KeyPair>,
    session_ttl: Duration,
    service_ttl: Duration,
}

impl TokenKeys {
    pub fn new(jwt_secret: &str, api_key: &str, session_ttl: Duration, service_ttl: Duration) -> Self {
        Self {
            session: Arc::new(KeyPair::from_secret(jwt_secret)),
            service: Arc::new(KeyPair::from_secret(api_key)),
            session_ttl,
            service_ttl,
        }
    }

    pub fn issue_session_token(&self, user: &SessionUser, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = SessionClaims {
            sub: user.id,
            user: user.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.session_ttl).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.session.encoding)?)
    }

    pub fn validate_session_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<SessionClaims>(token, &self.session.decoding, &validation)
            .map_err(|_| AppError::InvalidToken)?;

        Ok(data.claims)
    }

    pub fn issue_service_token(&self, permission: &str, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = ServiceClaims {
            permission: permission.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.service_ttl).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.service.encoding)?)
    }

    /// Aceita só tokens assinados com a API_KEY, dentro da validade,
    /// com timestamp coerente e permissão na lista global.
    pub fn validate_service_token(&self, token: &str) -> Result<ServiceClaims, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<ServiceClaims>(token, &self.service.decoding, &validation)
            .map_err(|_| AppError::InvalidToken)?
            .claims;

        let now = Utc::now().timestamp();
        if claims.iat <= 0 || claims.iat > now + CLOCK_SKEW_SECS {
            return Err(AppError::InvalidToken);
        }

        if !is_allowed_permission(&claims.permission) {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn keys() -> TokenKeys {
        TokenKeys::new("session-secret", "api-key", Duration::hours(168), Duration::hours(12))
    }

    fn user(permission: &str) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            name: "Ana Souza".into(),
            email: "ana@metrocasa.com.br".into(),
            cpf: "12345678909".into(),
            role: "cac".into(),
            metadata: json!({ "permission": permission }),
            login_timestamp: Utc::now().timestamp_millis(),
        }
    }

    #[test]
    fn service_token_for_staff_permission_is_accepted() {
        let keys = keys();
        let token = keys.issue_service_token("cac senior", Utc::now()).unwrap();

        let claims = keys.validate_service_token(&token).unwrap();
        assert_eq!(claims.permission, "cac senior");
    }

    #[test]
    fn service_token_signed_with_other_key_is_rejected() {
        let other = TokenKeys::new("session-secret", "outra-chave", Duration::hours(1), Duration::hours(1));
        let token = other.issue_service_token("admin", Utc::now()).unwrap();

        assert!(matches!(keys().validate_service_token(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn service_token_with_unknown_or_empty_permission_is_rejected() {
        let keys = keys();
        for permission in ["customer", "", "ADMIN"] {
            let token = keys.issue_service_token(permission, Utc::now()).unwrap();
            assert!(keys.validate_service_token(&token).is_err(), "{permission:?}");
        }
    }

    #[test]
    fn expired_service_token_is_rejected() {
        let keys = keys();
        let token = keys
            .issue_service_token("admin", Utc::now() - Duration::hours(13))
            .unwrap();

        assert!(keys.validate_service_token(&token).is_err());
    }

    #[test]
    fn service_token_from_the_future_is_rejected() {
        let keys = keys();
        let token = keys
            .issue_service_token("admin", Utc::now() + Duration::hours(1))
            .unwrap();

        assert!(keys.validate_service_token(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = keys();
        // O antigo formato base64("permission.timestamp.apiKey") não é mais aceito
        assert!(keys.validate_service_token("YWRtaW4uMTcwMDAwMDAwMC5hcGkta2V5").is_err());
        assert!(keys.validate_service_token("a.b.c").is_err());
        assert!(keys.validate_service_token("").is_err());
    }

    #[test]
    fn session_token_round_trip_keeps_metadata() {
        let keys = keys();
        let user = user("cac analyst");
        let token = keys.issue_session_token(&user, Utc::now()).unwrap();

        let claims = keys.validate_session_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.user, user);
        assert_eq!(claims.user.permission(), Some("cac analyst"));
    }

    #[test]
    fn session_and_service_tokens_are_not_interchangeable() {
        let keys = keys();
        let session = keys.issue_session_token(&user("admin"), Utc::now()).unwrap();
        let service = keys.issue_service_token("admin", Utc::now()).unwrap();

        assert!(keys.validate_service_token(&session).is_err());
        assert!(keys.validate_session_token(&service).is_err());
    }
}
