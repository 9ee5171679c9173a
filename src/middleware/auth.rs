// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::SessionUser,
    services::access::AuthContext,
};

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

// Gate de todas as rotas /api (exceto /api/auth e a indicação pública).
// Valida o service token e deixa o contexto nos "extensions" da requisição.
pub async fn service_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let context = authorize_service(&app_state, request.headers(), request.uri().path())?;
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

fn authorize_service(app_state: &AppState, headers: &HeaderMap, path: &str) -> Result<ServiceContext, AppError> {
    let Some(token) = bearer_token(headers) else {
        tracing::warn!(path = %path, "🚫 Requisição sem token");
        return Err(AppError::MissingToken);
    };

    let claims = app_state.tokens.validate_service_token(&token).inspect_err(|_| {
        tracing::warn!(path = %path, "🚫 Service token rejeitado");
    })?;

    Ok(ServiceContext {
        permission: claims.permission,
        issued_at: claims.iat,
    })
}

// Fallback do router: caminhos /api desconhecidos (fora de /api/auth) passam
// pelo gate antes do 404, como as rotas existentes.
pub async fn api_fallback(State(app_state): State<AppState>, uri: Uri, headers: HeaderMap) -> AppError {
    let path = uri.path();
    if path.starts_with("/api/") && !path.starts_with("/api/auth/") {
        if let Err(e) = authorize_service(&app_state, &headers, path) {
            return e;
        }
    }
    AppError::RouteNotFound
}

/// Quem está chamando a API, segundo o service token.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub permission: String,
    pub issued_at: i64,
}

// Extrator para obter o contexto do gate diretamente nos handlers
impl<S> FromRequestParts<S> for ServiceContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ServiceContext>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}

/// Usuário da sessão, lido do token de sessão enviado como Bearer.
pub struct SessionAuth(pub SessionUser);

impl SessionAuth {
    pub fn auth_context(&self) -> AuthContext {
        AuthContext::new(self.0.permission())
    }
}

impl<S> FromRequestParts<S> for SessionAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(&parts.headers).ok_or(AppError::MissingToken)?;
        let claims = app_state.tokens.validate_session_token(&token)?;

        Ok(SessionAuth(claims.user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(authorization: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(authorization));
        headers
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).as_deref(), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer   abc ")).as_deref(), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
