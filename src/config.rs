// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{IndicationRepository, PropertyRepository, UserRepository},
    services::{
        auth::AuthService, indication_service::IndicationService,
        property_service::PropertyService, tokens::TokenKeys, user_service::UserService,
    },
};

pub const DEFAULT_INDICATION_ORIGIN: &str = "https://www.metrocasa.com.br";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    // Segredo compartilhado usado para assinar/verificar o service token
    pub api_key: String,
    pub bind_addr: String,
    pub indication_allowed_origin: String,
    pub session_ttl_hours: i64,
    pub service_token_ttl_hours: i64,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_key: required("API_KEY")?,
            bind_addr: optional("BIND_ADDR", "0.0.0.0:3000"),
            indication_allowed_origin: optional(
                "INDICATION_ALLOWED_ORIGIN",
                DEFAULT_INDICATION_ORIGIN,
            ),
            session_ttl_hours: parsed("SESSION_TTL_HOURS", 24 * 7)?,
            service_token_ttl_hours: parsed("SERVICE_TOKEN_TTL_HOURS", 12)?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    let value = env::var(key).with_context(|| format!("{key} deve ser definida"))?;
    if value.trim().is_empty() {
        anyhow::bail!("{key} não pode ser vazia");
    }
    Ok(value)
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} possui um valor inválido: {raw}")),
        _ => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub tokens: TokenKeys,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub property_service: PropertyService,
    pub indication_service: IndicationService,
}

impl AppState {
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: AppConfig) -> Self {
        let tokens = TokenKeys::new(
            &config.jwt_secret,
            &config.api_key,
            chrono::Duration::hours(config.session_ttl_hours),
            chrono::Duration::hours(config.service_token_ttl_hours),
        );

        let user_repo = UserRepository::new(db_pool.clone());
        let property_repo = PropertyRepository::new(db_pool.clone());
        let indication_repo = IndicationRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), tokens.clone());
        let user_service =
            UserService::new(user_repo, property_repo.clone(), db_pool.clone());
        let property_service = PropertyService::new(property_repo, db_pool.clone());
        let indication_service = IndicationService::new(indication_repo);

        Self {
            db_pool,
            config: Arc::new(config),
            tokens,
            auth_service,
            user_service,
            property_service,
            indication_service,
        }
    }
}
