// src/db/user_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::user::User};

const USER_COLUMNS: &str =
    "id, name, email, cpf, role, email_verified, metadata, created_at, updated_at";

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // O CPF gravado pode estar formatado; comparamos apenas os dígitos.
    pub async fn find_by_credentials(&self, email: &str, cpf_digits: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
              AND regexp_replace(COALESCE(cpf, ''), '[^0-9]', '', 'g') = $2
            LIMIT 1
            "#
        ))
        .bind(email)
        .bind(cpf_digits)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list_by_role(&self, role: &str) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY name ASC"
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    // Cria um novo usuário (sempre com e-mail não verificado)
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        cpf: &str,
        role: &str,
        metadata: &Value,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, cpf, role, email_verified, metadata)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(cpf)
        .bind(role)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    // Lê a metadata travando a linha até o fim da transação
    pub async fn lock_metadata<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Value>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let metadata = sqlx::query_scalar::<_, Value>(
            "SELECT metadata FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(metadata)
    }

    pub async fn update_metadata<'e, E>(&self, executor: E, id: Uuid, metadata: &Value) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET metadata = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(metadata)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }
}
