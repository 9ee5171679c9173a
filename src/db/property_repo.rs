// src/db/property_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::property::{Property, PropertyStatus, PropertySummary, PropertyTourRow},
};

const PROPERTY_COLUMNS: &str = "id, title, address, project_status, facade, logo, images, \
     project_evolution, metadata, created_at, updated_at";

#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Property>, AppError> {
        let properties = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY title ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }

    pub async fn list_by_status(&self, status: PropertyStatus) -> Result<Vec<Property>, AppError> {
        let properties = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE project_status = $1 ORDER BY title ASC"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    pub async fn find_summaries(&self, ids: &[Uuid]) -> Result<Vec<PropertySummary>, AppError> {
        let summaries = sqlx::query_as::<_, PropertySummary>(
            r#"
            SELECT id, title, project_status, facade, address, project_evolution
            FROM properties
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    pub async fn update_project_evolution(
        &self,
        id: Uuid,
        project_evolution: &Value,
    ) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>(&format!(
            r#"
            UPDATE properties
            SET project_evolution = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(project_evolution)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    pub async fn list_tours(&self, limit: i64) -> Result<Vec<PropertyTourRow>, AppError> {
        let rows = sqlx::query_as::<_, PropertyTourRow>(
            "SELECT id, title, facade, metadata FROM properties ORDER BY title ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_tour(&self, id: Uuid) -> Result<Option<PropertyTourRow>, AppError> {
        let row = sqlx::query_as::<_, PropertyTourRow>(
            "SELECT id, title, facade, metadata FROM properties WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // Lê a metadata travando a linha até o fim da transação
    pub async fn lock_metadata<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Value>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let metadata = sqlx::query_scalar::<_, Value>(
            "SELECT metadata FROM properties WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(metadata)
    }

    pub async fn update_metadata<'e, E>(&self, executor: E, id: Uuid, metadata: &Value) -> Result<Property, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let property = sqlx::query_as::<_, Property>(&format!(
            r#"
            UPDATE properties
            SET metadata = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(metadata)
        .fetch_one(executor)
        .await?;

        Ok(property)
    }
}
