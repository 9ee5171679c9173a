// src/db/indication_repo.rs

use chrono::Days;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::indication::{CreateIndicationPayload, Indication, IndicationFilter, IndicationStatus},
};

const INDICATION_COLUMNS: &str = "id, name, rg, cpf, phone, birth_date, address, property, bank, \
     is_client, indication, status, created_at, updated_at";

#[derive(Clone)]
pub struct IndicationRepository {
    pool: PgPool,
}

impl IndicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        payload: CreateIndicationPayload,
        status: IndicationStatus,
    ) -> Result<Indication, AppError> {
        let indication = sqlx::query_as::<_, Indication>(&format!(
            r#"
            INSERT INTO indications (
                name, rg, cpf, phone, birth_date,
                address, property, bank, is_client, indication, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {INDICATION_COLUMNS}
            "#
        ))
        .bind(payload.name)
        .bind(payload.rg)
        .bind(payload.cpf)
        .bind(payload.phone)
        .bind(payload.birth_date)
        .bind(Json(payload.address))
        .bind(payload.property)
        .bind(Json(payload.bank))
        .bind(payload.is_client)
        .bind(Json(payload.indication))
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(indication)
    }

    // Monta o WHERE dinamicamente conforme os filtros presentes
    pub async fn list(&self, filter: &IndicationFilter) -> Result<Vec<Indication>, AppError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {INDICATION_COLUMNS} FROM indications WHERE TRUE"));

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }

        if let Some(client) = filter.client {
            query.push(" AND is_client = ").push_bind(client.is_client());
        }

        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            query
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR cpf LIKE ")
                .push_bind(pattern.clone())
                .push(" OR phone LIKE ")
                .push_bind(pattern.clone())
                .push(" OR indication->>'name' ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(from) = filter.from {
            query.push(" AND created_at >= ").push_bind(from);
        }

        // `to` é inclusivo: tudo antes do dia seguinte
        if let Some(to) = filter.to.and_then(|d| d.checked_add_days(Days::new(1))) {
            query.push(" AND created_at < ").push_bind(to);
        }

        query.push(" ORDER BY created_at DESC");

        let indications = query
            .build_query_as::<Indication>()
            .fetch_all(&self.pool)
            .await?;

        Ok(indications)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: IndicationStatus,
    ) -> Result<Option<Indication>, AppError> {
        let indication = sqlx::query_as::<_, Indication>(&format!(
            r#"
            UPDATE indications
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {INDICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(indication)
    }
}
