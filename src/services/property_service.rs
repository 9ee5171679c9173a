// src/services/property_service.rs

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, metadata::with_tour},
    db::PropertyRepository,
    models::property::{Property, PropertyStatus, PropertyTour},
};

// Limite da listagem de tours
pub const TOUR_LIST_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct PropertyService {
    repo: PropertyRepository,
    pool: PgPool,
}

impl PropertyService {
    pub fn new(repo: PropertyRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_properties(&self) -> Result<Vec<Property>, AppError> {
        self.repo.list_all().await
    }

    // Obras = empreendimentos em construção
    pub async fn list_obras(&self) -> Result<Vec<Property>, AppError> {
        self.repo.list_by_status(PropertyStatus::UnderConstruction).await
    }

    pub async fn get_property(&self, id: Uuid) -> Result<Property, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::PropertyNotFound)
    }

    pub async fn update_project_evolution(&self, id: Uuid, project_evolution: &Value) -> Result<Property, AppError> {
        self.repo
            .update_project_evolution(id, project_evolution)
            .await?
            .ok_or(AppError::PropertyNotFound)
    }

    pub async fn list_tours(&self) -> Result<Vec<PropertyTour>, AppError> {
        let rows = self.repo.list_tours(TOUR_LIST_LIMIT).await?;
        Ok(rows.into_iter().map(PropertyTour::from).collect())
    }

    pub async fn get_tour(&self, id: Uuid) -> Result<PropertyTour, AppError> {
        self.repo
            .find_tour(id)
            .await?
            .map(PropertyTour::from)
            .ok_or(AppError::PropertyNotFound)
    }

    /// Grava só `metadata.tour`, preservando as outras chaves.
    /// A linha fica travada entre a leitura e a escrita, então edições
    /// concorrentes no mesmo empreendimento não se sobrescrevem.
    pub async fn update_tour(&self, id: Uuid, tour: &str) -> Result<Property, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .repo
            .lock_metadata(&mut *tx, id)
            .await?
            .ok_or(AppError::PropertyNotFound)?;

        let property = self
            .repo
            .update_metadata(&mut *tx, id, &with_tour(current, tour.trim()))
            .await?;

        tx.commit().await?;

        tracing::info!(property_id = %id, "🎥 Tour atualizado");
        Ok(property)
    }
}
