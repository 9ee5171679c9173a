// src/services/indication_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::IndicationRepository,
    models::indication::{CreateIndicationPayload, Indication, IndicationFilter, IndicationStatus},
};

#[derive(Clone)]
pub struct IndicationService {
    repo: IndicationRepository,
}

impl IndicationService {
    pub fn new(repo: IndicationRepository) -> Self {
        Self { repo }
    }

    // Toda indicação nova entra como `new`, independente do que o site mande
    pub async fn create_indication(&self, payload: CreateIndicationPayload) -> Result<Indication, AppError> {
        let indication = self.repo.create(payload, IndicationStatus::New).await?;
        tracing::info!(indication_id = %indication.id, "📨 Nova indicação recebida");
        Ok(indication)
    }

    pub async fn list_indications(&self, filter: &IndicationFilter) -> Result<Vec<Indication>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn update_status(&self, id: Uuid, status: IndicationStatus) -> Result<Indication, AppError> {
        self.repo
            .update_status(id, status)
            .await?
            .ok_or(AppError::IndicationNotFound)
    }
}
