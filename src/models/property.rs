// src/models/property.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::metadata::tour_from_metadata;

// Mapeia o CREATE TYPE property_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "property_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    UnderConstruction,
    Launch,
    ReadyToMoveIn,
}

// Empreendimento completo
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Property {
    pub id: Uuid,
    #[schema(example = "Metrocasa Vila Mariana")]
    pub title: String,
    #[schema(value_type = Object)]
    pub address: Value,
    pub project_status: PropertyStatus,
    pub facade: Option<String>,
    pub logo: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub images: Value,
    // Percentual por etapa da obra, ex: { "project_percentage": 45, "fundacao": 100 }
    #[schema(value_type = Object)]
    pub project_evolution: Value,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Versão enxuta usada na visualização de um usuário
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PropertySummary {
    pub id: Uuid,
    pub title: String,
    pub project_status: PropertyStatus,
    pub facade: Option<String>,
    #[schema(value_type = Object)]
    pub address: Value,
    #[schema(value_type = Object)]
    pub project_evolution: Value,
}

#[derive(Debug, FromRow)]
pub struct PropertyTourRow {
    pub id: Uuid,
    pub title: String,
    pub facade: Option<String>,
    pub metadata: Value,
}

/// Link do tour virtual de um empreendimento (vazio quando não cadastrado).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertyTour {
    pub id: Uuid,
    pub title: String,
    pub facade: Option<String>,
    #[schema(example = "https://my.matterport.com/show/?m=abc123")]
    pub tour: String,
}

impl From<PropertyTourRow> for PropertyTour {
    fn from(row: PropertyTourRow) -> Self {
        let tour = tour_from_metadata(&row.metadata);
        Self {
            id: row.id,
            title: row.title,
            facade: row.facade,
            tour,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTourPayload {
    // Ausente, null ou vazio remove o tour
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "validate_tour_url"))]
    #[schema(example = "https://my.matterport.com/show/?m=abc123")]
    pub tour: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateTourResponse {
    pub success: bool,
    pub updated: Property,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEvolutionPayload {
    #[validate(custom(function = "validate_project_evolution"))]
    #[schema(value_type = Object)]
    pub project_evolution: Value,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_tour_url(tour: &str) -> Result<(), ValidationError> {
    let tour = tour.trim();
    if tour.is_empty() || tour.starts_with("https://") || tour.starts_with("http://") {
        return Ok(());
    }
    let mut err = ValidationError::new("url");
    err.message = Some("O tour deve ser uma URL http(s).".into());
    Err(err)
}

// Deve ser um objeto; valores numéricos (ou strings numéricas, como o
// formulário envia) precisam estar entre 0 e 100.
fn validate_project_evolution(value: &Value) -> Result<(), ValidationError> {
    let Some(phases) = value.as_object() else {
        let mut err = ValidationError::new("object");
        err.message = Some("project_evolution deve ser um objeto.".into());
        return Err(err);
    };

    for (phase, percentage) in phases {
        let number = match percentage {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
            _ => continue,
        };

        match number {
            Some(n) if (0.0..=100.0).contains(&n) => {}
            _ => {
                let mut err = ValidationError::new("percentage");
                err.message = Some(format!("Percentual inválido na etapa '{phase}'.").into());
                return Err(err);
            }
        }
    }
    Ok(())
}
