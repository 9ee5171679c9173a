// src/models/indication.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::cpf::validate_cpf;

// Mapeia o CREATE TYPE indication_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "indication_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IndicationStatus {
    New,
    Pending,
    Approved,
    Rejected,
    Processing,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct IndicationAddress {
    #[validate(length(min = 8, max = 9, message = "CEP inválido."))]
    #[schema(example = "01310-100")]
    pub cep: String,
    #[validate(length(min = 1, message = "O número é obrigatório."))]
    pub number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BankDetails {
    #[validate(length(min = 1, message = "O banco é obrigatório."))]
    pub bank: String,
    #[validate(length(min = 1, message = "A agência é obrigatória."))]
    pub agency: String,
    #[validate(length(min = 1, message = "A conta é obrigatória."))]
    pub account: String,
}

/// Quem fez a indicação.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct Referrer {
    #[validate(length(min = 1, message = "O nome de quem indicou é obrigatório."))]
    pub name: String,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: String,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    pub phone: String,
}

// Lead de indicação, como fica no banco
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Indication {
    pub id: Uuid,
    pub name: String,
    pub rg: String,
    pub cpf: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    #[schema(value_type = IndicationAddress)]
    pub address: Json<IndicationAddress>,
    #[schema(value_type = Option<Object>)]
    pub property: Option<Value>,
    #[schema(value_type = BankDetails)]
    pub bank: Json<BankDetails>,
    pub is_client: bool,
    #[schema(value_type = Referrer)]
    pub indication: Json<Referrer>,
    pub status: IndicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Payload público vindo do site
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndicationPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O RG é obrigatório."))]
    pub rg: String,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: String,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    pub phone: String,
    #[schema(example = "1990-05-17")]
    pub birth_date: NaiveDate,
    #[validate(nested)]
    pub address: IndicationAddress,
    // Imóvel de interesse, formato livre
    #[schema(value_type = Option<Object>)]
    pub property: Option<Value>,
    #[validate(nested)]
    pub bank: BankDetails,
    #[serde(default)]
    pub is_client: bool,
    #[validate(nested)]
    pub indication: Referrer,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateIndicationResponse {
    pub success: bool,
    pub data: Indication,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIndicationStatusPayload {
    pub status: IndicationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ClientFilter {
    Client,
    NonClient,
}

impl ClientFilter {
    pub fn is_client(self) -> bool {
        matches!(self, ClientFilter::Client)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IndicationFilter {
    pub status: Option<IndicationStatus>,
    /// `client` ou `non-client`
    pub client: Option<ClientFilter>,
    /// Busca por nome, CPF, telefone ou nome de quem indicou
    pub search: Option<String>,
    /// Data de criação inicial (inclusiva)
    pub from: Option<NaiveDate>,
    /// Data de criação final (inclusiva)
    pub to: Option<NaiveDate>,
}
