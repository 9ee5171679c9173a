pub mod access;
pub mod auth;
pub mod indication_service;
pub mod property_service;
pub mod tokens;
pub mod user_service;
