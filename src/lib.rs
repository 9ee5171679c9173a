//! Backend do painel administrativo da Metrocasa: usuários e permissões,
//! acompanhamento de obras, tours virtuais e indicações de clientes.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::{AppConfig, AppState};
pub use routes::build_router;
