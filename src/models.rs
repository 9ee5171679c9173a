pub mod auth;
pub mod indication;
pub mod property;
pub mod user;
