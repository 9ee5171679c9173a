pub mod auth;
pub mod indications;
pub mod properties;
pub mod users;
