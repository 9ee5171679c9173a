pub mod cpf;
pub mod error;
pub mod metadata;
