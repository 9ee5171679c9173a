pub mod user_repo;
pub use user_repo::UserRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod indication_repo;
pub use indication_repo::IndicationRepository;
