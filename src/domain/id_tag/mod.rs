//! IdTag aggregate

pub mod model;
pub mod repository;

pub use model::{Authorization, IdTagStatus, OcppTag};
pub use repository::IdTagRepository;
