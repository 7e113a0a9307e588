//! Charge Point aggregate
//!
//! Contains the ChargePoint entity, the boot outcome, and repository interface.

pub mod model;
pub mod repository;

pub use model::{BootOutcome, ChargePoint};
pub use repository::ChargePointRepository;
