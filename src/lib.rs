//! # csms-core
//!
//! Core of an OCPP 1.6 Central System: charge point identity, id tag
//! authorization, transactions, reservations, meter values and connector
//! status. The transport (OCPP-J over WebSocket, SOAP) is left to the host,
//! which decodes frames into [`OcppRequest`] and hands them to a
//! [`MessageDispatcher`].
//!
//! ## Architecture
//!
//! - **domain**: entities and repository traits
//! - **application**: business managers, OCPP 1.6 handlers, session dispatcher
//! - **infrastructure**: SeaORM (SQLite) and in-memory storage engines
//! - **shared**: errors, tracing setup, shutdown signal

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::{CoreServices, MessageDispatcher, OcppRequest, OcppResponse};
pub use config::{default_config_path, AppConfig};
pub use infrastructure::{
    init_database, run_migrations, DatabaseConfig, InMemoryRepositoryProvider,
    SeaOrmRepositoryProvider,
};
pub use shared::{init_tracing, DomainError, DomainResult, ShutdownSignal};
