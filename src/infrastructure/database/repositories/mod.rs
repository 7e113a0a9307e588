//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories, the unit of work, and the unified
//! RepositoryProvider.
//!
//! Every repository is generic over [`DbHandle`] so the same code runs on
//! the connection pool and inside a storage transaction.

pub mod charge_point_repository;
pub mod connector_status_repository;
pub mod id_tag_repository;
pub mod meter_value_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod transaction_repository;
pub mod unit_of_work;

use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction};

pub use repository_provider::SeaOrmRepositoryProvider;
pub use unit_of_work::SeaOrmUnitOfWork;

/// Something repositories can run statements on
pub trait DbHandle: Send + Sync {
    type Conn: ConnectionTrait + Send + Sync;

    fn conn(&self) -> &Self::Conn;
}

impl DbHandle for DatabaseConnection {
    type Conn = DatabaseConnection;

    fn conn(&self) -> &DatabaseConnection {
        self
    }
}

impl DbHandle for Arc<DatabaseTransaction> {
    type Conn = DatabaseTransaction;

    fn conn(&self) -> &DatabaseTransaction {
        self.as_ref()
    }
}
