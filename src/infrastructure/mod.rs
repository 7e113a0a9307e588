//! Infrastructure layer - storage engines behind the domain repository traits

pub mod database;
pub mod storage;

pub use database::{
    init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider, SeaOrmUnitOfWork,
};
pub use storage::{InMemoryRepositoryProvider, InMemoryUnitOfWork};
