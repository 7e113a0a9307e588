//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_charge_points;
mod m20240101_000002_create_connector_status;
mod m20240101_000003_create_ocpp_tags;
mod m20240101_000004_create_transactions;
mod m20240101_000005_create_reservations;
mod m20240101_000006_create_meter_values;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_charge_points::Migration),
            Box::new(m20240101_000002_create_connector_status::Migration),
            Box::new(m20240101_000003_create_ocpp_tags::Migration),
            Box::new(m20240101_000004_create_transactions::Migration),
            Box::new(m20240101_000005_create_reservations::Migration),
            Box::new(m20240101_000006_create_meter_values::Migration),
        ]
    }
}
