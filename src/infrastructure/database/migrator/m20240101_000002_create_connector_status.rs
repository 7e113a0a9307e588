//! Create connector_status table
//!
//! Current status projection, keyed by (charge point, connector).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ConnectorStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConnectorStatus::ChargePointId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectorStatus::ConnectorId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConnectorStatus::Status).string().not_null())
                    .col(
                        ColumnDef::new(ConnectorStatus::ErrorCode)
                            .string()
                            .not_null()
                            .default("NoError"),
                    )
                    .col(ColumnDef::new(ConnectorStatus::Info).string())
                    .col(
                        ColumnDef::new(ConnectorStatus::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ConnectorStatus::ChargePointId)
                            .col(ConnectorStatus::ConnectorId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConnectorStatus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ConnectorStatus {
    Table,
    ChargePointId,
    ConnectorId,
    Status,
    ErrorCode,
    Info,
    Timestamp,
}
