//! Create ocpp_tags table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OcppTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OcppTags::IdTag)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OcppTags::Status)
                            .string_len(20)
                            .not_null()
                            .default("Accepted"),
                    )
                    .col(ColumnDef::new(OcppTags::ParentIdTag).string())
                    .col(ColumnDef::new(OcppTags::ExpiryDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(OcppTags::InTransaction)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(OcppTags::Note).string())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OcppTags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum OcppTags {
    Table,
    IdTag,
    Status,
    ParentIdTag,
    ExpiryDate,
    InTransaction,
    Note,
}
