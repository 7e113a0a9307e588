//! SeaORM implementation of IdTagRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;

use super::DbHandle;
use crate::domain::id_tag::{IdTagRepository, IdTagStatus, OcppTag};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::ocpp_tag::{self, TagStatus};

pub struct SeaOrmIdTagRepository<C: DbHandle = DatabaseConnection> {
    db: C,
}

impl<C: DbHandle> SeaOrmIdTagRepository<C> {
    pub fn new(db: C) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_db(status: IdTagStatus) -> TagStatus {
    match status {
        IdTagStatus::Accepted => TagStatus::Accepted,
        IdTagStatus::Blocked => TagStatus::Blocked,
        IdTagStatus::Expired => TagStatus::Expired,
        IdTagStatus::Invalid => TagStatus::Invalid,
        IdTagStatus::ConcurrentTx => TagStatus::ConcurrentTx,
    }
}

fn status_from_db(status: TagStatus) -> IdTagStatus {
    match status {
        TagStatus::Accepted => IdTagStatus::Accepted,
        TagStatus::Blocked => IdTagStatus::Blocked,
        TagStatus::Expired => IdTagStatus::Expired,
        TagStatus::Invalid => IdTagStatus::Invalid,
        TagStatus::ConcurrentTx => IdTagStatus::ConcurrentTx,
    }
}

fn model_to_domain(m: ocpp_tag::Model) -> OcppTag {
    OcppTag {
        id_tag: m.id_tag,
        status: status_from_db(m.status),
        parent_id_tag: m.parent_id_tag,
        expiry_date: m.expiry_date,
        in_transaction: m.in_transaction,
        note: m.note,
    }
}

#[async_trait]
impl<C: DbHandle> IdTagRepository for SeaOrmIdTagRepository<C> {
    async fn save(&self, tag: OcppTag) -> DomainResult<()> {
        debug!(id_tag = %tag.id_tag, status = %tag.status, "Saving id tag");

        let model = ocpp_tag::ActiveModel {
            id_tag: Set(tag.id_tag),
            status: Set(status_to_db(tag.status)),
            parent_id_tag: Set(tag.parent_id_tag),
            expiry_date: Set(tag.expiry_date),
            in_transaction: Set(tag.in_transaction),
            note: Set(tag.note),
        };

        ocpp_tag::Entity::insert(model)
            .on_conflict(
                OnConflict::column(ocpp_tag::Column::IdTag)
                    .update_columns([
                        ocpp_tag::Column::Status,
                        ocpp_tag::Column::ParentIdTag,
                        ocpp_tag::Column::ExpiryDate,
                        ocpp_tag::Column::InTransaction,
                        ocpp_tag::Column::Note,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.conn())
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id_tag: &str) -> DomainResult<Option<OcppTag>> {
        let model = ocpp_tag::Entity::find_by_id(id_tag.to_string())
            .one(self.db.conn())
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<OcppTag>> {
        let models = ocpp_tag::Entity::find()
            .order_by_asc(ocpp_tag::Column::IdTag)
            .all(self.db.conn())
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn set_in_transaction(&self, id_tag: &str, in_transaction: bool) -> DomainResult<bool> {
        let result = ocpp_tag::Entity::update_many()
            .col_expr(ocpp_tag::Column::InTransaction, Expr::value(in_transaction))
            .filter(ocpp_tag::Column::IdTag.eq(id_tag))
            .exec(self.db.conn())
            .await?;
        Ok(result.rows_affected == 1)
    }
}
