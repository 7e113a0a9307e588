//! IdTag repository interface

use async_trait::async_trait;

use super::model::OcppTag;
use crate::domain::DomainResult;

#[async_trait]
pub trait IdTagRepository: Send + Sync {
    /// Insert or replace a tag
    async fn save(&self, tag: OcppTag) -> DomainResult<()>;
    async fn find_by_id(&self, id_tag: &str) -> DomainResult<Option<OcppTag>>;
    async fn find_all(&self) -> DomainResult<Vec<OcppTag>>;
    /// Set the double-use flag; returns false if the tag is unknown.
    async fn set_in_transaction(&self, id_tag: &str, in_transaction: bool) -> DomainResult<bool>;
}
