//! Id tag lookup and authorization

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::{Authorization, DomainResult, OcppTag, RepositoryProvider};

pub struct AuthorizationService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AuthorizationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn resolve_tag(&self, id_tag: &str) -> DomainResult<Option<OcppTag>> {
        self.repos.id_tags().find_by_id(id_tag).await
    }

    /// Authorize a tag. Read-only; the double-use flag is not consulted.
    pub async fn authorize(&self, id_tag: &str) -> DomainResult<Authorization> {
        let tag = self.resolve_tag(id_tag).await?;
        let auth = Authorization::for_tag(tag.as_ref(), Utc::now());
        debug!(id_tag, status = %auth.status, "Authorize");
        Ok(auth)
    }

    /// Out-of-band registration; replaces an existing tag with the same id.
    pub async fn register_tag(&self, tag: OcppTag) -> DomainResult<()> {
        info!(id_tag = %tag.id_tag, status = %tag.status, "Id tag registered");
        self.repos.id_tags().save(tag).await
    }

    pub async fn list_tags(&self) -> DomainResult<Vec<OcppTag>> {
        self.repos.id_tags().find_all().await
    }
}
