use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::{JobPost, JobPostPatch, NewJobPost};
use crate::database::JobPostStore;
use crate::filter::{JobPostFilter, SearchParams};

use super::error::ServiceError;

/// Job post lifecycle on top of a `JobPostStore`.
///
/// Callers of the mutating operations must already hold a resolved session; the
/// user id they pass in is trusted. Ownership is only checked when
/// `enforce_ownership` is on.
pub struct JobPostService {
    store: Arc<dyn JobPostStore>,
    enforce_ownership: bool,
    max_term_length: usize,
    debug_logging: bool,
}

impl JobPostService {
    pub fn new(store: Arc<dyn JobPostStore>, config: &AppConfig) -> Self {
        Self {
            store,
            enforce_ownership: config.security.enforce_post_ownership,
            max_term_length: config.filter.max_term_length,
            debug_logging: config.filter.debug_logging,
        }
    }

    pub async fn create(&self, posted_by: Uuid, body: Value) -> Result<JobPost, ServiceError> {
        let draft = NewJobPost::from_json(body)?;
        let post = JobPost::create(draft, posted_by, Utc::now());
        let saved = self.store.insert(post).await?;
        tracing::info!(job_post = %saved.id, user = %posted_by, "Job post created");
        Ok(saved)
    }

    pub async fn list(&self, params: &SearchParams) -> Result<Vec<JobPost>, ServiceError> {
        let filter = JobPostFilter::from_params(params, self.max_term_length)?;
        if self.debug_logging {
            tracing::debug!(?filter, "Listing job posts");
        }
        Ok(self.store.list(&filter).await?)
    }

    /// Lookup by id sees soft-deleted posts too
    pub async fn get(&self, id: &str) -> Result<JobPost, ServiceError> {
        let id = parse_id(id)?;
        Ok(self.store.get(id).await?)
    }

    pub async fn update(&self, user: Uuid, id: &str, body: Value) -> Result<JobPost, ServiceError> {
        let id = parse_id(id)?;
        let patch = JobPostPatch::from_json(body)?;
        self.authorize_owner(user, id).await?;
        let updated = self.store.update(id, &patch, Utc::now()).await?;
        tracing::info!(job_post = %id, user = %user, "Job post updated");
        Ok(updated)
    }

    pub async fn soft_delete(&self, user: Uuid, id: &str) -> Result<JobPost, ServiceError> {
        let id = parse_id(id)?;
        self.authorize_owner(user, id).await?;
        let deleted = self.store.soft_delete(id, Utc::now()).await?;
        tracing::info!(job_post = %id, user = %user, "Job post marked as deleted");
        Ok(deleted)
    }

    pub async fn restore(&self, user: Uuid, id: &str) -> Result<JobPost, ServiceError> {
        let id = parse_id(id)?;
        self.authorize_owner(user, id).await?;
        let restored = self.store.restore(id).await?;
        tracing::info!(job_post = %id, user = %user, "Job post restored");
        Ok(restored)
    }

    async fn authorize_owner(&self, user: Uuid, id: Uuid) -> Result<(), ServiceError> {
        if !self.enforce_ownership {
            return Ok(());
        }
        let post = self.store.get(id).await?;
        if post.posted_by != user {
            tracing::warn!(job_post = %id, user = %user, owner = %post.posted_by, "Rejected mutation by non-owner");
            return Err(ServiceError::Forbidden("Only the author of a job post can modify it".to_string()));
        }
        Ok(())
    }
}

// Malformed ids can never name a stored record
fn parse_id(id: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(id).map_err(|_| ServiceError::NotFound("Job Post not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryJobPostStore;
    use serde_json::json;

    fn service(enforce_ownership: bool) -> JobPostService {
        let mut config = AppConfig::development();
        config.security.enforce_post_ownership = enforce_ownership;
        JobPostService::new(Arc::new(MemoryJobPostStore::new()), &config)
    }

    fn search(term: Option<&str>, location: Option<&str>) -> SearchParams {
        SearchParams {
            search_term: term.map(str::to_string),
            location_term: location.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_assigns_owner_and_live_state() {
        let svc = service(false);
        let user = Uuid::new_v4();

        let post = svc
            .create(user, json!({ "title": "Backend Engineer", "locationTerm": "Remote" }))
            .await
            .unwrap();

        assert_eq!(post.posted_by, user);
        assert!(!post.is_deleted);
        assert!(post.deleted_at.is_none());
    }

    #[tokio::test]
    async fn create_without_title_is_rejected() {
        let svc = service(false);
        let err = svc.create(Uuid::new_v4(), json!({ "company": "Acme" })).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("title")));
        assert!(svc.list(&SearchParams::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_combines_terms_with_or() {
        let svc = service(false);
        let user = Uuid::new_v4();
        let engineer = svc.create(user, json!({ "title": "Backend Engineer", "locationTerm": "Madrid" })).await.unwrap();
        let remote = svc.create(user, json!({ "title": "Accountant", "locationTerm": "Remote" })).await.unwrap();
        svc.create(user, json!({ "title": "Accountant", "locationTerm": "Madrid" })).await.unwrap();

        let only_title = svc.list(&search(Some("ENGINEER"), None)).await.unwrap();
        assert_eq!(only_title.iter().map(|p| p.id).collect::<Vec<_>>(), vec![engineer.id]);

        let either = svc.list(&search(Some("engineer"), Some("remote"))).await.unwrap();
        let ids: Vec<Uuid> = either.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&engineer.id) && ids.contains(&remote.id));
    }

    #[tokio::test]
    async fn soft_delete_hides_from_list_only() {
        let svc = service(false);
        let user = Uuid::new_v4();
        let post = svc.create(user, json!({ "title": "Backend Engineer" })).await.unwrap();

        svc.soft_delete(user, &post.id.to_string()).await.unwrap();

        assert!(svc.list(&SearchParams::default()).await.unwrap().is_empty());
        let fetched = svc.get(&post.id.to_string()).await.unwrap();
        assert!(fetched.is_deleted);

        let restored = svc.restore(user, &post.id.to_string()).await.unwrap();
        assert_eq!(restored, post);
        assert_eq!(svc.list(&SearchParams::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_and_keeps_identity() {
        let svc = service(false);
        let user = Uuid::new_v4();
        let post = svc.create(user, json!({ "title": "Backend Engineer" })).await.unwrap();

        let updated = svc
            .update(Uuid::new_v4(), &post.id.to_string(), json!({ "title": "Staff Engineer", "company": "Acme" }))
            .await
            .unwrap();

        assert_eq!(updated.id, post.id);
        assert_eq!(updated.posted_by, user);
        assert_eq!(updated.created_at, post.created_at);
        assert_eq!(updated.title, "Staff Engineer");
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn unknown_or_malformed_ids_are_not_found() {
        let svc = service(false);
        let user = Uuid::new_v4();
        assert!(matches!(svc.get("not-a-uuid").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.soft_delete(user, &Uuid::new_v4().to_string()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            svc.update(user, &Uuid::new_v4().to_string(), json!({ "title": "x" })).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn ownership_enforcement_blocks_other_users() {
        let svc = service(true);
        let owner = Uuid::new_v4();
        let post = svc.create(owner, json!({ "title": "Backend Engineer" })).await.unwrap();
        let id = post.id.to_string();

        let err = svc.soft_delete(Uuid::new_v4(), &id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert!(!svc.get(&id).await.unwrap().is_deleted);

        svc.soft_delete(owner, &id).await.unwrap();
        assert!(svc.get(&id).await.unwrap().is_deleted);
    }

    #[tokio::test]
    async fn oversized_search_term_is_a_validation_error() {
        let svc = service(false);
        let term = "a".repeat(500);
        let err = svc.list(&search(Some(&term), None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
