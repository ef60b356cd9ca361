use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{EmailSubscription, JobPost, JobPostPatch};
use crate::filter::JobPostFilter;

/// Errors surfaced by any storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::Conflict(db.message().to_string())
            }
            _ => StoreError::Sqlx(err),
        }
    }
}

pub(crate) fn job_post_not_found(id: Uuid) -> StoreError {
    StoreError::NotFound(format!("Job post {} not found", id))
}

/// Durable storage for job posts.
///
/// `update`, `soft_delete` and `restore` default to a read-modify-write over
/// `get` and `save`; backends may override them with a single statement.
#[async_trait]
pub trait JobPostStore: Send + Sync {
    async fn insert(&self, post: JobPost) -> Result<JobPost, StoreError>;

    /// Point lookup, regardless of deletion state
    async fn get(&self, id: Uuid) -> Result<JobPost, StoreError>;

    async fn list(&self, filter: &JobPostFilter) -> Result<Vec<JobPost>, StoreError>;

    /// Overwrite every mutable column of an existing record
    async fn save(&self, post: &JobPost) -> Result<JobPost, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn update(&self, id: Uuid, patch: &JobPostPatch, now: DateTime<Utc>) -> Result<JobPost, StoreError> {
        let mut post = self.get(id).await?;
        post.apply(patch, now);
        self.save(&post).await
    }

    async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> Result<JobPost, StoreError> {
        let mut post = self.get(id).await?;
        post.mark_deleted(now);
        self.save(&post).await
    }

    async fn restore(&self, id: Uuid) -> Result<JobPost, StoreError> {
        let mut post = self.get(id).await?;
        post.restore();
        self.save(&post).await
    }
}

/// Set of unique subscribed addresses
#[async_trait]
pub trait EmailStore: Send + Sync {
    /// Fails with `StoreError::Conflict` when the address is already subscribed
    async fn insert(&self, subscription: EmailSubscription) -> Result<EmailSubscription, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Resolves a session token to the user it belongs to.
///
/// Token issuance and revocation live elsewhere; this is only ever asked to look one up.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Option<Uuid>, StoreError>;
}
