use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{EmailSubscription, JobPost, JobPostPatch};
use crate::database::store::{job_post_not_found, EmailStore, JobPostStore, SessionValidator, StoreError};
use crate::filter::JobPostFilter;

/// Process-local job post store used for development and tests
#[derive(Default)]
pub struct MemoryJobPostStore {
    posts: RwLock<HashMap<Uuid, JobPost>>,
}

impl MemoryJobPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobPostStore for MemoryJobPostStore {
    async fn insert(&self, post: JobPost) -> Result<JobPost, StoreError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(StoreError::Conflict(format!("Job post {} already exists", post.id)));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get(&self, id: Uuid) -> Result<JobPost, StoreError> {
        self.posts.read().await.get(&id).cloned().ok_or_else(|| job_post_not_found(id))
    }

    async fn list(&self, filter: &JobPostFilter) -> Result<Vec<JobPost>, StoreError> {
        let posts = self.posts.read().await;
        let mut matched: Vec<JobPost> = posts.values().filter(|p| filter.matches(p)).cloned().collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn save(&self, post: &JobPost) -> Result<JobPost, StoreError> {
        let mut posts = self.posts.write().await;
        let existing = posts.get_mut(&post.id).ok_or_else(|| job_post_not_found(post.id))?;
        // Identity and ownership columns are never rewritten
        let kept = (existing.id, existing.posted_by, existing.created_at);
        *existing = post.clone();
        (existing.id, existing.posted_by, existing.created_at) = kept;
        Ok(existing.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &JobPostPatch, now: DateTime<Utc>) -> Result<JobPost, StoreError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or_else(|| job_post_not_found(id))?;
        post.apply(patch, now);
        Ok(post.clone())
    }

    async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> Result<JobPost, StoreError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or_else(|| job_post_not_found(id))?;
        post.mark_deleted(now);
        Ok(post.clone())
    }

    async fn restore(&self, id: Uuid) -> Result<JobPost, StoreError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or_else(|| job_post_not_found(id))?;
        post.restore();
        Ok(post.clone())
    }
}

#[derive(Default)]
pub struct MemoryEmailStore {
    subscriptions: RwLock<HashMap<String, EmailSubscription>>,
}

impl MemoryEmailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }
}

#[async_trait]
impl EmailStore for MemoryEmailStore {
    async fn insert(&self, subscription: EmailSubscription) -> Result<EmailSubscription, StoreError> {
        let mut subscriptions = self.subscriptions.write().await;
        if subscriptions.contains_key(&subscription.email) {
            return Err(StoreError::Conflict(format!("{} is already subscribed", subscription.email)));
        }
        subscriptions.insert(subscription.email.clone(), subscription.clone());
        Ok(subscription)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Token to user-id map standing in for the external session store
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Uuid>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from `token:user-uuid` pairs; entries with an unparsable user id are skipped
    pub fn seeded(pairs: &[(String, String)]) -> Self {
        let sessions = pairs
            .iter()
            .filter_map(|(token, user)| match Uuid::parse_str(user) {
                Ok(user_id) => Some((token.clone(), user_id)),
                Err(_) => {
                    tracing::warn!("Skipping seeded session '{}': invalid user id '{}'", token, user);
                    None
                }
            })
            .collect();
        Self { sessions: RwLock::new(sessions) }
    }

    pub async fn insert(&self, token: impl Into<String>, user_id: Uuid) {
        self.sessions.write().await.insert(token.into(), user_id);
    }

    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}

#[async_trait]
impl SessionValidator for MemorySessionStore {
    async fn resolve(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        Ok(self.sessions.read().await.get(token).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NewJobPost, SubscriberEmail};
    use crate::filter::SearchParams;

    fn post(title: &str, location: Option<&str>) -> JobPost {
        let draft = NewJobPost {
            title: Some(title.to_string()),
            location_term: location.map(str::to_string),
            ..Default::default()
        };
        JobPost::create(draft, Uuid::new_v4(), Utc::now())
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryJobPostStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.soft_delete(id, Utc::now()).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.restore(id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update(id, &JobPostPatch::default(), Utc::now()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_hides_soft_deleted_but_get_does_not() {
        let store = MemoryJobPostStore::new();
        let kept = store.insert(post("Backend Engineer", Some("Remote"))).await.unwrap();
        let gone = store.insert(post("Frontend Engineer", None)).await.unwrap();

        store.soft_delete(gone.id, Utc::now()).await.unwrap();

        let listed = store.list(&JobPostFilter::new()).await.unwrap();
        assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![kept.id]);

        let fetched = store.get(gone.id).await.unwrap();
        assert!(fetched.is_deleted);
        assert!(fetched.deleted_at.is_some());
    }

    #[tokio::test]
    async fn restore_clears_deletion_state() {
        let store = MemoryJobPostStore::new();
        let created = store.insert(post("Data Analyst", Some("Lima"))).await.unwrap();

        store.soft_delete(created.id, Utc::now()).await.unwrap();
        let restored = store.restore(created.id).await.unwrap();

        assert_eq!(restored, created);
    }

    #[tokio::test]
    async fn update_keeps_deletion_state() {
        let store = MemoryJobPostStore::new();
        let created = store.insert(post("Designer", None)).await.unwrap();
        store.soft_delete(created.id, Utc::now()).await.unwrap();

        let patch = JobPostPatch {
            title: Some(Some("Senior Designer".to_string())),
            ..Default::default()
        };
        let updated = store.update(created.id, &patch, Utc::now()).await.unwrap();

        assert_eq!(updated.title, "Senior Designer");
        assert!(updated.is_deleted);
        assert!(updated.deleted_at.is_some());
    }

    #[tokio::test]
    async fn list_applies_search_filter() {
        let store = MemoryJobPostStore::new();
        let engineer = store.insert(post("Site Reliability Engineer", Some("Berlin"))).await.unwrap();
        let remote = store.insert(post("Recruiter", Some("Remote"))).await.unwrap();
        store.insert(post("Recruiter", Some("Paris"))).await.unwrap();

        let params = SearchParams {
            search_term: Some("engineer".to_string()),
            location_term: Some("remote".to_string()),
        };
        let filter = JobPostFilter::from_params(&params, 200).unwrap();
        let mut ids: Vec<Uuid> = store.list(&filter).await.unwrap().into_iter().map(|p| p.id).collect();
        ids.sort();
        let mut expected = vec![engineer.id, remote.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn save_keeps_identity_columns() {
        let store = MemoryJobPostStore::new();
        let created = store.insert(post("Designer", None)).await.unwrap();

        let mut tampered = created.clone();
        tampered.posted_by = Uuid::new_v4();
        tampered.title = "Senior Designer".to_string();
        let saved = store.save(&tampered).await.unwrap();

        assert_eq!(saved.posted_by, created.posted_by);
        assert_eq!(saved.title, "Senior Designer");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryEmailStore::new();
        let email = SubscriberEmail::parse("ana@example.com").unwrap();

        store.insert(EmailSubscription::new(email.clone(), Utc::now())).await.unwrap();
        let second = store.insert(EmailSubscription::new(email, Utc::now())).await;

        assert!(matches!(second, Err(StoreError::Conflict(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn seeded_sessions_resolve() {
        let user = Uuid::new_v4();
        let store = MemorySessionStore::seeded(&[
            ("good".to_string(), user.to_string()),
            ("bad".to_string(), "not-a-uuid".to_string()),
        ]);

        assert_eq!(store.resolve("good").await.unwrap(), Some(user));
        assert_eq!(store.resolve("bad").await.unwrap(), None);
        assert_eq!(store.resolve("missing").await.unwrap(), None);

        store.remove("good").await;
        assert_eq!(store.resolve("good").await.unwrap(), None);
    }
}
