use chrono::Utc;
use std::sync::Arc;

use crate::database::models::{EmailSubscription, SubscriberEmail};
use crate::database::{EmailStore, StoreError};

use super::error::ServiceError;

pub struct EmailService {
    store: Arc<dyn EmailStore>,
}

impl EmailService {
    pub fn new(store: Arc<dyn EmailStore>) -> Self {
        Self { store }
    }

    /// Subscribe an address. Shape-checked only; duplicates are a conflict.
    pub async fn subscribe(&self, raw_email: Option<&str>) -> Result<EmailSubscription, ServiceError> {
        let email = raw_email
            .and_then(SubscriberEmail::parse)
            .ok_or_else(|| ServiceError::Validation("Invalid email".to_string()))?;

        let subscription = EmailSubscription::new(email, Utc::now());
        match self.store.insert(subscription).await {
            Ok(saved) => {
                tracing::info!(subscription = %saved.id, "Email subscribed");
                Ok(saved)
            }
            Err(StoreError::Conflict(_)) => {
                Err(ServiceError::Conflict("Email is already subscribed".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryEmailStore;

    #[tokio::test]
    async fn subscribes_valid_address_once() {
        let store = Arc::new(MemoryEmailStore::new());
        let svc = EmailService::new(store.clone());

        let first = svc.subscribe(Some("ana@example.com")).await.unwrap();
        assert_eq!(first.email, "ana@example.com");

        let second = svc.subscribe(Some("ana@example.com")).await.unwrap_err();
        assert!(matches!(second, ServiceError::Conflict(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_address() {
        let store = Arc::new(MemoryEmailStore::new());
        let svc = EmailService::new(store.clone());

        for raw in [None, Some(""), Some("not-an-email"), Some("a@b")] {
            let err = svc.subscribe(raw).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "accepted {raw:?}");
        }
        assert_eq!(store.len().await, 0);
    }
}
