use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Shape check only: something@something.something, no whitespace
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubscription {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl EmailSubscription {
    pub fn new(email: SubscriberEmail, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into_inner(),
            created_at: now,
        }
    }
}

/// An address that passed the `local@domain.tld` shape check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if EMAIL_SHAPE.is_match(trimmed) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_email_shaped_input() {
        for raw in ["ana@example.com", "a.b+c@sub.domain.io", "  x@y.z  "] {
            assert!(SubscriberEmail::parse(raw).is_some(), "rejected {raw}");
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in ["", "plainaddress", "no-at.example.com", "a@b", "a b@c.d", "@.", "mail me at a@b.co"] {
            assert!(SubscriberEmail::parse(raw).is_none(), "accepted {raw}");
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let email = SubscriberEmail::parse(" ana@example.com ").unwrap();
        assert_eq!(email.as_ref(), "ana@example.com");
    }
}
