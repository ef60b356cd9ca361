use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Fields owned by the server. Clients may never set these through create or update bodies.
pub const SYSTEM_FIELDS: &[&str] = &[
    "id",
    "_id",
    "postedBy",
    "createdAt",
    "updatedAt",
    "isDeleted",
    "deletedAt",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobPost {
    pub id: Uuid,
    pub title: String,
    pub company: Option<String>,
    pub location_term: Option<String>,
    pub description: Option<String>,
    pub posted_by: Uuid,
    pub category: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub employment_style: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub contact_email: Option<String>,
    pub linkedin_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Errors raised while turning a request body into a job post draft or patch
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Field '{0}' is managed by the server and cannot be set")]
    SystemFieldNotAllowed(&'static str),
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),
}

/// Client-supplied fields for a new job post
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobPost {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location_term: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub employment_style: Option<String>,
    #[serde(default, deserialize_with = "optional_deadline")]
    pub application_deadline: Option<DateTime<Utc>>,
    pub contact_email: Option<String>,
    pub linkedin_link: Option<String>,
}

impl NewJobPost {
    /// Parse a create body, rejecting system fields and a missing or blank title
    pub fn from_json(json: Value) -> Result<Self, InputError> {
        reject_system_fields(&json)?;
        let draft: NewJobPost =
            serde_json::from_value(json).map_err(|e| InputError::InvalidJson(e.to_string()))?;
        match draft.title.as_deref() {
            Some(title) if !title.trim().is_empty() => Ok(draft),
            _ => Err(InputError::MissingRequiredField("title")),
        }
    }
}

/// Partial update. The outer `Option` is "field present in body", the inner one is the new value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub location_term: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub salary_range: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub employment_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub employment_style: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable_deadline")]
    pub application_deadline: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub linkedin_link: Option<Option<String>>,
}

impl JobPostPatch {
    /// Parse an update body. `title` may be changed but never cleared.
    pub fn from_json(json: Value) -> Result<Self, InputError> {
        reject_system_fields(&json)?;
        let patch: JobPostPatch =
            serde_json::from_value(json).map_err(|e| InputError::InvalidJson(e.to_string()))?;
        match &patch.title {
            Some(None) => Err(InputError::MissingRequiredField("title")),
            Some(Some(title)) if title.trim().is_empty() => Err(InputError::MissingRequiredField("title")),
            _ => Ok(patch),
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` or a bare `YYYY-MM-DD`.
/// The naive forms are read as UTC.
pub fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn optional_deadline<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_deadline(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid applicationDeadline '{}'", raw))),
    }
}

fn nullable_deadline<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_deadline(deserializer).map(Some)
}

fn reject_system_fields(json: &Value) -> Result<(), InputError> {
    let map = json
        .as_object()
        .ok_or_else(|| InputError::InvalidJson("Expected JSON object".to_string()))?;
    match SYSTEM_FIELDS.iter().copied().find(|field| map.contains_key(*field)) {
        Some(field) => Err(InputError::SystemFieldNotAllowed(field)),
        None => Ok(()),
    }
}

impl JobPost {
    /// Build a fresh, live record owned by `posted_by`
    pub fn create(draft: NewJobPost, posted_by: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title.unwrap_or_default(),
            company: draft.company,
            location_term: draft.location_term,
            description: draft.description,
            posted_by,
            category: draft.category,
            salary_range: draft.salary_range,
            employment_type: draft.employment_type,
            employment_style: draft.employment_style,
            application_deadline: draft.application_deadline,
            contact_email: draft.contact_email,
            linkedin_link: draft.linkedin_link,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }

    pub fn apply(&mut self, patch: &JobPostPatch, now: DateTime<Utc>) -> &mut Self {
        if let Some(Some(title)) = &patch.title {
            self.title = title.clone();
        }
        assign(&mut self.company, &patch.company);
        assign(&mut self.location_term, &patch.location_term);
        assign(&mut self.description, &patch.description);
        assign(&mut self.category, &patch.category);
        assign(&mut self.salary_range, &patch.salary_range);
        assign(&mut self.employment_type, &patch.employment_type);
        assign(&mut self.employment_style, &patch.employment_style);
        assign(&mut self.application_deadline, &patch.application_deadline);
        assign(&mut self.contact_email, &patch.contact_email);
        assign(&mut self.linkedin_link, &patch.linkedin_link);
        self.updated_at = now;
        self
    }

    /// Soft delete: hide from listings without removing the row
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) -> &mut Self {
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self
    }

    pub fn restore(&mut self) -> &mut Self {
        self.is_deleted = false;
        self.deleted_at = None;
        self
    }
}

fn assign<T: Clone>(target: &mut Option<T>, change: &Option<Option<T>>) {
    if let Some(value) = change {
        *target = value.clone();
    }
}
