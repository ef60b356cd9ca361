use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{EmailSubscription, JobPost, JobPostPatch};
use crate::database::store::{job_post_not_found, EmailStore, JobPostStore, SessionValidator, StoreError};
use crate::filter::JobPostFilter;

const JOB_POSTS_TABLE: &str = "job_posts";

pub struct PgJobPostRepository {
    pool: PgPool,
}

impl PgJobPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobPostStore for PgJobPostRepository {
    async fn insert(&self, post: JobPost) -> Result<JobPost, StoreError> {
        let row = sqlx::query_as::<_, JobPost>(
            "INSERT INTO job_posts (
                id, title, company, location_term, description, posted_by, category,
                salary_range, employment_type, employment_style, application_deadline,
                contact_email, linkedin_link, created_at, updated_at, is_deleted, deleted_at
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING *",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.company)
        .bind(&post.location_term)
        .bind(&post.description)
        .bind(post.posted_by)
        .bind(&post.category)
        .bind(&post.salary_range)
        .bind(&post.employment_type)
        .bind(&post.employment_style)
        .bind(post.application_deadline)
        .bind(&post.contact_email)
        .bind(&post.linkedin_link)
        .bind(post.created_at)
        .bind(post.updated_at)
        .bind(post.is_deleted)
        .bind(post.deleted_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<JobPost, StoreError> {
        sqlx::query_as::<_, JobPost>("SELECT * FROM job_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| job_post_not_found(id))
    }

    async fn list(&self, filter: &JobPostFilter) -> Result<Vec<JobPost>, StoreError> {
        let sql_result = filter.to_sql(JOB_POSTS_TABLE);
        let mut q = sqlx::query_as::<_, JobPost>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = q.bind(p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn save(&self, post: &JobPost) -> Result<JobPost, StoreError> {
        sqlx::query_as::<_, JobPost>(
            "UPDATE job_posts SET
                title = $2, company = $3, location_term = $4, description = $5, category = $6,
                salary_range = $7, employment_type = $8, employment_style = $9,
                application_deadline = $10, contact_email = $11, linkedin_link = $12,
                updated_at = $13, is_deleted = $14, deleted_at = $15
             WHERE id = $1
             RETURNING *",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.company)
        .bind(&post.location_term)
        .bind(&post.description)
        .bind(&post.category)
        .bind(&post.salary_range)
        .bind(&post.employment_type)
        .bind(&post.employment_style)
        .bind(post.application_deadline)
        .bind(&post.contact_email)
        .bind(&post.linkedin_link)
        .bind(post.updated_at)
        .bind(post.is_deleted)
        .bind(post.deleted_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| job_post_not_found(post.id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // Only the columns present in the patch are written; lifecycle columns never are
    async fn update(&self, id: Uuid, patch: &JobPostPatch, now: DateTime<Utc>) -> Result<JobPost, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE job_posts SET updated_at = ");
        qb.push_bind(now);
        if let Some(Some(title)) = &patch.title {
            qb.push(", title = ").push_bind(title.clone());
        }
        for (column, change) in text_changes(patch) {
            if let Some(value) = change {
                qb.push(format!(", {} = ", column)).push_bind(value.clone());
            }
        }
        if let Some(deadline) = patch.application_deadline {
            qb.push(", application_deadline = ").push_bind(deadline);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<JobPost>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| job_post_not_found(id))
    }

    async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> Result<JobPost, StoreError> {
        sqlx::query_as::<_, JobPost>(
            "UPDATE job_posts SET is_deleted = TRUE, deleted_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| job_post_not_found(id))
    }

    async fn restore(&self, id: Uuid) -> Result<JobPost, StoreError> {
        sqlx::query_as::<_, JobPost>(
            "UPDATE job_posts SET is_deleted = FALSE, deleted_at = NULL WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| job_post_not_found(id))
    }
}

fn text_changes(patch: &JobPostPatch) -> [(&'static str, &Option<Option<String>>); 9] {
    [
        ("company", &patch.company),
        ("location_term", &patch.location_term),
        ("description", &patch.description),
        ("category", &patch.category),
        ("salary_range", &patch.salary_range),
        ("employment_type", &patch.employment_type),
        ("employment_style", &patch.employment_style),
        ("contact_email", &patch.contact_email),
        ("linkedin_link", &patch.linkedin_link),
    ]
}

pub struct PgEmailRepository {
    pool: PgPool,
}

impl PgEmailRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailStore for PgEmailRepository {
    async fn insert(&self, subscription: EmailSubscription) -> Result<EmailSubscription, StoreError> {
        let row = sqlx::query_as::<_, EmailSubscription>(
            "INSERT INTO email_subscriptions (id, email, created_at) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(subscription.id)
        .bind(&subscription.email)
        .bind(subscription.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Session lookup where the token is the session row's primary key
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionValidator for PgSessionRepository {
    async fn resolve(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        let user_id = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM sessions WHERE id = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user_id)
    }
}
