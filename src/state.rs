use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::database::{
    DatabaseError, DatabaseManager, EmailStore, JobPostStore, MemoryEmailStore, MemoryJobPostStore,
    MemorySessionStore, PgEmailRepository, PgJobPostRepository, PgSessionRepository, SessionValidator,
    StoreError,
};
use crate::services::{EmailService, JobPostService};

/// Shared handler state. Cheap to clone; every member is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub job_posts: Arc<JobPostService>,
    pub emails: Arc<EmailService>,
    pub sessions: Arc<dyn SessionValidator>,
    job_post_store: Arc<dyn JobPostStore>,
    email_store: Arc<dyn EmailStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        job_post_store: Arc<dyn JobPostStore>,
        email_store: Arc<dyn EmailStore>,
        sessions: Arc<dyn SessionValidator>,
    ) -> Self {
        let job_posts = Arc::new(JobPostService::new(job_post_store.clone(), &config));
        let emails = Arc::new(EmailService::new(email_store.clone()));
        Self {
            config: Arc::new(config),
            job_posts,
            emails,
            sessions,
            job_post_store,
            email_store,
        }
    }

    /// Process-local stores; sessions come from `security.session_seed`
    pub fn in_memory(config: AppConfig) -> Self {
        let sessions = Arc::new(MemorySessionStore::seeded(&config.security.session_seed));
        Self::new(
            config,
            Arc::new(MemoryJobPostStore::new()),
            Arc::new(MemoryEmailStore::new()),
            sessions,
        )
    }

    pub fn postgres(config: AppConfig, database: &DatabaseManager) -> Self {
        let pool = database.pool();
        Self::new(
            config,
            Arc::new(PgJobPostRepository::new(pool.clone())),
            Arc::new(PgEmailRepository::new(pool.clone())),
            Arc::new(PgSessionRepository::new(pool)),
        )
    }

    /// Build state for the configured backend, connecting and migrating Postgres when selected
    pub async fn from_config(config: AppConfig) -> Result<(Self, Option<DatabaseManager>), DatabaseError> {
        match config.database.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on shutdown");
                Ok((Self::in_memory(config), None))
            }
            StorageBackend::Postgres => {
                let database = DatabaseManager::connect(&config.database).await?;
                if config.database.run_migrations {
                    database.migrate().await?;
                }
                Ok((Self::postgres(config, &database), Some(database)))
            }
        }
    }

    /// Ping every backing store
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.job_post_store.ping().await?;
        self.email_store.ping().await?;
        Ok(())
    }
}
