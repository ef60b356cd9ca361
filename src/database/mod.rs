pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{MemoryEmailStore, MemoryJobPostStore, MemorySessionStore};
pub use repository::{PgEmailRepository, PgJobPostRepository, PgSessionRepository};
pub use store::{EmailStore, JobPostStore, SessionValidator, StoreError};
