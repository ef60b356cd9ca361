pub mod email_service;
pub mod error;
pub mod job_post_service;

pub use email_service::EmailService;
pub use error::ServiceError;
pub use job_post_service::JobPostService;
