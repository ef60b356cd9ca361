pub mod email;
pub mod job_post;

pub use email::{EmailSubscription, SubscriberEmail};
pub use job_post::{InputError, JobPost, JobPostPatch, NewJobPost};
