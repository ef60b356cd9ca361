// Public handlers - no session required
//
// Route prefix: /, /health, /emails, GET /jobposts[/:id]
pub mod emails;
pub mod job_posts;
pub mod system;
