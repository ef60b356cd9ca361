// Protected handlers - require a session resolved by `session_auth_middleware`
//
// Route prefix: POST /jobposts, PUT|DELETE /jobposts/:id, POST /jobposts/restore/:id
pub mod job_posts;
