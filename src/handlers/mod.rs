// handlers/mod.rs - two security tiers
//
// Public (no session) → Protected (session token in Authorization header)
pub mod public;
pub mod protected;
