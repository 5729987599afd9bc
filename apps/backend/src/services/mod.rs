pub mod arbiter;
pub mod identity;
pub mod sessions;
