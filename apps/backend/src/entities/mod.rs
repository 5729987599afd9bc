pub mod actions;
pub mod agents;
pub mod participants;
pub mod sessions;
