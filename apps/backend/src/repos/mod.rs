//! Repository functions for the domain layer: adapters underneath, domain
//! models and `DomainError` on top.

pub mod actions;
pub mod agents;
pub mod participants;
pub mod sessions;
