//! SeaORM adapters: row-level operations generic over `ConnectionTrait`.
//! Adapter functions return `DbErr`; the repos layer maps to `DomainError`.

pub mod actions_sea;
pub mod agents_sea;
pub mod participants_sea;
pub mod sessions_sea;
