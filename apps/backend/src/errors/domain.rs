//! Domain-level error type used across services, repos, and templates.
//!
//! This error type is HTTP- and DB-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use sea_orm::DbErr;

/// Validation kinds; each maps to one taxonomy code at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Schema-level malformedness (bad participants map, missing expected_tick, ...)
    InvalidRequest,
    /// Action not in `legal_actions`, wrong turn, or wrong session status
    InvalidAction,
    /// Simultaneous-template duplicate submission for the current phase
    AlreadyActed,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Agent,
    Session,
    Template,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Sequential-template `expected_tick` did not match the current tick
    StaleTick,
    /// Join attempted on a role that is already bound
    RoleTaken,
    /// The tick compare-and-set in the store found a concurrent writer
    OptimisticLock,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    DbUnavailable,
    DataCorruption,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Bearer secret did not resolve, or a claim failed
    Unauthorized(String),
    /// Authenticated but not permitted
    Forbidden(String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Unauthorized(d) => write!(f, "unauthorized: {d}"),
            DomainError::Forbidden(d) => write!(f, "forbidden: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn invalid_action(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::InvalidAction, detail.into())
    }
    pub fn already_acted(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::AlreadyActed, detail.into())
    }
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::InvalidRequest, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized(detail.into())
    }
    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden(detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
}

/// Sentinel prefix used by adapters when a compare-and-set touches zero rows.
pub const OPTIMISTIC_LOCK_SENTINEL: &str = "OPTIMISTIC_LOCK";

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match &e {
            DbErr::RecordNotFound(msg) => {
                DomainError::not_found(NotFoundKind::Other(msg.clone()), msg.clone())
            }
            DbErr::Custom(msg) if msg.starts_with(OPTIMISTIC_LOCK_SENTINEL) => {
                DomainError::conflict(ConflictKind::OptimisticLock, msg.clone())
            }
            _ => DomainError::infra(InfraErrorKind::Other("db".to_string()), e.to_string()),
        }
    }
}
