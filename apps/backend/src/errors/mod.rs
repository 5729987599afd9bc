pub mod domain;
pub mod error_code;

pub use domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
pub use error_code::ErrorCode;
