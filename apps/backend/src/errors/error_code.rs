//! Error codes for the Parlor engine API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Parlor engine API.
///
/// The first seven variants are the client-facing taxonomy; the rest are
/// operational codes that only ever surface on 5xx responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Missing, malformed, or unresolvable bearer secret; failed claim
    Unauthorized,
    /// Authenticated but not a participant
    Forbidden,
    /// Unknown session, agent, or template
    NotFound,
    /// Schema-level request malformedness
    InvalidRequest,
    /// Action not legal in the current state, or wrong session status
    InvalidAction,
    /// Simultaneous-template role has exhausted its actions for this phase
    AlreadyActed,
    /// Stale tick on a sequential template; role already filled
    Conflict,

    // System errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected (e.g. stored state fails to parse)
    DataCorruption,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InvalidAction => "INVALID_ACTION",
            ErrorCode::AlreadyActed => "ALREADY_ACTED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::DbError => "DB_ERROR",
            ErrorCode::DbUnavailable => "DB_UNAVAILABLE",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn wire_strings_are_unique() {
        let all = [
            ErrorCode::Unauthorized,
            ErrorCode::Forbidden,
            ErrorCode::NotFound,
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidAction,
            ErrorCode::AlreadyActed,
            ErrorCode::Conflict,
            ErrorCode::DbError,
            ErrorCode::DbUnavailable,
            ErrorCode::Internal,
            ErrorCode::ConfigError,
            ErrorCode::DataCorruption,
        ];
        let unique: HashSet<&str> = all.iter().map(|c| c.as_str()).collect();
        assert_eq!(unique.len(), all.len());
    }
}
