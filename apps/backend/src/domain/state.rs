//! Typed session-state documents.
//!
//! The store persists session state as an opaque JSON document; this module
//! is the boundary where those documents become tagged variants dispatched on
//! the owning template id. The arbiter passes `SessionState` values around
//! without inspecting them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{DomainError, InfraErrorKind};

// ----- rock-paper-scissors -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpsPhase {
    Commit,
    Reveal,
}

/// A committed choice. `Hidden` only ever appears in role-filtered views,
/// never in authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
    Hidden,
}

impl RpsChoice {
    /// Parse an action string. `"hidden"` is not an action and does not parse.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "rock" => Some(RpsChoice::Rock),
            "paper" => Some(RpsChoice::Paper),
            "scissors" => Some(RpsChoice::Scissors),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RpsChoice::Rock => "rock",
            RpsChoice::Paper => "paper",
            RpsChoice::Scissors => "scissors",
            RpsChoice::Hidden => "hidden",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpsResult {
    #[serde(rename = "player_1_wins")]
    Player1Wins,
    #[serde(rename = "player_2_wins")]
    Player2Wins,
    #[serde(rename = "draw")]
    Draw,
}

/// Per-role choice slots; both roles always present in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsChoices {
    pub player_1: Option<RpsChoice>,
    pub player_2: Option<RpsChoice>,
}

impl RpsChoices {
    /// The slot for `role`, or None when the role is not part of the template.
    pub fn slot(&self, role: &str) -> Option<Option<RpsChoice>> {
        match role {
            "player_1" => Some(self.player_1),
            "player_2" => Some(self.player_2),
            _ => None,
        }
    }

    pub fn set(&mut self, role: &str, choice: RpsChoice) {
        match role {
            "player_1" => self.player_1 = Some(choice),
            "player_2" => self.player_2 = Some(choice),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpsState {
    pub phase: RpsPhase,
    pub choices: RpsChoices,
    pub result: Option<RpsResult>,
}

// ----- chess -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChessRole {
    White,
    Black,
}

impl ChessRole {
    pub fn opponent(self) -> Self {
        match self {
            ChessRole::White => ChessRole::Black,
            ChessRole::Black => ChessRole::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChessRole::White => "white",
            ChessRole::Black => "black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChessOutcome {
    WhiteWins,
    BlackWins,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChessState {
    /// Authoritative position, FEN.
    pub fen: String,
    pub turn: ChessRole,
    /// Accepted moves in UCI notation, in order.
    pub moves: Vec<String>,
    pub outcome: Option<ChessOutcome>,
}

// ----- the tagged sum -----

/// Session state, dispatched on the owning template id.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Rps(RpsState),
    Chess(ChessState),
}

impl SessionState {
    pub fn template_id(&self) -> &'static str {
        match self {
            SessionState::Rps(_) => crate::domain::rps::TEMPLATE_ID,
            SessionState::Chess(_) => crate::domain::chess::TEMPLATE_ID,
        }
    }

    /// Serialize to the opaque document persisted in the `state` column and
    /// returned on the wire.
    pub fn to_document(&self) -> Result<Value, DomainError> {
        let result = match self {
            SessionState::Rps(s) => serde_json::to_value(s),
            SessionState::Chess(s) => serde_json::to_value(s),
        };
        result.map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("state failed to serialize: {e}"),
            )
        })
    }

    /// Parse a persisted document back into the variant owned by `template`.
    pub fn from_document(template: &str, doc: &Value) -> Result<Self, DomainError> {
        let parsed = match template {
            crate::domain::rps::TEMPLATE_ID => {
                serde_json::from_value(doc.clone()).map(SessionState::Rps)
            }
            crate::domain::chess::TEMPLATE_ID => {
                serde_json::from_value(doc.clone()).map(SessionState::Chess)
            }
            other => {
                return Err(DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("stored state references unknown template: {other}"),
                ))
            }
        };
        parsed.map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("stored state failed to parse under {template}: {e}"),
            )
        })
    }
}
