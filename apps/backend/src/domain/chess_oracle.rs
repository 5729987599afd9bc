//! Chess legality oracle.
//!
//! The chess template knows nothing about chess rules beyond this interface:
//! a position string in, the legal move list / the successor position / the
//! terminal verdict out. Move generation is delegated to `shakmaty`.
//!
//! Repetition draws are not detected: the authoritative position is a bare
//! FEN, which carries no history to repeat against.

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position};

use crate::domain::state::{ChessOutcome, ChessRole};
use crate::errors::{DomainError, InfraErrorKind};

/// Standard starting position.
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Result of applying a move: the successor position, plus the terminal
/// verdict when the move ended the game.
pub struct MoveResult {
    pub fen: String,
    pub outcome: Option<ChessOutcome>,
}

fn position(fen: &str) -> Result<Chess, DomainError> {
    let parsed: Fen = fen.parse().map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("stored position is not valid FEN: {e}"),
        )
    })?;
    parsed.into_position(CastlingMode::Standard).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("stored position is not a legal chess position: {e}"),
        )
    })
}

/// Side to move encoded in the position string.
pub fn side_to_move(fen: &str) -> Result<ChessRole, DomainError> {
    let pos = position(fen)?;
    Ok(match pos.turn() {
        Color::White => ChessRole::White,
        Color::Black => ChessRole::Black,
    })
}

/// All legal moves for the side to move, as UCI strings (promotion suffix
/// included). Deterministic order.
pub fn legal_moves(fen: &str) -> Result<Vec<String>, DomainError> {
    let pos = position(fen)?;
    Ok(pos
        .legal_moves()
        .iter()
        .map(|m| m.to_uci(CastlingMode::Standard).to_string())
        .collect())
}

/// Apply a UCI move to the position. Fails when the string is malformed or
/// the move is not legal in the position.
pub fn apply_move(fen: &str, uci: &str) -> Result<MoveResult, DomainError> {
    let pos = position(fen)?;

    let parsed: UciMove = uci
        .parse()
        .map_err(|_| DomainError::invalid_action(format!("malformed move: {uci}")))?;
    let mv = parsed
        .to_move(&pos)
        .map_err(|_| DomainError::invalid_action(format!("illegal move: {uci}")))?;
    let next = pos
        .play(&mv)
        .map_err(|_| DomainError::invalid_action(format!("illegal move: {uci}")))?;

    let outcome = if next.is_checkmate() {
        // The side to move after the push is the side that got mated.
        Some(match next.turn() {
            Color::White => ChessOutcome::BlackWins,
            Color::Black => ChessOutcome::WhiteWins,
        })
    } else if next.is_stalemate() || next.is_insufficient_material() || next.halfmoves() >= 100 {
        Some(ChessOutcome::Draw)
    } else {
        None
    };

    let fen = Fen::from_position(next, EnPassantMode::Legal).to_string();
    Ok(MoveResult { fen, outcome })
}
