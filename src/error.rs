use crate::color::Color;
use crate::r#move::Move;
use crate::square::Square;
use std::fmt;
use thiserror::Error;

/// Move text that could not be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("empty move text")]
    Empty,
    #[error("invalid move text '{0}'")]
    Invalid(String),
    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("invalid FEN: expected 6 fields, got {0}")]
    FieldCount(usize),
    #[error("invalid FEN: expected 8 ranks, got {0}")]
    RankCount(usize),
    #[error("invalid FEN: rank {rank} describes {width} squares")]
    RankWidth { rank: u8, width: usize },
    #[error("invalid FEN: unexpected character '{0}' in piece placement")]
    InvalidPiece(char),
    #[error("invalid FEN: side to move must be 'w' or 'b', got '{0}'")]
    InvalidSide(String),
    #[error("invalid FEN: castling rights '{0}'")]
    InvalidCastling(String),
    #[error("invalid FEN: en passant square '{0}'")]
    InvalidEnPassant(String),
    #[error("invalid FEN: halfmove clock '{0}'")]
    InvalidHalfmoveClock(String),
    #[error("invalid FEN: fullmove number '{0}'")]
    InvalidFullmoveNumber(String),
    #[error("invalid FEN: pawn on back rank at {0}")]
    PawnOnBackRank(Square),
    #[error("invalid FEN: more than one {0} king")]
    TooManyKings(Color),
}

/// Why a syntactically valid move was refused in a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IllegalReason {
    NoPieceOnSource,
    NotYourTurn,
    FriendlyFire,
    Unreachable,
    KingLeftInCheck,
    CastlingRightLost,
    CastlingPathBlocked,
    CastlingOutOfCheck,
    CastlingThroughCheck,
    MissingPromotion,
    UnexpectedPromotion,
    InvalidPromotionPiece,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IllegalReason::NoPieceOnSource => "no piece on the source square",
            IllegalReason::NotYourTurn => "piece belongs to the side not on move",
            IllegalReason::FriendlyFire => "cannot capture own piece",
            IllegalReason::Unreachable => "piece cannot reach the destination",
            IllegalReason::KingLeftInCheck => "king would be left in check",
            IllegalReason::CastlingRightLost => "castling right has been lost",
            IllegalReason::CastlingPathBlocked => "castling path is blocked",
            IllegalReason::CastlingOutOfCheck => "cannot castle out of check",
            IllegalReason::CastlingThroughCheck => {
                "king passes through or lands on an attacked square"
            }
            IllegalReason::MissingPromotion => "pawn reaching the last rank must promote",
            IllegalReason::UnexpectedPromotion => "only a pawn reaching the last rank may promote",
            IllegalReason::InvalidPromotionPiece => "cannot promote to that piece",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal move {mv}: {reason}")]
pub struct IllegalMoveError {
    pub mv: Move,
    pub reason: IllegalReason,
}

impl IllegalMoveError {
    pub fn new(mv: Move, reason: IllegalReason) -> Self {
        IllegalMoveError { mv, reason }
    }
}

/// SAN text that matches more than one legal move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ambiguous move '{text}': {} candidates", .candidates.len())]
pub struct AmbiguousMoveError {
    pub text: String,
    pub candidates: Vec<Move>,
}

/// SAN text that names no legal move in the position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal move '{text}': no legal move matches")]
pub struct UnmatchedMoveError {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousMoveError),
    #[error(transparent)]
    Illegal(#[from] IllegalMoveError),
    #[error(transparent)]
    Unmatched(#[from] UnmatchedMoveError),
    #[error(transparent)]
    Fen(#[from] FenError),
}

impl ChessError {
    /// True for every failure caused by the rules rather than by the text.
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, ChessError::Illegal(_) | ChessError::Unmatched(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::{E2, E5};

    #[test]
    fn test_illegal_move_message() {
        let err = IllegalMoveError::new(Move::new(E2, E5), IllegalReason::Unreachable);
        assert_eq!(
            err.to_string(),
            "illegal move e2e5: piece cannot reach the destination"
        );
    }

    #[test]
    fn test_ambiguous_message() {
        let err = AmbiguousMoveError {
            text: "Nd2".to_string(),
            candidates: vec![Move::new(E2, E5), Move::new(E5, E2)],
        };
        assert_eq!(err.to_string(), "ambiguous move 'Nd2': 2 candidates");
    }

    #[test]
    fn test_chess_error_conversion() {
        let err: ChessError = FenError::FieldCount(3).into();
        assert_eq!(err.to_string(), "invalid FEN: expected 6 fields, got 3");
        assert!(!err.is_illegal_move());

        let err: ChessError = UnmatchedMoveError {
            text: "Ke4".to_string(),
        }
        .into();
        assert!(err.is_illegal_move());
    }
}
