use crate::color::Color;
use crate::pieces::PieceType;
use crate::state::BoardState;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawReason {
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
}

/// Classification of a position for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveOutcome {
    Ongoing,
    Check,
    Mate,
    Stalemate,
    Draw(DrawReason),
}

impl MoveOutcome {
    /// The mated side is the side to move, so the winner is the other one.
    pub fn winner(&self, to_move: Color) -> Option<Color> {
        match self {
            MoveOutcome::Mate => Some(to_move.opposite()),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, MoveOutcome::Ongoing | MoveOutcome::Check)
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, MoveOutcome::Stalemate | MoveOutcome::Draw(_))
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DrawReason::InsufficientMaterial => "insufficient_material",
            DrawReason::ThreefoldRepetition => "threefold_repetition",
            DrawReason::FiftyMoveRule => "fifty_move_rule",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveOutcome::Ongoing => write!(f, "ongoing"),
            MoveOutcome::Check => write!(f, "check"),
            MoveOutcome::Mate => write!(f, "mate"),
            MoveOutcome::Stalemate => write!(f, "stalemate"),
            MoveOutcome::Draw(reason) => write!(f, "draw ({})", reason),
        }
    }
}

/// Mate and stalemate from the state alone. Draw rules are layered on top by the caller.
pub fn classify_board(state: &BoardState) -> MoveOutcome {
    let in_check = state.is_check();
    match (state.has_legal_moves(), in_check) {
        (false, true) => MoveOutcome::Mate,
        (false, false) => MoveOutcome::Stalemate,
        (true, true) => MoveOutcome::Check,
        (true, false) => MoveOutcome::Ongoing,
    }
}

/// K v K, K+minor v K, and any number of bishops all standing on one square colour.
pub fn is_insufficient_material(state: &BoardState) -> bool {
    let mut minors = [0u32; 2];
    let mut knights = 0;
    let mut bishop_shades = [false; 2];

    for color in [Color::White, Color::Black] {
        let side = usize::from(color == Color::Black);
        for (sq, piece) in state.board().pieces(color) {
            match piece.piece_type {
                PieceType::Pawn | PieceType::Rook | PieceType::Queen => return false,
                PieceType::Knight => {
                    knights += 1;
                    minors[side] += 1;
                }
                PieceType::Bishop => {
                    bishop_shades[usize::from(sq.is_light())] = true;
                    minors[side] += 1;
                }
                PieceType::King => {}
            }
        }
    }

    // Bishops only, all on one colour: no square of the other shade can ever be attacked.
    if knights == 0 && bishop_shades[0] != bishop_shades[1] {
        return true;
    }

    matches!((minors[0], minors[1]), (0, 0) | (0, 1) | (1, 0))
}
