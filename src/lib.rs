pub mod board;
pub mod castling;
pub mod color;
pub mod error;
pub mod fen;
pub mod game;
pub mod legality;
pub mod r#move;
pub mod movegen;
pub mod outcome;
pub mod perft;
pub mod pieces;
pub mod san;
pub mod square;
pub mod state;

#[cfg(feature = "serde")]
pub mod serde_support;

pub use error::{
    AmbiguousMoveError, ChessError, FenError, IllegalMoveError, IllegalReason, NotationError,
    UnmatchedMoveError,
};
pub use game::{LegalMove, Position};
pub use outcome::{DrawReason, MoveOutcome};
pub use r#move::{Move, MoveFlags};
pub use state::BoardState;
