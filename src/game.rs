use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::board::Board;
use crate::castling::CastlingRights;
use crate::color::Color;
use crate::error::{ChessError, IllegalMoveError};
use crate::fen;
use crate::outcome::{self, DrawReason, MoveOutcome};
use crate::r#move::{Move, MoveFlags};
use crate::san;
use crate::square::Square;
use crate::state::BoardState;

/// What must match for two positions to count as a repetition. The en passant
/// square only counts when a capture there is actually legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct RepetitionKey {
    board: Board,
    turn: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
}

impl RepetitionKey {
    fn of(state: &BoardState) -> Self {
        RepetitionKey {
            board: *state.board(),
            turn: state.turn(),
            castling_rights: state.castling_rights(),
            en_passant: state.en_passant().filter(|_| state.has_legal_en_passant()),
        }
    }
}

/// One link of the persistent game history. Branches share their common prefix.
#[derive(Debug)]
struct HistoryNode {
    key: RepetitionKey,
    parent: Option<Arc<HistoryNode>>,
}

impl Drop for HistoryNode {
    // Unlinks iteratively so a long game does not recurse once per ply.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Arc::try_unwrap(node) {
                Ok(mut node) => parent = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Immutable game position: the board state, the history that led to it and
/// a lazily computed classification.
#[derive(Clone, Debug)]
pub struct Position {
    state: BoardState,
    history: Arc<HistoryNode>,
    properties: OnceLock<MoveOutcome>,
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl Position {
    pub fn starting() -> Self {
        Position::from_state(BoardState::starting())
    }

    /// A position with no history before `state`.
    pub fn from_state(state: BoardState) -> Self {
        Position::with_parent(state, None)
    }

    /// Nothing before a capture or pawn move can repeat, so the chain is cut
    /// whenever the halfmove clock is reset.
    fn with_parent(state: BoardState, parent: Option<Arc<HistoryNode>>) -> Self {
        let parent = parent.filter(|_| state.halfmove_clock() > 0);
        Position {
            history: Arc::new(HistoryNode {
                key: RepetitionKey::of(&state),
                parent,
            }),
            state,
            properties: OnceLock::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        Ok(fen::parse(fen)?)
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn turn(&self) -> Color {
        self.state.turn()
    }

    pub fn to_fen(&self) -> String {
        fen::print(self)
    }

    /// Applies move text, coordinate notation first and SAN otherwise. The
    /// receiver is left untouched whether or not the move is accepted.
    pub fn make_move(&self, text: &str) -> Result<Position, ChessError> {
        let mv = match Move::parse(text) {
            Ok(mv) => mv,
            Err(coordinate_err) => san::resolve(&self.state, text)
                .map_err(|san_err| match san_err {
                    ChessError::Notation(_) if starts_with_square(text) => coordinate_err.into(),
                    other => other,
                })
                .inspect_err(|e| {
                    log::debug!("rejected move '{}' in {}: {}", text, self.to_fen(), e);
                })?,
        };

        let legal = self.validate_legal_move(mv).inspect_err(|e| {
            log::debug!("rejected move '{}' in {}: {}", text, self.to_fen(), e);
        })?;

        Ok(legal.to_position())
    }

    /// Plays a move validated earlier. A `LegalMove` from another position is
    /// checked again against this one.
    pub fn make_legal_move(&self, legal: &LegalMove) -> Result<Position, IllegalMoveError> {
        if Arc::ptr_eq(&legal.parent, &self.history) {
            return Ok(legal.to_position());
        }
        Ok(self.validate_legal_move(legal.mv)?.to_position())
    }

    pub fn validate_legal_move(&self, mv: Move) -> Result<LegalMove, IllegalMoveError> {
        let next = self.state.check_legality(&mv)?;
        Ok(LegalMove {
            mv,
            flags: self.state.move_flags(&mv),
            next,
            parent: Arc::clone(&self.history),
        })
    }

    pub fn legal_moves(&self) -> Vec<LegalMove> {
        self.state
            .legal_successors()
            .into_iter()
            .map(|(mv, next)| LegalMove {
                mv,
                flags: self.state.move_flags(&mv),
                next,
                parent: Arc::clone(&self.history),
            })
            .collect()
    }

    /// Computed on first access and cached for the lifetime of the position.
    pub fn properties(&self) -> MoveOutcome {
        *self.properties.get_or_init(|| {
            let outcome = self.classify();
            log::trace!("classified {} as {}", self.to_fen(), outcome);
            outcome
        })
    }

    fn classify(&self) -> MoveOutcome {
        let board_outcome = outcome::classify_board(&self.state);
        if matches!(board_outcome, MoveOutcome::Mate | MoveOutcome::Stalemate) {
            return board_outcome;
        }

        if outcome::is_insufficient_material(&self.state) {
            MoveOutcome::Draw(DrawReason::InsufficientMaterial)
        } else if self.repetition_count() >= 3 {
            MoveOutcome::Draw(DrawReason::ThreefoldRepetition)
        } else if self.state.halfmove_clock() >= 100 {
            MoveOutcome::Draw(DrawReason::FiftyMoveRule)
        } else {
            board_outcome
        }
    }

    /// How many times this position has occurred, counting itself. Nothing
    /// before the last capture or pawn move can repeat, so the scan stops there.
    pub fn repetition_count(&self) -> usize {
        let key = &self.history.key;
        let window = self.state.halfmove_clock() as usize + 1;

        std::iter::successors(Some(&self.history), |node| node.parent.as_ref())
            .take(window)
            .filter(|node| node.key == *key)
            .count()
    }

    pub fn is_check(&self) -> bool {
        self.state.is_check()
    }

    pub fn is_over(&self) -> bool {
        self.properties().is_terminal()
    }

    pub fn winner(&self) -> Option<Color> {
        self.properties().winner(self.turn())
    }

    /// SAN for a move validated against this position.
    pub fn san(&self, legal: &LegalMove) -> String {
        san::format(&self.state, &legal.mv)
    }

    /// Board diagram followed by side to move, classification and FEN.
    pub fn dump(&self) -> String {
        format!(
            "{}\n{} to move ({})\n{}",
            self.state.board(),
            self.turn(),
            self.properties(),
            self.to_fen()
        )
    }
}

/// Whether `text` opens with a square, as coordinate notation does. Only
/// consulted once the text failed to parse as SAN too.
fn starts_with_square(text: &str) -> bool {
    text.trim()
        .get(0..2)
        .and_then(Square::from_algebraic)
        .is_some()
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dump())
    }
}

/// A move proven legal in one specific position, carrying the state it leads to.
#[derive(Clone, Debug)]
pub struct LegalMove {
    mv: Move,
    flags: MoveFlags,
    next: BoardState,
    parent: Arc<HistoryNode>,
}

impl LegalMove {
    pub fn mv(&self) -> Move {
        self.mv
    }

    pub fn flags(&self) -> MoveFlags {
        self.flags
    }

    pub fn next_state(&self) -> &BoardState {
        &self.next
    }

    pub fn to_position(&self) -> Position {
        log::trace!("applied {}", self.mv);
        Position::with_parent(self.next, Some(Arc::clone(&self.parent)))
    }
}

impl PartialEq for LegalMove {
    fn eq(&self, other: &Self) -> bool {
        self.mv == other.mv && Arc::ptr_eq(&self.parent, &other.parent)
    }
}

impl fmt::Display for LegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mv)
    }
}
