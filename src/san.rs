//! Standard Algebraic Notation.
//!
//! Parsing is context-free and produces a `San` pattern. Resolving that pattern
//! against a state picks out the single legal move it names. Check and mate
//! marks on input are accepted but never verified.

use crate::castling::CastleSide;
use crate::error::{AmbiguousMoveError, ChessError, NotationError, UnmatchedMoveError};
use crate::pieces::PieceType;
use crate::r#move::{Move, MoveFlags, strip_annotations};
use crate::square::Square;
use crate::state::BoardState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum San {
    Castle(CastleSide),
    Normal {
        piece: PieceType,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        capture: bool,
        to: Square,
        promotion: Option<PieceType>,
    },
}

impl San {
    pub fn parse(text: &str) -> Result<San, NotationError> {
        let text = strip_annotations(text.trim());
        if text.is_empty() {
            return Err(NotationError::Empty);
        }

        match text {
            "O-O" | "0-0" => return Ok(San::Castle(CastleSide::Kingside)),
            "O-O-O" | "0-0-0" => return Ok(San::Castle(CastleSide::Queenside)),
            _ => {}
        }

        let invalid = || NotationError::Invalid(text.to_string());
        if !text.is_ascii() {
            return Err(invalid());
        }

        let (piece, mut body) = match text.chars().next().and_then(PieceType::from_san_letter) {
            Some(piece) if piece != PieceType::Pawn => (piece, &text[1..]),
            _ => (PieceType::Pawn, text),
        };

        let mut promotion = None;
        if let Some((rest, promo)) = body.split_once('=') {
            let mut chars = promo.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(invalid());
            };
            promotion =
                Some(PieceType::from_promotion_char(c).ok_or(NotationError::InvalidPromotion(c))?);
            body = rest;
        } else if let Some(c) = body.chars().last().filter(|c| c.is_ascii_uppercase()) {
            promotion =
                Some(PieceType::from_promotion_char(c).ok_or(NotationError::InvalidPromotion(c))?);
            body = &body[..body.len() - 1];
        }

        if promotion.is_some() && piece != PieceType::Pawn {
            return Err(invalid());
        }
        if body.len() < 2 {
            return Err(invalid());
        }

        let (prefix, dest) = body.split_at(body.len() - 2);
        let to = Square::from_algebraic(dest).ok_or_else(invalid)?;

        let (prefix, capture) = match prefix.strip_suffix('x') {
            Some(rest) => (rest, true),
            None => (prefix, false),
        };

        let mut from_file = None;
        let mut from_rank = None;
        let mut chars = prefix.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (None, _, _) => {}
            (Some(c), None, _) => {
                if let Some(file) = Square::file_from_char(c) {
                    from_file = Some(file);
                } else {
                    from_rank = Some(Square::rank_from_char(c).ok_or_else(invalid)?);
                }
            }
            (Some(f), Some(r), None) => {
                from_file = Some(Square::file_from_char(f).ok_or_else(invalid)?);
                from_rank = Some(Square::rank_from_char(r).ok_or_else(invalid)?);
            }
            _ => return Err(invalid()),
        }

        Ok(San::Normal {
            piece,
            from_file,
            from_rank,
            capture,
            to,
            promotion,
        })
    }

    /// Whether `mv` fits this pattern in `state`, ignoring the promotion piece.
    /// The capture marker is advisory and not compared.
    fn matches_shape(&self, state: &BoardState, mv: &Move) -> bool {
        let Some(moving) = state.piece_at(mv.from) else {
            return false;
        };

        match *self {
            San::Castle(side) => {
                moving.piece_type == PieceType::King
                    && mv.from == CastleSide::king_from(moving.color)
                    && mv.to == side.king_to(moving.color)
            }
            San::Normal {
                piece,
                from_file,
                from_rank,
                to,
                ..
            } => {
                moving.piece_type == piece
                    && mv.to == to
                    && from_file.is_none_or(|f| mv.from.file() == f)
                    && from_rank.is_none_or(|r| mv.from.rank() == r)
                    && !state.move_flags(mv).contains(MoveFlags::CASTLE)
            }
        }
    }

    pub fn matches(&self, state: &BoardState, mv: &Move) -> bool {
        let promotion = match self {
            San::Castle(_) => None,
            San::Normal { promotion, .. } => *promotion,
        };
        self.matches_shape(state, mv) && mv.promotion == promotion
    }

    /// The move this pattern would name if the board allowed it, used to explain
    /// why nothing legal matched.
    fn closest_candidate(&self, state: &BoardState) -> Option<Move> {
        match *self {
            San::Castle(side) => {
                let color = state.turn();
                Some(Move::new(CastleSide::king_from(color), side.king_to(color)))
            }
            San::Normal { promotion, .. } => state
                .pseudo_legal_moves()
                .into_iter()
                .find(|mv| self.matches_shape(state, mv))
                .map(|mv| Move { promotion, ..mv }),
        }
    }
}

impl std::str::FromStr for San {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        San::parse(s)
    }
}

/// Finds the unique legal move `text` names in `state`.
pub fn resolve(state: &BoardState, text: &str) -> Result<Move, ChessError> {
    let san = San::parse(text)?;

    let matching: Vec<Move> = state
        .legal_moves()
        .into_iter()
        .filter(|mv| san.matches(state, mv))
        .collect();

    match matching.as_slice() {
        [mv] => Ok(*mv),
        [] => {
            // Prefer the precise rule violation when the text names a real piece move.
            if let Some(candidate) = san.closest_candidate(state) {
                if let Err(err) = state.check_legality(&candidate) {
                    return Err(err.into());
                }
            }
            Err(UnmatchedMoveError {
                text: text.trim().to_string(),
            }
            .into())
        }
        _ => Err(AmbiguousMoveError {
            text: text.trim().to_string(),
            candidates: matching,
        }
        .into()),
    }
}

/// Writes `mv` in SAN. `mv` must be legal in `state`.
pub fn format(state: &BoardState, mv: &Move) -> String {
    let Some(piece) = state.piece_at(mv.from) else {
        return mv.to_lan();
    };
    let flags = state.move_flags(mv);
    let mut san = String::new();

    if flags.contains(MoveFlags::CASTLE) {
        san.push_str(CastleSide::from_king_move(mv.from, mv.to).san());
    } else if piece.piece_type == PieceType::Pawn {
        if flags.contains(MoveFlags::CAPTURE) {
            san.push(mv.from.file_char());
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());
        if let Some(promo) = mv.promotion.and_then(|p| p.san_letter()) {
            san.push('=');
            san.push(promo);
        }
    } else {
        if let Some(letter) = piece.piece_type.san_letter() {
            san.push(letter);
        }
        san.push_str(&disambiguation(state, mv, piece.piece_type));
        if flags.contains(MoveFlags::CAPTURE) {
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());
    }

    let next = state.apply(mv);
    if next.is_check() {
        san.push(if next.has_legal_moves() { '+' } else { '#' });
    }

    san
}

/// File if that suffices, then rank, then the full origin square.
fn disambiguation(state: &BoardState, mv: &Move, piece_type: PieceType) -> String {
    let rivals: Vec<Square> = state
        .legal_moves()
        .into_iter()
        .filter(|other| other.to == mv.to && other.from != mv.from)
        .filter(|other| state.piece_at(other.from).map(|p| p.piece_type) == Some(piece_type))
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != mv.from.file()) {
        mv.from.file_char().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != mv.from.rank()) {
        mv.from.rank_char().to_string()
    } else {
        mv.from.to_algebraic()
    }
}
