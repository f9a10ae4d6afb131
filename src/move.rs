use crate::error::NotationError;
use crate::pieces::PieceType;
use crate::square::Square;
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Properties of a move that depend on the board it is played on.
    /// Never stored in a `Move`; see `BoardState::move_flags`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        const CAPTURE = 0b00000001;
        const DOUBLE_PUSH = 0b00000010;
        const EN_PASSANT = 0b00000100;
        const CASTLE = 0b00001000;
        const PROMOTION = 0b00010000;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PieceType) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// Parses coordinate notation without a board: `e2e4`, `e2-e4`, `e2 e4`,
    /// `e4xd5`, with an optional promotion as `b7b8q`, `b7-b8=Q` or `b7-b8Q`.
    /// Trailing check or annotation marks are ignored.
    pub fn parse(text: &str) -> Result<Self, NotationError> {
        let text = strip_annotations(text.trim());
        if text.is_empty() {
            return Err(NotationError::Empty);
        }
        if !text.is_ascii() || text.len() < 4 {
            return Err(NotationError::Invalid(text.to_string()));
        }

        let invalid = || NotationError::Invalid(text.to_string());

        let from = Square::from_algebraic(&text[0..2]).ok_or_else(invalid)?;
        let rest = match text.as_bytes()[2] {
            b'-' | b'x' | b' ' => &text[3..],
            _ => &text[2..],
        };
        if rest.len() < 2 {
            return Err(invalid());
        }
        let to = Square::from_algebraic(&rest[0..2]).ok_or_else(invalid)?;

        let suffix = rest[2..].strip_prefix('=').unwrap_or(&rest[2..]);
        let mut chars = suffix.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Move::new(from, to)),
            (Some(c), None) => {
                let promotion =
                    PieceType::from_promotion_char(c).ok_or(NotationError::InvalidPromotion(c))?;
                Ok(Move::with_promotion(from, to, promotion))
            }
            _ => Err(invalid()),
        }
    }

    /// UCI long algebraic form, e.g. `e2e4` or `b7b8q`.
    pub fn to_lan(&self) -> String {
        let mut lan = format!("{}{}", self.from, self.to);
        if let Some(promo) = self.promotion.and_then(|p| p.san_letter()) {
            lan.push(promo.to_ascii_lowercase());
        }
        lan
    }

    /// Human coordinate form, e.g. `e2-e4` or `b7-b8=Q`.
    pub fn to_coordinate(&self) -> String {
        let mut text = format!("{}-{}", self.from, self.to);
        if let Some(promo) = self.promotion.and_then(|p| p.san_letter()) {
            text.push('=');
            text.push(promo);
        }
        text
    }
}

/// Removes trailing `+`, `#`, `!` and `?` marks. They are decoration only.
pub(crate) fn strip_annotations(text: &str) -> &str {
    text.trim_end_matches(['+', '#', '!', '?'])
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_lan())
    }
}

impl std::str::FromStr for Move {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}
