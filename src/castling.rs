use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;
use arrayvec::ArrayVec;
use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastlingRights: u8 {
        const WHITE_KINGSIDE = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        CastlingRights::all()
    }
}

impl CastlingRights {
    pub fn for_side(color: Color, side: CastleSide) -> Self {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => CastlingRights::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => CastlingRights::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => CastlingRights::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => CastlingRights::BLACK_QUEENSIDE,
        }
    }

    pub fn for_color(color: Color) -> Self {
        CastlingRights::for_side(color, CastleSide::Kingside)
            | CastlingRights::for_side(color, CastleSide::Queenside)
    }

    pub fn has(&self, color: Color, side: CastleSide) -> bool {
        self.contains(CastlingRights::for_side(color, side))
    }

    pub fn has_kingside(&self, color: Color) -> bool {
        self.has(color, CastleSide::Kingside)
    }

    pub fn has_queenside(&self, color: Color) -> bool {
        self.has(color, CastleSide::Queenside)
    }

    /// The right lost when a piece leaves or is captured on `sq`, if `sq` is a rook corner.
    pub fn lost_at(sq: Square) -> CastlingRights {
        let mut lost = CastlingRights::empty();
        for color in [Color::White, Color::Black] {
            for side in [CastleSide::Kingside, CastleSide::Queenside] {
                if side.rook_from(color) == sq {
                    lost |= CastlingRights::for_side(color, side);
                }
            }
        }
        lost
    }

    pub fn to_fen(&self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }

        [
            (CastlingRights::WHITE_KINGSIDE, 'K'),
            (CastlingRights::WHITE_QUEENSIDE, 'Q'),
            (CastlingRights::BLACK_KINGSIDE, 'k'),
            (CastlingRights::BLACK_QUEENSIDE, 'q'),
        ]
        .into_iter()
        .filter(|(right, _)| self.contains(*right))
        .map(|(_, c)| c)
        .collect()
    }

    /// Accepts `-` or any ordering of a subset of `KQkq` without repeats.
    pub fn from_fen(field: &str) -> Result<Self, FenError> {
        let invalid = || FenError::InvalidCastling(field.to_string());

        if field == "-" {
            return Ok(CastlingRights::empty());
        }
        if field.is_empty() {
            return Err(invalid());
        }

        let mut rights = CastlingRights::empty();
        for c in field.chars() {
            let right = match c {
                'K' => CastlingRights::WHITE_KINGSIDE,
                'Q' => CastlingRights::WHITE_QUEENSIDE,
                'k' => CastlingRights::BLACK_KINGSIDE,
                'q' => CastlingRights::BLACK_QUEENSIDE,
                _ => return Err(invalid()),
            };
            if rights.contains(right) {
                return Err(invalid());
            }
            rights |= right;
        }
        Ok(rights)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    fn square(color: Color, file: u8) -> Square {
        Square::from_coords(file, color.back_rank())
    }

    pub fn king_from(color: Color) -> Square {
        CastleSide::square(color, 4)
    }

    pub fn king_to(&self, color: Color) -> Square {
        match self {
            CastleSide::Kingside => CastleSide::square(color, 6),
            CastleSide::Queenside => CastleSide::square(color, 2),
        }
    }

    pub fn rook_from(&self, color: Color) -> Square {
        match self {
            CastleSide::Kingside => CastleSide::square(color, 7),
            CastleSide::Queenside => CastleSide::square(color, 0),
        }
    }

    pub fn rook_to(&self, color: Color) -> Square {
        match self {
            CastleSide::Kingside => CastleSide::square(color, 5),
            CastleSide::Queenside => CastleSide::square(color, 3),
        }
    }

    /// Squares between king and rook, all of which must be empty.
    pub fn empty_path(&self, color: Color) -> ArrayVec<Square, 3> {
        let files: &[u8] = match self {
            CastleSide::Kingside => &[5, 6],
            CastleSide::Queenside => &[1, 2, 3],
        };
        files
            .iter()
            .map(|&file| CastleSide::square(color, file))
            .collect()
    }

    /// Squares the king crosses or lands on, none of which may be attacked.
    pub fn king_path(&self, color: Color) -> ArrayVec<Square, 2> {
        let files: &[u8] = match self {
            CastleSide::Kingside => &[5, 6],
            CastleSide::Queenside => &[3, 2],
        };
        files
            .iter()
            .map(|&file| CastleSide::square(color, file))
            .collect()
    }

    /// Classifies a king move by destination file, for moves already known to castle.
    pub fn from_king_move(from: Square, to: Square) -> CastleSide {
        if to.file() > from.file() {
            CastleSide::Kingside
        } else {
            CastleSide::Queenside
        }
    }

    pub fn san(&self) -> &'static str {
        match self {
            CastleSide::Kingside => "O-O",
            CastleSide::Queenside => "O-O-O",
        }
    }
}
