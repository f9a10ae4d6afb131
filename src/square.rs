use paste::paste;
use std::fmt;

/// A square on the 8x8 board. Both coordinates are always in `0..8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    /// Caller guarantees both coordinates are in `0..8`.
    pub(crate) const fn from_coords(file: u8, rank: u8) -> Self {
        Square { file, rank }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Square::from_coords((index % 8) as u8, (index / 8) as u8))
        } else {
            None
        }
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn index(&self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).filter_map(Square::from_index)
    }

    /// The square `df` files and `dr` ranks away, if it is on the board.
    pub fn offset(&self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::from_coords(file as u8, rank as u8))
        } else {
            None
        }
    }

    pub fn is_light(&self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    pub fn rank_char(&self) -> char {
        (b'1' + self.rank) as char
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    pub fn file_from_char(c: char) -> Option<u8> {
        match c {
            'a'..='h' => Some(c as u8 - b'a'),
            _ => None,
        }
    }

    pub fn rank_from_char(c: char) -> Option<u8> {
        match c {
            '1'..='8' => Some(c as u8 - b'1'),
            _ => None,
        }
    }

    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next().and_then(Square::file_from_char)?;
        let rank = chars.next().and_then(Square::rank_from_char)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::from_coords(file, rank))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

macro_rules! square_constants {
    ($($file:ident = $index:expr),* $(,)?) => {
        paste! {
            $(
                pub const [<$file 1>]: Square = Square::from_coords($index, 0);
                pub const [<$file 2>]: Square = Square::from_coords($index, 1);
                pub const [<$file 3>]: Square = Square::from_coords($index, 2);
                pub const [<$file 4>]: Square = Square::from_coords($index, 3);
                pub const [<$file 5>]: Square = Square::from_coords($index, 4);
                pub const [<$file 6>]: Square = Square::from_coords($index, 5);
                pub const [<$file 7>]: Square = Square::from_coords($index, 6);
                pub const [<$file 8>]: Square = Square::from_coords($index, 7);
            )*
        }
    };
}

square_constants!(A = 0, B = 1, C = 2, D = 3, E = 4, F = 5, G = 6, H = 7);
