use crate::color::Color;
use crate::error::FenError;
use crate::pieces::{Piece, PieceType};
use crate::square::Square;
use std::fmt;

pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Piece placement only. Side to move, rights and clocks live in `BoardState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    pub fn standard() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, piece_type) in back_rank.into_iter().enumerate() {
            for color in [Color::White, Color::Black] {
                let file = file as u8;
                if let Some(sq) = Square::new(file, color.back_rank()) {
                    board.set_piece(sq, Some(Piece::new(piece_type, color)));
                }
                if let Some(sq) = Square::new(file, color.pawn_home_rank()) {
                    board.set_piece(sq, Some(Piece::new(PieceType::Pawn, color)));
                }
            }
        }
        board
    }

    pub fn get_piece(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index()] = piece;
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty_count = 0;

            for file in 0..8u8 {
                let piece = Square::new(file, rank).and_then(|sq| self.get_piece(sq));
                if let Some(piece) = piece {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }

            if rank > 0 {
                fen.push('/');
            }
        }

        fen
    }

    /// Parses the piece-placement field of a FEN record.
    pub fn from_fen(placement: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let ranks: Vec<&str> = placement.split('/').collect();

        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut width = 0usize;
            // Two digits in a row ("44") would be a non-canonical encoding.
            let mut last_was_digit = false;

            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    if last_was_digit {
                        return Err(FenError::InvalidPiece(c));
                    }
                    width += skip as usize;
                    last_was_digit = true;
                } else if let Some(piece) = Piece::from_char(c) {
                    let sq = u8::try_from(width)
                        .ok()
                        .and_then(|file| Square::new(file, rank))
                        .ok_or(FenError::RankWidth {
                            rank: rank + 1,
                            width: width + 1,
                        })?;
                    board.set_piece(sq, Some(piece));
                    width += 1;
                    last_was_digit = false;
                } else {
                    return Err(FenError::InvalidPiece(c));
                }
            }

            if width != 8 {
                return Err(FenError::RankWidth {
                    rank: rank + 1,
                    width,
                });
            }
        }

        Ok(board)
    }

    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        Square::all()
            .filter_map(|sq| self.get_piece(sq).map(|piece| (sq, piece)))
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| {
            self.get_piece(sq) == Some(Piece::new(PieceType::King, color))
        })
    }

    pub fn count(&self, piece: Piece) -> usize {
        self.squares.iter().filter(|p| **p == Some(piece)).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                match Square::new(file, rank).and_then(|sq| self.get_piece(sq)) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }

        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::*;
    use rstest::rstest;

    #[test]
    fn test_empty_board() {
        let board = Board::empty();
        assert!(Square::all().all(|sq| board.is_empty(sq)));
        assert_eq!(board.to_fen(), "8/8/8/8/8/8/8/8");
    }

    #[test]
    fn test_board_piece_placement() {
        let mut board = Board::empty();
        let king = Piece::new(PieceType::King, Color::White);

        board.set_piece(E1, Some(king));
        assert_eq!(board.get_piece(E1), Some(king));
        assert_eq!(board.find_king(Color::White), Some(E1));
        assert_eq!(board.find_king(Color::Black), None);

        board.set_piece(E1, None);
        assert_eq!(board.get_piece(E1), None);
    }

    #[test]
    fn test_board_standard_position() {
        let board = Board::standard();

        assert_eq!(
            board.get_piece(A1),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
        assert_eq!(
            board.get_piece(E8),
            Some(Piece::new(PieceType::King, Color::Black))
        );
        assert_eq!(
            board.get_piece(D1),
            Some(Piece::new(PieceType::Queen, Color::White))
        );
        assert_eq!(board.count(Piece::new(PieceType::Pawn, Color::White)), 8);
        assert_eq!(board.count(Piece::new(PieceType::Pawn, Color::Black)), 8);
        assert_eq!(board.pieces(Color::White).len(), 16);
    }

    #[test]
    fn test_board_fen_conversion() {
        let board = Board::standard();
        let fen = board.to_fen();
        assert_eq!(fen, STARTING_PLACEMENT);
        assert_eq!(Board::from_fen(&fen), Ok(board));
    }

    #[rstest]
    #[case("8/8/8/8/8/8/8/8")]
    #[case("1Q6/8/8/8/8/8/8/8")]
    #[case("r2q1rk1/p2n1pp1/2pb1np1/1p6/2BP1P2/6N1/PPP3PP/R1BQR1K1")]
    fn test_board_fen_reproducible(#[case] fen: &str) {
        let board = Board::from_fen(fen).expect("valid placement");
        assert_eq!(board.to_fen(), fen);
    }

    #[rstest]
    #[case("8/8/8/8/8/8/8", FenError::RankCount(7))]
    #[case("8/8/8/8/8/8/8/8/8", FenError::RankCount(9))]
    #[case("7/8/8/8/8/8/8/8", FenError::RankWidth { rank: 8, width: 7 })]
    #[case("9/8/8/8/8/8/8/8", FenError::InvalidPiece('9'))]
    #[case("8/8/8/8/8/8/8/ppppppppp", FenError::RankWidth { rank: 1, width: 9 })]
    #[case("8/8/8/8/8/8/8/44", FenError::InvalidPiece('4'))]
    #[case("8/8/8/8/8/8/8/7x", FenError::InvalidPiece('x'))]
    #[case("8/8/8/8/8/8/8/0pppppppp", FenError::InvalidPiece('0'))]
    fn test_board_fen_invalid(#[case] fen: &str, #[case] expected: FenError) {
        assert_eq!(Board::from_fen(fen), Err(expected));
    }

    #[test]
    fn test_board_display() {
        let text = Board::standard().to_string();
        let first = text.lines().next().expect("at least one line");
        assert_eq!(first, "8 r n b q k b n r ");
        assert!(text.ends_with("  a b c d e f g h"));
    }
}
