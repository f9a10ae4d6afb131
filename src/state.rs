use crate::board::Board;
use crate::castling::{CastleSide, CastlingRights};
use crate::color::Color;
use crate::pieces::{Piece, PieceType};
use crate::r#move::{Move, MoveFlags};
use crate::square::Square;

/// Immutable snapshot of everything the rules need to know about a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardState {
    board: Board,
    turn: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::starting()
    }
}

impl BoardState {
    pub fn starting() -> Self {
        BoardState {
            board: Board::standard(),
            turn: Color::White,
            castling_rights: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Assembles a state from already-validated parts. See `fen::parse_state`
    /// for the checked entry point.
    pub fn from_parts(
        board: Board,
        turn: Color,
        castling_rights: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        BoardState {
            board,
            turn,
            castling_rights,
            en_passant,
            halfmove_clock,
            fullmove_number: fullmove_number.max(1),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.get_piece(sq)
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board.find_king(color)
    }

    /// Derives capture, en passant, castle, double push and promotion flags for `mv`
    /// from the board. Does not check legality.
    pub fn move_flags(&self, mv: &Move) -> MoveFlags {
        let mut flags = MoveFlags::empty();

        let Some(piece) = self.board.get_piece(mv.from) else {
            return flags;
        };

        if self
            .board
            .get_piece(mv.to)
            .is_some_and(|target| target.color != piece.color)
        {
            flags |= MoveFlags::CAPTURE;
        }

        match piece.piece_type {
            PieceType::Pawn => {
                if Some(mv.to) == self.en_passant
                    && mv.from.file() != mv.to.file()
                    && self.board.is_empty(mv.to)
                {
                    flags |= MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
                }
                if mv.from.rank().abs_diff(mv.to.rank()) == 2 {
                    flags |= MoveFlags::DOUBLE_PUSH;
                }
            }
            PieceType::King => {
                if mv.from.file().abs_diff(mv.to.file()) == 2 && mv.from.rank() == mv.to.rank() {
                    flags |= MoveFlags::CASTLE;
                }
            }
            _ => {}
        }

        if mv.promotion.is_some() {
            flags |= MoveFlags::PROMOTION;
        }

        flags
    }

    /// Plays `mv` without checking it, producing the successor state.
    /// Callers must have established at least pseudo-legality.
    pub(crate) fn apply(&self, mv: &Move) -> BoardState {
        let mut next = *self;

        let Some(piece) = self.board.get_piece(mv.from) else {
            return next;
        };
        let flags = self.move_flags(mv);

        next.board.set_piece(mv.from, None);
        let placed = match mv.promotion {
            Some(promotion) if piece.piece_type == PieceType::Pawn => {
                Piece::new(promotion, piece.color)
            }
            _ => piece,
        };
        next.board.set_piece(mv.to, Some(placed));

        if flags.contains(MoveFlags::EN_PASSANT) {
            if let Some(captured) = Square::new(mv.to.file(), mv.from.rank()) {
                next.board.set_piece(captured, None);
            }
        }

        if flags.contains(MoveFlags::CASTLE) {
            let side = CastleSide::from_king_move(mv.from, mv.to);
            let rook_from = side.rook_from(piece.color);
            if let Some(rook) = next.board.get_piece(rook_from) {
                next.board.set_piece(rook_from, None);
                next.board.set_piece(side.rook_to(piece.color), Some(rook));
            }
        }

        if piece.piece_type == PieceType::King {
            next.castling_rights -= CastlingRights::for_color(piece.color);
        }
        next.castling_rights -= CastlingRights::lost_at(mv.from) | CastlingRights::lost_at(mv.to);

        next.en_passant = None;
        if piece.piece_type == PieceType::Pawn && flags.contains(MoveFlags::DOUBLE_PUSH) {
            next.en_passant = Square::new(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2);
        }

        if piece.piece_type == PieceType::Pawn || flags.contains(MoveFlags::CAPTURE) {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if self.turn == Color::Black {
            next.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        next.turn = self.turn.opposite();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::*;

    fn state(fen: &str) -> BoardState {
        BoardState::from_fen(fen).expect("valid FEN")
    }

    #[test]
    fn test_starting_state() {
        let s = BoardState::starting();
        assert_eq!(s.turn(), Color::White);
        assert_eq!(s.castling_rights(), CastlingRights::all());
        assert_eq!(s.en_passant(), None);
        assert_eq!(s.halfmove_clock(), 0);
        assert_eq!(s.fullmove_number(), 1);
        assert_eq!(s.king_square(Color::White), Some(E1));
        assert_eq!(s.king_square(Color::Black), Some(E8));
    }

    #[test]
    fn test_double_push_sets_en_passant() {
        let next = BoardState::starting().apply(&Move::new(E2, E4));
        assert_eq!(next.en_passant(), Some(E3));
        assert_eq!(next.turn(), Color::Black);
        assert_eq!(next.fullmove_number(), 1);

        let next = next.apply(&Move::new(G8, F6));
        assert_eq!(next.en_passant(), None);
        assert_eq!(next.fullmove_number(), 2);
        assert_eq!(next.halfmove_clock(), 1);
    }

    #[test]
    fn test_en_passant_capture_removes_pawn() {
        let s = state("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
        let mv = Move::new(E5, D6);
        assert_eq!(
            s.move_flags(&mv),
            MoveFlags::CAPTURE | MoveFlags::EN_PASSANT
        );
        let next = s.apply(&mv);
        assert_eq!(next.piece_at(D5), None);
        assert_eq!(
            next.piece_at(D6),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );
        assert_eq!(next.halfmove_clock(), 0);
    }

    #[test]
    fn test_castling_moves_rook_and_clears_rights() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10");
        let next = s.apply(&Move::new(E1, G1));
        assert_eq!(
            next.piece_at(F1),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
        assert_eq!(next.piece_at(H1), None);
        assert!(!next.castling_rights().has_kingside(Color::White));
        assert!(!next.castling_rights().has_queenside(Color::White));
        assert!(next.castling_rights().has_kingside(Color::Black));
        assert_eq!(next.halfmove_clock(), 4);

        let next = next.apply(&Move::new(E8, C8));
        assert_eq!(
            next.piece_at(D8),
            Some(Piece::new(PieceType::Rook, Color::Black))
        );
        assert_eq!(next.castling_rights(), CastlingRights::empty());
    }

    #[test]
    fn test_rook_move_and_capture_clear_rights() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = s.apply(&Move::new(A1, A8));
        assert!(!next.castling_rights().has_queenside(Color::White));
        assert!(!next.castling_rights().has_queenside(Color::Black));
        assert!(next.castling_rights().has_kingside(Color::White));
        assert!(next.castling_rights().has_kingside(Color::Black));
    }

    #[test]
    fn test_promotion_places_new_piece() {
        let s = state("8/1P6/8/8/8/8/8/8 w - - 0 1");
        let next = s.apply(&Move::with_promotion(B7, B8, PieceType::Queen));
        assert_eq!(
            next.piece_at(B8),
            Some(Piece::new(PieceType::Queen, Color::White))
        );
        assert_eq!(next.piece_at(B7), None);
    }

    #[test]
    fn test_apply_does_not_touch_receiver() {
        let s = BoardState::starting();
        let _ = s.apply(&Move::new(E2, E4));
        assert_eq!(s, BoardState::starting());
    }
}
