//! Attack detection and king-safety filtering.
//!
//! Legality is decided by simulate-and-recheck: play the pseudo-legal move on a
//! copy of the state and reject it if the mover's king is attacked afterwards.
//! Pins and discovered checks (including the en passant cases) fall out of this
//! without separate bookkeeping.

use crate::castling::CastleSide;
use crate::color::Color;
use crate::error::{IllegalMoveError, IllegalReason};
use crate::movegen::{BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS};
use crate::pieces::{Piece, PieceType};
use crate::r#move::{Move, MoveFlags};
use crate::square::Square;
use crate::state::BoardState;

impl BoardState {
    /// Whether any piece of `by` could capture on `sq`. Castling, double pushes and
    /// en passant never capture on an arbitrary square, so they are not considered.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let holds = |target: Option<Square>, piece_type: PieceType| {
            target.and_then(|t| self.piece_at(t)) == Some(Piece::new(piece_type, by))
        };

        // A pawn of `by` attacks diagonally forward, so look one rank behind `sq`.
        let back = -by.pawn_direction();
        if holds(sq.offset(-1, back), PieceType::Pawn) || holds(sq.offset(1, back), PieceType::Pawn)
        {
            return true;
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|&(df, dr)| holds(sq.offset(df, dr), PieceType::Knight))
        {
            return true;
        }

        if KING_OFFSETS
            .iter()
            .any(|&(df, dr)| holds(sq.offset(df, dr), PieceType::King))
        {
            return true;
        }

        self.slider_attacks(sq, by, &ROOK_DIRECTIONS, PieceType::Rook)
            || self.slider_attacks(sq, by, &BISHOP_DIRECTIONS, PieceType::Bishop)
    }

    /// Walks each ray out of `sq` to its first piece, looking for `slider` or a queen of `by`.
    fn slider_attacks(
        &self,
        sq: Square,
        by: Color,
        directions: &[(i8, i8)],
        slider: PieceType,
    ) -> bool {
        directions.iter().any(|&(df, dr)| {
            let mut current = sq;
            while let Some(next) = current.offset(df, dr) {
                if let Some(piece) = self.piece_at(next) {
                    return piece.color == by
                        && (piece.piece_type == slider || piece.piece_type == PieceType::Queen);
                }
                current = next;
            }
            false
        })
    }

    /// A side without a king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_square_attacked(king, color.opposite()))
    }

    pub fn is_check(&self) -> bool {
        self.is_in_check(self.turn())
    }

    /// Decides whether `mv` is legal here and returns the resulting state if so.
    pub fn check_legality(&self, mv: &Move) -> Result<BoardState, IllegalMoveError> {
        let fail = |reason| Err(IllegalMoveError::new(*mv, reason));

        let Some(piece) = self.piece_at(mv.from) else {
            return fail(IllegalReason::NoPieceOnSource);
        };
        if piece.color != self.turn() {
            return fail(IllegalReason::NotYourTurn);
        }
        if self
            .piece_at(mv.to)
            .is_some_and(|target| target.color == piece.color)
        {
            return fail(IllegalReason::FriendlyFire);
        }

        let candidates: Vec<Move> = self
            .pseudo_legal_moves_from(mv.from)
            .into_iter()
            .filter(|m| m.to == mv.to)
            .collect();

        if candidates.is_empty() {
            return fail(self.unreachable_reason(mv, &piece));
        }

        let promotes = candidates.iter().any(|m| m.promotion.is_some());
        match mv.promotion {
            None if promotes => return fail(IllegalReason::MissingPromotion),
            Some(_) if !promotes => return fail(IllegalReason::UnexpectedPromotion),
            Some(_) if !candidates.contains(mv) => {
                return fail(IllegalReason::InvalidPromotionPiece);
            }
            _ => {}
        }

        self.king_safe_after(mv)
    }

    /// Distinguishes blocked or forfeited castling from a plain bad destination.
    fn unreachable_reason(&self, mv: &Move, piece: &Piece) -> IllegalReason {
        let color = piece.color;
        let castling_shaped = piece.piece_type == PieceType::King
            && mv.from == CastleSide::king_from(color)
            && mv.from.rank() == mv.to.rank()
            && mv.from.file().abs_diff(mv.to.file()) == 2;

        if !castling_shaped {
            return IllegalReason::Unreachable;
        }

        let side = CastleSide::from_king_move(mv.from, mv.to);
        let rook_home =
            self.piece_at(side.rook_from(color)) == Some(Piece::new(PieceType::Rook, color));
        if !self.castling_rights().has(color, side) || !rook_home {
            // A FEN can grant a right whose rook is gone.
            IllegalReason::CastlingRightLost
        } else {
            IllegalReason::CastlingPathBlocked
        }
    }

    /// The second half of the legality check, for moves already known to be
    /// pseudo-legal: castling attack conditions, then simulate-and-recheck.
    fn king_safe_after(&self, mv: &Move) -> Result<BoardState, IllegalMoveError> {
        let color = self.turn();

        if self.move_flags(mv).contains(MoveFlags::CASTLE) {
            if self.is_in_check(color) {
                return Err(IllegalMoveError::new(*mv, IllegalReason::CastlingOutOfCheck));
            }
            let side = CastleSide::from_king_move(mv.from, mv.to);
            if side
                .king_path(color)
                .iter()
                .any(|&sq| self.is_square_attacked(sq, color.opposite()))
            {
                return Err(IllegalMoveError::new(*mv, IllegalReason::CastlingThroughCheck));
            }
        }

        let next = self.apply(mv);
        if next.is_in_check(color) {
            return Err(IllegalMoveError::new(*mv, IllegalReason::KingLeftInCheck));
        }

        Ok(next)
    }

    /// Every legal move for the side to move, paired with its resulting state.
    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    pub fn legal_successors(&self) -> Vec<(Move, BoardState)> {
        self.pseudo_legal_moves()
            .into_iter()
            .filter_map(|mv| self.king_safe_after(&mv).ok().map(|next| (mv, next)))
            .collect()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.pseudo_legal_moves()
            .into_iter()
            .filter(|mv| self.king_safe_after(mv).is_ok())
            .collect()
    }

    pub fn has_legal_moves(&self) -> bool {
        self.pseudo_legal_moves()
            .iter()
            .any(|mv| self.king_safe_after(mv).is_ok())
    }

    /// Whether the stored en passant target can actually be captured on legally.
    pub fn has_legal_en_passant(&self) -> bool {
        let Some(ep) = self.en_passant() else {
            return false;
        };
        let pawn = Piece::new(PieceType::Pawn, self.turn());

        [-1i8, 1]
            .into_iter()
            .filter_map(|df| ep.offset(df, -self.turn().pawn_direction()))
            .filter(|&from| self.piece_at(from) == Some(pawn))
            .any(|from| self.king_safe_after(&Move::new(from, ep)).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::*;
    use rstest::rstest;

    fn state(fen: &str) -> BoardState {
        BoardState::from_fen(fen).expect("valid FEN")
    }

    fn reason(s: &BoardState, mv: Move) -> IllegalReason {
        s.check_legality(&mv).expect_err("move should be illegal").reason
    }

    #[test]
    fn test_is_square_attacked_basic() {
        let s = state("4k3/8/8/4R3/8/8/8/K7 w - - 0 1");
        assert!(s.is_square_attacked(E1, Color::White));
        assert!(s.is_square_attacked(A5, Color::White));
        assert!(!s.is_square_attacked(F6, Color::White));
        assert!(s.is_square_attacked(E8, Color::White));
        assert!(s.is_in_check(Color::Black));
        assert!(!s.is_in_check(Color::White));
    }

    #[test]
    fn test_pawn_attacks_forward_diagonals_only() {
        let s = state("4k3/8/8/8/4p3/8/8/4K3 w - - 0 1");
        assert!(s.is_square_attacked(D3, Color::Black));
        assert!(s.is_square_attacked(F3, Color::Black));
        assert!(!s.is_square_attacked(E3, Color::Black));
        assert!(!s.is_square_attacked(D5, Color::Black));
    }

    #[test]
    fn test_blocked_slider_does_not_attack() {
        let s = state("4k3/8/8/8/8/8/1P6/B3K3 w - - 0 1");
        assert!(s.is_square_attacked(B2, Color::White));
        assert!(!s.is_square_attacked(D4, Color::White));
    }

    #[test]
    fn test_no_king_never_in_check() {
        let s = state("8/1P6/8/8/8/8/8/r7 w - - 0 1");
        assert!(!s.is_check());
        assert_eq!(s.legal_moves().len(), 4);
    }

    #[test]
    fn test_pinned_piece_cannot_leave_line() {
        let s = state("k3r3/8/8/8/8/8/4R3/4K3 w - - 0 1");
        assert_eq!(reason(&s, Move::new(E2, D2)), IllegalReason::KingLeftInCheck);
        assert!(s.check_legality(&Move::new(E2, E5)).is_ok());
        assert!(s.check_legality(&Move::new(E2, E8)).is_ok());
    }

    #[test]
    fn test_en_passant_exposing_king_is_illegal() {
        // Capturing removes both pawns from the fifth rank and opens the rook's file.
        let s = state("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert_eq!(reason(&s, Move::new(E5, D6)), IllegalReason::KingLeftInCheck);
        assert!(!s.has_legal_en_passant());
    }

    #[test]
    fn test_has_legal_en_passant() {
        let s = state("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
        assert!(s.has_legal_en_passant());
        let s = state("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert!(!s.has_legal_en_passant());
    }

    #[rstest]
    #[case("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", E1, G1, None)]
    #[case("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", E1, C1, None)]
    #[case("r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1", E1, G1, Some(IllegalReason::CastlingRightLost))]
    #[case("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1", E1, C1, Some(IllegalReason::CastlingPathBlocked))]
    #[case("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1", E1, G1, Some(IllegalReason::CastlingOutOfCheck))]
    #[case("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1", E1, G1, Some(IllegalReason::CastlingThroughCheck))]
    #[case("r3k2r/8/8/8/8/8/6r1/R3K2R w KQkq - 0 1", E1, G1, Some(IllegalReason::CastlingThroughCheck))]
    #[case("r3k2r/8/8/8/8/8/3r4/R3K2R w KQkq - 0 1", E1, C1, Some(IllegalReason::CastlingThroughCheck))]
    #[case("r3k2r/8/8/8/8/8/1r6/R3K2R w KQkq - 0 1", E1, C1, None)]
    #[case("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", E8, C8, None)]
    #[case("r3k2r/8/8/8/8/8/8/R3K2R b KQk - 0 1", E8, C8, Some(IllegalReason::CastlingRightLost))]
    #[case("4k3/8/8/8/8/8/8/4K3 w K - 0 1", E1, G1, Some(IllegalReason::CastlingRightLost))]
    #[case("4k3/8/8/8/8/8/8/4K2B w K - 0 1", E1, G1, Some(IllegalReason::CastlingRightLost))]
    fn test_castling_gating(
        #[case] fen: &str,
        #[case] from: Square,
        #[case] to: Square,
        #[case] expected: Option<IllegalReason>,
    ) {
        let s = state(fen);
        let result = s.check_legality(&Move::new(from, to));
        assert_eq!(result.err().map(|e| e.reason), expected);
    }

    #[rstest]
    #[case(Move::new(E3, E4), IllegalReason::NoPieceOnSource)]
    #[case(Move::new(E7, E5), IllegalReason::NotYourTurn)]
    #[case(Move::new(D1, D2), IllegalReason::FriendlyFire)]
    #[case(Move::new(G1, G3), IllegalReason::Unreachable)]
    #[case(Move::new(E2, E5), IllegalReason::Unreachable)]
    #[case(Move::with_promotion(E2, E4, PieceType::Queen), IllegalReason::UnexpectedPromotion)]
    fn test_rejection_reasons(#[case] mv: Move, #[case] expected: IllegalReason) {
        assert_eq!(reason(&BoardState::starting(), mv), expected);
    }

    #[test]
    fn test_promotion_reasons() {
        let s = state("8/1P6/8/8/8/8/8/8 w - - 0 1");
        assert_eq!(reason(&s, Move::new(B7, B8)), IllegalReason::MissingPromotion);
        assert_eq!(
            reason(&s, Move::with_promotion(B7, B8, PieceType::King)),
            IllegalReason::InvalidPromotionPiece
        );
        assert!(
            s.check_legality(&Move::with_promotion(B7, B8, PieceType::Queen))
                .is_ok()
        );
    }

    #[test]
    fn test_legal_moves_never_leave_king_in_check() {
        let s = state("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let successors = s.legal_successors();
        assert_eq!(successors.len(), 48);
        for (_, next) in successors {
            assert!(!next.is_in_check(Color::White));
        }
    }

    #[test]
    fn test_has_legal_moves() {
        assert!(BoardState::starting().has_legal_moves());
        let stalemate = state("K7/8/1q6/8/8/8/8/2k5 w - - 0 1");
        assert!(!stalemate.has_legal_moves());
        assert!(!stalemate.is_check());
    }
}
