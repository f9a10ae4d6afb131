use crate::castling::{CastleSide, CastlingRights};
use crate::color::Color;
use crate::pieces::{Piece, PieceType};
use crate::r#move::Move;
use crate::square::Square;
use crate::state::BoardState;

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

impl BoardState {
    /// Moves that obey piece movement and occupancy, for the side to move,
    /// ignoring whether the mover's king ends up attacked. Order is unspecified.
    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);

        for (sq, piece) in self.board().pieces(self.turn()) {
            self.generate_pseudo_legal_moves_for_piece(sq, &piece, &mut moves);
        }

        moves
    }

    pub fn pseudo_legal_moves_from(&self, src: Square) -> Vec<Move> {
        let mut moves = Vec::new();

        if let Some(piece) = self.piece_at(src) {
            if piece.color == self.turn() {
                self.generate_pseudo_legal_moves_for_piece(src, &piece, &mut moves);
            }
        }

        moves
    }

    fn generate_pseudo_legal_moves_for_piece(
        &self,
        src: Square,
        piece: &Piece,
        moves: &mut Vec<Move>,
    ) {
        match piece.piece_type {
            PieceType::Pawn => self.generate_pawn_moves(src, piece, moves),
            PieceType::Knight => self.generate_step_moves(src, piece, &KNIGHT_OFFSETS, moves),
            PieceType::Bishop => self.generate_sliding_moves(src, piece, &BISHOP_DIRECTIONS, moves),
            PieceType::Rook => self.generate_sliding_moves(src, piece, &ROOK_DIRECTIONS, moves),
            PieceType::Queen => {
                self.generate_sliding_moves(src, piece, &ROOK_DIRECTIONS, moves);
                self.generate_sliding_moves(src, piece, &BISHOP_DIRECTIONS, moves);
            }
            PieceType::King => {
                self.generate_step_moves(src, piece, &KING_OFFSETS, moves);
                self.generate_castling_candidates(src, piece, moves);
            }
        }
    }

    fn push_pawn_move(&self, src: Square, dst: Square, color: Color, moves: &mut Vec<Move>) {
        if dst.rank() == color.promotion_rank() {
            for piece_type in PieceType::PROMOTIONS {
                moves.push(Move::with_promotion(src, dst, piece_type));
            }
        } else {
            moves.push(Move::new(src, dst));
        }
    }

    fn generate_pawn_moves(&self, src: Square, piece: &Piece, moves: &mut Vec<Move>) {
        let direction = piece.color.pawn_direction();

        // Single push, then double push from the home rank through an empty square
        if let Some(dst) = src.offset(0, direction) {
            if self.board().is_empty(dst) {
                self.push_pawn_move(src, dst, piece.color, moves);

                if src.rank() == piece.color.pawn_home_rank() {
                    if let Some(double) = dst.offset(0, direction) {
                        if self.board().is_empty(double) {
                            moves.push(Move::new(src, double));
                        }
                    }
                }
            }
        }

        // Captures, including en passant
        for file_offset in [-1i8, 1] {
            let Some(dst) = src.offset(file_offset, direction) else {
                continue;
            };

            match self.piece_at(dst) {
                Some(target) if target.color != piece.color => {
                    self.push_pawn_move(src, dst, piece.color, moves);
                }
                None if self.en_passant() == Some(dst) => {
                    moves.push(Move::new(src, dst));
                }
                _ => {}
            }
        }
    }

    fn generate_step_moves(
        &self,
        src: Square,
        piece: &Piece,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(df, dr) in offsets {
            let Some(dst) = src.offset(df, dr) else {
                continue;
            };

            match self.piece_at(dst) {
                Some(target) if target.color == piece.color => {}
                _ => moves.push(Move::new(src, dst)),
            }
        }
    }

    fn generate_sliding_moves(
        &self,
        src: Square,
        piece: &Piece,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(df, dr) in directions {
            let mut current = src;

            while let Some(dst) = current.offset(df, dr) {
                match self.piece_at(dst) {
                    Some(target) => {
                        if target.color != piece.color {
                            moves.push(Move::new(src, dst));
                        }
                        break;
                    }
                    None => moves.push(Move::new(src, dst)),
                }
                current = dst;
            }
        }
    }

    /// Emits castling when the right is held, king and rook stand on their home
    /// squares and the squares between them are empty. Attack conditions are
    /// left to the legality check.
    fn generate_castling_candidates(&self, src: Square, piece: &Piece, moves: &mut Vec<Move>) {
        let color = piece.color;
        if src != CastleSide::king_from(color) {
            return;
        }

        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if self.castling_available(color, side) {
                moves.push(Move::new(src, side.king_to(color)));
            }
        }
    }

    /// Right held, pieces in place, path empty. Says nothing about attacks.
    pub(crate) fn castling_available(&self, color: Color, side: CastleSide) -> bool {
        self.castling_rights()
            .contains(CastlingRights::for_side(color, side))
            && self.piece_at(CastleSide::king_from(color))
                == Some(Piece::new(PieceType::King, color))
            && self.piece_at(side.rook_from(color)) == Some(Piece::new(PieceType::Rook, color))
            && side
                .empty_path(color)
                .iter()
                .all(|&sq| self.board().is_empty(sq))
    }
}
