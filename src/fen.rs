//! Forsyth-Edwards Notation.
//!
//! Printing is the exact inverse of parsing: for every state `s` accepted here,
//! `parse_state(&print_state(&s)) == Ok(s)`.

use crate::board::Board;
use crate::castling::CastlingRights;
use crate::color::Color;
use crate::error::FenError;
use crate::game::Position;
use crate::pieces::{Piece, PieceType};
use crate::square::Square;
use crate::state::BoardState;
use arrayvec::ArrayVec;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parses a full six-field FEN record into a fresh `Position` with no history.
pub fn parse(fen: &str) -> Result<Position, FenError> {
    parse_state(fen).map(Position::from_state)
}

pub fn print(position: &Position) -> String {
    print_state(position.state())
}

pub fn parse_state(fen: &str) -> Result<BoardState, FenError> {
    let count = fen.split_whitespace().count();
    if count != 6 {
        log::debug!("rejected FEN '{}': {} fields", fen, count);
        return Err(FenError::FieldCount(count));
    }
    let fields: ArrayVec<&str, 6> = fen.split_whitespace().collect();

    let board = Board::from_fen(fields[0])?;
    validate_placement(&board)?;

    let turn =
        Color::from_fen_char(fields[1]).ok_or_else(|| FenError::InvalidSide(fields[1].into()))?;

    let castling_rights = CastlingRights::from_fen(fields[2])?;

    let en_passant = match fields[3] {
        "-" => None,
        field => Some(parse_en_passant(&board, turn, field)?),
    };

    let halfmove_clock = parse_counter(fields[4])
        .ok_or_else(|| FenError::InvalidHalfmoveClock(fields[4].into()))?;

    let fullmove_number = parse_counter(fields[5])
        .filter(|&n| n >= 1)
        .ok_or_else(|| FenError::InvalidFullmoveNumber(fields[5].into()))?;

    log::trace!("parsed FEN '{}'", fen);

    Ok(BoardState::from_parts(
        board,
        turn,
        castling_rights,
        en_passant,
        halfmove_clock,
        fullmove_number,
    ))
}

pub fn print_state(state: &BoardState) -> String {
    let mut fen = state.board().to_fen();

    fen.push(' ');
    fen.push(state.turn().fen_char());

    fen.push(' ');
    fen.push_str(&state.castling_rights().to_fen());

    fen.push(' ');
    match state.en_passant() {
        Some(ep) => fen.push_str(&ep.to_algebraic()),
        None => fen.push('-'),
    }

    fen.push(' ');
    fen.push_str(&state.halfmove_clock().to_string());

    fen.push(' ');
    fen.push_str(&state.fullmove_number().to_string());

    fen
}

impl BoardState {
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_state(fen)
    }

    pub fn to_fen(&self) -> String {
        print_state(self)
    }
}

/// Plain decimal digits only: no sign, no whitespace.
fn parse_counter(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

fn validate_placement(board: &Board) -> Result<(), FenError> {
    for color in [Color::White, Color::Black] {
        if board.count(Piece::new(PieceType::King, color)) > 1 {
            return Err(FenError::TooManyKings(color));
        }
    }

    for sq in Square::all().filter(|sq| sq.rank() == 0 || sq.rank() == 7) {
        if board
            .get_piece(sq)
            .is_some_and(|p| p.piece_type == PieceType::Pawn)
        {
            return Err(FenError::PawnOnBackRank(sq));
        }
    }

    Ok(())
}

/// The target must sit behind a pawn that could just have made a double push.
fn parse_en_passant(board: &Board, turn: Color, field: &str) -> Result<Square, FenError> {
    let invalid = || FenError::InvalidEnPassant(field.to_string());

    let sq = Square::from_algebraic(field).ok_or_else(invalid)?;
    let pusher = turn.opposite();
    // Rank the pushed pawn skipped over: 3rd for White, 6th for Black.
    let expected_rank = (pusher.pawn_home_rank() as i8 + pusher.pawn_direction()) as u8;
    if sq.rank() != expected_rank || !board.is_empty(sq) {
        return Err(invalid());
    }

    let pawn_sq = sq.offset(0, pusher.pawn_direction()).ok_or_else(invalid)?;
    if board.get_piece(pawn_sq) != Some(Piece::new(PieceType::Pawn, pusher)) {
        return Err(invalid());
    }

    Ok(sq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::*;
    use rstest::rstest;

    #[test]
    fn test_starting_fen() {
        let state = parse_state(STARTING_FEN).expect("valid FEN");
        assert_eq!(state, BoardState::starting());
        assert_eq!(print_state(&state), STARTING_FEN);
    }

    #[rstest]
    #[case(STARTING_FEN)]
    #[case("8/1P6/8/8/8/8/8/8 w - - 0 1")]
    #[case("1Q6/8/8/8/8/8/8/8 b - - 0 1")]
    #[case("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")]
    #[case("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")]
    #[case("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")]
    #[case("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1")]
    #[case("4k3/8/8/8/8/8/8/4K3 b Kq - 99 250")]
    fn test_fen_round_trip(#[case] fen: &str) {
        let state = parse_state(fen).expect("valid FEN");
        assert_eq!(print_state(&state), fen);
        assert_eq!(parse_state(&print_state(&state)), Ok(state));
    }

    #[test]
    fn test_fen_fields() {
        let state = parse_state("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w Kq d6 4 3")
            .expect("valid FEN");
        assert_eq!(state.turn(), Color::White);
        assert_eq!(state.en_passant(), Some(D6));
        assert_eq!(
            state.castling_rights(),
            CastlingRights::WHITE_KINGSIDE | CastlingRights::BLACK_QUEENSIDE
        );
        assert_eq!(state.halfmove_clock(), 4);
        assert_eq!(state.fullmove_number(), 3);
    }

    #[test]
    fn test_fen_surrounding_whitespace() {
        let state = parse_state("  8/8/8/8/8/8/8/8   w  -  - 0 1 ").expect("valid FEN");
        assert_eq!(print_state(&state), "8/8/8/8/8/8/8/8 w - - 0 1");
    }

    #[rstest]
    #[case("", FenError::FieldCount(0))]
    #[case("8/8/8/8/8/8/8/8 w - - 0", FenError::FieldCount(5))]
    #[case("8/8/8/8/8/8/8/8 w - - 0 1 extra", FenError::FieldCount(7))]
    #[case("8/8/8/8/8/8/8 w - - 0 1", FenError::RankCount(7))]
    #[case("8/8/8/8/8/8/8/8 x - - 0 1", FenError::InvalidSide("x".into()))]
    #[case("8/8/8/8/8/8/8/8 w KX - 0 1", FenError::InvalidCastling("KX".into()))]
    #[case("8/8/8/8/8/8/8/8 w - e9 0 1", FenError::InvalidEnPassant("e9".into()))]
    #[case("8/8/8/8/8/8/8/8 w - e6 0 1", FenError::InvalidEnPassant("e6".into()))]
    #[case("8/8/8/4p3/8/8/8/8 w - e3 0 1", FenError::InvalidEnPassant("e3".into()))]
    #[case("8/8/8/8/8/8/8/8 w - - -1 1", FenError::InvalidHalfmoveClock("-1".into()))]
    #[case("8/8/8/8/8/8/8/8 w - - +1 1", FenError::InvalidHalfmoveClock("+1".into()))]
    #[case("8/8/8/8/8/8/8/8 w - - 0 0", FenError::InvalidFullmoveNumber("0".into()))]
    #[case("8/8/8/8/8/8/8/8 w - - 0 x", FenError::InvalidFullmoveNumber("x".into()))]
    #[case("8/8/8/8/8/8/8/8 w - - 99999999999 1", FenError::InvalidHalfmoveClock("99999999999".into()))]
    #[case("P7/8/8/8/8/8/8/8 w - - 0 1", FenError::PawnOnBackRank(A8))]
    #[case("8/8/8/8/8/8/8/7p b - - 0 1", FenError::PawnOnBackRank(H1))]
    #[case("KK6/8/8/8/8/8/8/8 w - - 0 1", FenError::TooManyKings(Color::White))]
    fn test_fen_invalid(#[case] fen: &str, #[case] expected: FenError) {
        assert_eq!(parse_state(fen), Err(expected));
    }

    #[test]
    fn test_parse_returns_position() {
        let position = parse("8/1P6/8/8/8/8/8/8 w - - 0 1").expect("valid FEN");
        assert_eq!(print(&position), "8/1P6/8/8/8/8/8/8 w - - 0 1");
    }
}
