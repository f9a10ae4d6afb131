use chess_logic::fen;
use chess_logic::game::Position;
use chess_logic::outcome::MoveOutcome;
use chess_logic::r#move::Move;

#[test]
fn make_move_then_dump() {
    // Fool's mate
    let position = Position::starting()
        .make_move("f3")
        .and_then(|p| p.make_move("e5"))
        .and_then(|p| p.make_move("g4"))
        .and_then(|p| p.make_move("Qh4#"))
        .expect("all moves legal");

    let dump = position.dump();
    assert!(!dump.is_empty());
    println!("{}", dump);
    assert_eq!(position.properties(), MoveOutcome::Mate);
}

#[test]
fn validate_move_then_print_fen() {
    let position = fen::parse("8/1P6/8/8/8/8/8/8 w - - 0 1").expect("valid FEN");
    let mv = Move::parse("b7-b8=Q").expect("valid notation");
    let next_position = position
        .validate_legal_move(mv)
        .expect("legal move")
        .to_position();

    assert_eq!(fen::print(&next_position), "1Q6/8/8/8/8/8/8/8 b - - 0 1");
}
