use chess_logic::game::Position;
use chess_logic::outcome::MoveOutcome;
use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::time::Instant;

/// Hard stop for games the draw rules have not ended yet.
const MAX_PLIES: usize = 600;

fn playout(rng: &mut StdRng) -> (MoveOutcome, usize) {
    let mut position = Position::starting();
    let mut plies = 0;

    while !position.is_over() && plies < MAX_PLIES {
        let moves = position.legal_moves();
        let Some(legal) = moves.choose(rng) else {
            break;
        };
        position = legal.to_position();
        plies += 1;
    }

    (position.properties(), plies)
}

#[cfg_attr(feature = "hotpath", hotpath::main)]
fn main() {
    let args: Vec<String> = std::env::args().collect();
    let games: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(200);
    let seed: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(42);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut outcomes: HashMap<String, usize> = HashMap::new();
    let mut total_plies = 0;

    let start = Instant::now();
    for _ in 0..games {
        let (outcome, plies) = playout(&mut rng);
        *outcomes.entry(outcome.to_string()).or_default() += 1;
        total_plies += plies;
    }
    let elapsed = start.elapsed();

    println!(
        "{} games, {} plies in {:.2?} ({:.0} plies/s)",
        games,
        total_plies,
        elapsed,
        total_plies as f64 / elapsed.as_secs_f64()
    );

    let mut outcomes: Vec<_> = outcomes.into_iter().collect();
    outcomes.sort();
    for (outcome, count) in outcomes {
        println!("  {:<32} {}", outcome, count);
    }
}
