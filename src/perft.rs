//! Move-path enumeration, for checking the generator against known node counts.

use crate::r#move::Move;
use crate::state::BoardState;

impl BoardState {
    /// Number of leaf nodes of the legal move tree `depth` plies deep.
    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        if depth == 1 {
            return self.legal_moves().len() as u64;
        }

        self.legal_successors()
            .iter()
            .map(|(_, next)| next.perft(depth - 1))
            .sum()
    }

    /// Per-move breakdown of `perft`, sorted by move text.
    pub fn divide(&self, depth: u32) -> Vec<(Move, u64)> {
        let mut counts: Vec<(Move, u64)> = self
            .legal_successors()
            .into_iter()
            .map(|(mv, next)| (mv, next.perft(depth.saturating_sub(1))))
            .collect();
        counts.sort_by_key(|(mv, _)| mv.to_lan());
        counts
    }
}
