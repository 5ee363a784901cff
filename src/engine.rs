//! The seam between the controller and the two search algorithms.
//!
//! An [`Engine`] proposes a move for one side. The controller never trusts a
//! proposal blindly: [`decide`] validates it against the live position and
//! falls back to the first legal move when the engine has nothing usable.

use std::fmt;

use log::warn;

use crate::board::{Board, Side};
use crate::mcts::{Mcts, MctsConfig};
use crate::minimax;
use crate::position::{GameState, Move};

/// Which search algorithm drives an AI player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AiKind {
    Minimax,
    Mcts,
}

impl fmt::Display for AiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiKind::Minimax => write!(f, "minimax"),
            AiKind::Mcts => write!(f, "mcts"),
        }
    }
}

/// A move chooser for one side.
pub trait Engine {
    fn name(&self) -> &'static str;

    /// Propose a move for `side`, or `None` if the engine found nothing.
    fn choose_move(&mut self, board: &Board, state: &GameState, side: Side) -> Option<Move>;
}

/// Fixed-depth alpha-beta minimax.
pub struct MinimaxEngine {
    pub depth: u32,
}

impl Engine for MinimaxEngine {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn choose_move(&mut self, board: &Board, state: &GameState, side: Side) -> Option<Move> {
        minimax::best_move(board, state, side, self.depth).best
    }
}

/// Time-bounded Monte Carlo tree search.
pub struct MctsEngine {
    mcts: Mcts,
}

impl MctsEngine {
    pub fn new(config: MctsConfig, seed: Option<u64>) -> Self {
        let mcts = match seed {
            Some(seed) => Mcts::with_seed(config, seed),
            None => Mcts::new(config),
        };
        Self { mcts }
    }
}

impl Engine for MctsEngine {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn choose_move(&mut self, board: &Board, state: &GameState, side: Side) -> Option<Move> {
        self.mcts.search(board, state, side).best
    }
}

/// Ask `engine` for a move and make sure it is legal.
///
/// Returns `None` only when `side` has no legal move at all.
pub fn decide(
    engine: &mut dyn Engine,
    board: &Board,
    state: &GameState,
    side: Side,
) -> Option<Move> {
    match engine.choose_move(board, state, side) {
        Some(mv) if state.check_move(board, side, mv).is_ok() => Some(mv),
        proposal => {
            if let Some(mv) = proposal {
                warn!("{} proposed illegal move {mv} for {side}", engine.name());
            }
            state.first_legal_move(board, side)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Point;

    struct Stubborn(Option<Move>);

    impl Engine for Stubborn {
        fn name(&self) -> &'static str {
            "stubborn"
        }

        fn choose_move(&mut self, _: &Board, _: &GameState, _: Side) -> Option<Move> {
            self.0
        }
    }

    #[test]
    fn test_illegal_proposal_falls_back() {
        let b = Board::standard().unwrap();
        let s = GameState::initial();
        let mut engine = Stubborn(Some(Move::new(Point::TOP, Point::CENTER)));
        let mv = decide(&mut engine, &b, &s, Side::Ai);
        assert_eq!(mv, s.first_legal_move(&b, Side::Ai));
    }

    #[test]
    fn test_missing_proposal_falls_back() {
        let b = Board::standard().unwrap();
        let s = GameState::initial();
        let mv = decide(&mut Stubborn(None), &b, &s, Side::Human);
        assert_eq!(mv, s.first_legal_move(&b, Side::Human));
        assert!(mv.is_some());
    }

    #[test]
    fn test_legal_proposal_is_kept() {
        let b = Board::standard().unwrap();
        let s = GameState::initial();
        let proposal = Move::new(Point::LEFT_NORTH, Point::LEFT);
        let mv = decide(&mut Stubborn(Some(proposal)), &b, &s, Side::Ai);
        assert_eq!(mv, Some(proposal));
    }

    #[test]
    fn test_minimax_engine_move_is_legal() {
        let b = Board::standard().unwrap();
        let s = GameState::initial();
        let mut engine = MinimaxEngine { depth: 2 };
        let mv = decide(&mut engine, &b, &s, Side::Ai).unwrap();
        assert!(s.check_move(&b, Side::Ai, mv).is_ok());
    }
}
