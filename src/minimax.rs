//! Depth-limited minimax search with alpha-beta pruning.
//!
//! The AI maximises and the HUMAN minimises a material-plus-mobility score.
//! The search explores moves on a single scratch state using an undo log
//! (relocate, recurse, unrelocate), so the caller's state is never touched
//! and piece order is restored exactly after every branch.
//!
//! Captures are not resolved inside the search; only the controller's real
//! move goes through capture resolution.
//!
//! # Example
//!
//! ```
//! use diamond_duel::board::{Board, Side};
//! use diamond_duel::minimax;
//! use diamond_duel::position::GameState;
//!
//! let board = Board::standard().unwrap();
//! let state = GameState::initial();
//! let result = minimax::best_move(&board, &state, Side::Ai, 2);
//! assert!(result.best.is_some());
//! ```

use log::debug;

use crate::board::{Board, Point, Side};
use crate::position::{GameState, Move};

/// Sentinel bound. A node with no candidate move reports `-SCORE_INF`
/// (maximising) or `SCORE_INF` (minimising).
pub const SCORE_INF: i32 = i32::MAX;

/// Result of a minimax search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimaxResult {
    /// Score of the best line, or the ±[`SCORE_INF`] sentinel if no move was evaluated
    pub score: i32,
    /// Best move for the side to move, `None` if no candidate move exists
    pub best: Option<Move>,
    /// Nodes visited
    pub nodes: u64,
}

/// Static evaluation from the AI's point of view: mobility differential plus
/// material differential.
pub fn evaluate(board: &Board, state: &GameState) -> i32 {
    let mobility = state.total_mobility(board, Side::Ai) as i32
        - state.total_mobility(board, Side::Human) as i32;
    let material = state.ai.len() as i32 - state.human.len() as i32;
    mobility + material
}

/// Run alpha-beta minimax to `depth` plies with the given window.
///
/// `maximizing` selects the AI as the side to move; otherwise the HUMAN moves.
/// Ties keep the first move found, so results are reproducible.
pub fn minimax(
    board: &Board,
    state: &GameState,
    depth: u32,
    maximizing: bool,
    alpha: i32,
    beta: i32,
) -> MinimaxResult {
    let mut searcher = Searcher { board, nodes: 0 };
    let mut scratch = state.clone();
    let (score, best) = searcher.search(&mut scratch, depth, maximizing, alpha, beta);
    MinimaxResult {
        score,
        best,
        nodes: searcher.nodes,
    }
}

/// Search the best move for `side` with a full window.
pub fn best_move(board: &Board, state: &GameState, side: Side, depth: u32) -> MinimaxResult {
    let result = minimax(board, state, depth, side == Side::Ai, -SCORE_INF, SCORE_INF);
    debug!(
        "minimax {side} depth={depth} score={} nodes={} best={:?}",
        result.score, result.nodes, result.best
    );
    result
}

struct Searcher<'a> {
    board: &'a Board,
    nodes: u64,
}

impl Searcher<'_> {
    fn search(
        &mut self,
        state: &mut GameState,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;

        if depth == 0 {
            return (evaluate(self.board, state), None);
        }

        let side = if maximizing { Side::Ai } else { Side::Human };
        let mut best_score = if maximizing { -SCORE_INF } else { SCORE_INF };
        let mut best = None;

        // Relocation appends at the end and undo reinserts at the same index,
        // so indexing by position stays valid across iterations.
        let count = state.pieces(side).len();
        'sources: for i in 0..count {
            let from = state.pieces(side)[i];
            if state.mobility(self.board, from) == 0 {
                continue;
            }

            let targets: Vec<Point> = state.empty_neighbors(self.board, from).collect();
            for to in targets {
                let mv = Move::new(from, to);
                let index = state.relocate(side, mv);
                let (score, _) = self.search(state, depth - 1, !maximizing, alpha, beta);
                state.unrelocate(side, mv, index);

                if maximizing {
                    if score > best_score {
                        best_score = score;
                        best = Some(mv);
                    }
                    alpha = alpha.max(score);
                } else {
                    if score < best_score {
                        best_score = score;
                        best = Some(mv);
                    }
                    beta = beta.min(score);
                }

                if beta <= alpha {
                    break 'sources;
                }
            }
        }

        (best_score, best)
    }
}
