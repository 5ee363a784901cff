//! Monte Carlo playouts (fast game simulation).
//!
//! A playout alternates moves from a given position, each ply choosing a
//! uniformly random legal move or, less often, a one-ply greedy move. It stops
//! at a terminal position or after a fixed number of plies, and is scored from
//! a fixed perspective in `[0, 1]`: 1.0 win, 0.0 loss, 0.5 draw, or the static
//! evaluation when the ply limit cuts the game short.

use crate::board::{Board, Side};
use crate::constants::{
    EVAL_MATERIAL_WEIGHT, EVAL_MOBILITY_WEIGHT, GREEDY_SAMPLE, INITIAL_PIECES, MAX_ROLLOUT_PLIES,
    PROB_RANDOM_ROLLOUT,
};
use crate::position::{GameState, Move, Outcome};

/// Parameters of the rollout policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutPolicy {
    /// Maximum plies per playout
    pub max_plies: usize,
    /// Probability of a uniformly random move; greedy otherwise
    pub prob_random: f64,
    /// Number of leading legal moves the greedy policy evaluates
    pub greedy_sample: usize,
}

impl Default for RolloutPolicy {
    fn default() -> Self {
        Self {
            max_plies: MAX_ROLLOUT_PLIES,
            prob_random: PROB_RANDOM_ROLLOUT,
            greedy_sample: GREEDY_SAMPLE,
        }
    }
}

/// Score of a finished game for `side`.
pub fn outcome_value(outcome: Outcome, side: Side) -> f64 {
    match outcome.winner() {
        Some(winner) if winner == side => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    }
}

/// Static evaluation of a position for `side`, in `[0, 1]`.
///
/// Material (piece difference over six) weighted 0.35 plus the normalised
/// mobility differential weighted 0.15, centred at 0.5.
pub fn evaluate(board: &Board, state: &GameState, side: Side) -> f64 {
    if let Some(outcome) = state.outcome() {
        return outcome_value(outcome, side);
    }

    let other = side.opponent();
    let material = (state.pieces(side).len() as f64 - state.pieces(other).len() as f64)
        / INITIAL_PIECES as f64;

    let mine = state.total_mobility(board, side) as f64;
    let theirs = state.total_mobility(board, other) as f64;
    let total = mine + theirs;
    let mobility = if total > 0.0 {
        (mine - theirs) / total
    } else {
        0.0
    };

    (0.5 + material * EVAL_MATERIAL_WEIGHT + mobility * EVAL_MOBILITY_WEIGHT).clamp(0.0, 1.0)
}

/// Play out the game from `state` with `to_move` moving first and return its
/// value for `perspective`.
pub fn rollout(
    board: &Board,
    mut state: GameState,
    to_move: Side,
    perspective: Side,
    policy: &RolloutPolicy,
    rng: &mut fastrand::Rng,
) -> f64 {
    let mut side = to_move;
    let mut plies = 0;

    while !state.is_terminal() && plies < policy.max_plies {
        let moves = state.legal_moves(board, side);
        if moves.is_empty() {
            break;
        }

        let mv = if rng.f64() < policy.prob_random {
            moves[rng.usize(..moves.len())]
        } else {
            match greedy_move(board, &state, &moves, side, perspective, policy.greedy_sample) {
                Some(mv) => mv,
                None => break,
            }
        };

        state.play_unchecked(board, side, mv);
        side = side.opponent();
        plies += 1;
    }

    match state.outcome() {
        Some(outcome) => outcome_value(outcome, perspective),
        None => evaluate(board, &state, perspective),
    }
}

/// Pick the best of the first `sample` moves by one-ply static evaluation.
///
/// Scores are computed for `perspective` and inverted when `mover` is the
/// other side. Ties keep the earlier move.
pub fn greedy_move(
    board: &Board,
    state: &GameState,
    moves: &[Move],
    mover: Side,
    perspective: Side,
    sample: usize,
) -> Option<Move> {
    let mut best = *moves.first()?;
    let mut best_score = f64::NEG_INFINITY;

    for &mv in moves.iter().take(sample) {
        let mut next = state.clone();
        next.play_unchecked(board, mover, mv);
        let mut score = evaluate(board, &next, perspective);
        if mover != perspective {
            score = 1.0 - score;
        }
        if score > best_score {
            best_score = score;
            best = mv;
        }
    }

    Some(best)
}
