//! Monte Carlo Tree Search (MCTS) with UCB1 selection.
//!
//! Each iteration runs four phases:
//! - Selection: descend by UCB1 while the node is fully expanded
//! - Expansion: add exactly one child for a random untried move
//! - Simulation: a mixed random/greedy playout from the new node
//! - Backpropagation: add the playout value to every node up to the root
//!
//! The search is bounded by wall-clock time, checked once per iteration,
//! together with an optional iteration cap and an optional external stop
//! flag. Nodes live in an arena and refer to their parent by index; the
//! whole tree is dropped when the search returns.
//!
//! Values are always from the point of view of the side to move at the root
//! and are not flipped on the way up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::debug;

use crate::board::{Board, Side};
use crate::constants::{
    MCTS_FAST_BUDGET_MS, MCTS_FAST_EXPLORATION, MCTS_FULL_BUDGET_MS, MCTS_FULL_EXPLORATION,
    MIN_PIECES,
};
use crate::playout::{RolloutPolicy, rollout};
use crate::position::{GameState, Move};

/// Identifier of a node in the search arena.
pub type NodeId = usize;

/// Search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Wall-clock budget per search
    pub time_budget: Duration,
    /// UCB1 exploration constant
    pub exploration: f64,
    /// Playout policy
    pub rollout: RolloutPolicy,
    /// Optional cap on iterations, on top of the time budget
    pub max_iterations: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self::full()
    }
}

impl MctsConfig {
    /// Longer budget and standard exploration, for play against a human.
    pub fn full() -> Self {
        Self {
            time_budget: Duration::from_millis(MCTS_FULL_BUDGET_MS),
            exploration: MCTS_FULL_EXPLORATION,
            rollout: RolloutPolicy::default(),
            max_iterations: None,
        }
    }

    /// Short budget and slightly less exploration, for real-time AI-vs-AI play.
    pub fn fast() -> Self {
        Self {
            time_budget: Duration::from_millis(MCTS_FAST_BUDGET_MS),
            exploration: MCTS_FAST_EXPLORATION,
            rollout: RolloutPolicy::default(),
            max_iterations: None,
        }
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Position after `mv`
    pub state: GameState,
    /// Parent node, `None` for the root
    pub parent: Option<NodeId>,
    /// Move that produced this node, `None` for the root
    pub mv: Option<Move>,
    /// Side to move in `state`
    pub to_move: Side,
    /// Legal moves not yet expanded
    untried: Vec<Move>,
    /// Expanded children
    pub children: Vec<NodeId>,
    /// Number of visits
    pub visits: u32,
    /// Sum of playout values
    pub score: f64,
}

impl Node {
    fn new(
        board: &Board,
        state: GameState,
        parent: Option<NodeId>,
        mv: Option<Move>,
        to_move: Side,
    ) -> Self {
        let untried = state.legal_moves(board, to_move);
        Self {
            state,
            parent,
            mv,
            to_move,
            untried,
            children: Vec::new(),
            visits: 0,
            score: 0.0,
        }
    }

    /// Mean playout value, or -0.1 for an unvisited node.
    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.score / self.visits as f64
        } else {
            -0.1
        }
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}

/// Arena holding one search tree. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(board: &Board, state: GameState, to_move: Side) -> Self {
        Self {
            nodes: vec![Node::new(board, state, None, None, to_move)],
        }
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child of `id` with the highest UCB1 value. Unvisited children come
    /// first; ties keep the earlier child.
    fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = &self.nodes[id];
        let log_parent = (node.visits as f64).ln();

        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;
        for &child_id in &node.children {
            let child = &self.nodes[child_id];
            let value = if child.visits == 0 {
                f64::INFINITY
            } else {
                let visits = child.visits as f64;
                child.score / visits + exploration * (log_parent / visits).sqrt()
            };
            if value > best_value {
                best_value = value;
                best = Some(child_id);
            }
        }
        best
    }

    /// Expand one random untried move of `id` and return the new child.
    fn expand(&mut self, board: &Board, id: NodeId, rng: &mut fastrand::Rng) -> Option<NodeId> {
        let node = &mut self.nodes[id];
        if node.untried.is_empty() {
            return None;
        }
        let mv = node.untried.swap_remove(rng.usize(..node.untried.len()));
        let mover = node.to_move;
        let mut state = node.state.clone();
        state.play_unchecked(board, mover, mv);

        let child_id = self.nodes.len();
        self.nodes
            .push(Node::new(board, state, Some(id), Some(mv), mover.opponent()));
        self.nodes[id].children.push(child_id);
        Some(child_id)
    }

    /// Add `value` to `id` and all its ancestors.
    fn backpropagate(&mut self, id: NodeId, value: f64) {
        let mut current = Some(id);
        while let Some(i) = current {
            let node = &mut self.nodes[i];
            node.visits += 1;
            node.score += value;
            current = node.parent;
        }
    }

    /// Root child with the most visits; ties keep the earlier child.
    pub fn most_visited_child(&self) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for &child_id in &self.root().children {
            let better = match best {
                None => true,
                Some(b) => self.nodes[child_id].visits > self.nodes[b].visits,
            };
            if better {
                best = Some(child_id);
            }
        }
        best
    }
}

/// Summary of one search, for logging and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Completed iterations
    pub iterations: u64,
    /// Nodes in the tree when the search stopped
    pub nodes: usize,
    /// Wall-clock time spent
    pub elapsed: Duration,
    /// (move, visits, winrate) for each root child
    pub root_children: Vec<(Move, u32, f64)>,
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen move, `None` only if the side to move has no legal move
    pub best: Option<Move>,
    /// The move wins on the spot; no tree was built
    pub immediate_win: bool,
    pub stats: SearchStats,
}

/// Time-bounded MCTS searcher.
pub struct Mcts {
    pub config: MctsConfig,
    rng: fastrand::Rng,
    stop: Option<Arc<AtomicBool>>,
}

impl Mcts {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            config,
            rng: fastrand::Rng::new(),
            stop: None,
        }
    }

    /// A searcher with a reproducible random stream.
    pub fn with_seed(config: MctsConfig, seed: u64) -> Self {
        Self {
            config,
            rng: fastrand::Rng::with_seed(seed),
            stop: None,
        }
    }

    /// Install a flag that ends the current search when set.
    pub fn set_stop_flag(&mut self, flag: Arc<AtomicBool>) {
        self.stop = Some(flag);
    }

    /// Search the best move for `side` in `state`.
    pub fn search(&mut self, board: &Board, state: &GameState, side: Side) -> SearchResult {
        let start = Instant::now();
        let mut tree = Tree::new(board, state.clone(), side);

        if let Some(mv) = immediate_win(board, &tree, side) {
            debug!("mcts {side}: immediate win {mv}");
            return SearchResult {
                best: Some(mv),
                immediate_win: true,
                stats: SearchStats {
                    nodes: tree.len(),
                    elapsed: start.elapsed(),
                    ..SearchStats::default()
                },
            };
        }

        let iterations = self.grow(board, &mut tree, start + self.config.time_budget);

        let best = tree
            .most_visited_child()
            .and_then(|id| tree.node(id).mv)
            .or_else(|| state.first_legal_move(board, side));

        let stats = SearchStats {
            iterations,
            nodes: tree.len(),
            elapsed: start.elapsed(),
            root_children: tree
                .root()
                .children
                .iter()
                .filter_map(|&id| {
                    let node = tree.node(id);
                    node.mv.map(|mv| (mv, node.visits, node.winrate()))
                })
                .collect(),
        };
        debug!(
            "mcts {side}: {} iterations, {} nodes, {:?}, best={:?}",
            stats.iterations, stats.nodes, stats.elapsed, best
        );

        SearchResult {
            best,
            immediate_win: false,
            stats,
        }
    }

    fn should_stop(&self, deadline: Instant, iterations: u64) -> bool {
        if self.config.max_iterations.is_some_and(|cap| iterations >= cap) {
            return true;
        }
        if self.stop.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return true;
        }
        Instant::now() >= deadline
    }

    /// Run iterations on `tree` until a stop condition holds. Returns the
    /// number of iterations completed.
    fn grow(&mut self, board: &Board, tree: &mut Tree, deadline: Instant) -> u64 {
        let perspective = tree.root().to_move;
        let mut iterations = 0;

        while !self.should_stop(deadline, iterations) {
            // Selection
            let mut id = 0;
            loop {
                let node = tree.node(id);
                if node.state.is_terminal() || !node.is_fully_expanded() {
                    break;
                }
                match tree.select_child(id, self.config.exploration) {
                    Some(child) => id = child,
                    None => break,
                }
            }

            // Expansion
            if !tree.node(id).state.is_terminal() {
                if let Some(child) = tree.expand(board, id, &mut self.rng) {
                    id = child;
                }
            }

            // Simulation
            let node = tree.node(id);
            let value = rollout(
                board,
                node.state.clone(),
                node.to_move,
                perspective,
                &self.config.rollout,
                &mut self.rng,
            );

            // Backpropagation
            tree.backpropagate(id, value);
            iterations += 1;
        }

        iterations
    }
}

/// The first untried root move after which the opponent of `side` is left
/// with fewer than [`MIN_PIECES`]. A move that also drops `side` below the
/// minimum counts.
fn immediate_win(board: &Board, tree: &Tree, side: Side) -> Option<Move> {
    let root = tree.root();
    root.untried.iter().copied().find(|&mv| {
        let mut next = root.state.clone();
        next.play_unchecked(board, side, mv);
        next.pieces(side.opponent()).len() < MIN_PIECES
    })
}
