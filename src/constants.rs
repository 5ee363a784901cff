//! Constants for board geometry, initial layouts, and engine parameters.
//!
//! The lattice is the "double diamond": one outer diamond with a small rhombus
//! hanging inside each of its four corners, plus a central rhombus. Points are
//! identified by index; the tables below are indexed by [`crate::board::Point`].

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of lattice points.
pub const NUM_POINTS: usize = 21;

/// Maximum neighbours of any point.
pub const MAX_NEIGHBORS: usize = 4;

/// Minimum neighbours of any point.
pub const MIN_NEIGHBORS: usize = 3;

/// Pieces per side at the start of a game.
pub const INITIAL_PIECES: usize = 6;

/// A side with fewer pieces than this has lost.
pub const MIN_PIECES: usize = 4;

/// Hit-test tolerance (canvas units, per axis) for pointer coordinates.
pub const PROXIMITY_TOLERANCE: f64 = 40.0;

// Canvas layout (1280x800): centre (640, 470), outer half diagonal 256,
// rhombus half size 70.

/// Kebab-case names, indexed by point.
pub const POINT_NAMES: [&str; NUM_POINTS] = [
    "top",
    "top-east",
    "top-west",
    "top-inner",
    "right",
    "right-north",
    "right-south",
    "right-inner",
    "left",
    "left-north",
    "left-south",
    "left-inner",
    "bottom",
    "bottom-east",
    "bottom-west",
    "bottom-inner",
    "center",
    "center-west",
    "center-east",
    "center-north",
    "center-south",
];

/// Canvas coordinates, indexed by point.
pub const POINT_COORDS: [(f64, f64); NUM_POINTS] = [
    (640.0, 214.0), // top
    (710.0, 284.0), // top-east
    (570.0, 284.0), // top-west
    (640.0, 354.0), // top-inner
    (896.0, 470.0), // right
    (826.0, 400.0), // right-north
    (826.0, 540.0), // right-south
    (756.0, 470.0), // right-inner
    (384.0, 470.0), // left
    (454.0, 400.0), // left-north
    (454.0, 540.0), // left-south
    (524.0, 470.0), // left-inner
    (640.0, 726.0), // bottom
    (710.0, 656.0), // bottom-east
    (570.0, 656.0), // bottom-west
    (640.0, 586.0), // bottom-inner
    (640.0, 470.0), // center
    (570.0, 470.0), // center-west
    (710.0, 470.0), // center-east
    (640.0, 400.0), // center-north
    (640.0, 540.0), // center-south
];

pub const TOP: u8 = 0;
pub const TOP_EAST: u8 = 1;
pub const TOP_WEST: u8 = 2;
pub const TOP_INNER: u8 = 3;
pub const RIGHT: u8 = 4;
pub const RIGHT_NORTH: u8 = 5;
pub const RIGHT_SOUTH: u8 = 6;
pub const RIGHT_INNER: u8 = 7;
pub const LEFT: u8 = 8;
pub const LEFT_NORTH: u8 = 9;
pub const LEFT_SOUTH: u8 = 10;
pub const LEFT_INNER: u8 = 11;
pub const BOTTOM: u8 = 12;
pub const BOTTOM_EAST: u8 = 13;
pub const BOTTOM_WEST: u8 = 14;
pub const BOTTOM_INNER: u8 = 15;
pub const CENTER: u8 = 16;
pub const CENTER_WEST: u8 = 17;
pub const CENTER_EAST: u8 = 18;
pub const CENTER_NORTH: u8 = 19;
pub const CENTER_SOUTH: u8 = 20;

/// First-hop adjacency, indexed by point. Order is significant: it fixes the
/// order in which moves are generated and therefore every search tie-break.
pub const NEIGHBOR_TABLE: [&[u8]; NUM_POINTS] = [
    &[TOP_EAST, TOP_WEST, TOP_INNER],
    &[TOP, TOP_INNER, RIGHT_NORTH],
    &[TOP, TOP_INNER, LEFT_NORTH],
    &[TOP, TOP_EAST, TOP_WEST, CENTER_NORTH],
    &[RIGHT_NORTH, RIGHT_SOUTH, RIGHT_INNER],
    &[RIGHT, RIGHT_INNER, TOP_EAST],
    &[RIGHT, RIGHT_INNER, BOTTOM_EAST],
    &[RIGHT_NORTH, RIGHT_SOUTH, RIGHT, CENTER_EAST],
    &[LEFT_NORTH, LEFT_SOUTH, LEFT_INNER],
    &[LEFT, LEFT_INNER, TOP_WEST],
    &[LEFT, LEFT_INNER, BOTTOM_WEST],
    &[LEFT, LEFT_NORTH, LEFT_SOUTH, CENTER_WEST],
    &[BOTTOM_WEST, BOTTOM_EAST, BOTTOM_INNER],
    &[BOTTOM, BOTTOM_INNER, RIGHT_SOUTH],
    &[BOTTOM, BOTTOM_INNER, LEFT_SOUTH],
    &[BOTTOM, BOTTOM_WEST, BOTTOM_EAST, CENTER_SOUTH],
    &[CENTER_WEST, CENTER_EAST, CENTER_NORTH, CENTER_SOUTH],
    &[CENTER, CENTER_NORTH, CENTER_SOUTH, LEFT_INNER],
    &[CENTER, CENTER_SOUTH, CENTER_NORTH, RIGHT_INNER],
    &[CENTER, CENTER_WEST, CENTER_EAST, TOP_INNER],
    &[CENTER, CENTER_WEST, CENTER_EAST, BOTTOM_INNER],
];

// =============================================================================
// Initial Layouts
// =============================================================================

/// AI pieces fill the top rhombus plus the two outer points beside it.
pub const AI_START: [u8; INITIAL_PIECES] =
    [TOP, TOP_EAST, TOP_WEST, TOP_INNER, LEFT_NORTH, RIGHT_NORTH];

/// HUMAN pieces mirror the AI layout across the horizontal axis.
pub const HUMAN_START: [u8; INITIAL_PIECES] =
    [BOTTOM, BOTTOM_WEST, BOTTOM_EAST, BOTTOM_INNER, LEFT_SOUTH, RIGHT_SOUTH];

// =============================================================================
// Minimax Parameters
// =============================================================================

/// Search depth (plies) when playing against a human.
pub const MINIMAX_DEPTH_VS_HUMAN: u32 = 4;

/// Search depth (plies) in the AI-vs-AI simulation.
pub const MINIMAX_DEPTH_AI_VS_AI: u32 = 2;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Time budget per move against a human (milliseconds).
pub const MCTS_FULL_BUDGET_MS: u64 = 1500;

/// Time budget per move in the AI-vs-AI simulation (milliseconds).
pub const MCTS_FAST_BUDGET_MS: u64 = 150;

/// Standard UCB1 exploration constant (sqrt 2).
pub const MCTS_FULL_EXPLORATION: f64 = 1.414;

/// Slightly greedier exploration for the fast simulation.
pub const MCTS_FAST_EXPLORATION: f64 = 1.2;

/// Maximum plies of a single rollout.
pub const MAX_ROLLOUT_PLIES: usize = 80;

/// Probability of a uniformly random rollout move (greedy otherwise).
pub const PROB_RANDOM_ROLLOUT: f64 = 0.7;

/// Moves sampled by the one-ply greedy rollout policy.
pub const GREEDY_SAMPLE: usize = 6;

/// Weight of material in the static evaluation.
pub const EVAL_MATERIAL_WEIGHT: f64 = 0.35;

/// Weight of the mobility differential in the static evaluation.
pub const EVAL_MOBILITY_WEIGHT: f64 = 0.15;

// =============================================================================
// Controller Parameters
// =============================================================================

/// Pause between moves in the AI-vs-AI simulation (milliseconds).
pub const AI_VS_AI_DELAY_MS: u64 = 500;

/// Consecutive failed AI-vs-AI moves before the game is declared a draw.
pub const MAX_STUCK_MOVES: u32 = 10;

/// Recent moves an AI-vs-AI player refuses to repeat.
pub const REPETITION_WINDOW: usize = 4;
