//! Diamond Duel: a two-player movement-and-capture game on a 21-point
//! lattice, with minimax and Monte Carlo tree search opponents.
//!
//! Each side starts with six pieces. A move slides one piece to an adjacent
//! empty point; afterwards every immobilised piece is captured, and a side
//! left with fewer than four pieces has lost.
//!
//! ## Modules
//!
//! - [`constants`] - Lattice tables, initial layouts, and engine parameters
//! - [`board`] - Points, topology, and the capture rule
//! - [`position`] - Game state, move execution, capture resolution
//! - [`minimax`] - Alpha-beta minimax over an undo log
//! - [`playout`] - Rollout policy and static evaluation
//! - [`mcts`] - Arena-based UCT search
//! - [`engine`] - The move-chooser trait both searches implement
//! - [`game`] - Screen state machine and turn loop
//! - [`console`] - Text front end
//!
//! ## Example
//!
//! ```
//! use diamond_duel::board::{Board, Point, Side};
//! use diamond_duel::minimax;
//! use diamond_duel::position::{GameState, Move};
//!
//! let board = Board::standard().unwrap();
//! let mut state = GameState::initial();
//!
//! // HUMAN opens
//! let mv = Move::new(Point::BOTTOM_INNER, Point::CENTER_SOUTH);
//! let captures = state.apply_move(&board, Side::Human, mv).unwrap();
//! println!("{} piece(s) captured", captures.len());
//!
//! // Ask minimax for the AI reply
//! if state.outcome().is_none() {
//!     let reply = minimax::best_move(&board, &state, Side::Ai, 2);
//!     println!("AI plays {:?}", reply.best);
//! }
//! ```

pub mod board;
pub mod console;
pub mod constants;
pub mod engine;
pub mod game;
pub mod mcts;
pub mod minimax;
pub mod playout;
pub mod position;
