//! Game state representation, move execution, and capture resolution.
//!
//! A [`GameState`] is two disjoint lists of occupied points, one per side.
//! Every accepted move is followed by a full-board capture pass: all pieces
//! that are trapped in the post-move position are removed together, so the
//! result never depends on the order pieces are examined in.

use std::fmt;

use crate::board::{Board, Point, Side};
use crate::constants::{AI_START, HUMAN_START, MIN_PIECES, POINT_COORDS};

/// A move of one piece to an adjacent empty point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Point,
    pub to: Point,
}

impl Move {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Why a move was rejected. A rejected move never changes the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The source point holds no piece of the moving side.
    NotOwned,
    /// The destination is not a neighbour of the source.
    NotAdjacent,
    /// The destination is occupied.
    Occupied,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::NotOwned => write!(f, "illegal move: source is not your piece"),
            MoveError::NotAdjacent => write!(f, "illegal move: destination is not adjacent"),
            MoveError::Occupied => write!(f, "illegal move: destination is occupied"),
        }
    }
}

impl std::error::Error for MoveError {}

/// A piece list that breaks the disjointness invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// A point appears twice.
    Duplicate(Point),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Duplicate(p) => write!(f, "point {p} is occupied twice"),
        }
    }
}

impl std::error::Error for SetupError {}

/// How a finished game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    AiWins,
    HumanWins,
    /// Both sides dropped below the minimum in the same capture pass, or the
    /// game was stopped by the stuck watchdog.
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::AiWins => Some(Side::Ai),
            Outcome::HumanWins => Some(Side::Human),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AiWins => write!(f, "AI wins"),
            Outcome::HumanWins => write!(f, "HUMAN wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// A piece removed by capture resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub side: Side,
    pub point: Point,
}

/// The pieces of both sides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// AI pieces, in insertion order
    pub(crate) ai: Vec<Point>,
    /// HUMAN pieces, in insertion order
    pub(crate) human: Vec<Point>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

impl GameState {
    /// The fixed starting layout.
    pub fn initial() -> Self {
        Self {
            ai: AI_START.iter().filter_map(|&i| Point::new(i)).collect(),
            human: HUMAN_START.iter().filter_map(|&i| Point::new(i)).collect(),
        }
    }

    /// Build a state from explicit piece lists.
    pub fn from_pieces(ai: Vec<Point>, human: Vec<Point>) -> Result<Self, SetupError> {
        let mut seen = Vec::with_capacity(ai.len() + human.len());
        for &p in ai.iter().chain(human.iter()) {
            if seen.contains(&p) {
                return Err(SetupError::Duplicate(p));
            }
            seen.push(p);
        }
        Ok(Self { ai, human })
    }

    /// Restore the starting layout.
    pub fn reset(&mut self) {
        *self = Self::initial();
    }

    #[inline]
    pub fn pieces(&self, side: Side) -> &[Point] {
        match side {
            Side::Ai => &self.ai,
            Side::Human => &self.human,
        }
    }

    #[inline]
    pub(crate) fn pieces_mut(&mut self, side: Side) -> &mut Vec<Point> {
        match side {
            Side::Ai => &mut self.ai,
            Side::Human => &mut self.human,
        }
    }

    /// The side owning the piece at `p`, if any.
    pub fn owner(&self, p: Point) -> Option<Side> {
        if self.ai.contains(&p) {
            Some(Side::Ai)
        } else if self.human.contains(&p) {
            Some(Side::Human)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_occupied(&self, p: Point) -> bool {
        self.ai.contains(&p) || self.human.contains(&p)
    }

    /// Empty neighbours of `p` in the current position.
    pub fn empty_neighbors<'a>(
        &'a self,
        board: &'a Board,
        p: Point,
    ) -> impl Iterator<Item = Point> + 'a {
        board.empty_neighbors(p, &self.ai, &self.human)
    }

    /// Local mobility of a piece at `p`: its count of empty neighbours.
    #[inline]
    pub fn mobility(&self, board: &Board, p: Point) -> usize {
        board.mobility(p, &self.ai, &self.human)
    }

    /// Sum of the local mobility of every piece of `side`.
    pub fn total_mobility(&self, board: &Board, side: Side) -> usize {
        self.pieces(side)
            .iter()
            .map(|&p| self.mobility(board, p))
            .sum()
    }

    /// All legal moves for `side`, in piece order then neighbour order.
    pub fn legal_moves(&self, board: &Board, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();
        for &from in self.pieces(side) {
            moves.extend(self.empty_neighbors(board, from).map(|to| Move::new(from, to)));
        }
        moves
    }

    /// The first legal move for `side`; the fallback when a search has none.
    pub fn first_legal_move(&self, board: &Board, side: Side) -> Option<Move> {
        self.pieces(side).iter().find_map(|&from| {
            self.empty_neighbors(board, from)
                .next()
                .map(|to| Move::new(from, to))
        })
    }

    /// Check a move against the current position without applying it.
    pub fn check_move(&self, board: &Board, side: Side, mv: Move) -> Result<(), MoveError> {
        if !self.pieces(side).contains(&mv.from) {
            return Err(MoveError::NotOwned);
        }
        if !board.topology().is_adjacent(mv.from, mv.to) {
            return Err(MoveError::NotAdjacent);
        }
        if self.is_occupied(mv.to) {
            return Err(MoveError::Occupied);
        }
        Ok(())
    }

    /// Apply a move for `side` and resolve captures.
    ///
    /// Returns the pieces removed by the capture pass. An illegal move is
    /// rejected with no change to the state.
    pub fn apply_move(
        &mut self,
        board: &Board,
        side: Side,
        mv: Move,
    ) -> Result<Vec<Capture>, MoveError> {
        self.check_move(board, side, mv)?;
        Ok(self.play_unchecked(board, side, mv))
    }

    /// Apply a move already known to be legal, then resolve captures.
    pub(crate) fn play_unchecked(&mut self, board: &Board, side: Side, mv: Move) -> Vec<Capture> {
        self.relocate(side, mv);
        self.resolve_captures(board)
    }

    /// Move a piece without resolving captures: remove the source, append
    /// the destination. Returns the index the source occupied.
    pub(crate) fn relocate(&mut self, side: Side, mv: Move) -> usize {
        let pieces = self.pieces_mut(side);
        let index = pieces.iter().position(|&p| p == mv.from).unwrap_or(pieces.len());
        if index < pieces.len() {
            pieces.remove(index);
        }
        pieces.push(mv.to);
        index
    }

    /// Reverse [`GameState::relocate`].
    pub(crate) fn unrelocate(&mut self, side: Side, mv: Move, index: usize) {
        let pieces = self.pieces_mut(side);
        pieces.pop();
        pieces.insert(index.min(pieces.len()), mv.from);
    }

    /// Remove every piece that is captured in the current position.
    ///
    /// Trapped pieces are collected against the position as it stands before
    /// any removal, then removed together.
    pub fn resolve_captures(&mut self, board: &Board) -> Vec<Capture> {
        let mut captured = Vec::new();
        for side in [Side::Ai, Side::Human] {
            for &p in self.pieces(side) {
                if board.is_captured(p, side, &self.ai, &self.human) {
                    captured.push(Capture { side, point: p });
                }
            }
        }
        if !captured.is_empty() {
            self.ai
                .retain(|p| !captured.iter().any(|c| c.side == Side::Ai && c.point == *p));
            self.human
                .retain(|p| !captured.iter().any(|c| c.side == Side::Human && c.point == *p));
        }
        captured
    }

    /// The result of the game, or `None` while both sides can still play.
    pub fn outcome(&self) -> Option<Outcome> {
        match (self.ai.len() < MIN_PIECES, self.human.len() < MIN_PIECES) {
            (true, true) => Some(Outcome::Draw),
            (true, false) => Some(Outcome::HumanWins),
            (false, true) => Some(Outcome::AiWins),
            (false, false) => None,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.ai.len() < MIN_PIECES || self.human.len() < MIN_PIECES
    }
}

/// Renders the lattice on a 9x9 character grid: `A` for AI, `H` for HUMAN,
/// `+` for an empty point.
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = |pick: fn(&(f64, f64)) -> f64| {
            let mut v: Vec<i64> = POINT_COORDS.iter().map(|c| pick(c) as i64).collect();
            v.sort_unstable();
            v.dedup();
            v
        };
        let xs = axis(|c| c.0);
        let ys = axis(|c| c.1);

        for &y in &ys {
            let mut line = String::with_capacity(xs.len() * 2);
            for &x in &xs {
                let here = Point::all().find(|p| {
                    let (px, py) = p.coords();
                    px as i64 == x && py as i64 == y
                });
                let ch = match here.map(|p| (p, self.owner(p))) {
                    Some((_, Some(Side::Ai))) => 'A',
                    Some((_, Some(Side::Human))) => 'H',
                    Some((_, None)) => '+',
                    None => ' ',
                };
                line.push(ch);
                line.push(' ');
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
