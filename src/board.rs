//! Board topology: the 21 lattice points, their adjacency, and the rules
//! configuration shared by every component.
//!
//! Two kinds of lookup live here and must not be confused:
//! - topology lookups use exact point identity (an index), and
//! - pointer hit-testing uses canvas coordinates with a tolerance window
//!   ([`match_by_proximity`]), and is only used at the input boundary.

use std::fmt;

use crate::constants::{
    MAX_NEIGHBORS, MIN_NEIGHBORS, NEIGHBOR_TABLE, NUM_POINTS, POINT_COORDS, POINT_NAMES,
    PROXIMITY_TOLERANCE,
};

/// One of the two players. The rules are symmetric.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Ai,
    Human,
}

impl Side {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Ai => Side::Human,
            Side::Human => Side::Ai,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Ai => write!(f, "AI"),
            Side::Human => write!(f, "HUMAN"),
        }
    }
}

/// A lattice point, identified by its index in the constant tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point(u8);

impl Point {
    pub const TOP: Point = Point(crate::constants::TOP);
    pub const TOP_EAST: Point = Point(crate::constants::TOP_EAST);
    pub const TOP_WEST: Point = Point(crate::constants::TOP_WEST);
    pub const TOP_INNER: Point = Point(crate::constants::TOP_INNER);
    pub const RIGHT: Point = Point(crate::constants::RIGHT);
    pub const RIGHT_NORTH: Point = Point(crate::constants::RIGHT_NORTH);
    pub const RIGHT_SOUTH: Point = Point(crate::constants::RIGHT_SOUTH);
    pub const RIGHT_INNER: Point = Point(crate::constants::RIGHT_INNER);
    pub const LEFT: Point = Point(crate::constants::LEFT);
    pub const LEFT_NORTH: Point = Point(crate::constants::LEFT_NORTH);
    pub const LEFT_SOUTH: Point = Point(crate::constants::LEFT_SOUTH);
    pub const LEFT_INNER: Point = Point(crate::constants::LEFT_INNER);
    pub const BOTTOM: Point = Point(crate::constants::BOTTOM);
    pub const BOTTOM_EAST: Point = Point(crate::constants::BOTTOM_EAST);
    pub const BOTTOM_WEST: Point = Point(crate::constants::BOTTOM_WEST);
    pub const BOTTOM_INNER: Point = Point(crate::constants::BOTTOM_INNER);
    pub const CENTER: Point = Point(crate::constants::CENTER);
    pub const CENTER_WEST: Point = Point(crate::constants::CENTER_WEST);
    pub const CENTER_EAST: Point = Point(crate::constants::CENTER_EAST);
    pub const CENTER_NORTH: Point = Point(crate::constants::CENTER_NORTH);
    pub const CENTER_SOUTH: Point = Point(crate::constants::CENTER_SOUTH);

    /// Create a point from its index, or `None` if the index is off the board.
    pub fn new(index: u8) -> Option<Point> {
        ((index as usize) < NUM_POINTS).then_some(Point(index))
    }

    /// Iterate over all 21 points in index order.
    pub fn all() -> impl Iterator<Item = Point> {
        (0..NUM_POINTS as u8).map(Point)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        POINT_NAMES[self.index()]
    }

    /// Canvas coordinates of this point.
    pub fn coords(self) -> (f64, f64) {
        POINT_COORDS[self.index()]
    }

    /// Parse a point from its name (`center-north`) or its index (`19`).
    pub fn parse(s: &str) -> Result<Point, ParsePointError> {
        let s = s.trim().to_lowercase();
        if let Ok(index) = s.parse::<u8>() {
            return Point::new(index).ok_or(ParsePointError(s));
        }
        POINT_NAMES
            .iter()
            .position(|&name| name == s)
            .map(|i| Point(i as u8))
            .ok_or(ParsePointError(s))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A string that names no lattice point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePointError(pub String);

impl fmt::Display for ParsePointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown point '{}'", self.0)
    }
}

impl std::error::Error for ParsePointError {}

/// A malformed adjacency table, detected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// The table does not have one entry per point.
    WrongSize(usize),
    /// A neighbour index is not a point.
    UnknownPoint { point: usize, neighbor: u8 },
    /// A point has fewer than 3 or more than 4 neighbours.
    Degree { point: usize, degree: usize },
    /// A point lists itself as a neighbour.
    SelfLoop(usize),
    /// A point lists the same neighbour twice.
    Duplicate { point: usize, neighbor: u8 },
    /// `neighbor` is adjacent to `point` but not the other way round.
    Asymmetric { point: usize, neighbor: u8 },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::WrongSize(n) => {
                write!(f, "topology has {n} entries, expected {NUM_POINTS}")
            }
            TopologyError::UnknownPoint { point, neighbor } => {
                write!(f, "point {point} lists unknown neighbour {neighbor}")
            }
            TopologyError::Degree { point, degree } => write!(
                f,
                "point {point} has {degree} neighbours, expected {MIN_NEIGHBORS}..={MAX_NEIGHBORS}"
            ),
            TopologyError::SelfLoop(point) => write!(f, "point {point} lists itself"),
            TopologyError::Duplicate { point, neighbor } => {
                write!(f, "point {point} lists neighbour {neighbor} twice")
            }
            TopologyError::Asymmetric { point, neighbor } => {
                write!(f, "edge {point} -> {neighbor} has no reverse edge")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

/// Validated, immutable first-hop adjacency.
#[derive(Debug, Clone)]
pub struct Topology {
    neighbors: Vec<Vec<Point>>,
}

impl Topology {
    /// Validate a raw adjacency table and build the topology from it.
    pub fn from_table(table: &[&[u8]]) -> Result<Topology, TopologyError> {
        if table.len() != NUM_POINTS {
            return Err(TopologyError::WrongSize(table.len()));
        }

        let mut neighbors = Vec::with_capacity(NUM_POINTS);
        for (point, entry) in table.iter().enumerate() {
            if !(MIN_NEIGHBORS..=MAX_NEIGHBORS).contains(&entry.len()) {
                return Err(TopologyError::Degree {
                    point,
                    degree: entry.len(),
                });
            }
            let mut list: Vec<Point> = Vec::with_capacity(entry.len());
            for &neighbor in entry.iter() {
                let p = Point::new(neighbor).ok_or(TopologyError::UnknownPoint { point, neighbor })?;
                if p.index() == point {
                    return Err(TopologyError::SelfLoop(point));
                }
                if list.contains(&p) {
                    return Err(TopologyError::Duplicate { point, neighbor });
                }
                list.push(p);
            }
            neighbors.push(list);
        }

        for (point, list) in neighbors.iter().enumerate() {
            for &q in list {
                if !neighbors[q.index()].iter().any(|r| r.index() == point) {
                    return Err(TopologyError::Asymmetric {
                        point,
                        neighbor: q.0,
                    });
                }
            }
        }

        Ok(Topology { neighbors })
    }

    /// The double-diamond board.
    pub fn standard() -> Result<Topology, TopologyError> {
        Topology::from_table(&NEIGHBOR_TABLE)
    }

    /// Neighbours of `p`, in table order.
    #[inline]
    pub fn neighbors(&self, p: Point) -> &[Point] {
        &self.neighbors[p.index()]
    }

    #[inline]
    pub fn is_adjacent(&self, a: Point, b: Point) -> bool {
        self.neighbors(a).contains(&b)
    }
}

/// How the post-move pass decides which immobilised pieces are removed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CaptureRule {
    /// Every piece without an empty neighbour is removed, including pieces
    /// walled in only by their own side.
    #[default]
    Immobilized,
    /// An immobilised piece is removed only if at least one neighbour
    /// belongs to the opponent.
    Contested,
}

/// The immutable game configuration: topology plus capture rule.
///
/// Built once at startup and passed by reference to every component.
#[derive(Debug, Clone)]
pub struct Board {
    topology: Topology,
    pub capture_rule: CaptureRule,
}

impl Board {
    pub fn new(topology: Topology, capture_rule: CaptureRule) -> Self {
        Self {
            topology,
            capture_rule,
        }
    }

    /// The standard board with the default capture rule.
    pub fn standard() -> Result<Board, TopologyError> {
        Ok(Board::new(Topology::standard()?, CaptureRule::default()))
    }

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[inline]
    pub fn neighbors(&self, p: Point) -> &[Point] {
        self.topology.neighbors(p)
    }

    /// Neighbours of `p` present in neither piece collection.
    pub fn empty_neighbors<'a>(
        &'a self,
        p: Point,
        ai: &'a [Point],
        human: &'a [Point],
    ) -> impl Iterator<Item = Point> + 'a {
        self.neighbors(p)
            .iter()
            .copied()
            .filter(move |n| !ai.contains(n) && !human.contains(n))
    }

    /// Number of empty neighbours of `p`: the local mobility of a piece there.
    #[inline]
    pub fn mobility(&self, p: Point, ai: &[Point], human: &[Point]) -> usize {
        self.empty_neighbors(p, ai, human).count()
    }

    /// A piece at `p` is trapped when it has no empty neighbour.
    #[inline]
    pub fn is_trapped(&self, p: Point, ai: &[Point], human: &[Point]) -> bool {
        self.empty_neighbors(p, ai, human).next().is_none()
    }

    /// Whether a piece of `owner` at `p` is removed by capture resolution.
    pub fn is_captured(&self, p: Point, owner: Side, ai: &[Point], human: &[Point]) -> bool {
        if !self.is_trapped(p, ai, human) {
            return false;
        }
        match self.capture_rule {
            CaptureRule::Immobilized => true,
            CaptureRule::Contested => {
                let enemies = match owner {
                    Side::Ai => human,
                    Side::Human => ai,
                };
                self.neighbors(p).iter().any(|n| enemies.contains(n))
            }
        }
    }
}

/// Find the element of `points` within the hit-test tolerance of a pointer
/// position. Only for translating raw input; searches never use it.
pub fn match_by_proximity(points: &[Point], x: f64, y: f64) -> Option<Point> {
    points.iter().copied().find(|p| {
        let (px, py) = p.coords();
        (px - x).abs() <= PROXIMITY_TOLERANCE && (py - y).abs() <= PROXIMITY_TOLERANCE
    })
}
