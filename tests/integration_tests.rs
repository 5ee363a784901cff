//! Integration tests for diamond-duel
//!
//! These drive the public API end to end: the lattice, move execution with
//! capture resolution, both search engines, and the game controller.

use std::time::Duration;

use diamond_duel::board::{Board, CaptureRule, Point, Side, Topology};
use diamond_duel::constants::{NEIGHBOR_TABLE, NUM_POINTS};
use diamond_duel::engine::AiKind;
use diamond_duel::game::{Event, Game, GameConfig, Mode, Screen, Step};
use diamond_duel::mcts::{Mcts, MctsConfig};
use diamond_duel::minimax;
use diamond_duel::position::{Capture, GameState, Move, MoveError, Outcome};

// =============================================================================
// Helper functions
// =============================================================================

fn immobilized() -> Board {
    Board::standard().unwrap()
}

fn contested() -> Board {
    Board::new(Topology::standard().unwrap(), CaptureRule::Contested)
}

fn state(ai: &[Point], human: &[Point]) -> GameState {
    GameState::from_pieces(ai.to_vec(), human.to_vec()).unwrap()
}

fn quick_mcts(iterations: u64) -> MctsConfig {
    MctsConfig {
        time_budget: Duration::from_secs(60),
        max_iterations: Some(iterations),
        ..MctsConfig::fast()
    }
}

fn quick_config() -> GameConfig {
    GameConfig {
        depth_vs_human: 2,
        mcts_full: quick_mcts(60),
        mcts_fast: quick_mcts(30),
        move_delay: Duration::ZERO,
        seed: Some(2024),
        ..GameConfig::default()
    }
}

/// A mid-game position with no piece walled in, so the strict rule does not
/// end the game on the next move.
fn open_middle_game() -> GameState {
    state(
        &[Point::CENTER, Point::TOP_INNER, Point::LEFT_NORTH, Point::RIGHT, Point::BOTTOM_WEST],
        &[
            Point::CENTER_SOUTH,
            Point::BOTTOM,
            Point::LEFT_INNER,
            Point::RIGHT_NORTH,
            Point::TOP_WEST,
        ],
    )
}

fn assert_disjoint(s: &GameState) {
    let (ai, human) = (s.pieces(Side::Ai), s.pieces(Side::Human));
    for p in ai {
        assert!(!human.contains(p), "{p} held by both sides");
    }
    let mut all: Vec<Point> = ai.iter().chain(human.iter()).copied().collect();
    let n = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), n, "duplicate piece");
}

// =============================================================================
// Lattice tests
// =============================================================================

#[test]
fn test_adjacency_is_symmetric_and_bounded() {
    let topo = Topology::standard().unwrap();
    for p in Point::all() {
        let neighbors = topo.neighbors(p);
        assert!((3..=4).contains(&neighbors.len()));
        for &q in neighbors {
            assert_ne!(p, q);
            assert!(topo.neighbors(q).contains(&p), "{p} -> {q} not mirrored");
        }
    }
}

#[test]
fn test_lattice_is_connected() {
    let topo = Topology::standard().unwrap();
    let mut seen = vec![Point::TOP];
    let mut frontier = vec![Point::TOP];
    while let Some(p) = frontier.pop() {
        for &q in topo.neighbors(p) {
            if !seen.contains(&q) {
                seen.push(q);
                frontier.push(q);
            }
        }
    }
    assert_eq!(seen.len(), NUM_POINTS);
}

#[test]
fn test_broken_table_is_rejected() {
    let mut table = NEIGHBOR_TABLE;
    table[0] = &[1, 2]; // top loses top-inner
    assert!(Topology::from_table(&table).is_err());
}

#[test]
fn test_point_names_roundtrip() {
    for p in Point::all() {
        assert_eq!(Point::parse(p.name()), Ok(p));
        assert_eq!(Point::parse(&p.index().to_string()), Ok(p));
    }
    assert!(Point::parse("middle").is_err());
    assert!(Point::parse("21").is_err());
}

// =============================================================================
// Move and capture tests
// =============================================================================

#[test]
fn test_illegal_moves_are_rejected_without_change() {
    let b = immobilized();
    let mut s = GameState::initial();
    let before = s.clone();

    let cases = [
        (Side::Human, Move::new(Point::TOP, Point::TOP_INNER), MoveError::NotOwned),
        (Side::Human, Move::new(Point::BOTTOM, Point::CENTER), MoveError::NotAdjacent),
        (Side::Human, Move::new(Point::BOTTOM, Point::BOTTOM_INNER), MoveError::Occupied),
    ];
    for (side, mv, expected) in cases {
        assert_eq!(s.apply_move(&b, side, mv), Err(expected));
        assert_eq!(s, before);
    }
}

#[test]
fn test_random_games_keep_sides_disjoint() {
    let mut rng = fastrand::Rng::with_seed(99);
    for b in [immobilized(), contested()] {
        for _ in 0..50 {
            let mut s = GameState::initial();
            let mut side = Side::Human;
            for _ in 0..60 {
                if s.is_terminal() {
                    break;
                }
                let moves = s.legal_moves(&b, side);
                if moves.is_empty() {
                    break;
                }
                let mv = moves[rng.usize(..moves.len())];
                let before = s.pieces(side).len() + s.pieces(side.opponent()).len();
                let captures = s.apply_move(&b, side, mv).unwrap();
                let after = s.pieces(side).len() + s.pieces(side.opponent()).len();
                assert_eq!(before - captures.len(), after);
                assert_disjoint(&s);
                side = side.opponent();
            }
        }
    }
}

#[test]
fn test_walled_piece_is_captured() {
    let b = immobilized();
    let mut s = state(
        &[Point::RIGHT_NORTH, Point::RIGHT_SOUTH, Point::CENTER_EAST, Point::LEFT, Point::TOP],
        &[Point::RIGHT, Point::BOTTOM, Point::CENTER, Point::LEFT_INNER, Point::TOP_INNER],
    );

    let captures = s
        .apply_move(&b, Side::Ai, Move::new(Point::CENTER_EAST, Point::RIGHT_INNER))
        .unwrap();
    assert_eq!(
        captures,
        vec![Capture {
            side: Side::Human,
            point: Point::RIGHT
        }]
    );
    assert_eq!(s.pieces(Side::Human).len(), 4);
    assert_eq!(s.outcome(), None);
}

#[test]
fn test_opening_under_each_rule() {
    let mv = Move::new(Point::BOTTOM_INNER, Point::CENTER_SOUTH);

    // Under the strict rule the AI's packed cluster is swept away at once.
    let mut s = GameState::initial();
    let captures = s.apply_move(&immobilized(), Side::Human, mv).unwrap();
    assert_eq!(captures.len(), 3);
    assert!(captures.iter().all(|c| c.side == Side::Ai));
    assert_eq!(s.outcome(), Some(Outcome::HumanWins));

    let mut s = GameState::initial();
    assert!(s.apply_move(&contested(), Side::Human, mv).unwrap().is_empty());
    assert_eq!(s.outcome(), None);
}

#[test]
fn test_terminal_detection() {
    let s = state(
        &[Point::TOP, Point::LEFT, Point::RIGHT],
        &[Point::BOTTOM, Point::CENTER, Point::LEFT_SOUTH, Point::RIGHT_SOUTH],
    );
    assert!(s.is_terminal());
    assert_eq!(s.outcome(), Some(Outcome::HumanWins));
}

// =============================================================================
// Search tests
// =============================================================================

#[test]
fn test_minimax_is_deterministic_and_legal() {
    let b = contested();
    let mut s = GameState::initial();
    s.apply_move(&b, Side::Human, Move::new(Point::LEFT_SOUTH, Point::LEFT))
        .unwrap();

    let first = minimax::best_move(&b, &s, Side::Ai, 4);
    let second = minimax::best_move(&b, &s, Side::Ai, 4);
    assert_eq!(first, second);

    let mv = first.best.unwrap();
    assert!(s.check_move(&b, Side::Ai, mv).is_ok());
}

#[test]
fn test_mcts_returns_legal_moves_for_both_sides() {
    let b = contested();
    let s = GameState::initial();
    for (seed, side) in [(1, Side::Ai), (2, Side::Human)] {
        let result = Mcts::with_seed(quick_mcts(200), seed).search(&b, &s, side);
        let mv = result.best.unwrap();
        assert!(s.check_move(&b, side, mv).is_ok(), "{mv} illegal for {side}");
        assert!(result.stats.iterations <= 200);
    }
}

#[test]
fn test_mcts_returns_legal_moves_under_strict_rule() {
    let b = immobilized();
    let s = open_middle_game();
    assert_eq!(s.outcome(), None);
    for (seed, side) in [(3, Side::Ai), (4, Side::Human)] {
        let result = Mcts::with_seed(quick_mcts(200), seed).search(&b, &s, side);
        let mv = result.best.unwrap();
        assert!(s.check_move(&b, side, mv).is_ok(), "{mv} illegal for {side}");
    }
}

#[test]
fn test_mcts_takes_immediate_win() {
    let b = contested();
    // Sliding into right-inner walls in the AI piece on right, leaving three.
    let s = state(
        &[Point::RIGHT, Point::BOTTOM_WEST, Point::CENTER, Point::LEFT],
        &[Point::RIGHT_NORTH, Point::RIGHT_SOUTH, Point::CENTER_EAST, Point::TOP],
    );
    let result = Mcts::with_seed(quick_mcts(500), 4).search(&b, &s, Side::Human);
    assert!(result.immediate_win);

    let mut after = s.clone();
    after.apply_move(&b, Side::Human, result.best.unwrap()).unwrap();
    assert_eq!(after.outcome(), Some(Outcome::HumanWins));
}

// =============================================================================
// Controller tests
// =============================================================================

#[test]
fn test_full_ai_vs_human_session() {
    let mut game = Game::new(contested(), quick_config());
    game.handle(Event::SelectMode(Mode::AiVsHuman)).unwrap();
    game.handle(Event::SelectAi(AiKind::Mcts)).unwrap();
    assert_eq!(game.screen(), Screen::Playing);

    let mut rng = fastrand::Rng::with_seed(8);
    for _ in 0..10 {
        if game.outcome().is_some() {
            break;
        }
        let moves = game.state().legal_moves(game.board(), Side::Human);
        let mv = moves[rng.usize(..moves.len())];
        game.handle(Event::HumanMove(mv)).unwrap();
        if game.outcome().is_none() {
            assert!(matches!(game.step(), Step::Moved(Side::Ai, _)));
        }
        assert_disjoint(game.state());
    }

    game.handle(Event::Menu).unwrap();
    assert_eq!(game.screen(), Screen::ModeSelect);
    assert_eq!(game.state(), &GameState::initial());
}

#[test]
fn test_ai_vs_ai_reaches_an_end_or_keeps_playing() {
    let mut game = Game::new(contested(), quick_config());
    game.handle(Event::SelectMode(Mode::AiVsAi)).unwrap();

    let mut moves = 0;
    while game.outcome().is_none() && moves < 60 {
        match game.step() {
            Step::Moved(..) => moves += 1,
            other => panic!("unexpected step {other:?}"),
        }
        assert_disjoint(game.state());
    }

    let snap = game.snapshot();
    assert_eq!(snap.turn, moves);
    if let Some(outcome) = game.outcome() {
        assert_eq!(snap.screen, Screen::GameOver(outcome));
        assert_eq!(game.step(), Step::Idle);
        game.handle(Event::Restart).unwrap();
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.state(), &GameState::initial());
    }
}

#[test]
fn test_ai_vs_ai_under_strict_rule() {
    let mut game = Game::new(immobilized(), quick_config());
    game.handle(Event::SelectMode(Mode::AiVsAi)).unwrap();
    game.set_position(open_middle_game(), Side::Ai);

    let mut expected = Side::Ai;
    let mut moves = 0;
    for _ in 0..40 {
        if game.outcome().is_some() {
            break;
        }
        let before = game.state().clone();
        match game.step() {
            Step::Moved(side, mv) => {
                assert_eq!(side, expected);
                assert!(before.check_move(game.board(), side, mv).is_ok());
                moves += 1;
            }
            Step::Passed(side) => assert_eq!(side, expected),
            Step::Idle => panic!("AI-vs-AI went idle while playing"),
        }
        assert_disjoint(game.state());
        expected = expected.opponent();
    }
    assert!(moves > 0);
}

#[test]
fn test_ai_vs_ai_opening_under_strict_rule() {
    // Both starting clusters are walled in by their own pieces; the AI's first
    // move sweeps the HUMAN cluster and ends the game.
    let mut game = Game::new(immobilized(), quick_config());
    game.handle(Event::SelectMode(Mode::AiVsAi)).unwrap();
    assert!(matches!(game.step(), Step::Moved(Side::Ai, _)));

    let outcome = game.outcome().unwrap();
    assert_ne!(outcome, Outcome::HumanWins);
    assert!(game.state().pieces(Side::Human).len() < 4);
    assert_eq!(game.step(), Step::Idle);
}

#[test]
fn test_back_from_ai_vs_ai_returns_to_mode_select() {
    let mut game = Game::new(contested(), quick_config());
    game.handle(Event::SelectMode(Mode::AiVsAi)).unwrap();
    game.step();
    game.handle(Event::Back).unwrap();
    assert_eq!(game.screen(), Screen::ModeSelect);
    assert_eq!(game.state(), &GameState::initial());
}
