//! Game controller: the screen state machine and the turn loop.
//!
//! Screens run `ModeSelect -> AiTypeSelect -> Playing -> GameOver`; AI-vs-AI
//! skips the AI type selection. While playing, exactly one side moves per
//! turn, captures are resolved after every move, and the game ends as soon
//! as a side drops below four pieces.
//!
//! The controller holds the authoritative [`GameState`]. Input arrives as
//! [`Event`]s, AI turns are driven by [`Game::step`], and a front end reads
//! everything it needs to draw from [`Game::snapshot`].

use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};

use crate::board::{Board, Point, Side, match_by_proximity};
use crate::constants::{
    AI_VS_AI_DELAY_MS, MAX_STUCK_MOVES, MINIMAX_DEPTH_AI_VS_AI, MINIMAX_DEPTH_VS_HUMAN,
    REPETITION_WINDOW,
};
use crate::engine::{AiKind, Engine, MctsEngine, MinimaxEngine, decide};
use crate::mcts::MctsConfig;
use crate::position::{Capture, GameState, Move, MoveError, Outcome};

/// Who plays whom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// A person plays the HUMAN side against one engine.
    AiVsHuman,
    /// Minimax plays the AI side, fast MCTS plays the HUMAN side.
    AiVsAi,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::AiVsHuman => write!(f, "ai-vs-human"),
            Mode::AiVsAi => write!(f, "ai-vs-ai"),
        }
    }
}

/// The active screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    ModeSelect,
    AiTypeSelect,
    Playing,
    GameOver(Outcome),
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::ModeSelect => write!(f, "mode-select"),
            Screen::AiTypeSelect => write!(f, "ai-type-select"),
            Screen::Playing => write!(f, "playing"),
            Screen::GameOver(outcome) => write!(f, "game-over ({outcome})"),
        }
    }
}

/// Input from the front end.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    SelectMode(Mode),
    SelectAi(AiKind),
    /// Leave the current screen for the previous one
    Back,
    /// Start the current mode over from the initial layout
    Restart,
    /// Return to mode selection
    Menu,
    /// A complete HUMAN move
    HumanMove(Move),
    /// A pointer press on the canvas
    Click { x: f64, y: f64 },
}

/// Why an event was refused. The game is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The event makes no sense on this screen.
    WrongScreen(Screen),
    /// It is not the person's turn.
    NotYourTurn,
    IllegalMove(MoveError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::WrongScreen(screen) => write!(f, "not available on {screen}"),
            GameError::NotYourTurn => write!(f, "not your turn"),
            GameError::IllegalMove(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<MoveError> for GameError {
    fn from(e: MoveError) -> Self {
        GameError::IllegalMove(e)
    }
}

/// Runtime settings of the controller.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Minimax depth against a person
    pub depth_vs_human: u32,
    /// Minimax depth in AI-vs-AI
    pub depth_ai_vs_ai: u32,
    /// MCTS settings against a person
    pub mcts_full: MctsConfig,
    /// MCTS settings in AI-vs-AI
    pub mcts_fast: MctsConfig,
    /// Pause a front end should leave between AI-vs-AI moves
    pub move_delay: Duration,
    /// Consecutive failed AI-vs-AI turns before a forced draw
    pub max_stuck_moves: u32,
    /// Recent moves an AI-vs-AI player will not repeat
    pub repetition_window: usize,
    /// Seed for the MCTS random stream; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            depth_vs_human: MINIMAX_DEPTH_VS_HUMAN,
            depth_ai_vs_ai: MINIMAX_DEPTH_AI_VS_AI,
            mcts_full: MctsConfig::full(),
            mcts_fast: MctsConfig::fast(),
            move_delay: Duration::from_millis(AI_VS_AI_DELAY_MS),
            max_stuck_moves: MAX_STUCK_MOVES,
            repetition_window: REPETITION_WINDOW,
            seed: None,
        }
    }
}

/// What [`Game::step`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// An AI moved.
    Moved(Side, Move),
    /// The side to move had no move and passed.
    Passed(Side),
    /// Nothing to do: not playing, or waiting for the person.
    Idle,
}

/// Everything a renderer needs after a state change.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub ai: Vec<Point>,
    pub human: Vec<Point>,
    pub screen: Screen,
    pub mode: Option<Mode>,
    pub ai_kind: Option<AiKind>,
    pub to_move: Side,
    pub last_move: Option<Move>,
    pub last_captures: Vec<Capture>,
    /// HUMAN piece picked by the first click of a move
    pub selected: Option<Point>,
    pub outcome: Option<Outcome>,
    pub turn: u32,
}

/// The game controller.
pub struct Game {
    board: Board,
    config: GameConfig,
    state: GameState,
    screen: Screen,
    mode: Option<Mode>,
    ai_kind: Option<AiKind>,
    to_move: Side,
    ai_player: Option<Box<dyn Engine>>,
    human_player: Option<Box<dyn Engine>>,
    last_move: Option<Move>,
    last_captures: Vec<Capture>,
    selected: Option<Point>,
    history: Vec<Move>,
    stuck: u32,
    turn: u32,
}

impl Game {
    pub fn new(board: Board, config: GameConfig) -> Self {
        Self {
            board,
            config,
            state: GameState::initial(),
            screen: Screen::ModeSelect,
            mode: None,
            ai_kind: None,
            to_move: Side::Human,
            ai_player: None,
            human_player: None,
            last_move: None,
            last_captures: Vec::new(),
            selected: None,
            history: Vec::new(),
            stuck: 0,
            turn: 0,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[inline]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.screen {
            Screen::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Whether [`Game::step`] has an AI move to make.
    pub fn ai_to_move(&self) -> bool {
        self.screen == Screen::Playing
            && match self.to_move {
                Side::Ai => self.ai_player.is_some(),
                Side::Human => self.human_player.is_some(),
            }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ai: self.state.ai.clone(),
            human: self.state.human.clone(),
            screen: self.screen,
            mode: self.mode,
            ai_kind: self.ai_kind,
            to_move: self.to_move,
            last_move: self.last_move,
            last_captures: self.last_captures.clone(),
            selected: self.selected,
            outcome: self.outcome(),
            turn: self.turn,
        }
    }

    /// Replace the position, keeping mode and players. The outcome is
    /// evaluated at once.
    pub fn set_position(&mut self, state: GameState, to_move: Side) {
        self.state = state;
        self.to_move = to_move;
        self.selected = None;
        self.last_move = None;
        self.last_captures.clear();
        if self.screen == Screen::Playing {
            if let Some(outcome) = self.state.outcome() {
                self.finish(outcome);
            }
        }
    }

    /// Feed one input event to the state machine.
    pub fn handle(&mut self, event: Event) -> Result<(), GameError> {
        match (self.screen, event) {
            (Screen::ModeSelect, Event::SelectMode(Mode::AiVsHuman)) => {
                self.mode = Some(Mode::AiVsHuman);
                self.screen = Screen::AiTypeSelect;
                Ok(())
            }
            (Screen::ModeSelect, Event::SelectMode(Mode::AiVsAi)) => {
                self.mode = Some(Mode::AiVsAi);
                self.ai_kind = None;
                self.start();
                Ok(())
            }
            (Screen::AiTypeSelect, Event::SelectAi(kind)) => {
                self.ai_kind = Some(kind);
                self.start();
                Ok(())
            }
            (Screen::AiTypeSelect, Event::Back) => {
                self.mode = None;
                self.screen = Screen::ModeSelect;
                Ok(())
            }
            (Screen::Playing, Event::Back) => {
                self.reset();
                if self.mode == Some(Mode::AiVsHuman) {
                    self.screen = Screen::AiTypeSelect;
                } else {
                    self.mode = None;
                    self.screen = Screen::ModeSelect;
                }
                Ok(())
            }
            (Screen::Playing | Screen::GameOver(_), Event::Restart) => {
                self.start();
                Ok(())
            }
            (_, Event::Menu) | (Screen::GameOver(_), Event::Back) => {
                self.reset();
                self.mode = None;
                self.ai_kind = None;
                self.screen = Screen::ModeSelect;
                Ok(())
            }
            (Screen::Playing, Event::HumanMove(mv)) => {
                self.require_human_turn()?;
                self.selected = None;
                self.play(Side::Human, mv)?;
                Ok(())
            }
            (Screen::Playing, Event::Click { x, y }) => {
                self.require_human_turn()?;
                self.click(x, y)
            }
            (screen, _) => Err(GameError::WrongScreen(screen)),
        }
    }

    /// Make one AI move if an AI is to move.
    ///
    /// In AI-vs-AI a side that cannot produce a move passes and counts
    /// towards the stuck watchdog; reaching the threshold ends the game in a
    /// draw.
    pub fn step(&mut self) -> Step {
        if !self.ai_to_move() {
            return Step::Idle;
        }

        let side = self.to_move;
        let player = match side {
            Side::Ai => self.ai_player.as_deref_mut(),
            Side::Human => self.human_player.as_deref_mut(),
        };
        let Some(player) = player else {
            return Step::Idle;
        };

        let mut choice = decide(player, &self.board, &self.state, side);

        if self.mode == Some(Mode::AiVsAi) {
            if let Some(mv) = choice {
                let window = self.history.len().saturating_sub(self.config.repetition_window);
                if self.history[window..].contains(&mv) {
                    debug!("{side} avoids repeating {mv}");
                    choice = self.state.first_legal_move(&self.board, side);
                }
            }
        }

        match choice {
            Some(mv) => match self.play(side, mv) {
                Ok(()) => {
                    self.stuck = 0;
                    Step::Moved(side, mv)
                }
                Err(e) => {
                    warn!("{side} move {mv} rejected: {e}");
                    self.pass(side)
                }
            },
            None => self.pass(side),
        }
    }

    fn require_human_turn(&self) -> Result<(), GameError> {
        if self.mode == Some(Mode::AiVsHuman) && self.to_move == Side::Human {
            Ok(())
        } else {
            Err(GameError::NotYourTurn)
        }
    }

    /// Two-click move entry: pick a HUMAN piece, then an empty neighbour.
    /// Clicking an occupied point or a non-neighbour drops the selection.
    fn click(&mut self, x: f64, y: f64) -> Result<(), GameError> {
        let Some(from) = self.selected.take() else {
            self.selected = match_by_proximity(&self.state.human, x, y);
            return Ok(());
        };

        if match_by_proximity(&self.state.ai, x, y).is_some()
            || match_by_proximity(&self.state.human, x, y).is_some()
        {
            return Ok(());
        }

        match match_by_proximity(self.board.neighbors(from), x, y) {
            Some(to) => {
                self.play(Side::Human, Move::new(from, to))?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn play(&mut self, side: Side, mv: Move) -> Result<(), MoveError> {
        let captures = self.state.apply_move(&self.board, side, mv)?;
        self.turn += 1;
        info!("turn {}: {side} {mv}", self.turn);
        for c in &captures {
            info!("captured {} piece at {}", c.side, c.point);
        }

        self.last_move = Some(mv);
        self.last_captures = captures;
        self.history.push(mv);

        match self.state.outcome() {
            Some(outcome) => self.finish(outcome),
            None => self.to_move = side.opponent(),
        }
        Ok(())
    }

    fn pass(&mut self, side: Side) -> Step {
        info!("{side} has no move and passes");
        self.to_move = side.opponent();

        if self.mode == Some(Mode::AiVsAi) {
            self.stuck += 1;
            if self.stuck >= self.config.max_stuck_moves {
                warn!("no progress after {} attempts, declaring a draw", self.stuck);
                self.finish(Outcome::Draw);
            }
        }
        Step::Passed(side)
    }

    fn finish(&mut self, outcome: Outcome) {
        info!("game over: {outcome}");
        self.screen = Screen::GameOver(outcome);
    }

    /// Back to the initial layout with no move history.
    fn reset(&mut self) {
        self.state.reset();
        self.to_move = Side::Human;
        self.last_move = None;
        self.last_captures.clear();
        self.selected = None;
        self.history.clear();
        self.stuck = 0;
        self.turn = 0;
        self.ai_player = None;
        self.human_player = None;
    }

    /// Set up players for the chosen mode and enter `Playing`.
    fn start(&mut self) {
        self.reset();
        let seed = self.config.seed;

        match self.mode {
            Some(Mode::AiVsAi) => {
                self.ai_player = Some(Box::new(MinimaxEngine {
                    depth: self.config.depth_ai_vs_ai,
                }));
                self.human_player = Some(Box::new(MctsEngine::new(
                    self.config.mcts_fast.clone(),
                    seed.map(|s| s.wrapping_add(1)),
                )));
                self.to_move = Side::Ai;
            }
            _ => {
                let engine: Box<dyn Engine> = match self.ai_kind {
                    Some(AiKind::Mcts) => {
                        Box::new(MctsEngine::new(self.config.mcts_full.clone(), seed))
                    }
                    _ => Box::new(MinimaxEngine {
                        depth: self.config.depth_vs_human,
                    }),
                };
                self.ai_player = Some(engine);
                self.to_move = Side::Human;
            }
        }

        info!(
            "new game: {} ({})",
            self.mode.unwrap_or(Mode::AiVsHuman),
            self.ai_kind.map_or_else(|| "minimax vs mcts".to_string(), |k| k.to_string())
        );
        self.screen = Screen::Playing;
    }
}
