//! Line-oriented text console for driving a game.
//!
//! The console follows the request/response framing of GTP: each command is
//! one line, optionally prefixed by a numeric id, and each response starts
//! with `=` on success or `?` on failure, followed by the echoed id and the
//! message, and ends with a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `mode <ai-vs-human|ai-vs-ai>` - Pick a game mode
//! - `ai <minimax|mcts>` - Pick the opponent in AI-vs-HUMAN
//! - `play <from> <to>` - Move a HUMAN piece; the AI replies at once
//! - `click <x> <y>` - Pointer press on the 1280x800 canvas
//! - `step` - Make one AI move (AI-vs-AI)
//! - `moves` - List legal moves of the side to move
//! - `showboard`, `status`
//! - `back`, `restart`, `menu`
//!
//! Points are given by name (`center-north`) or index (`19`).
//!
//! ## Example
//!
//! ```ignore
//! use diamond_duel::console::ConsoleEngine;
//! let mut console = ConsoleEngine::new(game);
//! console.run()?;
//! ```

use std::io::{self, BufRead, Write};

use crate::board::Point;
use crate::engine::AiKind;
use crate::game::{Event, Game, Mode, Step};
use crate::position::Move;

/// The list of known console commands.
const KNOWN_COMMANDS: &[&str] = &[
    "ai",
    "back",
    "click",
    "known_command",
    "list_commands",
    "menu",
    "mode",
    "moves",
    "name",
    "play",
    "quit",
    "restart",
    "showboard",
    "status",
    "step",
    "version",
];

/// Console session around one [`Game`].
pub struct ConsoleEngine {
    game: Game,
}

impl ConsoleEngine {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(stdout, "{prefix}{id_str} {message}\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());

        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "mode" => {
                let mode = match args.first().map(|a| a.to_lowercase()).as_deref() {
                    Some("ai-vs-human") => Mode::AiVsHuman,
                    Some("ai-vs-ai") => Mode::AiVsAi,
                    Some(other) => return (false, format!("unknown mode: {other}")),
                    None => return (false, "missing argument".to_string()),
                };
                self.send(Event::SelectMode(mode))
            }

            "ai" => {
                let kind = match args.first().map(|a| a.to_lowercase()).as_deref() {
                    Some("minimax") => AiKind::Minimax,
                    Some("mcts") => AiKind::Mcts,
                    Some(other) => return (false, format!("unknown ai: {other}")),
                    None => return (false, "missing argument".to_string()),
                };
                self.send(Event::SelectAi(kind))
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let (from, to) = match (Point::parse(args[0]), Point::parse(args[1])) {
                    (Ok(from), Ok(to)) => (from, to),
                    (Err(e), _) | (_, Err(e)) => return (false, e.to_string()),
                };
                match self.game.handle(Event::HumanMove(Move::new(from, to))) {
                    Ok(()) => (true, self.reply()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "click" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let (x, y) = match (args[0].parse::<f64>(), args[1].parse::<f64>()) {
                    (Ok(x), Ok(y)) => (x, y),
                    _ => return (false, "invalid coordinates".to_string()),
                };
                let before = self.game.snapshot().turn;
                if let Err(e) = self.game.handle(Event::Click { x, y }) {
                    return (false, e.to_string());
                }
                if self.game.snapshot().turn != before {
                    return (true, self.reply());
                }
                match self.game.snapshot().selected {
                    Some(p) => (true, format!("selected {p}")),
                    None => (true, String::new()),
                }
            }

            "step" => match self.game.step() {
                Step::Moved(side, mv) => (true, format!("{side} {mv}")),
                Step::Passed(side) => (true, format!("{side} pass")),
                Step::Idle => (false, "no AI to move".to_string()),
            },

            "moves" => {
                let game = &self.game;
                let moves = game.state().legal_moves(game.board(), game.to_move());
                let lines: Vec<String> = moves.iter().map(|mv| mv.to_string()).collect();
                (true, lines.join("\n"))
            }

            "showboard" => (true, format!("\n{}", self.game.state())),

            "status" => (true, self.status()),

            "back" => self.send(Event::Back),
            "restart" => self.send(Event::Restart),
            "menu" => self.send(Event::Menu),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn send(&mut self, event: Event) -> (bool, String) {
        match self.game.handle(event) {
            Ok(()) => (true, self.game.screen().to_string()),
            Err(e) => (false, e.to_string()),
        }
    }

    /// Let the AI answer a HUMAN move and describe what happened.
    fn reply(&mut self) -> String {
        let mut lines = Vec::new();
        if let Some(mv) = self.game.snapshot().last_move {
            lines.push(format!("HUMAN {mv}"));
        }
        loop {
            match self.game.step() {
                Step::Moved(side, mv) => lines.push(format!("{side} {mv}")),
                Step::Passed(side) => lines.push(format!("{side} pass")),
                Step::Idle => break,
            }
            if self.game.snapshot().mode != Some(Mode::AiVsHuman) {
                break;
            }
        }
        if let Some(outcome) = self.game.outcome() {
            lines.push(outcome.to_string());
        }
        lines.join("\n")
    }

    fn status(&self) -> String {
        let snap = self.game.snapshot();
        let mut lines = vec![
            format!("screen {}", snap.screen),
            format!("to_move {}", snap.to_move),
            format!("turn {}", snap.turn),
            format!("pieces AI {} HUMAN {}", snap.ai.len(), snap.human.len()),
        ];
        if let Some(mv) = snap.last_move {
            lines.push(format!("last {mv}"));
        }
        for c in &snap.last_captures {
            lines.push(format!("captured {} {}", c.side, c.point));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::board::{Board, CaptureRule, Topology};
    use crate::game::GameConfig;
    use crate::mcts::MctsConfig;

    fn engine() -> ConsoleEngine {
        let mut fast = MctsConfig::fast();
        fast.time_budget = Duration::from_secs(60);
        fast.max_iterations = Some(30);
        let config = GameConfig {
            depth_vs_human: 2,
            mcts_full: fast.clone(),
            mcts_fast: fast,
            seed: Some(5),
            ..GameConfig::default()
        };
        let board = Board::new(Topology::standard().unwrap(), CaptureRule::Contested);
        ConsoleEngine::new(Game::new(board, config))
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = ConsoleEngine::parse_id("42 status");
        assert_eq!(id, Some(42));
        assert_eq!(cmd, "status");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = ConsoleEngine::parse_id("status");
        assert_eq!(id, None);
        assert_eq!(cmd, "status");
    }

    #[test]
    fn test_name_and_known_command() {
        let mut console = engine();
        assert_eq!(console.execute("name", &[]), (true, "diamond-duel".to_string()));
        assert_eq!(
            console.execute("known_command", &["play"]),
            (true, "true".to_string())
        );
        assert_eq!(
            console.execute("known_command", &["genmove"]),
            (true, "false".to_string())
        );
    }

    #[test]
    fn test_menu_commands() {
        let mut console = engine();
        let (ok, _) = console.execute("mode", &["sideways"]);
        assert!(!ok);

        assert_eq!(
            console.execute("mode", &["ai-vs-human"]),
            (true, "ai-type-select".to_string())
        );
        assert_eq!(console.execute("ai", &["minimax"]), (true, "playing".to_string()));
        assert_eq!(console.execute("back", &[]), (true, "ai-type-select".to_string()));
        assert_eq!(console.execute("menu", &[]), (true, "mode-select".to_string()));
    }

    #[test]
    fn test_play_gets_ai_reply() {
        let mut console = engine();
        console.execute("mode", &["ai-vs-human"]);
        console.execute("ai", &["minimax"]);

        let (ok, response) = console.execute("play", &["bottom-inner", "center-south"]);
        assert!(ok, "{response}");
        let lines: Vec<&str> = response.lines().collect();
        assert_eq!(lines[0], "HUMAN bottom-inner -> center-south");
        assert!(lines[1].starts_with("AI "));
        assert_eq!(console.game().snapshot().turn, 2);
    }

    #[test]
    fn test_bad_play_is_reported() {
        let mut console = engine();
        console.execute("mode", &["ai-vs-human"]);
        console.execute("ai", &["mcts"]);

        let (ok, _) = console.execute("play", &["nowhere", "center"]);
        assert!(!ok);
        let (ok, response) = console.execute("play", &["bottom", "center"]);
        assert!(!ok);
        assert_eq!(response, "illegal move: destination is not adjacent");
        assert_eq!(console.game().snapshot().turn, 0);
    }

    #[test]
    fn test_click_selects_then_moves() {
        let mut console = engine();
        console.execute("mode", &["ai-vs-human"]);
        console.execute("ai", &["minimax"]);

        let (ok, response) = console.execute("click", &["640", "586"]);
        assert!(ok);
        assert_eq!(response, "selected bottom-inner");

        let (ok, response) = console.execute("click", &["640", "540"]);
        assert!(ok);
        assert!(response.starts_with("HUMAN bottom-inner -> center-south"));
    }

    #[test]
    fn test_step_in_ai_vs_ai() {
        let mut console = engine();
        let (ok, _) = console.execute("step", &[]);
        assert!(!ok);

        console.execute("mode", &["ai-vs-ai"]);
        let (ok, response) = console.execute("step", &[]);
        assert!(ok);
        assert!(response.starts_with("AI "));
        let (ok, response) = console.execute("step", &[]);
        assert!(ok);
        assert!(response.starts_with("HUMAN "));
    }

    #[test]
    fn test_showboard_and_status() {
        let mut console = engine();
        let (ok, board) = console.execute("showboard", &[]);
        assert!(ok);
        assert_eq!(board.matches('A').count(), 6);

        let (ok, status) = console.execute("status", &[]);
        assert!(ok);
        assert!(status.contains("screen mode-select"));
        assert!(status.contains("pieces AI 6 HUMAN 6"));
    }
}
