//! Game ids
//!
//! The launcher routes by these strings. Only the id is shared with the
//! catalog; titles, icons and cards live in the shell.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::lang::Language;

/// Every game the hub lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    TicTacToe,
    Snake,
    Memory,
    FlappyBird,
    RockPaperScissors,
    Breakout,
    #[serde(rename = "2048")]
    Game2048,
    SimonSays,
    Pong,
    Minesweeper,
}

impl GameId {
    pub const ALL: [GameId; 10] = [
        GameId::TicTacToe,
        GameId::Snake,
        GameId::Memory,
        GameId::FlappyBird,
        GameId::RockPaperScissors,
        GameId::Breakout,
        GameId::Game2048,
        GameId::SimonSays,
        GameId::Pong,
        GameId::Minesweeper,
    ];

    /// The five games with a simulation in this crate
    pub const SIMULATED: [GameId; 5] = [
        GameId::Breakout,
        GameId::Pong,
        GameId::FlappyBird,
        GameId::Snake,
        GameId::Minesweeper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::TicTacToe => "tic-tac-toe",
            GameId::Snake => "snake",
            GameId::Memory => "memory",
            GameId::FlappyBird => "flappy-bird",
            GameId::RockPaperScissors => "rock-paper-scissors",
            GameId::Breakout => "breakout",
            GameId::Game2048 => "2048",
            GameId::SimonSays => "simon-says",
            GameId::Pong => "pong",
            GameId::Minesweeper => "minesweeper",
        }
    }

    pub fn is_simulated(&self) -> bool {
        Self::SIMULATED.contains(self)
    }

    /// One-line how-to-play text for the simulated games
    pub fn instructions(&self, lang: Language) -> Option<&'static str> {
        let text = match (self, lang) {
            (GameId::Breakout, Language::En) => "Move paddle with mouse or arrow keys",
            (GameId::Breakout, Language::Ar) => "حرك المضرب بالماوس أو مفاتيح الأسهم",
            (GameId::Pong, Language::En) => {
                "Move paddle with mouse or arrow keys. First to 10 points wins!"
            }
            (GameId::Pong, Language::Ar) => {
                "حرك المضرب بالماوس أو مفاتيح الأسهم. أول من يصل إلى 10 نقاط يفوز!"
            }
            (GameId::FlappyBird, Language::En) => "Click or press spacebar to flap",
            (GameId::FlappyBird, Language::Ar) => "انقر أو اضغط مسطحة المسافة للرفرفة",
            (GameId::Snake, Language::En) => "Use arrow keys to control the snake",
            (GameId::Snake, Language::Ar) => "استخدم مفاتيح الأسهم للتحكم في الثعبان",
            (GameId::Minesweeper, Language::En) => {
                "Left-click to reveal cells. Right-click to flag suspected mines."
            }
            (GameId::Minesweeper, Language::Ar) => {
                "انقر بالزر الأيسر لكشف الخلايا. انقر بالزر الأيمن لوضع علامة على الألغام المشتبهة."
            }
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        GameId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ArcadeError::UnknownGame(s.to_string()))
    }
}
