//! Arcade Hub - simulation core for a hub of small mini-games
//!
//! Core modules:
//! - `sim`: Fixed-tick simulations (Breakout, Pong, Flappy Bird, Snake) and the
//!   Minesweeper state machine, plus the shared game-instance framework
//! - `catalog`: Stable game ids used by the launcher for routing
//! - `lang`: English/Arabic labels
//! - `settings`: Runtime configuration

pub mod catalog;
pub mod error;
pub mod lang;
pub mod settings;
pub mod sim;

pub use catalog::GameId;
pub use error::ArcadeError;
pub use lang::{Label, Language};
pub use settings::{Difficulty, Settings};

/// Scheduler constants shared by every tick-driven game
pub mod consts {
    use std::time::Duration;

    /// Maximum ticks run for a single frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame deltas above this are clamped (tab switch, debugger pause)
    pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

    /// Tick period of the paddle games
    pub const BREAKOUT_TICK: Duration = Duration::from_millis(16);
    pub const PONG_TICK: Duration = Duration::from_millis(16);
    pub const FLAPPY_TICK: Duration = Duration::from_millis(20);
    /// Snake moves one cell per tick, so it runs much slower
    pub const SNAKE_TICK: Duration = Duration::from_millis(150);
}
