//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one `Pcg32` per game instance)
//! - Stable iteration order (row-major bricks and tiles, head-first snake)
//! - No rendering or platform dependencies
//!
//! The tick-driven games implement [`Simulation`] and run inside a
//! [`GameInstance`] driven by a [`FixedTicker`]. Minesweeper is event-driven
//! and owns its board directly.

pub mod breakout;
pub mod flappy;
pub mod game;
pub mod geom;
pub mod input;
pub mod minesweeper;
pub mod pong;
pub mod schedule;
pub mod snake;

pub use breakout::{Breakout, BreakoutEvent, BreakoutWorld, BrickColor, PaddleIntent};
pub use flappy::{Flap, Flappy, FlappyEvent, FlappyWorld, Pipe};
pub use game::{
    GameInstance, Generation, Hud, Simulation, Snapshot, Status, Step, TickOutcome, Verdict,
};
pub use geom::{Bound, Rect, bounce, span_offset};
pub use input::{InputSampler, RawInput};
pub use minesweeper::{
    BoardSpec, BoardStatus, Coord, Minesweeper, NumberTint, Reveal, Tile, TileView,
};
pub use pong::{Pong, PongEvent, PongIntent, PongWorld, Side};
pub use schedule::FixedTicker;
pub use snake::{Cell, Direction, Snake, SnakeEvent, SnakeWorld};
