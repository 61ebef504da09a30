//! Breakout
//!
//! A ball bounces between the walls, a player paddle along the bottom and a
//! 6x10 grid of bricks. Clearing every brick wins; losing the ball three
//! times loses.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::game::{Hud, Simulation, Step, Verdict};
use super::geom::{Bound, Rect, bounce};
use super::input::RawInput;
use crate::catalog::GameId;
use crate::consts::BREAKOUT_TICK;

pub const FIELD_WIDTH: f32 = 600.0;
pub const FIELD_HEIGHT: f32 = 400.0;

pub const PADDLE_WIDTH: f32 = 80.0;
pub const PADDLE_HEIGHT: f32 = 10.0;
/// Top edge of the paddle (it floats 10px above the floor)
pub const PADDLE_Y: f32 = FIELD_HEIGHT - PADDLE_HEIGHT - 10.0;
/// Paddle travel per arrow-key press
pub const PADDLE_STEP: f32 = 20.0;
/// Horizontal speed given to the ball at the paddle's edges
pub const PADDLE_SPIN: f32 = 6.0;
/// Horizontal speed never drops below this after a paddle hit
pub const MIN_BALL_DX: f32 = 0.5;

pub const BALL_SIZE: f32 = 8.0;
const BALL_START: Vec2 = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - 40.0);
const BALL_START_VEL: Vec2 = Vec2::new(3.0, -3.0);

pub const BRICK_ROWS: usize = 6;
pub const BRICK_COLS: usize = 10;
const BRICK_SLOT_HEIGHT: f32 = 20.0;
const BRICK_TOP: f32 = 50.0;
const BRICK_SPACING: f32 = 2.0;

pub const START_LIVES: u8 = 3;
pub const BRICK_POINTS: u32 = 10;

/// Row colors, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Coral,
    Teal,
    Sky,
    Sage,
    Butter,
    Plum,
}

impl BrickColor {
    pub fn for_row(row: usize) -> Self {
        match row % BRICK_ROWS {
            0 => BrickColor::Coral,
            1 => BrickColor::Teal,
            2 => BrickColor::Sky,
            3 => BrickColor::Sage,
            4 => BrickColor::Butter,
            _ => BrickColor::Plum,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            BrickColor::Coral => "#ff6b6b",
            BrickColor::Teal => "#4ecdc4",
            BrickColor::Sky => "#45b7d1",
            BrickColor::Sage => "#96ceb4",
            BrickColor::Butter => "#ffeaa7",
            BrickColor::Plum => "#dda0dd",
        }
    }
}

/// Ball position is its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    /// Ball at the serve position, heading up and right
    pub fn serve() -> Self {
        Self {
            pos: BALL_START,
            vel: BALL_START_VEL,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, BALL_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: BrickColor,
    pub destroyed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutWorld {
    pub ball: Ball,
    /// Left edge of the paddle
    pub paddle_x: f32,
    /// Row-major, top row first
    pub bricks: Vec<Brick>,
    pub score: u32,
    pub lives: u8,
}

impl Default for BreakoutWorld {
    fn default() -> Self {
        Self {
            ball: Ball::serve(),
            paddle_x: (FIELD_WIDTH - PADDLE_WIDTH) / 2.0,
            bricks: brick_wall(),
            score: 0,
            lives: START_LIVES,
        }
    }
}

impl BreakoutWorld {
    pub fn paddle(&self) -> Rect {
        Rect::new(self.paddle_x, PADDLE_Y, PADDLE_WIDTH, PADDLE_HEIGHT)
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| !b.destroyed).count()
    }

    fn move_paddle_to(&mut self, left: f32) {
        self.paddle_x = left.clamp(0.0, FIELD_WIDTH - PADDLE_WIDTH);
    }
}

/// Build the full brick grid
pub fn brick_wall() -> Vec<Brick> {
    let slot_width = FIELD_WIDTH / BRICK_COLS as f32;
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            bricks.push(Brick {
                rect: Rect::new(
                    col as f32 * slot_width,
                    row as f32 * BRICK_SLOT_HEIGHT + BRICK_TOP,
                    slot_width - BRICK_SPACING,
                    BRICK_SLOT_HEIGHT - BRICK_SPACING,
                ),
                color: BrickColor::for_row(row),
                destroyed: false,
            });
        }
    }
    bricks
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleIntent {
    /// Center the paddle under the pointer
    PointerX(f32),
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakoutEvent {
    WallBounce,
    /// `offset` runs from -1 (left edge) to 1 (right edge)
    PaddleHit { offset: f32 },
    BrickDestroyed { index: usize },
    LifeLost { remaining: u8 },
}

pub struct Breakout;

impl Simulation for Breakout {
    const ID: GameId = GameId::Breakout;
    const TICK_PERIOD: Duration = BREAKOUT_TICK;

    type World = BreakoutWorld;
    type Intent = PaddleIntent;
    type Event = BreakoutEvent;

    fn initial_world() -> BreakoutWorld {
        BreakoutWorld::default()
    }

    fn interpret(raw: &RawInput) -> Option<PaddleIntent> {
        match *raw {
            RawInput::ArrowLeft => Some(PaddleIntent::Left),
            RawInput::ArrowRight => Some(PaddleIntent::Right),
            RawInput::PointerMove { x, .. } => Some(PaddleIntent::PointerX(x)),
            _ => None,
        }
    }

    fn step<R: Rng>(
        world: &mut BreakoutWorld,
        intent: Option<PaddleIntent>,
        _rng: &mut R,
    ) -> Step<BreakoutEvent> {
        let mut step = Step::new();

        match intent {
            Some(PaddleIntent::PointerX(x)) => world.move_paddle_to(x - PADDLE_WIDTH / 2.0),
            Some(PaddleIntent::Left) => world.move_paddle_to(world.paddle_x - PADDLE_STEP),
            Some(PaddleIntent::Right) => world.move_paddle_to(world.paddle_x + PADDLE_STEP),
            None => {}
        }

        let ball = &mut world.ball;
        ball.pos += ball.vel;

        // Side and top walls
        if ball.pos.x <= 0.0 {
            ball.pos.x = 0.0;
            if bounce(&mut ball.vel.x, Bound::Min) {
                step.emit(BreakoutEvent::WallBounce);
            }
        } else if ball.pos.x >= FIELD_WIDTH - BALL_SIZE {
            ball.pos.x = FIELD_WIDTH - BALL_SIZE;
            if bounce(&mut ball.vel.x, Bound::Max) {
                step.emit(BreakoutEvent::WallBounce);
            }
        }
        if ball.pos.y <= 0.0 {
            ball.pos.y = 0.0;
            if bounce(&mut ball.vel.y, Bound::Min) {
                step.emit(BreakoutEvent::WallBounce);
            }
        }

        // Paddle: bottom edge inside the paddle band while descending
        let bottom = ball.pos.y + BALL_SIZE;
        let paddle_x = world.paddle_x;
        if ball.vel.y > 0.0
            && bottom >= PADDLE_Y
            && ball.pos.y <= PADDLE_Y + PADDLE_HEIGHT
            && ball.pos.x >= paddle_x
            && ball.pos.x <= paddle_x + PADDLE_WIDTH
        {
            let hit = (ball.pos.x - paddle_x) / PADDLE_WIDTH;
            let mut dx = (hit - 0.5) * PADDLE_SPIN;
            if dx.abs() < MIN_BALL_DX {
                dx = MIN_BALL_DX.copysign(ball.vel.x);
            }
            ball.vel = Vec2::new(dx, -ball.vel.y);
            ball.pos.y = PADDLE_Y - BALL_SIZE;
            step.emit(BreakoutEvent::PaddleHit {
                offset: hit * 2.0 - 1.0,
            });
        }

        // Missed the paddle
        if ball.pos.y > FIELD_HEIGHT {
            world.lives = world.lives.saturating_sub(1);
            step.emit(BreakoutEvent::LifeLost {
                remaining: world.lives,
            });
            log::debug!("breakout: ball lost, {} lives left", world.lives);
            if world.lives == 0 {
                step.finish(Verdict::Lost);
                return step;
            }
            world.ball = Ball::serve();
        }

        // First live brick hit in row-major order
        let ball_box = world.ball.bounds();
        if let Some(index) = world
            .bricks
            .iter()
            .position(|b| !b.destroyed && b.rect.overlaps(&ball_box))
        {
            world.bricks[index].destroyed = true;
            world.score += BRICK_POINTS;
            world.ball.vel.y = -world.ball.vel.y;
            step.emit(BreakoutEvent::BrickDestroyed { index });
        }

        if world.bricks_left() == 0 {
            step.finish(Verdict::Won);
        }

        step
    }

    fn hud(world: &BreakoutWorld) -> Hud {
        Hud {
            score: world.score,
            lives: Some(world.lives),
            opponent_score: None,
        }
    }
}
