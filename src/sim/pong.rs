//! Pong
//!
//! Player paddle on the left, computer paddle on the right. A ball leaving
//! the field scores for the side that did not miss; first to
//! [`WINNING_SCORE`] takes the match.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::game::{Hud, Simulation, Step, Verdict};
use super::geom::{Bound, Rect, bounce, span_offset};
use super::input::RawInput;
use crate::catalog::GameId;
use crate::consts::PONG_TICK;
use crate::lang::Label;

pub const FIELD_WIDTH: f32 = 600.0;
pub const FIELD_HEIGHT: f32 = 400.0;

pub const PADDLE_WIDTH: f32 = 10.0;
pub const PADDLE_HEIGHT: f32 = 80.0;
pub const PADDLE_STEP: f32 = 20.0;
/// Vertical speed given to the ball at a paddle's ends
pub const PADDLE_SPIN: f32 = 5.0;
/// Computer paddle travel per tick
pub const AI_SPEED: f32 = 3.0;

pub const BALL_SIZE: f32 = 10.0;
pub const SERVE_SPEED: f32 = 4.0;
/// Serve dy is uniform in [-SERVE_SPREAD/2, SERVE_SPREAD/2)
const SERVE_SPREAD: f32 = 6.0;

pub const WINNING_SCORE: u32 = 10;

const PADDLE_MAX_Y: f32 = FIELD_HEIGHT - PADDLE_HEIGHT;
const PADDLE_START_Y: f32 = PADDLE_MAX_Y / 2.0;
const FIELD_CENTER: Vec2 = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Computer,
}

/// Ball position is its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    /// Centered ball moving horizontally at `dx` with a random vertical drift
    pub fn serve<R: Rng>(dx: f32, rng: &mut R) -> Self {
        let dy = (rng.random::<f32>() - 0.5) * SERVE_SPREAD;
        Self {
            pos: FIELD_CENTER,
            vel: Vec2::new(dx, dy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PongWorld {
    pub ball: Ball,
    /// Top edge of the player's paddle
    pub player_y: f32,
    /// Top edge of the computer's paddle
    pub computer_y: f32,
    pub player_score: u32,
    pub computer_score: u32,
    pub winner: Option<Side>,
}

impl Default for PongWorld {
    fn default() -> Self {
        Self {
            ball: Ball {
                pos: FIELD_CENTER,
                vel: Vec2::new(SERVE_SPEED, SERVE_SPEED),
            },
            player_y: PADDLE_START_Y,
            computer_y: PADDLE_START_Y,
            player_score: 0,
            computer_score: 0,
            winner: None,
        }
    }
}

impl PongWorld {
    pub fn player_paddle(&self) -> Rect {
        Rect::new(0.0, self.player_y, PADDLE_WIDTH, PADDLE_HEIGHT)
    }

    pub fn computer_paddle(&self) -> Rect {
        Rect::new(
            FIELD_WIDTH - PADDLE_WIDTH,
            self.computer_y,
            PADDLE_WIDTH,
            PADDLE_HEIGHT,
        )
    }

    /// Result line once the match is decided
    pub fn result_label(&self) -> Option<Label> {
        self.winner.map(|side| match side {
            Side::Player => Label::YouWin,
            Side::Computer => Label::ComputerWins,
        })
    }

    fn award_point<R: Rng>(&mut self, scorer: Side, rng: &mut R, step: &mut Step<PongEvent>) {
        let (score, serve_dx) = match scorer {
            Side::Player => (&mut self.player_score, -SERVE_SPEED),
            Side::Computer => (&mut self.computer_score, SERVE_SPEED),
        };
        *score += 1;
        let score = *score;
        step.emit(PongEvent::Point { scorer });
        log::debug!(
            "pong: {:?} scores ({} - {})",
            scorer,
            self.player_score,
            self.computer_score
        );

        self.ball = Ball::serve(serve_dx, rng);

        if score >= WINNING_SCORE {
            self.winner = Some(scorer);
            step.emit(PongEvent::MatchOver { winner: scorer });
            step.finish(match scorer {
                Side::Player => Verdict::Won,
                Side::Computer => Verdict::Lost,
            });
        }
    }
}

/// Reflect off a paddle, steering by where the ball struck it
fn paddle_return(ball: &mut Ball, paddle_y: f32) -> f32 {
    ball.vel.x = -ball.vel.x;
    let offset = span_offset(ball.pos.y, paddle_y, PADDLE_HEIGHT);
    ball.vel.y = offset * PADDLE_SPIN;
    offset
}

/// Move the computer paddle toward the ball, holding when close enough
pub fn follow_ball(paddle_y: f32, ball: &Ball) -> f32 {
    let ball_center = ball.pos.y + BALL_SIZE / 2.0;
    let paddle_center = paddle_y + PADDLE_HEIGHT / 2.0;
    let diff = ball_center - paddle_center;
    if diff.abs() < AI_SPEED {
        paddle_y
    } else {
        (paddle_y + AI_SPEED.copysign(diff)).clamp(0.0, PADDLE_MAX_Y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PongIntent {
    /// Center the player paddle on the pointer
    PointerY(f32),
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PongEvent {
    WallBounce,
    /// `offset` runs from -1 (top end) to 1 (bottom end)
    PaddleHit { side: Side, offset: f32 },
    Point { scorer: Side },
    MatchOver { winner: Side },
}

pub struct Pong;

impl Simulation for Pong {
    const ID: GameId = GameId::Pong;
    const TICK_PERIOD: Duration = PONG_TICK;

    type World = PongWorld;
    type Intent = PongIntent;
    type Event = PongEvent;

    fn initial_world() -> PongWorld {
        PongWorld::default()
    }

    fn on_start<R: Rng>(world: &mut PongWorld, rng: &mut R) {
        let dx = if rng.random_bool(0.5) {
            SERVE_SPEED
        } else {
            -SERVE_SPEED
        };
        world.ball = Ball::serve(dx, rng);
    }

    fn interpret(raw: &RawInput) -> Option<PongIntent> {
        match *raw {
            RawInput::ArrowUp => Some(PongIntent::Up),
            RawInput::ArrowDown => Some(PongIntent::Down),
            RawInput::PointerMove { y, .. } => Some(PongIntent::PointerY(y)),
            _ => None,
        }
    }

    fn step<R: Rng>(
        world: &mut PongWorld,
        intent: Option<PongIntent>,
        rng: &mut R,
    ) -> Step<PongEvent> {
        let mut step = Step::new();

        let target = match intent {
            Some(PongIntent::PointerY(y)) => Some(y - PADDLE_HEIGHT / 2.0),
            Some(PongIntent::Up) => Some(world.player_y - PADDLE_STEP),
            Some(PongIntent::Down) => Some(world.player_y + PADDLE_STEP),
            None => None,
        };
        if let Some(y) = target {
            world.player_y = y.clamp(0.0, PADDLE_MAX_Y);
        }

        let ball = &mut world.ball;
        ball.pos += ball.vel;

        // Top and bottom walls
        if ball.pos.y <= 0.0 {
            ball.pos.y = 0.0;
            if bounce(&mut ball.vel.y, Bound::Min) {
                step.emit(PongEvent::WallBounce);
            }
        } else if ball.pos.y >= FIELD_HEIGHT - BALL_SIZE {
            ball.pos.y = FIELD_HEIGHT - BALL_SIZE;
            if bounce(&mut ball.vel.y, Bound::Max) {
                step.emit(PongEvent::WallBounce);
            }
        }

        let on_paddle = |paddle_y: f32, y: f32| y >= paddle_y && y <= paddle_y + PADDLE_HEIGHT;

        if ball.vel.x < 0.0 && ball.pos.x <= PADDLE_WIDTH && on_paddle(world.player_y, ball.pos.y) {
            let offset = paddle_return(ball, world.player_y);
            step.emit(PongEvent::PaddleHit {
                side: Side::Player,
                offset,
            });
        } else if ball.vel.x > 0.0
            && ball.pos.x >= FIELD_WIDTH - PADDLE_WIDTH - BALL_SIZE
            && on_paddle(world.computer_y, ball.pos.y)
        {
            let offset = paddle_return(ball, world.computer_y);
            step.emit(PongEvent::PaddleHit {
                side: Side::Computer,
                offset,
            });
        }

        if ball.pos.x < 0.0 {
            world.award_point(Side::Computer, rng, &mut step);
        } else if ball.pos.x > FIELD_WIDTH {
            world.award_point(Side::Player, rng, &mut step);
        }

        world.computer_y = follow_ball(world.computer_y, &world.ball);

        step
    }

    fn hud(world: &PongWorld) -> Hud {
        Hud {
            score: world.player_score,
            lives: None,
            opponent_score: Some(world.computer_score),
        }
    }
}
