//! Flappy Bird
//!
//! The bird sits at a fixed x and only moves vertically. Pipes scroll left at
//! a constant speed; a new one spawns at the right edge whenever the newest
//! pipe has scrolled past [`SPAWN_THRESHOLD`].

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::game::{Hud, Simulation, Step, Verdict};
use super::geom::Rect;
use super::input::RawInput;
use crate::catalog::GameId;
use crate::consts::FLAPPY_TICK;

pub const FIELD_WIDTH: f32 = 600.0;
pub const FIELD_HEIGHT: f32 = 400.0;

pub const BIRD_SIZE: f32 = 20.0;
pub const BIRD_X: f32 = 50.0;
pub const BIRD_START_Y: f32 = 200.0;
/// Lowest top edge the bird may occupy
pub const FLOOR_Y: f32 = FIELD_HEIGHT - BIRD_SIZE;

pub const GRAVITY: f32 = 0.5;
pub const FLAP_VELOCITY: f32 = -8.0;

pub const PIPE_WIDTH: f32 = 50.0;
pub const PIPE_GAP: f32 = 150.0;
pub const PIPE_SPEED: f32 = 3.0;
pub const SPAWN_THRESHOLD: f32 = FIELD_WIDTH - 200.0;
/// Gap top is drawn uniformly from this range
pub const GAP_TOP_MIN: f32 = 50.0;
pub const GAP_TOP_MAX: f32 = FIELD_HEIGHT - PIPE_GAP - 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Bottom edge of the upper pipe
    pub gap_top: f32,
}

impl Pipe {
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        Self {
            x: FIELD_WIDTH,
            gap_top: rng.random_range(GAP_TOP_MIN..GAP_TOP_MAX),
        }
    }

    pub fn upper(&self) -> Rect {
        Rect::new(self.x, 0.0, PIPE_WIDTH, self.gap_top)
    }

    pub fn lower(&self) -> Rect {
        let top = self.gap_top + PIPE_GAP;
        Rect::new(self.x, top, PIPE_WIDTH, FIELD_HEIGHT - top)
    }

    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    pub fn blocks(&self, bird: &Rect) -> bool {
        self.upper().overlaps(bird) || self.lower().overlaps(bird)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlappyWorld {
    /// Top edge of the bird
    pub bird_y: f32,
    pub velocity: f32,
    /// Oldest (leftmost) first
    pub pipes: Vec<Pipe>,
    pub score: u32,
}

impl Default for FlappyWorld {
    fn default() -> Self {
        Self {
            bird_y: BIRD_START_Y,
            velocity: 0.0,
            pipes: Vec::new(),
            score: 0,
        }
    }
}

impl FlappyWorld {
    pub fn bird(&self) -> Rect {
        Rect::new(BIRD_X, self.bird_y, BIRD_SIZE, BIRD_SIZE)
    }

    /// Scroll pipes, retire the ones fully off-screen and spawn one if due
    fn advance_pipes<R: Rng>(&mut self, rng: &mut R, step: &mut Step<FlappyEvent>) {
        for pipe in &mut self.pipes {
            let before = pipe.trailing_edge();
            pipe.x -= PIPE_SPEED;
            if before >= BIRD_X && pipe.trailing_edge() < BIRD_X {
                self.score += 1;
                step.emit(FlappyEvent::PipePassed { score: self.score });
            }
        }
        self.pipes.retain(|pipe| pipe.x > -PIPE_WIDTH);

        let due = self
            .pipes
            .last()
            .is_none_or(|newest| newest.x < SPAWN_THRESHOLD);
        if due {
            let pipe = Pipe::spawn(rng);
            log::trace!("flappy: pipe spawned, gap at {:.1}", pipe.gap_top);
            self.pipes.push(pipe);
        }
    }
}

/// The only action: flap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlappyEvent {
    Flapped,
    PipePassed { score: u32 },
    /// Left the field vertically
    OutOfBounds,
    HitPipe,
}

pub struct Flappy;

impl Simulation for Flappy {
    const ID: GameId = GameId::FlappyBird;
    const TICK_PERIOD: Duration = FLAPPY_TICK;

    type World = FlappyWorld;
    type Intent = Flap;
    type Event = FlappyEvent;

    fn initial_world() -> FlappyWorld {
        FlappyWorld::default()
    }

    fn interpret(raw: &RawInput) -> Option<Flap> {
        match raw {
            RawInput::Space | RawInput::Click | RawInput::ArrowUp => Some(Flap),
            _ => None,
        }
    }

    fn step<R: Rng>(world: &mut FlappyWorld, intent: Option<Flap>, rng: &mut R) -> Step<FlappyEvent> {
        let mut step = Step::new();

        world.velocity = match intent {
            Some(Flap) => {
                step.emit(FlappyEvent::Flapped);
                FLAP_VELOCITY
            }
            None => world.velocity + GRAVITY,
        };

        let y = world.bird_y + world.velocity;
        if !(0.0..=FLOOR_Y).contains(&y) {
            // Bird stays where it was last seen
            step.emit(FlappyEvent::OutOfBounds);
            step.finish(Verdict::Lost);
            return step;
        }
        world.bird_y = y;

        world.advance_pipes(rng, &mut step);

        let bird = world.bird();
        if world.pipes.iter().any(|pipe| pipe.blocks(&bird)) {
            step.emit(FlappyEvent::HitPipe);
            step.finish(Verdict::Lost);
        }

        step
    }

    fn hud(world: &FlappyWorld) -> Hud {
        Hud {
            score: world.score,
            ..Hud::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(5)
    }

    /// A pipe far enough right that nothing spawns or collides
    fn parked_pipe() -> Pipe {
        Pipe {
            x: 350.0,
            gap_top: 100.0,
        }
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut world = FlappyWorld {
            pipes: vec![parked_pipe()],
            ..FlappyWorld::default()
        };
        let mut rng = rng();
        Flappy::step(&mut world, None, &mut rng);
        assert_eq!(world.velocity, 0.5);
        assert_eq!(world.bird_y, 200.5);
        Flappy::step(&mut world, None, &mut rng);
        assert_eq!(world.velocity, 1.0);
        assert_eq!(world.bird_y, 201.5);
    }

    #[test]
    fn test_flap_overrides_velocity() {
        let mut world = FlappyWorld {
            velocity: 7.0,
            pipes: vec![parked_pipe()],
            ..FlappyWorld::default()
        };
        let step = Flappy::step(&mut world, Some(Flap), &mut rng());
        assert_eq!(world.velocity, FLAP_VELOCITY);
        assert_eq!(world.bird_y, 192.0);
        assert_eq!(step.events, vec![FlappyEvent::Flapped]);
    }

    #[test]
    fn test_leaving_field_loses_and_freezes_bird() {
        let mut world = FlappyWorld {
            bird_y: 4.0,
            pipes: vec![parked_pipe()],
            ..FlappyWorld::default()
        };
        let step = Flappy::step(&mut world, Some(Flap), &mut rng());
        assert_eq!(step.verdict, Some(Verdict::Lost));
        assert_eq!(world.bird_y, 4.0);

        let mut world = FlappyWorld {
            bird_y: 379.0,
            velocity: 2.0,
            ..FlappyWorld::default()
        };
        let step = Flappy::step(&mut world, None, &mut rng());
        assert_eq!(step.verdict, Some(Verdict::Lost));
        assert!(step.events.contains(&FlappyEvent::OutOfBounds));
    }

    #[test]
    fn test_first_tick_spawns_pipe_at_right_edge() {
        let mut world = FlappyWorld::default();
        Flappy::step(&mut world, None, &mut rng());
        assert_eq!(world.pipes.len(), 1);
        let pipe = world.pipes[0];
        assert_eq!(pipe.x, FIELD_WIDTH);
        assert!(pipe.gap_top >= GAP_TOP_MIN && pipe.gap_top < GAP_TOP_MAX);
    }

    #[test]
    fn test_spawn_waits_for_threshold() {
        let mut world = FlappyWorld {
            pipes: vec![Pipe {
                x: 403.0,
                gap_top: 100.0,
            }],
            ..FlappyWorld::default()
        };
        let mut rng = rng();
        // 403 -> 400: not yet below the threshold
        Flappy::step(&mut world, None, &mut rng);
        assert_eq!(world.pipes.len(), 1);
        // 400 -> 397: one new pipe
        Flappy::step(&mut world, None, &mut rng);
        assert_eq!(world.pipes.len(), 2);
        assert_eq!(world.pipes[1].x, FIELD_WIDTH);
    }

    #[test]
    fn test_offscreen_pipe_is_dropped() {
        let mut world = FlappyWorld {
            pipes: vec![Pipe {
                x: -48.0,
                gap_top: 100.0,
            }],
            ..FlappyWorld::default()
        };
        Flappy::step(&mut world, None, &mut rng());
        assert_eq!(world.pipes.len(), 1);
        assert_eq!(world.pipes[0].x, FIELD_WIDTH);
    }

    #[test]
    fn test_pipe_scores_once_when_trailing_edge_passes_bird() {
        let mut world = FlappyWorld {
            pipes: vec![Pipe {
                x: 2.0,
                gap_top: 100.0,
            }],
            ..FlappyWorld::default()
        };
        let mut rng = rng();
        let step = Flappy::step(&mut world, None, &mut rng);
        assert_eq!(world.score, 1);
        assert_eq!(step.events, vec![FlappyEvent::PipePassed { score: 1 }]);
        assert_eq!(step.verdict, None);

        Flappy::step(&mut world, None, &mut rng);
        assert_eq!(world.score, 1);
    }

    #[test]
    fn test_hitting_upper_pipe_loses() {
        let mut world = FlappyWorld {
            bird_y: 20.0,
            pipes: vec![Pipe {
                x: 60.0,
                gap_top: 50.0,
            }],
            ..FlappyWorld::default()
        };
        let step = Flappy::step(&mut world, None, &mut rng());
        assert_eq!(step.verdict, Some(Verdict::Lost));
        assert!(step.events.contains(&FlappyEvent::HitPipe));
    }

    #[test]
    fn test_bird_inside_gap_is_safe() {
        let pipe = Pipe {
            x: 40.0,
            gap_top: 150.0,
        };
        let bird = Rect::new(BIRD_X, 200.0, BIRD_SIZE, BIRD_SIZE);
        assert!(!pipe.blocks(&bird));
        let low = Rect::new(BIRD_X, 290.0, BIRD_SIZE, BIRD_SIZE);
        assert!(pipe.blocks(&low));
    }

    #[test]
    fn test_input_mapping() {
        assert_eq!(Flappy::interpret(&RawInput::Space), Some(Flap));
        assert_eq!(Flappy::interpret(&RawInput::Click), Some(Flap));
        assert_eq!(Flappy::interpret(&RawInput::ArrowLeft), None);
    }
}
