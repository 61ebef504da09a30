//! Snake
//!
//! Grid-based: the head moves one cell per tick. Eating food grows the body by
//! one segment and moves the food to a random free cell.

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::game::{Hud, Simulation, Step, Verdict};
use super::input::RawInput;
use crate::catalog::GameId;
use crate::consts::SNAKE_TICK;

/// Cells per side
pub const GRID_SIZE: i32 = 20;
pub const FOOD_POINTS: u32 = 10;

const START: Cell = Cell::new(10, 10);
const FIRST_FOOD: Cell = Cell::new(15, 15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_grid(&self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    pub fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step on the grid (y grows downward)
    pub fn vector(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// A turn onto the other axis
    pub fn is_orthogonal_to(&self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeWorld {
    /// Head first
    pub body: VecDeque<Cell>,
    pub food: Cell,
    /// None until the game starts
    pub direction: Option<Direction>,
    pub score: u32,
}

impl Default for SnakeWorld {
    fn default() -> Self {
        Self {
            body: VecDeque::from([START]),
            food: FIRST_FOOD,
            direction: None,
            score: 0,
        }
    }
}

impl SnakeWorld {
    pub fn head(&self) -> Cell {
        assert!(!self.body.is_empty(), "snake has no segments");
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    fn can_turn(&self, to: Direction) -> bool {
        self.direction.is_none_or(|current| to.is_orthogonal_to(current))
    }

    /// Every grid cell the body does not cover
    fn free_cells(&self) -> Vec<Cell> {
        (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.occupies(*cell))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeEvent {
    Turned(Direction),
    Ate { score: u32 },
    FoodPlaced(Cell),
    HitWall,
    HitSelf,
    /// No free cell left for food
    BoardFilled,
}

pub struct Snake;

impl Simulation for Snake {
    const ID: GameId = GameId::Snake;
    const TICK_PERIOD: Duration = SNAKE_TICK;

    type World = SnakeWorld;
    type Intent = Direction;
    type Event = SnakeEvent;

    fn initial_world() -> SnakeWorld {
        SnakeWorld::default()
    }

    fn on_start<R: Rng>(world: &mut SnakeWorld, _rng: &mut R) {
        world.direction = Some(Direction::Right);
    }

    fn interpret(raw: &RawInput) -> Option<Direction> {
        match raw {
            RawInput::ArrowUp => Some(Direction::Up),
            RawInput::ArrowDown => Some(Direction::Down),
            RawInput::ArrowLeft => Some(Direction::Left),
            RawInput::ArrowRight => Some(Direction::Right),
            _ => None,
        }
    }

    /// Turns along the current axis are dropped, not queued
    fn admits(world: &SnakeWorld, intent: &Direction) -> bool {
        world.can_turn(*intent)
    }

    fn step<R: Rng>(
        world: &mut SnakeWorld,
        intent: Option<Direction>,
        rng: &mut R,
    ) -> Step<SnakeEvent> {
        let mut step = Step::new();

        if let Some(turn) = intent.filter(|turn| world.can_turn(*turn)) {
            world.direction = Some(turn);
            step.emit(SnakeEvent::Turned(turn));
        }
        let Some(direction) = world.direction else {
            return step;
        };

        let head = world.head().offset(direction);
        if !head.in_grid() {
            step.emit(SnakeEvent::HitWall);
            step.finish(Verdict::Lost);
            return step;
        }
        if world.occupies(head) {
            step.emit(SnakeEvent::HitSelf);
            step.finish(Verdict::Lost);
            return step;
        }

        world.body.push_front(head);

        if head != world.food {
            world.body.pop_back();
            return step;
        }

        world.score += FOOD_POINTS;
        step.emit(SnakeEvent::Ate { score: world.score });

        match world.free_cells().choose(rng) {
            Some(&cell) => {
                world.food = cell;
                step.emit(SnakeEvent::FoodPlaced(cell));
            }
            None => {
                log::debug!("snake: board filled at length {}", world.len());
                step.emit(SnakeEvent::BoardFilled);
                step.finish(Verdict::Won);
            }
        }

        step
    }

    fn hud(world: &SnakeWorld) -> Hud {
        Hud {
            score: world.score,
            ..Hud::default()
        }
    }
}
