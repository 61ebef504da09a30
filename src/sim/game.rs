//! Game instance lifecycle
//!
//! A [`Simulation`] is a set of pure rules: an initial world plus a step
//! function. A [`GameInstance`] wraps one world with its status, input
//! sampler, RNG and generation stamp, and is the only thing that mutates it.

use std::fmt;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::{InputSampler, RawInput};
use super::schedule::FixedTicker;
use crate::catalog::GameId;
use crate::error::ArcadeError;
use crate::lang::Label;

/// Lifecycle status of a game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Created or reset, waiting for the start action
    Idle,
    /// Ticking
    Running,
    Won,
    Lost,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Won | Status::Lost)
    }

    /// Status line shown under the field, if any
    pub fn label(&self) -> Option<Label> {
        match self {
            Status::Idle => None,
            Status::Running => Some(Label::Playing),
            Status::Won => Some(Label::YouWin),
            Status::Lost => Some(Label::GameOver),
        }
    }
}

/// Terminal result reported by a rule engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Won,
    Lost,
}

impl From<Verdict> for Status {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Won => Status::Won,
            Verdict::Lost => Status::Lost,
        }
    }
}

/// Output of one rule-engine step
#[derive(Debug, Clone, PartialEq)]
pub struct Step<E> {
    pub events: Vec<E>,
    pub verdict: Option<Verdict>,
}

impl<E> Default for Step<E> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            verdict: None,
        }
    }
}

impl<E> Step<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: E) {
        self.events.push(event);
    }

    /// First verdict wins; later ones in the same tick are ignored
    pub fn finish(&mut self, verdict: Verdict) {
        self.verdict.get_or_insert(verdict);
    }
}

/// Counters displayed by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    /// Remaining lives, for games that have them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lives: Option<u8>,
    /// Opponent's score in two-sided games
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_score: Option<u32>,
}

/// Monotonic stamp identifying one `running` stretch of an instance.
///
/// Every transition out of `running` moves to a new generation, so a ticker
/// holding an older stamp can no longer touch the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// Result of asking an instance to run one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stamp is out of date or the instance is not running; nothing changed
    Stale,
    /// World advanced, still running
    Advanced,
    /// World advanced and reached a terminal state
    Finished(Verdict),
}

/// Rules of one tick-driven game
pub trait Simulation {
    const ID: GameId;
    const TICK_PERIOD: Duration;

    type World: Clone + fmt::Debug + Serialize;
    type Intent: Clone + fmt::Debug;
    type Event: Clone + fmt::Debug + PartialEq;

    /// World as it is on mount and after reset
    fn initial_world() -> Self::World;

    /// Adjust the world on `idle -> running` (serve, initial heading, ...)
    fn on_start<R: Rng>(_world: &mut Self::World, _rng: &mut R) {}

    /// Translate a shell event into this game's intent
    fn interpret(raw: &RawInput) -> Option<Self::Intent>;

    /// Whether an intent may replace the pending one given the current world
    fn admits(_world: &Self::World, _intent: &Self::Intent) -> bool {
        true
    }

    /// Advance the world by exactly one tick
    fn step<R: Rng>(
        world: &mut Self::World,
        intent: Option<Self::Intent>,
        rng: &mut R,
    ) -> Step<Self::Event>;

    fn hud(world: &Self::World) -> Hud;
}

/// Serializable read of an instance for the render layer
#[derive(Debug, Serialize)]
pub struct Snapshot<'a, W> {
    pub game: GameId,
    pub status: Status,
    pub hud: Hud,
    pub ticks: u64,
    pub world: &'a W,
}

/// One running session of one simulation
pub struct GameInstance<S: Simulation> {
    status: Status,
    world: S::World,
    input: InputSampler<S::Intent>,
    rng: Pcg32,
    generation: Generation,
    events: Vec<S::Event>,
    ticks: u64,
}

impl<S: Simulation> fmt::Debug for GameInstance<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameInstance")
            .field("game", &S::ID)
            .field("status", &self.status)
            .field("generation", &self.generation)
            .field("ticks", &self.ticks)
            .field("world", &self.world)
            .finish()
    }
}

impl<S: Simulation> GameInstance<S> {
    /// Create an idle instance with the initial world
    pub fn new(seed: u64) -> Self {
        Self::with_world(seed, S::initial_world())
    }

    /// Create an idle instance around a prepared world
    pub fn with_world(seed: u64, world: S::World) -> Self {
        Self {
            status: Status::Idle,
            world,
            input: InputSampler::new(),
            rng: Pcg32::seed_from_u64(seed),
            generation: Generation::default(),
            events: Vec::new(),
            ticks: 0,
        }
    }

    /// `idle -> running`. Returns a fresh ticker bound to the new generation,
    /// or None if the instance is not idle.
    pub fn start(&mut self) -> Option<FixedTicker> {
        if self.status != Status::Idle {
            log::debug!("{} start ignored while {:?}", S::ID, self.status);
            return None;
        }
        self.generation = self.generation.next();
        self.status = Status::Running;
        self.input.clear();
        S::on_start(&mut self.world, &mut self.rng);
        log::info!("{} started ({})", S::ID, self.generation);
        Some(FixedTicker::new(S::TICK_PERIOD, self.generation))
    }

    /// Back to `idle` with a fresh world. Any outstanding ticker goes stale.
    pub fn reset(&mut self) {
        self.generation = self.generation.next();
        self.status = Status::Idle;
        self.world = S::initial_world();
        self.input.clear();
        self.events.clear();
        self.ticks = 0;
        log::info!("{} reset ({})", S::ID, self.generation);
    }

    /// Queue an intent for the next tick. Returns false if it was dropped.
    pub fn offer(&mut self, intent: S::Intent) -> bool {
        if self.status != Status::Running {
            return false;
        }
        if !S::admits(&self.world, &intent) {
            log::trace!("{} rejected intent {:?}", S::ID, intent);
            return false;
        }
        self.input.offer(intent);
        true
    }

    /// Forward a raw shell event
    pub fn handle(&mut self, raw: &RawInput) -> bool {
        match S::interpret(raw) {
            Some(intent) => self.offer(intent),
            None => false,
        }
    }

    /// Whether a ticker holding `stamp` may still drive this instance
    pub fn accepts(&self, stamp: Generation) -> bool {
        stamp == self.generation && self.status == Status::Running
    }

    /// Run one tick on behalf of the ticker stamped `stamp`
    pub fn tick(&mut self, stamp: Generation) -> TickOutcome {
        if !self.accepts(stamp) {
            log::trace!(
                "{} dropped tick from {} (current {}, {:?})",
                S::ID,
                stamp,
                self.generation,
                self.status
            );
            return TickOutcome::Stale;
        }

        let intent = self.input.take();
        let step = S::step(&mut self.world, intent, &mut self.rng);
        self.ticks += 1;
        self.events.extend(step.events);

        match step.verdict {
            Some(verdict) => {
                self.status = verdict.into();
                self.generation = self.generation.next();
                log::info!(
                    "{} finished: {:?} after {} ticks, score {}",
                    S::ID,
                    verdict,
                    self.ticks,
                    S::hud(&self.world).score
                );
                TickOutcome::Finished(verdict)
            }
            None => TickOutcome::Advanced,
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<S::Event> {
        std::mem::take(&mut self.events)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn world(&self) -> &S::World {
        &self.world
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn hud(&self) -> Hud {
        S::hud(&self.world)
    }

    pub fn snapshot(&self) -> Snapshot<'_, S::World> {
        Snapshot {
            game: S::ID,
            status: self.status,
            hud: self.hud(),
            ticks: self.ticks,
            world: &self.world,
        }
    }

    pub fn to_json(&self) -> Result<String, ArcadeError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts up; wins at 3, loses on a `Fail` intent
    struct Counter;

    #[derive(Debug, Clone)]
    enum CounterIntent {
        Bump,
        Fail,
        Forbidden,
    }

    impl Simulation for Counter {
        const ID: GameId = GameId::Snake;
        const TICK_PERIOD: Duration = Duration::from_millis(10);

        type World = u32;
        type Intent = CounterIntent;
        type Event = u32;

        fn initial_world() -> u32 {
            0
        }

        fn interpret(raw: &RawInput) -> Option<CounterIntent> {
            match raw {
                RawInput::Space => Some(CounterIntent::Bump),
                _ => None,
            }
        }

        fn admits(_world: &u32, intent: &CounterIntent) -> bool {
            !matches!(intent, CounterIntent::Forbidden)
        }

        fn step<R: Rng>(world: &mut u32, intent: Option<CounterIntent>, _rng: &mut R) -> Step<u32> {
            let mut step = Step::new();
            match intent {
                Some(CounterIntent::Fail) => step.finish(Verdict::Lost),
                Some(CounterIntent::Bump) => {
                    *world += 1;
                    step.emit(*world);
                }
                _ => {}
            }
            if *world >= 3 {
                step.finish(Verdict::Won);
            }
            step
        }

        fn hud(world: &u32) -> Hud {
            Hud {
                score: *world,
                ..Hud::default()
            }
        }
    }

    #[test]
    fn test_lifecycle_idle_running_won() {
        let mut game = GameInstance::<Counter>::new(1);
        assert_eq!(game.status(), Status::Idle);
        assert!(!game.status().is_terminal());
        // Intents are ignored until running
        assert!(!game.handle(&RawInput::Space));

        let ticker = game.start().expect("idle instance starts");
        assert!(game.start().is_none(), "second start is ignored");
        let stamp = ticker.stamp();

        for expected in 1..=3 {
            assert!(game.handle(&RawInput::Space));
            let outcome = game.tick(stamp);
            assert_eq!(*game.world(), expected);
            if expected < 3 {
                assert_eq!(outcome, TickOutcome::Advanced);
            } else {
                assert_eq!(outcome, TickOutcome::Finished(Verdict::Won));
            }
        }
        assert_eq!(game.status(), Status::Won);
        assert!(game.status().is_terminal());
        assert_eq!(game.drain_events(), vec![1, 2, 3]);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_stale_tick_does_not_mutate() {
        let mut game = GameInstance::<Counter>::new(1);
        assert_eq!(game.generation().value(), 0);
        let stamp = game.start().unwrap().stamp();
        assert_eq!(stamp.value(), 1);
        game.offer(CounterIntent::Bump);
        game.reset();
        assert_eq!(game.generation().value(), 2);

        assert_eq!(game.tick(stamp), TickOutcome::Stale);
        assert_eq!(*game.world(), 0);
        assert_eq!(game.ticks(), 0);

        // Restart gets a new generation; the old stamp stays dead
        let fresh = game.start().unwrap().stamp();
        assert_eq!(fresh.value(), 3);
        assert!(fresh > stamp);
        assert_eq!(game.tick(stamp), TickOutcome::Stale);
        assert_eq!(game.tick(fresh), TickOutcome::Advanced);
    }

    #[test]
    fn test_terminal_state_freezes_ticks() {
        let mut game = GameInstance::<Counter>::new(1);
        let stamp = game.start().unwrap().stamp();
        game.offer(CounterIntent::Fail);
        assert_eq!(game.tick(stamp), TickOutcome::Finished(Verdict::Lost));
        assert_eq!(game.status(), Status::Lost);
        assert!(game.status().is_terminal());
        assert!(!Status::Running.is_terminal());
        assert_eq!(game.tick(stamp), TickOutcome::Stale);
        assert!(!game.offer(CounterIntent::Bump));
    }

    #[test]
    fn test_admits_filters_intents() {
        let mut game = GameInstance::<Counter>::new(1);
        let stamp = game.start().unwrap().stamp();
        assert!(game.offer(CounterIntent::Bump));
        assert!(!game.offer(CounterIntent::Forbidden));
        game.tick(stamp);
        assert_eq!(*game.world(), 1, "pending bump survived the rejected intent");
    }

    #[test]
    fn test_snapshot_json() {
        let game = GameInstance::<Counter>::new(1);
        let json = game.to_json().unwrap();
        assert!(json.contains("\"status\":\"idle\""));
        assert!(json.contains("\"game\":\"snake\""));
        assert!(!json.contains("lives"));
    }
}
