//! Fixed-tick scheduler
//!
//! The host calls [`FixedTicker::advance`] once per frame with the wall-clock
//! time since the previous frame. The ticker converts that into whole ticks of
//! the game's period. Ticks run one at a time through `&mut GameInstance`, so
//! two ticks of the same instance can never overlap.

use std::time::Duration;

use super::game::{GameInstance, Generation, Simulation, TickOutcome};
use crate::consts::{MAX_FRAME_DELTA, MAX_SUBSTEPS};

#[derive(Debug, Clone)]
pub struct FixedTicker {
    period: Duration,
    stamp: Generation,
    accumulator: Duration,
    max_substeps: u32,
    fired: u64,
    cancelled: bool,
}

impl FixedTicker {
    pub fn new(period: Duration, stamp: Generation) -> Self {
        assert!(!period.is_zero(), "tick period must be non-zero");
        Self {
            period,
            stamp,
            accumulator: Duration::ZERO,
            max_substeps: MAX_SUBSTEPS,
            fired: 0,
            cancelled: false,
        }
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        assert!(max_substeps > 0, "max_substeps must be at least 1");
        self.max_substeps = max_substeps;
        self
    }

    /// Feed elapsed wall-clock time and run every tick that became due.
    ///
    /// Returns the number of ticks that ran. Once the instance leaves
    /// `running` (or moves to another generation) the ticker cancels itself
    /// and every later call is a no-op.
    pub fn advance<S: Simulation>(
        &mut self,
        elapsed: Duration,
        instance: &mut GameInstance<S>,
    ) -> u32 {
        if self.cancelled {
            return 0;
        }
        if !instance.accepts(self.stamp) {
            self.cancel();
            return 0;
        }

        self.accumulator += elapsed.min(MAX_FRAME_DELTA);

        let mut substeps = 0;
        while self.accumulator >= self.period && substeps < self.max_substeps {
            self.accumulator -= self.period;
            match instance.tick(self.stamp) {
                TickOutcome::Advanced => {
                    substeps += 1;
                    self.fired += 1;
                }
                TickOutcome::Finished(_) => {
                    substeps += 1;
                    self.fired += 1;
                    self.cancel();
                    break;
                }
                TickOutcome::Stale => {
                    self.cancel();
                    break;
                }
            }
        }

        // Capped: whole periods left over are dropped, only the fraction carries
        if substeps == self.max_substeps && self.accumulator >= self.period {
            let period = self.period.as_nanos();
            let dropped = self.accumulator.as_nanos() / period;
            self.accumulator =
                Duration::from_nanos((self.accumulator.as_nanos() % period) as u64);
            log::trace!("ticker {} dropped {} overdue ticks", self.stamp, dropped);
        }
        substeps
    }

    /// Stop for good. Safe to call more than once.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            log::debug!("ticker {} cancelled after {} ticks", self.stamp, self.fired);
        }
        self.cancelled = true;
        self.accumulator = Duration::ZERO;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn stamp(&self) -> Generation {
        self.stamp
    }

    /// Ticks this ticker has run so far
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::snake::{Snake, SnakeWorld};
    use crate::sim::{Cell, Direction, Status};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_runs_one_tick_per_period() {
        let mut game = GameInstance::<Snake>::new(3);
        let mut ticker = game.start().unwrap();
        assert_eq!(ticker.period(), ms(150));

        assert_eq!(ticker.advance(ms(100), &mut game), 0);
        assert_eq!(ticker.advance(ms(60), &mut game), 1);
        assert_eq!(game.ticks(), 1);
        // 10ms left over + 140ms
        assert_eq!(ticker.advance(ms(70), &mut game), 0);
        assert_eq!(ticker.advance(ms(70), &mut game), 1);
        assert_eq!(ticker.fired(), 2);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut game = GameInstance::<crate::sim::pong::Pong>::new(3);
        let mut ticker = game.start().unwrap().with_max_substeps(2);
        // 100ms at 16ms would be 6 ticks, capped to 2
        assert_eq!(ticker.advance(ms(100), &mut game), 2);
    }

    #[test]
    fn test_capped_backlog_does_not_tick_later() {
        let mut game = GameInstance::<crate::sim::pong::Pong>::new(3);
        let mut ticker = game.start().unwrap().with_max_substeps(1);
        for _ in 0..10 {
            assert_eq!(ticker.advance(ms(100), &mut game), 1);
        }
        // Each frame owes 6 ticks; only the sub-period remainder survives the cap
        for _ in 0..40 {
            assert_eq!(ticker.advance(Duration::ZERO, &mut game), 0);
        }
        assert_eq!(ticker.advance(ms(12), &mut game), 1);
        assert_eq!(game.ticks(), 11);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut game = GameInstance::<crate::sim::pong::Pong>::new(3);
        let mut ticker = game.start().unwrap().with_max_substeps(100);
        // A 5 second hitch only counts as 100ms
        assert_eq!(ticker.advance(Duration::from_secs(5), &mut game), 6);
    }

    #[test]
    fn test_reset_cancels_pending_ticks() {
        let mut game = GameInstance::<Snake>::new(3);
        let mut ticker = game.start().unwrap();
        ticker.advance(ms(149), &mut game);
        game.reset();

        assert_eq!(ticker.advance(ms(10), &mut game), 0);
        assert!(ticker.is_cancelled());
        assert_eq!(game.ticks(), 0);

        // Restarting yields a new ticker; the old one never resumes
        let mut fresh = game.start().unwrap();
        assert_eq!(ticker.advance(ms(500), &mut game), 0);
        assert_eq!(fresh.advance(ms(150), &mut game), 1);
    }

    #[test]
    fn test_terminal_tick_stops_ticker() {
        // Head next to the right wall, heading right
        let world = SnakeWorld {
            body: vec![Cell::new(19, 5)].into(),
            ..SnakeWorld::default()
        };
        let mut game = GameInstance::<Snake>::with_world(3, world);
        let mut ticker = game.start().unwrap();
        assert_eq!(game.world().direction, Some(Direction::Right));

        assert_eq!(ticker.advance(ms(100), &mut game), 0);
        assert_eq!(ticker.advance(ms(100), &mut game), 1);
        assert_eq!(game.status(), Status::Lost);
        assert!(ticker.is_cancelled());
        assert_eq!(ticker.advance(ms(100), &mut game), 0);
        ticker.cancel();
        assert!(ticker.is_cancelled());
    }
}
