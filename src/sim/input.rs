//! Input sampling
//!
//! The shell forwards raw events as they happen; each game instance keeps only
//! the latest intent and hands it to the next tick.

use serde::{Deserialize, Serialize};

/// Raw events forwarded by the presentation shell.
///
/// Pointer coordinates are relative to the game field's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawInput {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    PointerMove { x: f32, y: f32 },
    Click,
}

/// Latest-value intent slot (last write wins, no queue)
#[derive(Debug, Clone)]
pub struct InputSampler<I> {
    latest: Option<I>,
    overwritten: u64,
}

impl<I> Default for InputSampler<I> {
    fn default() -> Self {
        Self {
            latest: None,
            overwritten: 0,
        }
    }
}

impl<I> InputSampler<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new intent, replacing any not yet consumed
    pub fn offer(&mut self, intent: I) {
        if self.latest.replace(intent).is_some() {
            self.overwritten += 1;
        }
    }

    /// Consume the intent for the tick that is starting
    pub fn take(&mut self) -> Option<I> {
        self.latest.take()
    }

    pub fn peek(&self) -> Option<&I> {
        self.latest.as_ref()
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }

    /// How many intents were dropped because a newer one arrived first
    pub fn overwritten(&self) -> u64 {
        self.overwritten
    }
}
