//! Runtime settings
//!
//! Read once at startup, either from a JSON blob handed over by the shell or
//! from `ARCADE_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SUBSTEPS;
use crate::error::ArcadeError;
use crate::lang::Language;
use crate::sim::minesweeper::BoardSpec;

/// Minesweeper board presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Expert => "Expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Some(Difficulty::Beginner),
            "intermediate" | "medium" => Some(Difficulty::Intermediate),
            "expert" | "hard" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    /// Board dimensions and mine count for this preset
    pub fn board(&self) -> BoardSpec {
        match self {
            Difficulty::Beginner => BoardSpec::new(9, 9, 10),
            Difficulty::Intermediate => BoardSpec::new(16, 16, 40),
            Difficulty::Expert => BoardSpec::new(16, 30, 99),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display language for labels
    pub language: Language,
    /// Minesweeper board preset
    pub difficulty: Difficulty,
    /// Fixed RNG seed (None = fresh seed per game)
    pub seed: Option<u64>,
    /// Cap on ticks run per frame
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::En,
            difficulty: Difficulty::Beginner,
            seed: None,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    const LANG_VAR: &'static str = "ARCADE_LANG";
    const DIFFICULTY_VAR: &'static str = "ARCADE_DIFFICULTY";
    const SEED_VAR: &'static str = "ARCADE_SEED";
    const SUBSTEPS_VAR: &'static str = "ARCADE_MAX_SUBSTEPS";

    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validated()
    }

    pub fn to_json(&self) -> Result<String, ArcadeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load settings from the process environment, defaulting anything unset
    pub fn from_env() -> Result<Self, ArcadeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (environment, query string, ...)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ArcadeError> {
        let mut settings = Self::default();

        if let Some(value) = lookup(Self::LANG_VAR) {
            settings.language = value.parse()?;
        }
        if let Some(value) = lookup(Self::DIFFICULTY_VAR) {
            settings.difficulty =
                Difficulty::parse(&value).ok_or_else(|| ArcadeError::InvalidSetting {
                    key: Self::DIFFICULTY_VAR,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(Self::SEED_VAR) {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ArcadeError::InvalidSetting {
                    key: Self::SEED_VAR,
                    value: value.clone(),
                })?;
            settings.seed = Some(seed);
        }
        if let Some(value) = lookup(Self::SUBSTEPS_VAR) {
            settings.max_substeps =
                value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ArcadeError::InvalidSetting {
                        key: Self::SUBSTEPS_VAR,
                        value: value.clone(),
                    })?;
        }

        log::info!(
            "Settings: lang={} difficulty={} seed={:?}",
            settings.language.tag(),
            settings.difficulty.as_str(),
            settings.seed
        );
        settings.validated()
    }

    /// Seed for a new game: the fixed one, or a fresh random one
    pub fn game_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    fn validated(self) -> Result<Self, ArcadeError> {
        if self.max_substeps == 0 {
            return Err(ArcadeError::InvalidSetting {
                key: Self::SUBSTEPS_VAR,
                value: self.max_substeps.to_string(),
            });
        }
        Ok(self)
    }
}
