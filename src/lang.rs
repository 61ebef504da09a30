//! English/Arabic labels
//!
//! The shell owns the language toggle. The core only picks one of two
//! pre-written strings per label.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "ar" | "arabic" => Some(Language::Ar),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Language::En => Language::Ar,
            Language::Ar => Language::En,
        }
    }

    /// Arabic renders right-to-left
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }
}

impl FromStr for Language {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_tag(s).ok_or_else(|| ArcadeError::UnknownLanguage(s.to_string()))
    }
}

/// Every user-visible label the games display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Score,
    Lives,
    Flags,
    You,
    Computer,
    YouWin,
    ComputerWins,
    GameOver,
    Playing,
    StartGame,
    ResetGame,
    PlayAgain,
    NewGame,
    BackToGames,
    HowToPlay,
}

impl Label {
    pub fn text(&self, lang: Language) -> &'static str {
        match lang {
            Language::En => match self {
                Label::Score => "Score:",
                Label::Lives => "Lives:",
                Label::Flags => "Flags:",
                Label::You => "You",
                Label::Computer => "Computer",
                Label::YouWin => "You Win!",
                Label::ComputerWins => "Computer Wins!",
                Label::GameOver => "Game Over!",
                Label::Playing => "Playing...",
                Label::StartGame => "Start Game",
                Label::ResetGame => "Reset Game",
                Label::PlayAgain => "Play Again",
                Label::NewGame => "New Game",
                Label::BackToGames => "Back to Games",
                Label::HowToPlay => "How to Play:",
            },
            Language::Ar => match self {
                Label::Score => "النقاط:",
                Label::Lives => "الأرواح:",
                Label::Flags => "الأعلام:",
                Label::You => "أنت",
                Label::Computer => "الكمبيوتر",
                Label::YouWin => "أنت تفوز!",
                Label::ComputerWins => "الكمبيوتر يفوز!",
                Label::GameOver => "انتهت اللعبة!",
                Label::Playing => "جاري اللعب...",
                Label::StartGame => "ابدأ اللعبة",
                Label::ResetGame => "إعادة تشغيل",
                Label::PlayAgain => "العب مرة أخرى",
                Label::NewGame => "لعبة جديدة",
                Label::BackToGames => "العودة للألعاب",
                Label::HowToPlay => "كيفية اللعب:",
            },
        }
    }
}
