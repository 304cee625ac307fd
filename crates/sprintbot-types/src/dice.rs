use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Caption used when a roll expression carries no trailing text.
pub const DEFAULT_ROLL_CAPTION: &str = "Результат";

/// Whether a roll is made twice and which total is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerollMode {
    /// Single roll.
    #[default]
    None,
    /// Roll twice, keep the higher total.
    Advantage,
    /// Roll twice, keep the lower total.
    Disadvantage,
}

impl RerollMode {
    pub fn is_reroll(self) -> bool {
        !matches!(self, RerollMode::None)
    }
}

impl fmt::Display for RerollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RerollMode::None => write!(f, "none"),
            RerollMode::Advantage => write!(f, "adv"),
            RerollMode::Disadvantage => write!(f, "dis"),
        }
    }
}

impl FromStr for RerollMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "none" => Ok(RerollMode::None),
            "adv" => Ok(RerollMode::Advantage),
            "dis" => Ok(RerollMode::Disadvantage),
            other => Err(format!("invalid reroll mode: '{other}'")),
        }
    }
}

/// A dice roll parsed from one chat command.
///
/// Values are already clamped to their valid ranges; `notation` keeps the
/// expression as the user typed it so the result can echo it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRollSpec {
    /// Number of dice in one pool, in `1..=500`.
    pub count: u32,
    /// Highest face value.
    pub faces: i64,
    /// Lowest face value, in `-faces..=faces`.
    pub floor: i64,
    pub reroll: RerollMode,
    /// Added to the kept total.
    pub bonus: i64,
    pub caption: String,
    /// The expression as typed, without reroll mode and caption.
    pub notation: String,
}
