//! Roll evaluation and result formatting.
//!
//! Dice are drawn from the operating system's CSPRNG so players cannot
//! predict or replay rolls. `roll_with` accepts any RNG that is marked
//! cryptographically secure, which keeps seedable generators out.

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};
use sprintbot_types::chat::escape_html;
use sprintbot_types::dice::{DiceRollSpec, RerollMode};

/// One set of dice thrown together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DicePool {
    pub values: Vec<i64>,
}

impl DicePool {
    fn draw<R: RngCore + CryptoRng>(spec: &DiceRollSpec, rng: &mut R) -> Self {
        let values = (0..spec.count)
            .map(|_| rng.gen_range(spec.floor..=spec.faces))
            .collect();
        Self { values }
    }

    /// Sum of the dice, without bonus.
    pub fn total(&self) -> i64 {
        self.values.iter().fold(0, |sum, &v| sum.saturating_add(v))
    }
}

/// Result of evaluating a [`DiceRollSpec`].
#[derive(Debug, Clone)]
pub struct RollOutcome {
    pub spec: DiceRollSpec,
    pub first: DicePool,
    /// Present for advantage and disadvantage rolls.
    pub second: Option<DicePool>,
}

/// Whether the first of two pools is kept.
///
/// Ties keep the first pool in both modes.
pub fn keeps_first(mode: RerollMode, first: i64, second: i64) -> bool {
    match mode {
        RerollMode::None => true,
        RerollMode::Advantage => first >= second,
        RerollMode::Disadvantage => first <= second,
    }
}

/// Roll using the OS CSPRNG.
pub fn roll(spec: DiceRollSpec) -> RollOutcome {
    roll_with(spec, &mut OsRng)
}

pub fn roll_with<R: RngCore + CryptoRng>(spec: DiceRollSpec, rng: &mut R) -> RollOutcome {
    let first = DicePool::draw(&spec, rng);
    let second = spec
        .reroll
        .is_reroll()
        .then(|| DicePool::draw(&spec, rng));
    RollOutcome {
        spec,
        first,
        second,
    }
}

impl RollOutcome {
    /// The pool that counts.
    pub fn kept(&self) -> &DicePool {
        match &self.second {
            Some(second)
                if !keeps_first(self.spec.reroll, self.first.total(), second.total()) =>
            {
                second
            }
            _ => &self.first,
        }
    }

    /// Kept pool's sum plus bonus.
    pub fn total(&self) -> i64 {
        self.with_bonus(self.kept())
    }

    fn with_bonus(&self, pool: &DicePool) -> i64 {
        pool.total().saturating_add(self.spec.bonus)
    }

    /// HTML result: caption, then the kept total and each pool on its own line
    /// with the discarded pool struck through.
    pub fn render(&self) -> String {
        let mut result = format!("<b>{} </b>", escape_html(&self.spec.caption));
        let first_line = self.pool_line(&self.first);

        match &self.second {
            None => result.push_str(&first_line),
            Some(second) => {
                let second_line = self.pool_line(second);
                if keeps_first(self.spec.reroll, self.first.total(), second.total()) {
                    result.push_str(&format!(
                        "\n<b>{}</b>\n{first_line}\n<s>{second_line}</s>",
                        self.with_bonus(&self.first)
                    ));
                } else {
                    result.push_str(&format!(
                        "\n<b>{}</b>\n<s>{first_line}</s>\n{second_line}",
                        self.with_bonus(second)
                    ));
                }
            }
        }
        result
    }

    fn pool_line(&self, pool: &DicePool) -> String {
        let values = pool
            .values
            .iter()
            .map(|&v| {
                if v == self.spec.faces {
                    format!("<b>{v}</b>")
                } else if v == self.spec.floor {
                    format!("<u>{v}</u>")
                } else {
                    v.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let bonus = match self.spec.bonus {
            0 => String::new(),
            b if b > 0 => format!("+{b}"),
            b => b.to_string(),
        };

        format!(
            "<code>{} </code><b>{}</b>: [{values}]{bonus}",
            self.spec.notation,
            self.with_bonus(pool)
        )
    }
}
