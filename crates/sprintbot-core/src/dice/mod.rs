//! Dice roller for tabletop-style roll commands.
//!
//! - `parser` -- extracts a [`DiceRollSpec`] from free chat text
//! - `roller` -- draws dice from the OS CSPRNG and formats the result
//!
//! [`DiceRollSpec`]: sprintbot_types::dice::DiceRollSpec

pub mod parser;
pub mod roller;

pub use parser::parse;
pub use roller::{DicePool, RollOutcome, roll, roll_with};

/// Parse `text` and roll it. `None` when the text holds no dice expression.
pub fn roll_command(text: &str) -> Option<String> {
    parse(text).map(|spec| roll(spec).render())
}
