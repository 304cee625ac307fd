//! CLI command definitions for the `sprintbot` binary.
//!
//! Each subcommand exercises one of the bot's chat commands locally:
//! dice rolls, numeral forms, word counts and a full sprint run against the
//! console transport.

pub mod config;
pub mod dice;
pub mod render;
pub mod sprint;
pub mod text;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use sprintbot_observe::tracing_setup::LogFormat;

/// Writing sprints, dice and word counts for group chats.
#[derive(Parser)]
#[command(name = "sprintbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format: text or json.
    #[arg(long, global = true, default_value = "text", env = "SPRINTBOT_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Roll dice, e.g. `sprintbot roll 2d6b3 Attack`.
    Roll {
        /// Message text containing a dice expression.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Pick the Ukrainian noun form for a count.
    Plural {
        count: u64,
        /// Form used with 1, 21, 31...
        one: String,
        /// Form used with 2-4, 22-24...
        few: String,
        /// Form used with 0, 5-20, 25-30...
        many: String,
    },

    /// Count words, characters and letters.
    Wc {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Run a sprint end to end and print every message it produces.
    Sprint {
        /// Sprint length in minutes.
        #[arg(short, long)]
        duration: Option<u32>,

        /// Minutes before the sprint starts.
        #[arg(long)]
        delay: Option<u32>,

        /// Name of the user who plans the sprint.
        #[arg(long, default_value = "Author")]
        initiator: String,

        /// Additional participants who join right after planning.
        #[arg(long = "join", value_name = "NAME")]
        joiners: Vec<String>,

        /// Cancel the sprint this many minutes after planning.
        #[arg(long, value_name = "MINUTES")]
        cancel_after: Option<u32>,

        /// Use the system clock and real timers instead of fast-forwarding.
        #[arg(long)]
        live: bool,
    },

    /// Show the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
