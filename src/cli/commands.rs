use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::client::DEFAULT_MODEL;

/// Marketing assistant for Telegram: slash commands become prompts for Gemini.
#[derive(Parser, Debug)]
#[command(name = "marketing-bot", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true, global = true)]
    pub telegram_token: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub gemini_key: Option<String>,

    /// Gemini model
    #[arg(short, long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// JSON template catalog, replaces the built-in one
    #[arg(short, long, env = "MARKETING_BOT_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Long-poll timeout for Telegram updates, in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub poll_timeout: u64,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    /// Maximum tokens of a generated answer
    #[arg(long, global = true)]
    pub max_output_tokens: Option<u32>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Serve the bot over Telegram until Ctrl-C
    Run,
    /// List the available commands and their fields
    Templates,
    /// Print the prompt a command would send; reads the arguments from stdin when piped
    Render {
        /// Command name, without the slash (e.g. `post`)
        command: String,
        /// Arguments, fields separated by `|`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Render a command and stream Gemini's answer to stdout
    Generate {
        /// Command name, without the slash (e.g. `post`)
        command: String,
        /// Arguments, fields separated by `|`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}
