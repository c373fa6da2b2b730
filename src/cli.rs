//! Command-line interface.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::Parser;

use crate::config::{Engine, InputMode, CONFIG_PATH};

#[derive(Clone, Debug, Parser)]
#[command(name = "chatbuddy")]
#[command(about = "A friendly rule-based chatbot you can type or talk to")]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(long, env = "CHATBUDDY_CONFIG", default_value = CONFIG_PATH)]
    pub config: PathBuf,

    /// Which responder to use
    #[arg(long, value_enum, env = "CHATBUDDY_ENGINE")]
    pub engine: Option<Engine>,

    /// Input mode; "ask" prompts for text or voice every turn
    #[arg(long, value_enum, env = "CHATBUDDY_MODE")]
    pub mode: Option<InputMode>,

    /// Print replies without speaking them; `--mute=false` re-enables speech
    #[arg(
        long,
        env = "CHATBUDDY_MUTE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = FalseyValueParser::new()
    )]
    pub mute: Option<bool>,

    /// Speech program invoked with each reply
    #[arg(long, env = "CHATBUDDY_VOICE_COMMAND")]
    pub voice_command: Option<String>,

    /// Pause before each reply, in milliseconds
    #[arg(long, env = "CHATBUDDY_TYPING_DELAY_MS")]
    pub typing_delay_ms: Option<u64>,

    /// Seed for reply selection, to replay a conversation
    #[arg(long, env = "CHATBUDDY_SEED")]
    pub seed: Option<u64>,

    /// Response overrides file (JSON)
    #[arg(long, env = "CHATBUDDY_RESPONSES")]
    pub responses: Option<PathBuf>,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: PathBuf::from(CONFIG_PATH),
            engine: None,
            mode: None,
            mute: None,
            voice_command: None,
            typing_delay_ms: None,
            seed: None,
            responses: None,
        }
    }
}
