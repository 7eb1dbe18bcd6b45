//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "MEMETALK_DEBUG")]
    /// Enable debug logging. Env: MEMETALK_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "3000", env = "MEMETALK_PORT")]
    /// http listener, defaults to `3000`.
    /// Env: MEMETALK_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "MEMETALK_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: MEMETALK_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(
        long,
        short,
        default_value = "memetalk.sqlite",
        env = "MEMETALK_DATABASE_PATH"
    )]
    /// Path to the history database file, eg `/data/memetalk.sqlite`.
    /// Env: MEMETALK_DATABASE_PATH
    pub database_path: String,

    #[clap(long, default_value = "./public/memes", env = "MEMETALK_IMAGE_DIR")]
    /// Directory holding the meme template images.
    /// Env: MEMETALK_IMAGE_DIR
    pub image_dir: PathBuf,

    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    /// OpenAI API key. When unset every request uses the rule-based generators.
    /// Env: OPENAI_API_KEY
    pub openai_api_key: Option<String>,

    #[clap(long, default_value = DEFAULT_OPENAI_MODEL, env = "MEMETALK_OPENAI_MODEL")]
    /// Text model used for captions and dialogues.
    /// Env: MEMETALK_OPENAI_MODEL
    pub openai_model: String,

    #[clap(long, default_value = DEFAULT_OPENAI_BASE_URL, env = "MEMETALK_OPENAI_BASE_URL")]
    /// Base URL of the OpenAI-compatible API.
    /// Env: MEMETALK_OPENAI_BASE_URL
    pub openai_base_url: url::Url,

    #[clap(long, default_value = "30", env = "MEMETALK_OPENAI_TIMEOUT_SECS")]
    /// Client-side timeout for a single model call, in seconds.
    /// Env: MEMETALK_OPENAI_TIMEOUT_SECS
    pub openai_timeout_secs: u64,
}
