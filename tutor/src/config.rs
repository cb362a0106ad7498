//! Client configuration.
//!
//! Configuration is loaded from an optional YAML file with environment variable overrides. The
//! file path defaults to `tutor.yaml` but can be set with `-f` or the `TUTOR_CONFIG` environment
//! variable. A missing file is not an error: every value has a default.
//!
//! ## Loading Priority
//!
//! 1. **Defaults** - backend at `http://localhost:3000`
//! 2. **YAML config file** - `tutor.yaml` unless overridden
//! 3. **Environment variables** - variables prefixed with `TUTOR_`, e.g. `TUTOR_BACKEND_URL`
//!
//! ## Example
//!
//! ```yaml
//! backend_url: http://localhost:3000
//! show_context: true
//! ```

use clap::{Parser, Subcommand};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::errors::Result;

/// Default backend location.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about = "Personal Tutor Assistant: upload study material and ask questions", long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "TUTOR_CONFIG", default_value = "tutor.yaml")]
    pub config: String,

    /// Print the effective configuration and exit.
    #[arg(long)]
    pub validate: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open both forms in an interactive session (the default)
    Interactive,

    /// Upload a single file
    Upload {
        /// File to upload
        path: Option<PathBuf>,
    },

    /// Ask a single question
    Ask {
        /// Question text; words are joined with spaces
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,
    },
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the backend serving `/upload-file` and `/ask`
    pub backend_url: Url,
    /// Print the retrieved context the backend used under each answer
    pub show_context: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            show_context: false,
        }
    }
}

impl Config {
    /// Load configuration from defaults, the YAML file named in `args`, and `TUTOR_` variables.
    pub fn load(args: &Args) -> Result<Self> {
        Ok(Self::figment(args).extract()?)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(&args.config))
            // TUTOR_CONFIG names the file and is not a config key
            .merge(Env::prefixed("TUTOR_").ignore(&["config"]).split("__"))
    }
}
