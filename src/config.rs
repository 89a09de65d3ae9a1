//! Application-level configuration loading: game defaults and the random source seed.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TRIVIA_PARTY_BACK_CONFIG_PATH";

const DEFAULT_QUESTION_COUNT: usize = 10;
const DEFAULT_ROOM_CODE_ATTEMPTS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Number of questions drawn when a start request does not specify one.
    pub default_question_count: usize,
    /// How many fresh room codes are tried before room creation gives up.
    pub room_code_attempts: u32,
    /// Fixed seed for the shared random source; OS entropy when absent.
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        default_question_count = config.default_question_count,
                        room_code_attempts = config.room_code_attempts,
                        seeded = config.rng_seed.is_some(),
                        "loaded application config"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document, clamping values that would make the game unplayable.
    fn parse(contents: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(contents)?;
        config.default_question_count = config.default_question_count.max(1);
        config.room_code_attempts = config.room_code_attempts.max(1);
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_question_count: DEFAULT_QUESTION_COUNT,
            room_code_attempts: DEFAULT_ROOM_CODE_ATTEMPTS,
            rng_seed: None,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
