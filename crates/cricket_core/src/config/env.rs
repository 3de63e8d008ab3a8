use super::{ConfigError, ScoringConfig};
use std::path::Path;
use std::{env, fs};

pub const SCORING_CONFIG_ENV: &str = "CRICKET_SCORING_CONFIG";

/// Load the config named by `CRICKET_SCORING_CONFIG`, or defaults when the
/// variable is unset or blank.
pub fn from_env() -> Result<ScoringConfig, ConfigError> {
    let Ok(path) = env::var(SCORING_CONFIG_ENV) else {
        return Ok(ScoringConfig::default());
    };

    let path = path.trim();
    if path.is_empty() {
        return Ok(ScoringConfig::default());
    }

    log::info!("Loading scoring config from {SCORING_CONFIG_ENV}='{path}'");
    from_path(path)
}

pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<ScoringConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
    ScoringConfig::from_json(&content)
}
