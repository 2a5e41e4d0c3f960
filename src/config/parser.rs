use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads, parses and validates a configuration file
///
/// Missing sections and keys fall back to their defaults, so an empty file
/// is a valid configuration.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use doc_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Scope prefix: {}", config.scope.prefix);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a hex-encoded SHA-256 hash of a configuration file
///
/// Logged at the start of each crawl so runs can be tied to the settings
/// that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

/// Loads the configuration at `path`, or the validated defaults when no path is given
pub fn load_or_default(path: Option<&Path>) -> Result<(Config, Option<String>), ConfigError> {
    match path {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            Ok((config, Some(hash)))
        }
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok((config, None))
        }
    }
}
