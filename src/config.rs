//! Server configuration, read from the environment (and `.env`) with fallbacks in `consts`.

use std::{env, fmt::Display, fs::File, path::Path, str::FromStr, time::Duration};

use anyhow::{anyhow, Context, Result};
use log::info;

use crate::consts;
use crate::validation::ValidationOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub fetch_timeout: Duration,
    /// Applied to requests that do not carry their own options
    pub default_options: ValidationOptions,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = env_or(consts::PORT_ENV, consts::HTTP_PORT)?;
        let timeout_secs = env_or(consts::FETCH_TIMEOUT_ENV, consts::FETCH_TIMEOUT_SECS)?;
        let options_path =
            env::var(consts::OPTIONS_PATH_ENV).unwrap_or_else(|_| consts::OPTIONS_PATH.to_string());

        Ok(Self {
            port,
            fetch_timeout: Duration::from_secs(timeout_secs),
            default_options: load_options(Path::new(&options_path))?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: consts::HTTP_PORT,
            fetch_timeout: Duration::from_secs(consts::FETCH_TIMEOUT_SECS),
            default_options: ValidationOptions::default(),
        }
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid value for {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

/// Loads validation options from a YAML file. A missing file yields the built-in defaults.
pub fn load_options(path: &Path) -> Result<ValidationOptions> {
    if !path.exists() {
        info!("No options file at {}, using built-in defaults", path.display());
        return Ok(ValidationOptions::default());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open options file {}", path.display()))?;
    let options = serde_yaml::from_reader(file)
        .with_context(|| format!("Failed to parse options file {}", path.display()))?;
    info!("Loaded default validation options from {}", path.display());
    Ok(options)
}
