//! Global defaults, overridable through the environment (see `config`).

pub const HTTP_PORT: u16 = 8080; // Default HTTP port
pub const FETCH_TIMEOUT_SECS: u64 = 10; // Per-image download timeout
pub const OPTIONS_PATH: &str = "./data/options.yaml"; // Default validation options

pub const PORT_ENV: &str = "INPUTGATE_PORT";
pub const FETCH_TIMEOUT_ENV: &str = "INPUTGATE_FETCH_TIMEOUT_SECS";
pub const OPTIONS_PATH_ENV: &str = "INPUTGATE_OPTIONS_PATH";
