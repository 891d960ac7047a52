use crate::error::{GenerationError, Result};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://image.pollinations.ai/prompt";
pub const DEFAULT_TICK_MS: u64 = 500;

#[derive(Debug, Clone, Serialize)]
pub struct PollinationsConfig {
    pub endpoint: String,
    /// `None` keeps the load unbounded.
    pub load_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressConfig {
    pub tick_ms: u64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub pollinations: PollinationsConfig,
    pub progress: ProgressConfig,
    pub output_dir: PathBuf,
    pub log_level: Option<String>,
}

impl Default for PollinationsConfig {
    fn default() -> Self {
        PollinationsConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            load_timeout_secs: Some(120),
        }
    }
}

impl PollinationsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(endpoint) = env::var("PIXGEN_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(raw) = env::var("PIXGEN_LOAD_TIMEOUT_SECS") {
            config.load_timeout_secs = parse_timeout(&raw)?;
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_load_timeout(mut self, secs: Option<u64>) -> Self {
        self.load_timeout_secs = secs;
        self
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_secs.map(Duration::from_secs)
    }
}

/// `0` disables the timeout.
fn parse_timeout(raw: &str) -> Result<Option<u64>> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        GenerationError::Config(format!("PIXGEN_LOAD_TIMEOUT_SECS is not a number: {raw}"))
    })?;
    Ok(if secs == 0 { None } else { Some(secs) })
}

fn parse_seed(raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|_| {
        GenerationError::Config(format!("PIXGEN_PROGRESS_SEED is not a number: {raw}"))
    })
}

impl Default for ProgressConfig {
    fn default() -> Self {
        ProgressConfig {
            tick_ms: DEFAULT_TICK_MS,
            seed: None,
        }
    }
}

impl ProgressConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let tick_ms = match env::var("PIXGEN_TICK_MS") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                GenerationError::Config(format!("PIXGEN_TICK_MS is not a number: {raw}"))
            })?,
            Err(_) => DEFAULT_TICK_MS,
        };
        if tick_ms == 0 {
            return Err(GenerationError::Config(
                "PIXGEN_TICK_MS must be greater than zero".into(),
            ));
        }
        let seed = match env::var("PIXGEN_PROGRESS_SEED") {
            Ok(raw) => Some(parse_seed(&raw)?),
            Err(_) => None,
        };

        Ok(ProgressConfig { tick_ms, seed })
    }

    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pollinations: PollinationsConfig::default(),
            progress: ProgressConfig::default(),
            output_dir: PathBuf::from("."),
            log_level: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let output_dir = env::var("PIXGEN_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let log_level = env::var("PIXGEN_LOG_LEVEL").ok();

        Ok(Config {
            pollinations: PollinationsConfig::from_env()?,
            progress: ProgressConfig::from_env()?,
            output_dir,
            log_level,
        })
    }

    pub fn with_pollinations(mut self, config: PollinationsConfig) -> Self {
        self.pollinations = config;
        self
    }

    pub fn with_progress(mut self, config: ProgressConfig) -> Self {
        self.progress = config;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pollinations.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.progress.tick_interval(), Duration::from_millis(500));
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        assert_eq!(parse_timeout("0").unwrap(), None);
        assert_eq!(parse_timeout(" 30 ").unwrap(), Some(30));
        assert!(parse_timeout("soon").is_err());
    }

    #[test]
    fn test_malformed_seed_is_rejected() {
        assert_eq!(parse_seed(" 42 ").unwrap(), 42);
        let err = parse_seed("forty-two").unwrap_err();
        assert!(matches!(err, GenerationError::Config(ref msg) if msg.contains("PIXGEN_PROGRESS_SEED")));
        assert!(parse_seed("-1").is_err());
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_pollinations(PollinationsConfig::new().with_load_timeout(None))
            .with_progress(ProgressConfig::new().with_tick_ms(0).with_seed(7))
            .with_output_dir("/tmp/out");

        assert!(config.pollinations.load_timeout().is_none());
        assert_eq!(config.progress.tick_ms, 1);
        assert_eq!(config.progress.seed, Some(7));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }
}
