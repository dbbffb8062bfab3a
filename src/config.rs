use crate::channel::arena::MAX_BLOCKS;
use crate::error::ChannelError;
use crate::rate_limit::RateLimits;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "api.riotgames.com";
pub const DEFAULT_BLOCK_COUNT: usize = 8;
pub const DEFAULT_BLOCK_SIZE: usize = 256 * 1024;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Geometry of the response arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    pub blocks: usize,
    pub block_size: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            blocks: DEFAULT_BLOCK_COUNT,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub rate_limits: RateLimits,
    pub enforce_rate_limits: bool,
    pub scheme: String,
    pub host: String,
    pub timeout: Option<Duration>,
    pub arena: ArenaConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            rate_limits: RateLimits::default(),
            enforce_rate_limits: false,
            scheme: "https".to_string(),
            host: DEFAULT_HOST.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            arena: ArenaConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ChannelError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("RIOT_API_KEY").map_err(|_| {
            ChannelError::ConfigError("RIOT_API_KEY not found in .env file".to_string())
        })?;

        let mut config = Config {
            api_key: Some(api_key),
            ..Config::default()
        };

        if let Ok(host) = env::var("RIOT_API_HOST") {
            config.host = host;
        }
        if let Some(per_second) = parse_var::<u16>("RIOT_MAX_PER_SECOND")? {
            config.rate_limits.per_second = per_second;
        }
        if let Some(per_two_minutes) = parse_var::<u16>("RIOT_MAX_PER_TWO_MINUTES")? {
            config.rate_limits.per_two_minutes = per_two_minutes;
        }
        if let Some(enforce) = parse_var::<bool>("RIOT_ENFORCE_RATE_LIMITS")? {
            config.enforce_rate_limits = enforce;
        }
        if let Some(secs) = parse_var::<u64>("RIOT_TIMEOUT_SECS")? {
            // 0 disables the timeout
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn validate(&self) -> Result<(), ChannelError> {
        if self.arena.blocks == 0 || self.arena.blocks > MAX_BLOCKS {
            return Err(ChannelError::ConfigError(format!(
                "arena block count must be between 1 and {}, got {}",
                MAX_BLOCKS, self.arena.blocks
            )));
        }
        if self.arena.block_size == 0 {
            return Err(ChannelError::ConfigError(
                "arena block size must be non-zero".to_string(),
            ));
        }
        self.rate_limits.validate()?;
        if self.host.is_empty() {
            return Err(ChannelError::ConfigError("API host is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, ChannelError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ChannelError::ConfigError(format!("{} has invalid value {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}
