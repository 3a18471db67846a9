#![forbid(unsafe_code)]

use scene_storage::{DEFAULT_CHECKPOINT_TTL, RemoteConfig, StoreConfig};
use std::path::PathBuf;
use std::time::Duration;

pub(crate) const ENV_KV_URL: &[&str] = &["UPSTASH_REDIS_REST_URL", "KV_REST_API_URL"];
pub(crate) const ENV_KV_TOKEN: &[&str] = &["UPSTASH_REDIS_REST_TOKEN", "KV_REST_API_TOKEN"];
pub(crate) const ENV_STORAGE_DIR: &str = "SCENE_MCP_STORAGE_DIR";
pub(crate) const ENV_CHECKPOINT_TTL_SECS: &str = "SCENE_MCP_CHECKPOINT_TTL_SECS";
pub(crate) const ENV_KV_TIMEOUT_SECS: &str = "SCENE_MCP_KV_TIMEOUT_SECS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ConfigError {
    MissingValue { flag: &'static str },
    InvalidNumber { source: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingValue { flag } => write!(f, "{flag} requires a value"),
            Self::InvalidNumber { source, value } => {
                write!(f, "{source} must be a positive integer (got {value:?})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process arguments (without argv[0]) plus an environment lookup, so the
/// parsing below can be exercised without touching the real process state.
pub(crate) struct RuntimeInputs<'a> {
    pub(crate) args: &'a [String],
    pub(crate) env: &'a dyn Fn(&str) -> Option<String>,
}

impl RuntimeInputs<'_> {
    fn flag_value(&self, flag: &'static str) -> Result<Option<String>, ConfigError> {
        let mut args = self.args.iter();
        while let Some(arg) = args.next() {
            if arg.as_str() == flag {
                return match args.next() {
                    Some(value) => Ok(Some(value.clone())),
                    None => Err(ConfigError::MissingValue { flag }),
                };
            }
            if let Some(value) = arg
                .strip_prefix(flag)
                .and_then(|rest| rest.strip_prefix('='))
            {
                return Ok(Some(value.to_string()));
            }
        }
        Ok(None)
    }

    fn env_first(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| (self.env)(key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    fn secs(&self, flag: &'static str, env_key: &str) -> Result<Option<Duration>, ConfigError> {
        let (source, raw) = match self.flag_value(flag)? {
            Some(value) => (flag.to_string(), value),
            None => match self.env_first(&[env_key]) {
                Some(value) => (env_key.to_string(), value),
                None => return Ok(None),
            },
        };
        // Zero is rejected: a checkpoint TTL of 0 expires entries as they are written.
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
            _ => Err(ConfigError::InvalidNumber { source, value: raw }),
        }
    }
}

pub(crate) fn parse_store_config(inputs: &RuntimeInputs<'_>) -> Result<StoreConfig, ConfigError> {
    let url = inputs
        .flag_value("--kv-url")?
        .or_else(|| inputs.env_first(ENV_KV_URL));
    let token = inputs.env_first(ENV_KV_TOKEN);
    let timeout = inputs.secs("--kv-timeout-secs", ENV_KV_TIMEOUT_SECS)?;
    let storage_dir = inputs
        .flag_value("--storage-dir")?
        .or_else(|| inputs.env_first(&[ENV_STORAGE_DIR]))
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from);
    let checkpoint_ttl = inputs
        .secs("--checkpoint-ttl-secs", ENV_CHECKPOINT_TTL_SECS)?
        .unwrap_or(DEFAULT_CHECKPOINT_TTL);

    Ok(StoreConfig {
        remote: RemoteConfig {
            url,
            token,
            timeout,
        },
        storage_dir,
        checkpoint_ttl,
    })
}

pub(crate) fn process_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

pub(crate) fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
