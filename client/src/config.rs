//! Executor configuration.
//!
//! Defaults match interactive use: the xhr transport and no timeout beyond
//! whatever the network imposes. `from_env` reads a `.env` file first so a
//! developer can pin settings per checkout.

use std::env;
use std::time::Duration;

use apiprobe_core::ExecuteError;

use crate::transport::TransportKind;

pub const ENV_TRANSPORT: &str = "APIPROBE_TRANSPORT";
pub const ENV_TIMEOUT_MS: &str = "APIPROBE_TIMEOUT_MS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Transport used by `Executor::execute`.
    pub default_transport: TransportKind,
    /// Whole-request timeout applied by both transports. `None` disables it.
    pub timeout: Option<Duration>,
}

impl ExecutorConfig {
    pub fn from_env() -> Result<Self, ExecuteError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExecuteError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TRANSPORT).filter(|v| !v.trim().is_empty()) {
            config.default_transport = raw.parse()?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS).filter(|v| !v.trim().is_empty()) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                ExecuteError::Config(format!("{ENV_TIMEOUT_MS} must be an integer, got {raw:?}"))
            })?;
            config.timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        Ok(config)
    }
}
