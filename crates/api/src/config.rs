//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const BIND_ADDR_ENV: &str = "STOCKHOLD_BIND_ADDR";
pub const HOLD_TTL_ENV: &str = "STOCKHOLD_HOLD_TTL_SECS";
pub const SWEEP_INTERVAL_ENV: &str = "STOCKHOLD_SWEEP_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Age after which an unexecuted hold is expired.
    pub hold_ttl: Duration,
    /// Period of the expiry sweep.
    pub sweep_interval: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            hold_ttl: Duration::from_secs(15 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults;
    /// set but invalid values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(BIND_ADDR_ENV) {
            cfg.bind_addr = raw
                .trim()
                .parse()
                .with_context(|| format!("{BIND_ADDR_ENV}={raw:?} is not a socket address"))?;
        }
        if let Some(raw) = lookup(HOLD_TTL_ENV) {
            cfg.hold_ttl = parse_secs(HOLD_TTL_ENV, &raw)?;
        }
        if let Some(raw) = lookup(SWEEP_INTERVAL_ENV) {
            cfg.sweep_interval = parse_secs(SWEEP_INTERVAL_ENV, &raw)?;
            if cfg.sweep_interval.is_zero() {
                anyhow::bail!("{SWEEP_INTERVAL_ENV} must be greater than zero");
            }
        }

        Ok(cfg)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key}={raw:?} is not a whole number of seconds"))?;
    Ok(Duration::from_secs(secs))
}
