use std::env;
use std::time::Duration;

use crate::hub_client::Credentials;
use crate::scheduler;

/// Period of the host heartbeat driving the scheduler.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(5);

/// Host-supplied configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    /// Poll cycle length in heartbeat ticks, from the fixed interval menu.
    pub interval_ticks: u32,
    /// Verbosity only.
    pub debug: bool,
    /// Base URL override; when unset the well-known director address is used.
    pub base_url: Option<String>,
}

impl Config {
    /// Reads MYENERGI_SERIAL, MYENERGI_PASSWORD, MYENERGI_INTERVAL,
    /// MYENERGI_DEBUG and MYENERGI_URL. Off-menu or unparseable interval
    /// selections fall back to the default.
    pub fn from_env() -> anyhow::Result<Self> {
        let serial = env::var("MYENERGI_SERIAL")
            .map_err(|_| anyhow::anyhow!("MYENERGI_SERIAL is required (hub serial)"))?;
        let password = env::var("MYENERGI_PASSWORD").map_err(|_| {
            anyhow::anyhow!("MYENERGI_PASSWORD is required (password as set in the app)")
        })?;
        let interval_ticks = env::var("MYENERGI_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(scheduler::validated_interval)
            .unwrap_or(scheduler::DEFAULT_INTERVAL_TICKS);
        let debug = parse_bool_safe(env::var("MYENERGI_DEBUG").ok());
        let base_url = env::var("MYENERGI_URL").ok();

        Ok(Self {
            credentials: Credentials { serial, password },
            interval_ticks,
            debug,
            base_url,
        })
    }
}

/// Safely parses a boolean from an optional string, defaulting to false
fn parse_bool_safe(val: Option<String>) -> bool {
    val.unwrap_or_default()
        .to_ascii_lowercase()
        .parse()
        .unwrap_or_default()
}
