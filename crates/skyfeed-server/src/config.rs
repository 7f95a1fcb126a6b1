//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub sim_tick_ms: u64,
    pub broadcast_tick_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("SKYFEED_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30003),
            sim_tick_ms: env::var("SKYFEED_SIM_TICK_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            broadcast_tick_ms: env::var("SKYFEED_BROADCAST_TICK_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
        }
    }
}
