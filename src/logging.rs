//! Logging setup.

use tracing::debug;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config;

/// Install the global subscriber. The base level comes from the
/// configuration; `WLAN_PHY_LOG` refines it per target.
pub fn init() {
    let format = fmt::layer()
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .compact();

    let level: LevelFilter = config::config()
        .log_level
        .parse()
        .unwrap_or(LevelFilter::INFO);
    let filter = EnvFilter::from_env("WLAN_PHY_LOG").add_directive(level.into());

    let subscriber = tracing_subscriber::registry().with(filter).with(format);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        debug!("logger already initialized");
    }
}
