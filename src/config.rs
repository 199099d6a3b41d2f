//! Configuration management.
//!
//! Settings come from, in increasing precedence: built-in defaults, the
//! user configuration file (`~/.config/wlan-phy/config.toml`), a
//! `config.toml` in the working directory, and `WLAN_PHY_*` environment
//! variables.

use once_cell::sync::Lazy;

pub fn config() -> &'static Config {
    &CONFIG
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Samples handed to the receive pipeline per batch.
    pub rx_batch_size: usize,
    /// Baseband sample rate in Hz; sets the real-time budget per batch.
    pub sample_rate: f64,
    /// Default log level, overridable per target via `WLAN_PHY_LOG`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rx_batch_size: 4096,
            sample_rate: 5e6,
            log_level: "info".to_string(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    let mut settings = ::config::Config::builder();

    if let Some(mut path) = dirs::config_dir() {
        path.push("wlan-phy");
        path.push("config.toml");
        settings = settings.add_source(::config::File::from(path).required(false));
    }

    settings = settings.add_source(
        ::config::File::new("config.toml", ::config::FileFormat::Toml).required(false),
    );
    settings = settings.add_source(::config::Environment::with_prefix("wlan_phy"));

    let mut c = Config::default();
    if let Ok(built) = settings.build() {
        if let Ok(v) = built.get_int("rx_batch_size") {
            c.rx_batch_size = v as usize;
        }
        if let Ok(v) = built.get_float("sample_rate") {
            c.sample_rate = v;
        }
        if let Ok(v) = built.get_string("log_level") {
            c.log_level = v;
        }
    }
    c
});
