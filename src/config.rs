use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_error_cooldown_secs")]
    pub error_cooldown_secs: u64,
    #[serde(default = "default_cpu_sample_window_ms")]
    pub cpu_sample_window_ms: u64,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub temperature: TemperatureConfig,
    #[serde(default)]
    pub uptime: UptimeConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: String,
    #[serde(default = "default_i2c_address")]
    pub address: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TemperatureConfig {
    #[serde(default = "default_thermal_zone_path")]
    pub thermal_zone_path: PathBuf,
    #[serde(default = "default_vendor_command")]
    pub vendor_command: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UptimeConfig {
    #[serde(default = "default_uptime_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NetworkConfig {
    #[serde(default = "default_probe_address")]
    pub probe_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            error_cooldown_secs: default_error_cooldown_secs(),
            cpu_sample_window_ms: default_cpu_sample_window_ms(),
            display: DisplayConfig::default(),
            temperature: TemperatureConfig::default(),
            uptime: UptimeConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            i2c_bus: default_i2c_bus(),
            address: default_i2c_address(),
        }
    }
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            thermal_zone_path: default_thermal_zone_path(),
            vendor_command: default_vendor_command(),
        }
    }
}

impl Default for UptimeConfig {
    fn default() -> Self {
        Self {
            path: default_uptime_path(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_address: default_probe_address(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_display.clone(),
            source,
        })?;

        let cfg: Config = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path_display,
            source,
        })?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs < 1 {
            return Err(ConfigError::Validation(
                "interval_secs must be >= 1".to_string(),
            ));
        }
        if self.error_cooldown_secs < 1 {
            return Err(ConfigError::Validation(
                "error_cooldown_secs must be >= 1".to_string(),
            ));
        }
        if !(100..=10_000).contains(&self.cpu_sample_window_ms) {
            return Err(ConfigError::Validation(
                "cpu_sample_window_ms must be in 100..=10000".to_string(),
            ));
        }

        validate_display(&self.display)?;
        validate_network(&self.network)?;

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn error_cooldown(&self) -> Duration {
        Duration::from_secs(self.error_cooldown_secs)
    }

    pub fn cpu_sample_window(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_window_ms)
    }

    pub fn example_yaml() -> &'static str {
        include_str!("../config.yaml.example")
    }
}

fn validate_display(cfg: &DisplayConfig) -> Result<(), ConfigError> {
    if cfg.i2c_bus.trim().is_empty() {
        return Err(ConfigError::Validation(
            "display.i2c_bus must not be empty".to_string(),
        ));
    }
    if cfg.address > 0x7F {
        return Err(ConfigError::Validation(format!(
            "display.address {:#04x} is not a 7-bit I2C address",
            cfg.address
        )));
    }
    Ok(())
}

fn validate_network(cfg: &NetworkConfig) -> Result<(), ConfigError> {
    if SocketAddr::from_str(&cfg.probe_address).is_err() {
        return Err(ConfigError::Validation(format!(
            "network.probe_address '{}' must be an ip:port pair",
            cfg.probe_address
        )));
    }
    Ok(())
}

const fn default_interval_secs() -> u64 {
    1
}

const fn default_error_cooldown_secs() -> u64 {
    5
}

const fn default_cpu_sample_window_ms() -> u64 {
    1000
}

fn default_i2c_bus() -> String {
    "/dev/i2c-5".to_string()
}

const fn default_i2c_address() -> u8 {
    0x3C
}

fn default_thermal_zone_path() -> PathBuf {
    PathBuf::from("/sys/class/thermal/thermal_zone0/temp")
}

fn default_vendor_command() -> Vec<String> {
    vec!["vcgencmd".to_string(), "measure_temp".to_string()]
}

fn default_uptime_path() -> PathBuf {
    PathBuf::from("/proc/uptime")
}

fn default_probe_address() -> String {
    "8.8.8.8:80".to_string()
}
