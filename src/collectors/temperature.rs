use crate::collectors::NOT_AVAILABLE;
use crate::config::TemperatureConfig;
use std::fs;
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Degree sign as it comes out of the vendor utility under a latin-1 locale.
const MISENCODED_DEGREE: &str = "Â°";

#[derive(Debug, Error)]
pub enum TemperatureError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("'{0}' is not a millidegree reading")]
    Parse(String),
    #[error("no vendor command configured")]
    NoVendorCommand,
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("vendor command printed nothing usable")]
    EmptyVendorOutput,
}

/// Thermal zone first, vendor utility second, `N/A` last.
pub fn read_cpu_temperature(cfg: &TemperatureConfig) -> String {
    match read_thermal_zone(&cfg.thermal_zone_path) {
        Ok(label) => return label,
        Err(err) => debug!(error = %err, "thermal zone unavailable, trying vendor command"),
    }

    match read_vendor_temperature(&cfg.vendor_command) {
        Ok(label) => label,
        Err(err) => {
            debug!(error = %err, "vendor temperature unavailable");
            NOT_AVAILABLE.to_string()
        }
    }
}

fn read_thermal_zone(path: &Path) -> Result<String, TemperatureError> {
    let raw = fs::read_to_string(path).map_err(|source| TemperatureError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let trimmed = raw.trim();
    let millidegrees = trimmed
        .parse::<f64>()
        .map_err(|_| TemperatureError::Parse(trimmed.to_string()))?;
    if !millidegrees.is_finite() {
        return Err(TemperatureError::Parse(trimmed.to_string()));
    }
    Ok(format_millidegrees(millidegrees))
}

pub fn format_millidegrees(millidegrees: f64) -> String {
    format!("{:.0}C", millidegrees / 1000.0)
}

fn read_vendor_temperature(command: &[String]) -> Result<String, TemperatureError> {
    let (program, args) = command
        .split_first()
        .ok_or(TemperatureError::NoVendorCommand)?;

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| TemperatureError::Spawn {
            program: program.clone(),
            source,
        })?;

    let label = clean_vendor_output(&String::from_utf8_lossy(&output.stdout));
    if label.is_empty() {
        return Err(TemperatureError::EmptyVendorOutput);
    }
    Ok(label)
}

/// `temp=41.0'C` -> `41.0C`
pub fn clean_vendor_output(raw: &str) -> String {
    raw.trim()
        .replace("temp=", "")
        .replace(MISENCODED_DEGREE, "")
        .replace('\'', "")
}
