use crate::collectors::NOT_AVAILABLE;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

#[derive(Debug, Error)]
pub enum UptimeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("unexpected uptime contents '{0}'")]
    Parse(String),
}

pub fn read_uptime(path: &Path) -> String {
    match read_uptime_seconds(path) {
        Ok(seconds) => format_uptime(seconds),
        Err(err) => {
            debug!(error = %err, "uptime unavailable");
            NOT_AVAILABLE.to_string()
        }
    }
}

fn read_uptime_seconds(path: &Path) -> Result<u64, UptimeError> {
    let raw = fs::read_to_string(path).map_err(|source| UptimeError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let token = raw.split_whitespace().next().unwrap_or_default();
    let seconds = token
        .parse::<f64>()
        .map_err(|_| UptimeError::Parse(raw.trim().to_string()))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(UptimeError::Parse(raw.trim().to_string()));
    }
    Ok(seconds as u64)
}

/// Days drop the minutes: `{d}d{h}h`, then `{h}h{m}m`, then `{m}m`.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / SECS_PER_DAY;
    let hours = (seconds % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (seconds % SECS_PER_HOUR) / SECS_PER_MINUTE;

    if days > 0 {
        format!("{days}d{hours}h")
    } else if hours > 0 {
        format!("{hours}h{minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn formatting_branches() {
        assert_eq!(format_uptime(0), "0m");
        assert_eq!(format_uptime(90), "1m");
        assert_eq!(format_uptime(3661), "1h1m");
        assert_eq!(format_uptime(7325), "2h2m");
        assert_eq!(format_uptime(90_000), "1d1h");
        assert_eq!(format_uptime(86_400 + 59 * 60), "1d0h");
    }

    #[test]
    fn reads_first_token() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "7325.42 28811.07").expect("write");
        assert_eq!(read_uptime(file.path()), "2h2m");
    }

    #[test]
    fn placeholder_on_missing_or_garbage() {
        assert_eq!(read_uptime(Path::new("/nonexistent/uptime")), NOT_AVAILABLE);

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "soon").expect("write");
        assert_eq!(read_uptime(file.path()), NOT_AVAILABLE);

        let empty = tempfile::NamedTempFile::new().expect("temp file");
        assert_eq!(read_uptime(empty.path()), NOT_AVAILABLE);
    }
}
