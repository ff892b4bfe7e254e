//! Configuration loading and path resolution.

use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;

const ENV_CONFIG_PATH: &str = "PLC_CHAT_CONFIG";
const LOCAL_FILE: &str = "plc-chat.toml";

/// Resolve the config file path, or `None` when no file exists anywhere and
/// the built-in defaults apply.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(explicit));
    }

    let local = PathBuf::from(LOCAL_FILE);
    if local.is_file() {
        return Some(local);
    }

    ProjectDirs::from("", "", "plc-chat")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load configuration with automatic path resolution and environment
/// overrides applied. Missing files fall back to defaults; an unreadable or
/// malformed file is an error.
pub fn load() -> ConfigResult<Config> {
    let mut config = match resolve_config_path() {
        Some(path) => load_from(&path)?,
        None => {
            debug!("no config file found, using defaults");
            Config::default()
        }
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Load configuration from an explicit path, without environment overrides.
pub fn load_from(path: &Path) -> ConfigResult<Config> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    apply_overrides(config, |key| env::var(key).ok())
}

/// Override application, parameterized over the key lookup so it can be
/// tested without mutating process-global environment state.
fn apply_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<()> {
    if let Some(value) = lookup("PLC_CHAT_SERIAL_DEFAULT_BAUD") {
        config.serial.default_baud = parse_override("PLC_CHAT_SERIAL_DEFAULT_BAUD", &value)?;
    }
    if let Some(value) = lookup("PLC_CHAT_SERIAL_RETRY_ATTEMPTS") {
        config.serial.retry_attempts = parse_override("PLC_CHAT_SERIAL_RETRY_ATTEMPTS", &value)?;
    }
    if let Some(value) = lookup("PLC_CHAT_LOG_LEVEL") {
        config.logging.level = value;
    }
    Ok(())
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.parse().map_err(|_| ConfigError::InvalidOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn load_from_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[serial]\nport = \"/dev/ttyUSB3\"\nretry_attempts = 2"
        )
        .unwrap();

        let config = load_from(file.path()).unwrap();
        assert_eq!(config.serial.port.as_deref(), Some("/dev/ttyUSB3"));
        assert_eq!(config.serial.retry_attempts, 2);
        assert_eq!(config.serial.default_baud, 57_600);
    }

    #[test]
    fn load_from_missing_file_is_read_error() {
        let err = load_from(Path::new("/nonexistent/plc-chat.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[serial\nbroken").unwrap();

        let err = load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = Config::default();
        apply_overrides(&mut config, |key| match key {
            "PLC_CHAT_SERIAL_DEFAULT_BAUD" => Some("9600".to_string()),
            "PLC_CHAT_SERIAL_RETRY_ATTEMPTS" => Some("8".to_string()),
            "PLC_CHAT_LOG_LEVEL" => Some("debug".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.serial.default_baud, 9600);
        assert_eq!(config.serial.retry_attempts, 8);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn absent_overrides_leave_defaults() {
        let mut config = Config::default();
        apply_overrides(&mut config, |_| None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_override_is_rejected() {
        let mut config = Config::default();
        let err = apply_overrides(&mut config, |key| {
            (key == "PLC_CHAT_SERIAL_RETRY_ATTEMPTS").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { .. }));
    }

    #[test]
    fn numeric_override_parsing() {
        let baud: u32 = parse_override("KEY", "57600").unwrap();
        assert_eq!(baud, 57_600);
        let err = parse_override::<u32>("KEY", "fast").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { .. }));
    }
}
