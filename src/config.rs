use config::{ConfigError, Environment};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BLOCKED_PATHS_FILE: &str = "/scanner_paths.json";

/// Verbosity threshold. Ordered so that `Debug < Info < Warn < Error < None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    None,
}

impl LogLevel {
    /// Case-insensitive; anything unrecognised (including empty) falls back to `Info`.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            "none" | "off" => LogLevel::None,
            _ => LogLevel::Info,
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::None => log::LevelFilter::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectStatus {
    #[default]
    MovedPermanently,
    Found,
}

impl RedirectStatus {
    /// Only `301` and `302` are accepted; anything else means "not provided".
    pub fn parse(value: &str) -> Self {
        match value.parse::<u16>() {
            Ok(302) => RedirectStatus::Found,
            _ => RedirectStatus::MovedPermanently,
        }
    }

    pub fn code(self) -> u16 {
        match self {
            RedirectStatus::MovedPermanently => 301,
            RedirectStatus::Found => 302,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            RedirectStatus::MovedPermanently => "Moved Permanently",
            RedirectStatus::Found => "Found",
        }
    }
}

impl fmt::Display for RedirectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Flags are enabled only by the exact literal `true`.
pub fn parse_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

// Raw environment values, as the `config` crate hands them over.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    redirect_target: Option<String>,
    port: Option<String>,
    redirect_code: Option<String>,
    preserve_path: Option<String>,
    block_scanners: Option<String>,
    blocked_paths_file: Option<String>,
    log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub target: String,
    pub port: u16,
    pub status: RedirectStatus,
    pub preserve_path: bool,
    pub block_scanners: bool,
    pub blocked_paths_file: PathBuf,
    pub log_level: LogLevel,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    fn load(source: Environment) -> Result<Self, ConfigError> {
        let raw = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize::<RawSettings>()?;

        Self::resolve(raw)
    }

    fn resolve(raw: RawSettings) -> Result<Self, ConfigError> {
        let target = raw
            .redirect_target
            .filter(|target| !target.is_empty())
            .ok_or_else(|| ConfigError::NotFound("REDIRECT_TARGET".to_string()))?;

        let port = match raw.port.as_deref() {
            None | Some("") => DEFAULT_PORT,
            Some(port) => port
                .parse()
                .map_err(|_| ConfigError::Message(format!("invalid PORT: {}", port)))?,
        };

        let blocked_paths_file = raw
            .blocked_paths_file
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_BLOCKED_PATHS_FILE.to_string());

        Ok(Config {
            target,
            port,
            status: raw
                .redirect_code
                .as_deref()
                .map(RedirectStatus::parse)
                .unwrap_or_default(),
            preserve_path: parse_flag(raw.preserve_path.as_deref()),
            block_scanners: parse_flag(raw.block_scanners.as_deref()),
            blocked_paths_file: PathBuf::from(blocked_paths_file),
            log_level: LogLevel::parse(raw.log_level.as_deref().unwrap_or_default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        Config::load(Environment::default().source(Some(map)))
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("REDIRECT_TARGET", "https://example.com")]).unwrap();
        assert_eq!(config.target, "https://example.com");
        assert_eq!(config.port, 8080);
        assert_eq!(config.status, RedirectStatus::MovedPermanently);
        assert!(!config.preserve_path);
        assert!(!config.block_scanners);
        assert_eq!(config.blocked_paths_file, PathBuf::from("/scanner_paths.json"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_missing_target_is_fatal() {
        assert!(matches!(load(&[]), Err(ConfigError::NotFound(_))));
        assert!(load(&[("REDIRECT_TARGET", "")]).is_err());
    }

    #[test]
    fn test_all_fields() {
        let config = load(&[
            ("REDIRECT_TARGET", "https://example.org"),
            ("PORT", "9000"),
            ("REDIRECT_CODE", "302"),
            ("PRESERVE_PATH", "true"),
            ("BLOCK_SCANNERS", "true"),
            ("BLOCKED_PATHS_FILE", "/etc/paths.json"),
            ("LOG_LEVEL", "WARNING"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.status, RedirectStatus::Found);
        assert!(config.preserve_path);
        assert!(config.block_scanners);
        assert_eq!(config.blocked_paths_file, PathBuf::from("/etc/paths.json"));
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_port_is_fatal() {
        let result = load(&[("REDIRECT_TARGET", "https://example.com"), ("PORT", "http")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_redirect_status_fallback() {
        assert_eq!(RedirectStatus::parse("302"), RedirectStatus::Found);
        assert_eq!(RedirectStatus::parse("301"), RedirectStatus::MovedPermanently);
        assert_eq!(RedirectStatus::parse("abc"), RedirectStatus::MovedPermanently);
        assert_eq!(RedirectStatus::parse("307"), RedirectStatus::MovedPermanently);
        assert_eq!(RedirectStatus::parse(""), RedirectStatus::MovedPermanently);
        assert_eq!(RedirectStatus::Found.to_string(), "302");
    }

    #[test]
    fn test_flag_requires_exact_true() {
        assert!(parse_flag(Some("true")));
        assert!(!parse_flag(Some("TRUE")));
        assert!(!parse_flag(Some("True")));
        assert!(!parse_flag(Some("1")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::parse("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("INFO"), LogLevel::Info);
        assert_eq!(LogLevel::parse("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::parse("Error"), LogLevel::Error);
        assert_eq!(LogLevel::parse("none"), LogLevel::None);
        assert_eq!(LogLevel::parse("off"), LogLevel::None);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Info);
        assert_eq!(LogLevel::parse(""), LogLevel::Info);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Error < LogLevel::None);
        assert_eq!(log::LevelFilter::from(LogLevel::None), log::LevelFilter::Off);
    }
}
