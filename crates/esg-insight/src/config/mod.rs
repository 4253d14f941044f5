use crate::dataset::SchemaConfig;
use crate::render::FontResolver;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub esg: EsgConfig,
}

impl AppConfig {
    /// Reads `.env` when present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: env::var("APP_ENV")
                .map(|value| AppEnvironment::parse(&value))
                .unwrap_or_default(),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: var_or("APP_LOG_LEVEL", "info"),
            },
            esg: EsgConfig::from_env()?,
        })
    }
}

/// HTTP binding for `serve`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = var_or("APP_PORT", "3000")
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        Ok(Self {
            host: var_or("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Dataset location, analysed year range and font candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsgConfig {
    pub data_path: Option<PathBuf>,
    pub year_start: i32,
    pub year_end: i32,
    /// Extra font files tried before the platform defaults.
    pub font_paths: Vec<PathBuf>,
}

impl Default for EsgConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            year_start: 2015,
            year_end: 2020,
            font_paths: Vec::new(),
        }
    }
}

impl EsgConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let data_path = env::var("ESG_DATA_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let year_start = year_var("ESG_YEAR_START", 2015)?;
        let year_end = year_var("ESG_YEAR_END", 2020)?;
        if year_start > year_end {
            return Err(ConfigError::InvertedYearRange {
                start: year_start,
                end: year_end,
            });
        }

        let font_paths = env::var("ESG_FONT_PATHS")
            .map(|value| {
                value
                    .split(':')
                    .map(str::trim)
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            data_path,
            year_start,
            year_end,
            font_paths,
        })
    }

    pub fn schema(&self) -> SchemaConfig {
        SchemaConfig::default().with_years(self.year_start..=self.year_end)
    }

    /// Configured fonts first, then the platform defaults.
    pub fn font_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = self.font_paths.clone();
        candidates.extend(FontResolver::default_candidates());
        candidates
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn year_var(name: &'static str, default: i32) -> Result<i32, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|year| (1900..=2100).contains(year))
            .ok_or(ConfigError::InvalidYear { name, value }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidYear { name: &'static str, value: String },
    InvertedYearRange { start: i32, end: i32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidYear { name, value } => {
                write!(f, "{name} must be a year between 1900 and 2100, got '{value}'")
            }
            ConfigError::InvertedYearRange { start, end } => {
                write!(f, "ESG_YEAR_START ({start}) is after ESG_YEAR_END ({end})")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidYear { .. }
            | ConfigError::InvertedYearRange { .. } => None,
        }
    }
}
