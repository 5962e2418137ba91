use crate::assessments::interpretation::InterpretationScheme;
use crate::assessments::scoring::SymptomSchema;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let schema = parse_symptom_schema(
            &env::var("APP_SYMPTOM_SCHEMA").unwrap_or_else(|_| "extended".to_string()),
        )?;
        let scheme = parse_interpretation_scheme(
            &env::var("APP_SCORING_SCHEME").unwrap_or_else(|_| "report".to_string()),
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig { schema, scheme },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Deployment-selected scoring strategy. The symptom schema and the
/// interpretation scheme are chosen once here and never mixed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    pub schema: SymptomSchema,
    pub scheme: InterpretationScheme,
}

fn parse_symptom_schema(value: &str) -> Result<SymptomSchema, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "classic" => Ok(SymptomSchema::Classic),
        "extended" => Ok(SymptomSchema::Extended),
        _ => Err(ConfigError::InvalidSymptomSchema {
            value: value.to_string(),
        }),
    }
}

fn parse_interpretation_scheme(value: &str) -> Result<InterpretationScheme, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "clinical" => Ok(InterpretationScheme::Clinical),
        "likelihood" => Ok(InterpretationScheme::Likelihood),
        "report" => Ok(InterpretationScheme::Report),
        _ => Err(ConfigError::InvalidInterpretationScheme {
            value: value.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSymptomSchema { value: String },
    InvalidInterpretationScheme { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSymptomSchema { value } => {
                write!(
                    f,
                    "APP_SYMPTOM_SCHEMA must be 'classic' or 'extended' (got '{value}')"
                )
            }
            ConfigError::InvalidInterpretationScheme { value } => {
                write!(
                    f,
                    "APP_SCORING_SCHEME must be 'clinical', 'likelihood', or 'report' (got '{value}')"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
