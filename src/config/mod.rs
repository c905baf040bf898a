use std::env;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
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

/// Top-level configuration for the batch runner.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub batch: BatchConfig,
    pub telemetry: TelemetryConfig,
}

/// Default input documents picked up when the command line names none.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub districts_file: Option<PathBuf>,
    pub citizens_file: Option<PathBuf>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is set but empty; it must name an input document")]
    EmptyPath { var: &'static str },
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("CADASTRE_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let districts_file = input_path("CADASTRE_DISTRICTS_FILE")?;
        let citizens_file = input_path("CADASTRE_CITIZENS_FILE")?;

        let log_level = env::var("CADASTRE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            batch: BatchConfig {
                districts_file,
                citizens_file,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn input_path(var: &'static str) -> Result<Option<PathBuf>, ConfigError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyPath { var }),
        Ok(value) => Ok(Some(PathBuf::from(value))),
        Err(_) => Ok(None),
    }
}
