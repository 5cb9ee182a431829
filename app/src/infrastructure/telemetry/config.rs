use serde::Deserialize;
use tracing::metadata::LevelFilter;
use tracing_appender::rolling::Rotation;

/// Logging configuration, the `telemetry` section.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enable: bool,
    /// Level applied when no directive matches.
    pub max_level: LoggingLevel,
    /// Filter directives, e.g. `service_storage=debug,actix_web=warn`.
    pub level_filter: String,
    /// Environment variable read for more directives, e.g. `RUST_LOG`.
    pub level_filter_env: String,
    pub console: ConsoleConfig,
    pub file: FileConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable: true,
            max_level: LoggingLevel::Info,
            level_filter: String::new(),
            level_filter_env: "RUST_LOG".to_string(),
            console: Default::default(),
            file: Default::default(),
        }
    }
}

#[derive(Default, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Off,
}

impl From<LoggingLevel> for LevelFilter {
    fn from(val: LoggingLevel) -> Self {
        match val {
            LoggingLevel::Error => LevelFilter::ERROR,
            LoggingLevel::Warn => LevelFilter::WARN,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Debug => LevelFilter::DEBUG,
            LoggingLevel::Trace => LevelFilter::TRACE,
            LoggingLevel::Off => LevelFilter::OFF,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enable: bool,
    /// Print file, line, thread id and target of every event.
    pub verbose: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enable: true,
            verbose: false,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct FileConfig {
    pub enable: bool,
    pub verbose: bool,
    /// Upper bound for this sink, on top of the global filter.
    pub max_level: LoggingLevel,
    pub path: String,
    /// Log file name, or the prefix of rotated files.
    pub prefix: String,
    pub rotation: RotationLevel,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enable: false,
            verbose: false,
            max_level: LoggingLevel::Trace,
            path: "./logs".to_string(),
            prefix: "upload-server.log".to_string(),
            rotation: Default::default(),
        }
    }
}

#[derive(Default, Deserialize, Clone, Copy, Debug)]
pub enum RotationLevel {
    Daily,
    Hourly,
    #[default]
    Never,
}

impl From<RotationLevel> for Rotation {
    fn from(val: RotationLevel) -> Self {
        match val {
            RotationLevel::Daily => Rotation::DAILY,
            RotationLevel::Hourly => Rotation::HOURLY,
            RotationLevel::Never => Rotation::NEVER,
        }
    }
}
