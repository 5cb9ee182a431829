mod config;
pub use self::config::*;

use tracing::metadata::LevelFilter;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    let mut builder = EnvFilter::builder().with_default_directive(
        LevelFilter::from(config.max_level).into(),
    );
    if !config.level_filter_env.is_empty() {
        builder = builder.with_env_var(&config.level_filter_env);
    }
    let filter = builder.from_env_lossy();
    config
        .level_filter
        .split(',')
        .filter(|directive| !directive.trim().is_empty())
        .filter_map(|directive| directive.trim().parse().ok())
        .fold(filter, |filter, directive| filter.add_directive(directive))
}

/// Installs the global subscriber: console output and an optional rotated log
/// file, both behind one `EnvFilter`.
pub fn initialize_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    if !config.enable {
        return Ok(());
    }
    let console = config.console.enable.then(|| {
        let verbose = config.console.verbose;
        tracing_subscriber::fmt::layer()
            .with_file(verbose)
            .with_line_number(verbose)
            .with_thread_ids(verbose)
            .with_target(verbose)
    });
    let file = config.file.enable.then(|| {
        let file = &config.file;
        let appender = RollingFileAppender::new(file.rotation.into(), &file.path, &file.prefix);
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
            .with_file(file.verbose)
            .with_line_number(file.verbose)
            .with_thread_ids(file.verbose)
            .with_target(file.verbose)
            .with_filter(LevelFilter::from(file.max_level))
    });
    Registry::default().with(build_filter(config)).with(console).with(file).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_override_default_level() {
        let config = TelemetryConfig {
            max_level: LoggingLevel::Warn,
            level_filter: "service_storage=debug, ,not a directive".to_string(),
            level_filter_env: String::new(),
            ..Default::default()
        };
        let filter = build_filter(&config).to_string();
        assert!(filter.contains("service_storage=debug"), "{filter}");
        assert!(filter.contains("warn"), "{filter}");
    }

    #[test]
    fn reads_telemetry_section() {
        let yaml = r#"
max_level: Debug
file:
  enable: true
  rotation: Daily
"#;
        let config = ::config::Config::builder()
            .add_source(::config::File::from_str(yaml, ::config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<TelemetryConfig>()
            .unwrap();
        assert_eq!(config.max_level, LoggingLevel::Debug);
        assert!(config.console.enable);
        assert!(config.file.enable);
        assert_eq!(config.file.prefix, "upload-server.log");
    }
}
