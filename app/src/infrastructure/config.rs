use domain_storage::model::vo::ChunkRetryPolicy;
use serde::Deserialize;

use super::telemetry::TelemetryConfig;

#[derive(Default, Clone, Deserialize, Debug)]
pub struct UploadServerConfig {
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub janitor: JanitorConfig,
}

#[derive(Clone, Deserialize, Debug)]
pub struct HostConfig {
    #[serde(default = "HostConfig::default_address")]
    pub bind_address: String,
    #[serde(default = "HostConfig::default_port")]
    pub bind_port: u16,
    /// Total size limit of one multipart request in bytes.
    #[serde(default = "HostConfig::default_multipart_limit")]
    pub multipart_limit: usize,
    /// Directory served under `/static`, holding the browser uploader.
    #[serde(default = "HostConfig::default_static_path")]
    pub static_path: String,
}

impl HostConfig {
    fn default_address() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8090
    }
    fn default_multipart_limit() -> usize {
        100 * 1024 * 1024
    }
    fn default_static_path() -> String {
        "static".to_string()
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind_address: Self::default_address(),
            bind_port: Self::default_port(),
            multipart_limit: Self::default_multipart_limit(),
            static_path: Self::default_static_path(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct StorageConfig {
    /// Output area for completed files.
    #[serde(default = "StorageConfig::default_upload_path")]
    pub upload_path: String,
    /// Staging area for chunks and artifacts being reassembled.
    #[serde(default = "StorageConfig::default_chunk_path")]
    pub chunk_path: String,
    #[serde(default)]
    pub chunk_retry_policy: ChunkRetryPolicy,
}

impl StorageConfig {
    fn default_upload_path() -> String {
        "uploads".to_string()
    }
    fn default_chunk_path() -> String {
        "chunks".to_string()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_path: Self::default_upload_path(),
            chunk_path: Self::default_chunk_path(),
            chunk_retry_policy: Default::default(),
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct JanitorConfig {
    #[serde(default = "JanitorConfig::default_enable")]
    pub enable: bool,
    #[serde(default = "JanitorConfig::default_interval_secs")]
    pub interval_secs: u64,
    /// Also wipe the staging area. In-flight uploads then fail reassembly
    /// with a missing chunk.
    #[serde(default)]
    pub sweep_staging: bool,
}

impl JanitorConfig {
    fn default_enable() -> bool {
        true
    }
    fn default_interval_secs() -> u64 {
        60
    }
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            enable: Self::default_enable(),
            interval_secs: Self::default_interval_secs(),
            sweep_staging: false,
        }
    }
}

/// Layers `config.yaml`, any yaml file passed on the command line, and
/// `UPLOAD__*` environment variables.
pub fn build_config() -> anyhow::Result<config::Config> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = config::Config::builder().add_source(
        config::File::with_name("config")
            .required(false)
            .format(config::FileFormat::Yaml),
    );
    for arg in args {
        if arg.ends_with("yaml") || arg.ends_with("yml") {
            config = config.add_source(
                config::File::from(std::path::Path::new(arg.as_str()))
                    .format(config::FileFormat::Yaml)
                    .required(false),
            );
        }
    }
    config = config.add_source(
        config::Environment::with_prefix("UPLOAD")
            .separator("__")
            .try_parsing(true),
    );
    Ok(config.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_layout() {
        let config = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize::<UploadServerConfig>()
            .unwrap();
        assert_eq!(config.host.bind_port, 8090);
        assert_eq!(config.host.static_path, "static");
        assert_eq!(config.storage.upload_path, "uploads");
        assert_eq!(config.storage.chunk_path, "chunks");
        assert_eq!(config.storage.chunk_retry_policy, ChunkRetryPolicy::Replace);
        assert_eq!(config.janitor.interval_secs, 60);
        assert!(!config.janitor.sweep_staging);
    }

    #[test]
    fn reads_yaml_sections() {
        let yaml = r#"
host:
  bind_port: 9000
storage:
  upload_path: /srv/uploads
  chunk_retry_policy: append
janitor:
  enable: false
"#;
        let config = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<UploadServerConfig>()
            .unwrap();
        assert_eq!(config.host.bind_port, 9000);
        assert_eq!(config.storage.upload_path, "/srv/uploads");
        assert_eq!(config.storage.chunk_path, "chunks");
        assert_eq!(config.storage.chunk_retry_policy, ChunkRetryPolicy::Append);
        assert!(!config.janitor.enable);
    }
}
