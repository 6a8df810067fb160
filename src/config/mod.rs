mod file_config;

pub use file_config::{FileConfig, PipelineConfig};

use anyhow::{anyhow, Result};

use crate::ingestion::IngestionSettings;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML
/// config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub api_base_url: Option<String>,
    pub bearer_token: Option<String>,
    pub request_timeout_sec: u64,
}

/// Resolved configuration handed to the clients and the manager.
///
/// Everything is explicit: there is no process-wide default-headers or auth
/// singleton anywhere in this crate.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the receipt backend (OCR, structuring, persistence).
    pub api_base_url: String,
    /// Bearer credential attached to every call, supplied by the session
    /// layer.
    pub bearer_token: String,
    pub request_timeout_sec: u64,
    pub pipeline: IngestionSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let api_base_url = file
            .api_base_url
            .or_else(|| cli.api_base_url.clone())
            .ok_or_else(|| {
                anyhow!("api_base_url must be specified via --api-url or in config file")
            })?;

        let bearer_token = file
            .bearer_token
            .or_else(|| cli.bearer_token.clone())
            .ok_or_else(|| {
                anyhow!("bearer_token must be specified via --token or in config file")
            })?;

        let request_timeout_sec = file
            .request_timeout_sec
            .unwrap_or(cli.request_timeout_sec);

        // Pipeline settings - merge file config with defaults
        let pipeline_file = file.pipeline.unwrap_or_default();
        let defaults = IngestionSettings::default();
        let pipeline = IngestionSettings {
            max_image_bytes: pipeline_file
                .max_image_mb
                .map(|mb| mb * 1024 * 1024)
                .unwrap_or(defaults.max_image_bytes),
            max_images_per_session: pipeline_file
                .max_images_per_session
                .unwrap_or(defaults.max_images_per_session),
        };

        Ok(Self {
            api_base_url,
            bearer_token,
            request_timeout_sec,
            pipeline,
        })
    }
}
