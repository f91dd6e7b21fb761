use lz4_flex::frame::BlockSize;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub encoder: EncoderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Capacity of the buffer between the JSON writer and the byte counter
    pub output_buffer_size: usize,
    pub zstd_level: i32,
    /// One of `max64kb`, `max256kb`, `max1mb`, `max4mb`
    pub lz4_block_size: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            output_buffer_size: 8192,
            zstd_level: 3,
            lz4_block_size: "max64kb".to_string(),
        }
    }
}

impl EncoderConfig {
    /// Unknown names fall back to 64KB blocks.
    pub fn lz4_frame_block_size(&self) -> BlockSize {
        match self.lz4_block_size.to_ascii_lowercase().as_str() {
            "max256kb" => BlockSize::Max256KB,
            "max1mb" => BlockSize::Max1MB,
            "max4mb" => BlockSize::Max4MB,
            _ => BlockSize::Max64KB,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub console_level: String,
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            console_level: "info".to_string(),
            file_level: "debug".to_string(),
        }
    }
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("QDE_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

/// Loads settings from `path` (any format the `config` crate detects); a
/// missing file yields the defaults.
pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
