use std::io::Write;

use lz4_flex::frame::BlockSize;
use tempfile::Builder;

use crate::shared::config::{EncoderConfig, Settings, load_settings_from};

#[test]
fn defaults_apply_when_file_is_missing() {
    let settings = load_settings_from("/nonexistent/query_data_encoder").unwrap();
    assert_eq!(settings.encoder.output_buffer_size, 8192);
    assert_eq!(settings.encoder.zstd_level, 3);
    assert_eq!(settings.logging.console_level, "info");
}

#[test]
fn partial_file_overrides_only_given_keys() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[encoder]\nzstd_level = 9\n\n[logging]\nlog_dir = \"/tmp/qde\"").unwrap();

    let path = file.path().to_str().unwrap();
    let settings: Settings = load_settings_from(path).unwrap();
    assert_eq!(settings.encoder.zstd_level, 9);
    assert_eq!(settings.encoder.output_buffer_size, 8192);
    assert_eq!(settings.logging.log_dir, "/tmp/qde");
    assert_eq!(settings.logging.file_level, "debug");
}

#[test]
fn lz4_block_size_names() {
    let with = |name: &str| EncoderConfig {
        lz4_block_size: name.to_string(),
        ..EncoderConfig::default()
    };
    assert!(matches!(with("max1mb").lz4_frame_block_size(), BlockSize::Max1MB));
    assert!(matches!(with("MAX4MB").lz4_frame_block_size(), BlockSize::Max4MB));
    assert!(matches!(with("bogus").lz4_frame_block_size(), BlockSize::Max64KB));
}
