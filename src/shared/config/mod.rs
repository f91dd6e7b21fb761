pub mod global;
pub mod model;

#[cfg(test)]
mod model_test;

pub use global::CONFIG;
pub use model::{EncoderConfig, LoggingConfig, Settings, load_settings, load_settings_from};
