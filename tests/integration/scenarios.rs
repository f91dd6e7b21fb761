use crate::integration::matcher::Matcher;
use serde::Deserialize;
use std::fs;

fn default_encoding() -> String {
    "json".to_string()
}

fn default_rows_per_page() -> usize {
    2
}

#[derive(Debug, Deserialize)]
pub struct TestScenario {
    pub name: String,
    /// Row set document handed to the loader.
    pub input: serde_json::Value,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    pub matchers: Vec<Matcher>,
}

pub fn load_scenarios_from_json(path: &str) -> Vec<TestScenario> {
    let content = fs::read_to_string(path).expect("Failed to read scenario file");
    serde_json::from_str(&content).expect("Invalid JSON format")
}
