use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    Eq,
    Include,
    NotInclude,
    /// Parses the output and compares it structurally.
    JsonEq,
}

#[derive(Debug, Deserialize)]
pub struct Matcher {
    pub kind: MatcherKind,
    pub value: serde_json::Value,
}

impl Matcher {
    pub fn matches(&self, actual: &str) -> bool {
        debug!("Matching against actual output:\n{}", actual);
        match (&self.kind, &self.value) {
            (MatcherKind::Eq, serde_json::Value::String(s)) => actual == s,
            (MatcherKind::Include, serde_json::Value::String(s)) => actual.contains(s.as_str()),
            (MatcherKind::NotInclude, serde_json::Value::String(s)) => {
                !actual.contains(s.as_str())
            }
            (MatcherKind::JsonEq, expected) => {
                match serde_json::from_str::<serde_json::Value>(actual) {
                    Ok(parsed) => {
                        debug!("JsonEq parsed output: {}", parsed);
                        &parsed == expected
                    }
                    Err(e) => {
                        debug!("Output is not valid JSON: {}", e);
                        false
                    }
                }
            }
            (kind, value) => {
                debug!("Unsupported matcher {:?} with value {}", kind, value);
                false
            }
        }
    }
}
