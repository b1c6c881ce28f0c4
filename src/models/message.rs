use chrono::{DateTime, Utc};
use serde::Deserialize;

// Only the fields the scanner prices are declared; serde skips the rest.

#[derive(Deserialize, Debug, Default)]
pub struct MessageUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
}

#[derive(Deserialize, Debug, Default)]
pub struct MessageObj {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<MessageUsage>,
}

#[derive(Deserialize, Debug)]
pub struct TranscriptLine {
    pub r#type: Option<String>,
    pub message: Option<MessageObj>,
    pub timestamp: Option<String>,
}

/// A priced-to-be assistant turn extracted from a transcript line.
#[derive(Clone, Debug, PartialEq)]
pub struct UsageRecord {
    pub model: String,
    pub input: u64,
    pub output: u64,
    pub cache_create: u64,
    pub cache_read: u64,
    pub ts: DateTime<Utc>,
}

impl UsageRecord {
    pub fn cost(&self) -> f64 {
        crate::pricing::calculate_entry_cost(
            self.input,
            self.output,
            self.cache_create,
            self.cache_read,
            &self.model,
        )
    }
}
