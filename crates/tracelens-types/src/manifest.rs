use serde::{Deserialize, Serialize};

/// Run summary, read from the `manifest.json` sidecar or synthesized from the
/// span log when the sidecar is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceRun {
    #[serde(default)]
    pub run_id: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, rename = "duration_seconds")]
    pub duration_secs: f64,
    #[serde(default)]
    pub span_count: usize,
    #[serde(default)]
    pub llm_calls: usize,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub estimated_cost: f64,
}

impl TraceRun {
    pub fn is_ok(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "ok")
    }
}
