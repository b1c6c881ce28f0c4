use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct HookModel {
    pub id: String,
    pub display_name: String,
}

/// Optional cost summary provided by Claude Code's statusLine input
#[derive(Deserialize, Debug, Clone, Default)]
pub struct HookCost {
    pub total_cost_usd: Option<f64>,
}

/// The statusLine hook payload. Only the fields the cost line needs are kept.
#[derive(Deserialize, Debug, Clone)]
pub struct HookJson {
    #[serde(default)]
    pub session_id: String,
    pub model: Option<HookModel>,
    /// Aggregate cost fields from Claude Code
    pub cost: Option<HookCost>,
}

impl HookJson {
    /// Live session cost reported by Claude Code, zero when absent.
    pub fn live_cost(&self) -> f64 {
        self.cost
            .as_ref()
            .and_then(|c| c.total_cost_usd)
            .unwrap_or(0.0)
    }
}
