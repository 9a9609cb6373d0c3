// file: src/models/insight.rs
// description: structured narrative returned by the insight synthesizer
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// Narrative sections produced by the external text-generation service.
///
/// Every list field is optional in the wire response; a response that cannot
/// be parsed as structured JSON degrades to `from_raw`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedInsights {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub statistical_notes: Vec<String>,
}

impl SynthesizedInsights {
    /// Fallback when the service returns free-form text instead of the
    /// structured record: the raw text becomes the summary.
    pub fn from_raw(text: &str) -> Self {
        Self {
            summary: text.trim().to_string(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.insights.is_empty()
            && self.risk_factors.is_empty()
            && self.recommendations.is_empty()
            && self.statistical_notes.is_empty()
    }
}
