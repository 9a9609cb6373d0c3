// file: src/synthesizer/mod.rs
// description: external text-generation collaborator for narrative insights
// reference: https://console.groq.com/docs/api-reference

use crate::config::SynthesisConfig;
use crate::error::{PipelineError, Result};
use crate::models::{AnalysisSummary, PredictionResult, SynthesizedInsights};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct InsightSynthesizer {
    client: Client,
    config: SynthesisConfig,
}

impl InsightSynthesizer {
    /// Returns `None` when no API key is configured; the pipeline then skips
    /// the synthesis stage entirely.
    pub fn from_config(config: &SynthesisConfig) -> Result<Option<Self>> {
        if config.api_key.is_none() {
            return Ok(None);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Synthesis(format!("cannot build HTTP client: {}", e)))?;

        Ok(Some(Self {
            client,
            config: config.clone(),
        }))
    }

    /// Turns the analysis summary into narrative insight sections.
    ///
    /// `context` carries the last-N prior conversation turns, oldest first.
    /// A response that is not the requested JSON shape degrades to the raw
    /// text as a single summary string rather than failing the run.
    pub async fn synthesize(
        &self,
        summary: &AnalysisSummary,
        prediction: Option<&PredictionResult>,
        context: &[ChatMessage],
    ) -> Result<SynthesizedInsights> {
        let prompt = build_prompt(summary, prediction);

        let mut messages: Vec<ChatMessage> = context
            .iter()
            .rev()
            .take(self.config.history_turns)
            .rev()
            .cloned()
            .collect();
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt,
        });

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
        };

        debug!(
            "Requesting insight synthesis from {} (model {})",
            self.config.endpoint, self.config.model
        );

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| PipelineError::Synthesis("API key missing".to_string()))?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Synthesis(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Synthesis(format!(
                "synthesis request failed with status {}: {}",
                status, error_text
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Synthesis(format!("cannot parse response: {}", e)))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PipelineError::Synthesis("response has no choices".to_string()))?;

        Ok(parse_insights(&content))
    }
}

/// Extracts the structured insight record from free-form model output,
/// degrading to the raw text as a summary when no parseable JSON exists.
pub fn parse_insights(content: &str) -> SynthesizedInsights {
    let start = content.find('{');
    let end = content.rfind('}');

    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            if let Ok(insights) =
                serde_json::from_str::<SynthesizedInsights>(&content[start..=end])
            {
                return insights;
            }
            warn!("Synthesis response JSON did not match the expected shape");
        }
    }

    SynthesizedInsights::from_raw(content)
}

fn build_prompt(summary: &AnalysisSummary, prediction: Option<&PredictionResult>) -> String {
    let mut prompt = format!(
        "Analyze this dataset and provide insights.\n\nData summary:\n{}\n\nTrends:\n{}\n",
        summary.to_text(),
        summary.trend_text()
    );

    if let Some(prediction) = prediction {
        prompt.push_str(&format!(
            "\nPredictive context:\n- Target column: {}\n- Features used: {}\n- Held-out accuracy: {:.2}%\n",
            prediction.target_column,
            prediction.feature_columns.join(", "),
            prediction.accuracy * 100.0
        ));
    }

    prompt.push_str(
        "\nReturn a JSON object with these fields:\n\
         {\"summary\": \"overview paragraph\", \"insights\": [...], \
         \"risk_factors\": [...], \"recommendations\": [...], \
         \"statistical_notes\": [...]}\n",
    );

    prompt
}
