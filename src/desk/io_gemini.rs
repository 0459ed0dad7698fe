//! The strategic report service backed by the Gemini `generateContent` API.

use std::env;
use std::time::Duration;

use delegate_desk::report::*;
use log::{debug, info};
use reqwest::blocking::Client;
use serde_json::json;
use serde_json::Value as JSValue;

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Checked in this order.
const KEY_VARIABLES: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

pub struct GeminiReportSource {
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiReportSource {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    /// The public endpoint, with the key taken from the environment.
    pub fn from_env(model: Option<String>) -> Self {
        let api_key = KEY_VARIABLES
            .iter()
            .filter_map(|v| env::var(v).ok())
            .find(|k| !k.is_empty());
        Self::new(
            DEFAULT_BASE_URL,
            model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
        )
    }

    fn generate_content_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn string_type() -> JSValue {
    json!({"type": "STRING"})
}

fn number_type() -> JSValue {
    json!({"type": "NUMBER"})
}

/// The shape the service is asked to answer with. Mirrors [StrategicReport].
pub fn response_schema() -> JSValue {
    json!({
        "type": "OBJECT",
        "properties": {
            "executiveSummary": string_type(),
            "prediction": string_type(),
            "riskSummary": {"type": "ARRAY", "items": string_type()},
            "strategicSuggestions": {"type": "ARRAY", "items": string_type()},
            "estimatedVotes2028": number_type(),
            "weightedTotalVotes": number_type(),
            "microGrowthTargets": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "chamber": string_type(),
                        "potentialGain": number_type(),
                        "reason": string_type()
                    }
                }
            },
            "scenarios": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": string_type(),
                        "predictedVotes": number_type(),
                        "description": string_type()
                    }
                }
            },
            "algorithmAuditLog": string_type(),
            "factionTransitionAnalysis": string_type()
        },
        "required": [
            "executiveSummary",
            "prediction",
            "riskSummary",
            "strategicSuggestions",
            "estimatedVotes2028",
            "weightedTotalVotes",
            "microGrowthTargets",
            "scenarios",
            "algorithmAuditLog",
            "factionTransitionAnalysis"
        ]
    })
}

pub fn request_body(prompt: &str) -> JSValue {
    json!({
        "contents": [{"role": "user", "parts": [{"text": prompt}]}],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

/// Extracts the report from a `generateContent` answer. The report is the
/// JSON text of the first part of the first candidate.
pub fn read_response(body: &JSValue) -> Result<StrategicReport, ReportFailure> {
    let text = body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| ReportFailure::Parse("no text in the first candidate".to_string()))?;
    debug!("read_response: {} bytes of report text", text.len());
    serde_json::from_str(text).map_err(|e| ReportFailure::Parse(e.to_string()))
}

/// A blocking client without a request timeout: reports wait for the model.
fn http_client() -> reqwest::Result<Client> {
    Client::builder().timeout(None::<Duration>).build()
}

impl ReportSource for GeminiReportSource {
    fn id(&self) -> &str {
        &self.model
    }

    fn fetch_strategic_report(&self, snapshot: &Snapshot) -> Result<StrategicReport, ReportFailure> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ReportFailure::Unavailable(format!("none of {:?} is set", KEY_VARIABLES))
        })?;
        let prompt = build_prompt(snapshot)?;
        let client = http_client().map_err(|e| ReportFailure::Unavailable(e.to_string()))?;
        let url = self.generate_content_url();
        info!("fetch_strategic_report: POST {}", url);
        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(&prompt))
            .send()
            .map_err(|e| ReportFailure::Unavailable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ReportFailure::Request(format!("{}: {}", status, text)));
        }
        let body: JSValue = response
            .json()
            .map_err(|e| ReportFailure::Parse(e.to_string()))?;
        read_response(&body)
    }
}
