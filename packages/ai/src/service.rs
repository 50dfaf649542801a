// ABOUTME: Gemini client for roadmap analysis
// ABOUTME: Builds prompts, POSTs generateContent, and maps every failure shape

use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::prompt::{self, ItemAnalysisRequest};
use milemap_core::{CompanyGoal, DepartmentConfig, RoadmapItem};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Missing GEMINI_API_KEY")]
    MissingApiKey,

    #[error("Gemini API error ({status}): {body}")]
    Endpoint { status: u16, body: String },

    #[error("Gemini API error: {0}")]
    Api(String),

    #[error("No response from Gemini API")]
    Empty,

    #[error("Failed to call Gemini API: {0}")]
    Transport(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// Client for the Gemini generateContent endpoint
pub struct AnalysisService {
    http: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AnalysisService {
    fn create_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client")
    }

    /// Creates a service reading the key from GEMINI_API_KEY. A missing key
    /// is not an error until an analysis is requested.
    pub fn new() -> Self {
        let api_key = env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            info!("GEMINI_API_KEY not set - analysis requests will be rejected");
        }

        Self {
            http: Self::create_client(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Creates a service with an explicit API key
    pub fn with_api_key(api_key: String) -> Self {
        Self {
            http: Self::create_client(),
            api_key: Some(api_key),
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Points the service at a different endpoint, used by tests
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Get the model identifier recorded in analysis logs
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Strategic analysis of the whole roadmap against company goals
    pub async fn analyze_portfolio(
        &self,
        goals: &[CompanyGoal],
        items: &[RoadmapItem],
        departments: &[DepartmentConfig],
    ) -> AnalysisResult<String> {
        self.generate(prompt::portfolio_prompt(goals, items, departments))
            .await
    }

    /// Single-item analysis with the template picked by the request's type
    pub async fn analyze_item(&self, request: &ItemAnalysisRequest) -> AnalysisResult<String> {
        self.generate(prompt::item_prompt(request)).await
    }

    async fn generate(&self, prompt: String) -> AnalysisResult<String> {
        let api_key = self.api_key.as_ref().ok_or(AnalysisError::MissingApiKey)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            },
        };

        info!("Making Gemini API request: model={}", self.model);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini API error: {} - {}", status, body);
            return Err(AnalysisError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        if let Some(err) = payload.error {
            error!("Gemini API reported an error: {}", err.message);
            return Err(AnalysisError::Api(err.message));
        }

        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(AnalysisError::Empty)
    }
}

impl Default for AnalysisService {
    fn default() -> Self {
        Self::new()
    }
}
