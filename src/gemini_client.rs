use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error_codes::CodedError;
use crate::generated::GeneratedPrompt;
use crate::prompt_templates::PromptMode;
use crate::reference_images::ReferenceImageSet;
use crate::response_schema::schema_for;
use crate::settings::PromptSettings;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
// Near deterministic; the schema does the heavy lifting.
const TEMPERATURE: f64 = 0.1;

/// Reads the credential from the environment. Checked before any request is
/// built so a missing key surfaces as a configuration error, never as a
/// network failure.
pub fn api_key_from_env() -> Result<String> {
    std::env::var("GEMINI_API_KEY").map_err(|_| {
        anyhow!(CodedError::config(
            "MISSING_API_KEY",
            "GEMINI_API_KEY is not set; configure it in the environment",
        ))
    })
}

pub fn model_from_env() -> String {
    std::env::var("GEMINI_MODEL")
        .ok()
        .and_then(|value| (!value.trim().is_empty()).then_some(value))
        .unwrap_or_else(|| DEFAULT_MODEL.to_owned())
}

/// Everything needed for one `generateContent` call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub mode: PromptMode,
    pub final_prompt: String,
    pub settings: PromptSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    verbose: bool,
}

impl GeminiClient {
    pub fn new(http: Client, api_key: String, model: String, verbose: bool) -> Self {
        Self {
            http,
            api_key,
            model,
            verbose,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
        images: &ReferenceImageSet,
        system_instruction: &str,
    ) -> Result<GeneratedPrompt> {
        let body = build_request_body(request, images, system_instruction);
        if self.verbose {
            eprintln!(
                "[DEBUG] model '{}', mode {}, {} image part(s), {} segment(s)",
                self.model,
                request.mode.keyword(),
                images.len(),
                request.settings.duration.segment_count()
            );
        }

        let response: GenerateContentResponse = self
            .http
            .post(format!("{API_BASE}/{}:generateContent", self.model))
            .header("X-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call the Gemini API")?
            .error_for_status()
            .context("Gemini API returned an error status")?
            .json()
            .await
            .context("failed to decode the Gemini response")?;

        let text = response
            .candidates
            .into_iter()
            .flatten()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts.unwrap_or_default())
            .find_map(|part| part.text.filter(|text| !text.trim().is_empty()))
            .ok_or_else(|| anyhow!("empty model response"))?;

        GeneratedPrompt::from_json_str(&text)
    }
}

fn build_request_body(
    request: &GenerationRequest,
    images: &ReferenceImageSet,
    system_instruction: &str,
) -> GenerateContentRequest {
    let prompt_text = if request.final_prompt.trim().is_empty() {
        crate::prompt_templates::default_prompt_text(&request.settings)
    } else {
        request.final_prompt.clone()
    };

    let mut parts = vec![Part::Text { text: prompt_text }];
    for image in images.iter() {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            },
        });
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_owned()),
            parts,
        }],
        system_instruction: SystemInstruction {
            parts: vec![Part::Text {
                text: system_instruction.to_owned(),
            }],
        },
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_owned(),
            response_schema: schema_for(request.mode, request.settings.duration.segment_count()),
            temperature: TEMPERATURE,
        },
    }
}

/// Validates model output text without a network round trip. Used by `show`
/// and by tests; the post-request path goes through the same parse.
pub fn parse_model_text(text: &str) -> Result<GeneratedPrompt> {
    if text.trim().is_empty() {
        bail!("empty model response");
    }
    GeneratedPrompt::from_json_str(text)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}
