use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{error::DirectionsError, DirectionsProvider, NO_DESCRIPTION};
use crate::{
  config::DirectionsConfig,
  navigation::step::{Direction, NavigationStep},
};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
const API_KEY_HEADER: &str = "x-goog-api-key";

const SYSTEM_INSTRUCTION: &str =
  "你是一个帮助盲人的导航助手。严格输出JSON格式。使用简短的中文句子。专注于安全提示。";

/// Directions generated by the Gemini `generateContent` endpoint.
pub struct GeminiDirections {
  client: Client,
  base_url: String,
  model: String,
  api_key: String,
}

impl GeminiDirections {
  pub fn new(config: &DirectionsConfig) -> Result<Self, DirectionsError> {
    let api_key = config
      .api_key
      .clone()
      .filter(|key| !key.is_empty())
      .or_else(|| std::env::var(API_KEY_ENV).ok())
      .filter(|key| !key.is_empty())
      .ok_or(DirectionsError::MissingApiKey)?;
    let client =
      Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
    let mut base_url = config.base_url.clone();
    if !base_url.ends_with('/') {
      base_url.push('/');
    }
    Ok(Self { client, base_url, model: config.model.clone(), api_key })
  }

  fn url(&self) -> String {
    format!("{}models/{}:generateContent", self.base_url, self.model)
  }

  async fn generate(&self, request: &GeminiRequest) -> Result<String, DirectionsError> {
    let response = self
      .client
      .post(self.url())
      .header(API_KEY_HEADER, &self.api_key)
      .json(request)
      .send()
      .await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(DirectionsError::Api { status: status.as_u16(), body });
    }
    let body = response.text().await?;
    let response: GeminiResponse = serde_json::from_str(&body)?;
    Ok(response.text())
  }
}

#[async_trait]
impl DirectionsProvider for GeminiDirections {
  async fn fetch_steps(
    &self,
    destination: &str,
  ) -> Result<Vec<NavigationStep>, DirectionsError> {
    let text = self.generate(&directions_request(destination)).await?;
    debug!(destination, length = text.len(), "Gemini returned directions");
    parse_steps(&text)
  }

  async fn describe_surroundings(&self, context: &str) -> Result<String, DirectionsError> {
    let text = self.generate(&description_request(context)).await?;
    let text = text.trim();
    if text.is_empty() {
      warn!(context, "Gemini returned an empty description");
      return Ok(NO_DESCRIPTION.to_string());
    }
    Ok(text.to_string())
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
  contents: Vec<GeminiContent>,
  #[serde(skip_serializing_if = "Option::is_none")]
  system_instruction: Option<GeminiContent>,
  #[serde(skip_serializing_if = "Option::is_none")]
  generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<GeminiPart>,
}

impl GeminiContent {
  fn text(role: Option<&str>, text: impl Into<String>) -> Self {
    Self {
      role: role.map(str::to_string),
      parts: vec![GeminiPart { text: Some(text.into()) }],
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  response_mime_type: String,
  response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
  #[serde(default)]
  candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
  content: Option<GeminiContent>,
}

impl GeminiResponse {
  /// Text of the first candidate, parts concatenated.
  fn text(&self) -> String {
    self
      .candidates
      .first()
      .and_then(|candidate| candidate.content.as_ref())
      .map(|content| content.parts.iter().filter_map(|part| part.text.as_deref()).collect())
      .unwrap_or_default()
  }
}

fn directions_request(destination: &str) -> GeminiRequest {
  let prompt = format!(
    "我是一名视障用户，正步行前往：{destination}。请提供3-5条清晰、简单的步行导航指令，模拟从我当前位置出发（假设一个通用的城市环境）。请用中文回答。"
  );
  GeminiRequest {
    contents: vec![GeminiContent::text(Some("user"), prompt)],
    system_instruction: Some(GeminiContent::text(None, SYSTEM_INSTRUCTION)),
    generation_config: Some(GenerationConfig {
      response_mime_type: "application/json".to_string(),
      response_schema: steps_schema(),
    }),
  }
}

fn description_request(context: &str) -> GeminiRequest {
  let prompt =
    format!("根据这个上下文为盲人用户描述周围环境：{context}。请用中文回答，保持在20个字以内。");
  GeminiRequest {
    contents: vec![GeminiContent::text(Some("user"), prompt)],
    system_instruction: None,
    generation_config: None,
  }
}

fn steps_schema() -> serde_json::Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "steps": {
        "type": "ARRAY",
        "items": {
          "type": "OBJECT",
          "properties": {
            "instruction": { "type": "STRING", "description": "指令文本，例如：'向前直行50米'" },
            "distance": { "type": "STRING", "description": "距离，例如：'50米'" },
            "direction": { "type": "STRING", "enum": ["left", "right", "straight", "arrive"] }
          },
          "required": ["instruction", "distance", "direction"]
        }
      }
    },
    "required": ["steps"]
  })
}

#[derive(Debug, Deserialize)]
struct StepsEnvelope {
  #[serde(default)]
  steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
  instruction: Option<String>,
  distance: Option<String>,
  direction: Option<String>,
}

/// Decodes the model output and checks every step against the contract.
///
/// Blank output decodes to an empty route, which the session reports as a
/// planning failure rather than a malformed answer.
pub fn parse_steps(text: &str) -> Result<Vec<NavigationStep>, DirectionsError> {
  if text.trim().is_empty() {
    return Ok(Vec::new());
  }
  let envelope: StepsEnvelope = serde_json::from_str(text)?;
  envelope
    .steps
    .into_iter()
    .enumerate()
    .map(|(index, raw)| -> Result<NavigationStep, DirectionsError> {
      let missing =
        |field: &str| DirectionsError::Malformed(format!("step {index} has no {field}"));
      let instruction = raw.instruction.ok_or_else(|| missing("instruction"))?;
      let distance = raw.distance.ok_or_else(|| missing("distance"))?;
      let direction = raw.direction.ok_or_else(|| missing("direction"))?;
      let direction = direction.parse::<Direction>().map_err(|_| {
        DirectionsError::Malformed(format!("step {index} has unknown direction {direction}"))
      })?;
      Ok(NavigationStep { instruction, distance, direction })
    })
    .collect()
}
