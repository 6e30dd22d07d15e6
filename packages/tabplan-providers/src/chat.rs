use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};
use tabplan_config::LlmProviderConfig;

const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: String,
	pub content: String,
}
impl ChatMessage {
	pub fn system(content: impl Into<String>) -> Self {
		Self { role: "system".to_string(), content: content.into() }
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self { role: "user".to_string(), content: content.into() }
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
	pub model: String,
	pub temperature: f32,
	pub messages: Vec<ChatMessage>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub response_format: Option<Value>,
	pub stream: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletion {
	#[serde(default)]
	pub choices: Vec<ChatChoice>,
}
impl ChatCompletion {
	/// Wraps `content` in a single-choice completion.
	pub fn from_content(content: impl Into<String>) -> Self {
		Self {
			choices: vec![ChatChoice {
				message: Some(ChatChoiceMessage { content: Some(content.into()) }),
			}],
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
	#[serde(default)]
	pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
	#[serde(default)]
	pub content: Option<String>,
}

/// Sends one non-streaming chat completion request. No retries.
pub async fn complete(
	cfg: &LlmProviderConfig,
	api_key: &str,
	request: &ChatRequest,
) -> Result<ChatCompletion> {
	let mut builder = Client::builder();

	if let Some(timeout_ms) = cfg.timeout_ms {
		builder = builder.timeout(Duration::from_millis(timeout_ms));
	}

	let client = builder.build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);

	tracing::debug!(%url, model = %request.model, "Sending chat completion request.");

	let res = client
		.post(&url)
		.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
		.json(request)
		.send()
		.await?;
	let status = res.status();

	if !status.is_success() {
		let body = res.text().await.unwrap_or_default();
		let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();

		return Err(Error::InvalidResponse {
			message: format!("Chat completion request returned HTTP {status}: {excerpt}"),
		});
	}

	let bytes = res.bytes().await?;

	Ok(serde_json::from_slice(&bytes)?)
}
