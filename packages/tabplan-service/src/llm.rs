use std::sync::Arc;

use serde_json::Value;

use tabplan_config::LlmProviderConfig;
use tabplan_domain::{SelectionRequest, TabSuggestion};
use tabplan_providers::chat::{ChatCompletion, ChatMessage, ChatRequest};

use crate::{BoxFuture, ChatProvider, Error, PlanOptions, Planner, Result, context};

pub const DEFAULT_REASON: &str = "No reason provided.";
pub const DEFAULT_SCORE: f64 = 0.5;

pub const SYSTEM_PROMPT: &str = "\
You help a user decide which of their saved bookmarks to open as browser tabs for the task at hand.

Rules:
- Choose only from the bookmarks provided. Never invent URLs.
- Pick the smallest set of tabs that still covers the user's intent.
- Weigh relevance to the prompt, any freshness the prompt implies, and topic coverage.
- Give a short reason for every selection explaining how the bookmark helps.
- Give a confidence score between 0 and 1, higher for better matches.
- Answer strictly with JSON matching the provided schema, with a top-level `tabs` array.
";

/// Why an item in the model's `tabs` array was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
	NotAnObject,
	MissingTitle,
	MissingUrl,
	InvalidScore,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedPlan {
	pub suggestions: Vec<TabSuggestion>,
	pub dropped: Vec<DropReason>,
}

/// Planner backed by a hosted chat-completions model.
pub struct LlmPlanner {
	cfg: LlmProviderConfig,
	provider: Arc<dyn ChatProvider>,
}
impl LlmPlanner {
	pub fn new(cfg: LlmProviderConfig, provider: Arc<dyn ChatProvider>) -> Self {
		Self { cfg, provider }
	}

	async fn run(&self, request: &SelectionRequest, options: &PlanOptions) -> Result<Vec<TabSuggestion>> {
		let api_key = self.cfg.api_key.as_deref().filter(|key| !key.trim().is_empty()).ok_or_else(
			|| Error::Configuration {
				message: format!(
					"Missing {} environment variable; cannot call the language model.",
					tabplan_config::API_KEY_ENV
				),
			},
		)?;
		let chat_request = build_chat_request(&self.cfg, request, options);
		let completion = self.provider.complete(&self.cfg, api_key, &chat_request).await?;
		let content = completion_content(&completion)?;
		let parsed = parse_plan(content)?;

		if !parsed.dropped.is_empty() {
			tracing::warn!(
				dropped = parsed.dropped.len(),
				kept = parsed.suggestions.len(),
				"Dropped malformed tab suggestions from model output."
			);
		}

		Ok(parsed.suggestions)
	}
}

impl Planner for LlmPlanner {
	fn plan<'a>(
		&'a self,
		request: &'a SelectionRequest,
		options: &'a PlanOptions,
	) -> BoxFuture<'a, Result<Vec<TabSuggestion>>> {
		Box::pin(self.run(request, options))
	}
}

pub fn build_chat_request(
	cfg: &LlmProviderConfig,
	request: &SelectionRequest,
	options: &PlanOptions,
) -> ChatRequest {
	let model = options
		.model
		.as_deref()
		.map(str::trim)
		.filter(|model| !model.is_empty())
		.unwrap_or(&cfg.model)
		.to_string();

	ChatRequest {
		model,
		temperature: options.temperature.unwrap_or(cfg.temperature),
		messages: vec![
			ChatMessage::system(SYSTEM_PROMPT),
			ChatMessage::user(context::render_user_message(request)),
		],
		response_format: Some(response_format()),
		stream: false,
	}
}

/// Structured-output constraint: `{ tabs: [{ title, url, reason, score }] }`, closed objects.
pub fn response_format() -> Value {
	serde_json::json!({
		"type": "json_schema",
		"json_schema": {
			"name": "tab_plan",
			"strict": true,
			"schema": {
				"type": "object",
				"additionalProperties": false,
				"properties": {
					"tabs": {
						"type": "array",
						"items": {
							"type": "object",
							"additionalProperties": false,
							"properties": {
								"title": { "type": "string" },
								"url": { "type": "string" },
								"reason": { "type": "string" },
								"score": { "type": "number", "minimum": 0, "maximum": 1 }
							},
							"required": ["title", "url", "reason", "score"]
						}
					}
				},
				"required": ["tabs"]
			}
		}
	})
}

pub fn completion_content(completion: &ChatCompletion) -> Result<&str> {
	let Some(choice) = completion.choices.first() else {
		return Err(Error::Planning { message: "Language model returned no choices.".to_string() });
	};

	choice.message.as_ref().and_then(|message| message.content.as_deref()).ok_or_else(|| {
		Error::Planning { message: "Language model returned an empty message.".to_string() }
	})
}

/// Parses the model's JSON answer. Whole-response problems fail; per-item problems drop the item.
pub fn parse_plan(content: &str) -> Result<ParsedPlan> {
	let payload: Value = serde_json::from_str(content).map_err(|_| Error::Planning {
		message: "Language model response was not valid JSON.".to_string(),
	})?;
	let Some(items) = payload.get("tabs").and_then(Value::as_array) else {
		return Err(Error::Planning {
			message: "Language model response did not include a 'tabs' list.".to_string(),
		});
	};
	let mut parsed = ParsedPlan::default();

	for item in items {
		match convert_item(item) {
			Ok(suggestion) => parsed.suggestions.push(suggestion),
			Err(reason) => parsed.dropped.push(reason),
		}
	}

	Ok(parsed)
}

/// Converts one `tabs` item, defaulting `reason` and `score` when they are absent.
///
/// A numeric string score is accepted. Any other non-numeric score drops the item.
pub fn convert_item(item: &Value) -> Result<TabSuggestion, DropReason> {
	let Some(object) = item.as_object() else { return Err(DropReason::NotAnObject) };
	let title = non_blank_str(object.get("title")).ok_or(DropReason::MissingTitle)?;
	let url = non_blank_str(object.get("url")).ok_or(DropReason::MissingUrl)?;
	let reason = object.get("reason").and_then(Value::as_str).unwrap_or(DEFAULT_REASON);
	let score = match object.get("score") {
		None | Some(Value::Null) => DEFAULT_SCORE,
		Some(Value::Number(number)) => number.as_f64().ok_or(DropReason::InvalidScore)?,
		Some(Value::String(raw)) => raw.trim().parse::<f64>().map_err(|_| DropReason::InvalidScore)?,
		Some(_) => return Err(DropReason::InvalidScore),
	};

	if !score.is_finite() {
		return Err(DropReason::InvalidScore);
	}

	Ok(TabSuggestion {
		title: title.to_string(),
		url: url.to_string(),
		reason: reason.to_string(),
		score,
	})
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
	value.and_then(Value::as_str).filter(|raw| !raw.trim().is_empty())
}
