use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_MAX_TABS: u32 = 5;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub service: Service,
	#[serde(default)]
	pub planner: Planner,
	#[serde(default)]
	pub providers: Providers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	#[serde(default = "default_http_bind")]
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
	#[serde(default)]
	pub cors: Cors,
}
impl Default for Service {
	fn default() -> Self {
		Self { http_bind: default_http_bind(), log_level: default_log_level(), cors: Cors::default() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cors {
	/// `"*"` allows any origin.
	#[serde(default = "default_allow_origins")]
	pub allow_origins: Vec<String>,
}
impl Default for Cors {
	fn default() -> Self {
		Self { allow_origins: default_allow_origins() }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
	#[default]
	Llm,
	Heuristic,
}
impl Strategy {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Llm => "llm",
			Self::Heuristic => "heuristic",
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Planner {
	#[serde(default)]
	pub default_strategy: Strategy,
	/// Applied by the HTTP layer when a request carries no usable limit.
	#[serde(default = "default_max_tabs")]
	pub default_max_tabs: u32,
}
impl Default for Planner {
	fn default() -> Self {
		Self { default_strategy: Strategy::default(), default_max_tabs: default_max_tabs() }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Providers {
	#[serde(default)]
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	#[serde(default = "default_provider_id")]
	pub provider_id: String,
	#[serde(default = "default_api_base")]
	pub api_base: String,
	/// Optional. Falls back to `OPENAI_API_KEY`; absence only fails the LLM path.
	#[serde(default)]
	pub api_key: Option<String>,
	#[serde(default = "default_path")]
	pub path: String,
	#[serde(default = "default_model")]
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	/// Optional. When absent the HTTP client's own defaults govern the call.
	#[serde(default)]
	pub timeout_ms: Option<u64>,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}
impl Default for LlmProviderConfig {
	fn default() -> Self {
		Self {
			provider_id: default_provider_id(),
			api_base: default_api_base(),
			api_key: None,
			path: default_path(),
			model: default_model(),
			temperature: default_temperature(),
			timeout_ms: None,
			default_headers: Map::new(),
		}
	}
}

fn default_http_bind() -> String {
	"127.0.0.1:8000".to_string()
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_allow_origins() -> Vec<String> {
	vec!["*".to_string()]
}

fn default_max_tabs() -> u32 {
	DEFAULT_MAX_TABS
}

fn default_provider_id() -> String {
	"openai".to_string()
}

fn default_api_base() -> String {
	"https://api.openai.com".to_string()
}

fn default_path() -> String {
	"/v1/chat/completions".to_string()
}

fn default_model() -> String {
	DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
	DEFAULT_TEMPERATURE
}
