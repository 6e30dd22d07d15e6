mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Cors, DEFAULT_MAX_TABS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, LlmProviderConfig, Planner,
	Providers, Service, Strategy,
};

use std::{env, fs, path::Path};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "TAB_PLANNER_OPENAI_MODEL";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	prepare(cfg, |key| env::var(key).ok())
}

/// Builds a config from built-in defaults and the process environment.
pub fn load_default() -> Result<Config> {
	prepare(Config::default(), |key| env::var(key).ok())
}

pub fn prepare<F>(mut cfg: Config, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	apply_env_overrides(&mut cfg, lookup);
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn apply_env_overrides<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(key) = lookup(API_KEY_ENV).filter(|value| !value.trim().is_empty()) {
		cfg.providers.llm.api_key = Some(key);
	}
	if let Some(model) = lookup(MODEL_ENV).filter(|value| !value.trim().is_empty()) {
		cfg.providers.llm.model = model.trim().to_string();
	}
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.cors.allow_origins.iter().any(|origin| origin.trim().is_empty()) {
		return Err(Error::Validation {
			message: "service.cors.allow_origins must not contain empty entries.".to_string(),
		});
	}
	if cfg.planner.default_max_tabs == 0 {
		return Err(Error::Validation {
			message: "planner.default_max_tabs must be greater than zero.".to_string(),
		});
	}

	let llm = &cfg.providers.llm;

	for (label, value) in [
		("providers.llm.provider_id", &llm.provider_id),
		("providers.llm.api_base", &llm.api_base),
		("providers.llm.path", &llm.path),
		("providers.llm.model", &llm.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if !llm.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number.".to_string(),
		});
	}

	if let Some(timeout_ms) = llm.timeout_ms
		&& timeout_ms == 0
	{
		return Err(Error::Validation {
			message: "providers.llm.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &llm.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("providers.llm.default_headers.{key} must be a string."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.llm.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.providers.llm.api_key = None;
	}

	let trimmed = cfg.providers.llm.api_base.trim_end_matches('/').len();

	cfg.providers.llm.api_base.truncate(trimmed);
}
