pub mod assemble;
pub mod context;
pub mod heuristic;
pub mod llm;

mod error;

pub use error::{Error, Result};
pub use heuristic::HeuristicPlanner;
pub use llm::LlmPlanner;
pub use tabplan_config::Strategy;

use std::{future::Future, pin::Pin, sync::Arc, time::Instant};

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use tabplan_config::{Config, LlmProviderConfig};
use tabplan_domain::{SelectionInput, SelectionRequest, TabSuggestion};
use tabplan_providers::chat::{self, ChatCompletion, ChatRequest};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		api_key: &'a str,
		request: &'a ChatRequest,
	) -> BoxFuture<'a, tabplan_providers::Result<ChatCompletion>>;
}

/// A selection strategy. The returned list is capped at `request.max_tabs()` by the assembler,
/// after suggestions that match no bookmark have been dropped.
pub trait Planner
where
	Self: Send + Sync,
{
	fn plan<'a>(
		&'a self,
		request: &'a SelectionRequest,
		options: &'a PlanOptions,
	) -> BoxFuture<'a, Result<Vec<TabSuggestion>>>;
}

/// Per-request overrides. Only the LLM strategy reads them.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
	pub model: Option<String>,
	pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
	pub strategy: Strategy,
	pub tabs: Vec<TabSuggestion>,
}

pub struct TabPlanService {
	pub cfg: Config,
	heuristic: HeuristicPlanner,
	llm: LlmPlanner,
}

struct DefaultProviders;

impl ChatProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		api_key: &'a str,
		request: &'a ChatRequest,
	) -> BoxFuture<'a, tabplan_providers::Result<ChatCompletion>> {
		Box::pin(chat::complete(cfg, api_key, request))
	}
}

impl TabPlanService {
	pub fn new(cfg: Config) -> Self {
		Self::with_provider(cfg, Arc::new(DefaultProviders))
	}

	pub fn with_provider(cfg: Config, provider: Arc<dyn ChatProvider>) -> Self {
		let llm = LlmPlanner::new(cfg.providers.llm.clone(), provider);

		Self { cfg, heuristic: HeuristicPlanner, llm }
	}

	pub fn planner(&self, strategy: Strategy) -> &dyn Planner {
		match strategy {
			Strategy::Llm => &self.llm,
			Strategy::Heuristic => &self.heuristic,
		}
	}

	/// Validates `input`, runs the chosen strategy and assembles the final list.
	pub async fn plan(
		&self,
		strategy: Strategy,
		input: &SelectionInput,
		max_tabs: i64,
		options: &PlanOptions,
	) -> Result<PlanResponse> {
		let request_id = Uuid::new_v4();
		let span = tracing::info_span!("plan_tabs", %request_id, strategy = strategy.as_str());

		async move {
			let started = Instant::now();
			let request = input.validate(max_tabs)?;
			let raw = match self.planner(strategy).plan(&request, options).await {
				Ok(raw) => raw,
				Err(err) => {
					tracing::warn!(error = %err, "Planning failed.");

					return Err(err);
				},
			};
			let tabs = assemble::assemble(strategy, &request, raw)?;

			tracing::info!(
				suggestions = tabs.len(),
				elapsed_ms = started.elapsed().as_millis() as u64,
				"Planned tabs."
			);

			Ok(PlanResponse { strategy, tabs })
		}
		.instrument(span)
		.await
	}
}
