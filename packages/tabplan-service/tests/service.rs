use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use tabplan_config::{Config, LlmProviderConfig};
use tabplan_domain::{BookmarkInput, SelectionInput};
use tabplan_providers::chat::{ChatCompletion, ChatRequest};
use tabplan_service::{BoxFuture, ChatProvider, Error, PlanOptions, Strategy, TabPlanService, llm};

enum Reply {
	Content(String),
	Completion(ChatCompletion),
	Failure(String),
}

struct SpyChat {
	calls: Arc<AtomicUsize>,
	last_request: Arc<Mutex<Option<ChatRequest>>>,
	reply: Reply,
}
impl SpyChat {
	fn new(reply: Reply) -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)), last_request: Arc::default(), reply }
	}

	fn with_content(content: &str) -> Self {
		Self::new(Reply::Content(content.to_string()))
	}
}

impl ChatProvider for SpyChat {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_api_key: &'a str,
		request: &'a ChatRequest,
	) -> BoxFuture<'a, tabplan_providers::Result<ChatCompletion>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		*self.last_request.lock().expect("lock") = Some(request.clone());

		let reply = match &self.reply {
			Reply::Content(content) => Ok(ChatCompletion::from_content(content.clone())),
			Reply::Completion(completion) => Ok(completion.clone()),
			Reply::Failure(message) =>
				Err(tabplan_providers::Error::InvalidResponse { message: message.clone() }),
		};

		Box::pin(async move { reply })
	}
}

fn config(api_key: Option<&str>) -> Config {
	let mut cfg = Config::default();

	cfg.providers.llm.api_key = api_key.map(String::from);
	cfg.providers.llm.model = "default-model".to_string();

	cfg
}

fn service(spy: SpyChat) -> (TabPlanService, Arc<AtomicUsize>, Arc<Mutex<Option<ChatRequest>>>) {
	let calls = spy.calls.clone();
	let last_request = spy.last_request.clone();
	let service = TabPlanService::with_provider(config(Some("test-key")), Arc::new(spy));

	(service, calls, last_request)
}

fn bookmark(title: &str, url: &str, tags: &[&str]) -> BookmarkInput {
	BookmarkInput {
		title: title.to_string(),
		url: url.to_string(),
		tags: if tags.is_empty() { None } else { Some(tags.iter().map(|t| t.to_string()).collect()) },
		description: None,
	}
}

fn rust_input() -> SelectionInput {
	SelectionInput {
		prompt: "read about rust ownership".to_string(),
		bookmarks: vec![
			bookmark("Cooking pasta", "https://b", &[]),
			bookmark("Rust Ownership Guide", "https://a", &["rust"]),
		],
		history: None,
		open_tabs: None,
	}
}

#[tokio::test]
async fn heuristic_ranks_matching_bookmark_first() {
	let (service, calls, _) = service(SpyChat::with_content("{}"));
	let response = service
		.plan(Strategy::Heuristic, &rust_input(), 5, &PlanOptions::default())
		.await
		.expect("Heuristic planning failed.");

	assert_eq!(response.strategy, Strategy::Heuristic);
	assert_eq!(response.tabs.len(), 2);
	assert_eq!(response.tabs[0].title, "Rust Ownership Guide");
	assert_eq!(response.tabs[0].url, "https://a/");
	assert_eq!(response.tabs[0].score, 2.0);
	assert_eq!(response.tabs[0].reason, "ownership, rust");
	assert_eq!(response.tabs[1].title, "Cooking pasta");
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn heuristic_output_is_bounded_and_sorted() {
	let (service, _, _) = service(SpyChat::with_content("{}"));
	let input = SelectionInput {
		prompt: "rust async tokio".to_string(),
		bookmarks: vec![
			bookmark("Gardening", "https://g.example", &[]),
			bookmark("Tokio tutorial", "https://t.example", &["rust", "async"]),
			bookmark("Rustacean news", "https://n.example", &[]),
			bookmark("Async book", "https://a.example", &["rust"]),
		],
		history: None,
		open_tabs: None,
	};
	let response = service
		.plan(Strategy::Heuristic, &input, 3, &PlanOptions::default())
		.await
		.expect("Heuristic planning failed.");
	let scores: Vec<f64> = response.tabs.iter().map(|tab| tab.score).collect();

	assert_eq!(scores, vec![3.0, 2.0, 0.5]);
	assert!(response.tabs.iter().all(|tab| !tab.reason.is_empty()));
}

#[tokio::test]
async fn empty_bookmarks_fail_before_any_call() {
	let (service, calls, _) = service(SpyChat::with_content(r#"{"tabs": []}"#));
	let input = SelectionInput { bookmarks: Vec::new(), ..rust_input() };

	for strategy in [Strategy::Llm, Strategy::Heuristic] {
		let err = service
			.plan(strategy, &input, 5, &PlanOptions::default())
			.await
			.expect_err("Empty bookmarks must fail.");

		match err {
			Error::Validation { fields, .. } => assert_eq!(fields, vec!["bookmarks".to_string()]),
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_url_is_a_validation_error() {
	let (service, calls, _) = service(SpyChat::with_content(r#"{"tabs": []}"#));
	let mut input = rust_input();

	input.bookmarks.push(bookmark("Broken", "example.com/no-scheme", &[]));

	let err = service
		.plan(Strategy::Llm, &input, 5, &PlanOptions::default())
		.await
		.expect_err("Invalid URL must fail.");

	match err {
		Error::Validation { fields, .. } => assert_eq!(fields, vec!["bookmarks[2].url".to_string()]),
		other => panic!("Unexpected error: {other:?}"),
	}
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_api_key_is_a_configuration_error() {
	let spy = SpyChat::with_content(r#"{"tabs": []}"#);
	let calls = spy.calls.clone();
	let service = TabPlanService::with_provider(config(None), Arc::new(spy));
	let err = service
		.plan(Strategy::Llm, &rust_input(), 5, &PlanOptions::default())
		.await
		.expect_err("Missing key must fail.");

	assert!(matches!(err, Error::Configuration { .. }), "Unexpected error: {err:?}");
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_api_key_does_not_block_heuristic() {
	let service = TabPlanService::with_provider(
		config(None),
		Arc::new(SpyChat::with_content(r#"{"tabs": []}"#)),
	);
	let response = service
		.plan(Strategy::Heuristic, &rust_input(), 1, &PlanOptions::default())
		.await
		.expect("Heuristic planning must not need a key.");

	assert_eq!(response.tabs.len(), 1);
}

#[tokio::test]
async fn llm_request_carries_schema_prompt_and_overrides() {
	let (service, _, last_request) = service(SpyChat::with_content(
		r#"{"tabs": [{"title": "Rust Ownership Guide", "url": "https://a/", "reason": "On topic.", "score": 0.92}]}"#,
	));
	let options = PlanOptions { model: Some("override-model".to_string()), temperature: Some(1.7) };
	let response = service
		.plan(Strategy::Llm, &rust_input(), 3, &options)
		.await
		.expect("LLM planning failed.");

	assert_eq!(response.strategy, Strategy::Llm);
	assert_eq!(response.tabs.len(), 1);
	assert_eq!(response.tabs[0].score, 0.92);

	let request = last_request.lock().expect("lock").clone().expect("No request captured.");

	assert_eq!(request.model, "override-model");
	assert_eq!(request.temperature, 1.7);
	assert!(!request.stream);
	assert_eq!(request.messages.len(), 2);
	assert_eq!(request.messages[0].role, "system");
	assert_eq!(request.messages[0].content, llm::SYSTEM_PROMPT);
	assert_eq!(request.messages[1].role, "user");
	assert!(request.messages[1].content.starts_with("User prompt:\nread about rust ownership"));
	assert!(request.messages[1].content.contains("Select up to 3 bookmarks"));
	assert_eq!(request.response_format, Some(llm::response_format()));
}

#[tokio::test]
async fn llm_uses_configured_defaults_without_overrides() {
	let (service, _, last_request) = service(SpyChat::with_content(
		r#"{"tabs": [{"title": "A", "url": "https://a", "reason": "r", "score": 0.5}]}"#,
	));

	service
		.plan(Strategy::Llm, &rust_input(), 3, &PlanOptions::default())
		.await
		.expect("LLM planning failed.");

	let request = last_request.lock().expect("lock").clone().expect("No request captured.");

	assert_eq!(request.model, "default-model");
	assert_eq!(request.temperature, tabplan_config::DEFAULT_TEMPERATURE);
}

#[tokio::test]
async fn llm_drops_item_missing_url() {
	let (service, _, _) = service(SpyChat::with_content(
		r#"{"tabs": [
			{"title": "Rust Ownership Guide", "url": "https://a", "reason": "Covers it.", "score": 0.8},
			{"title": "Cooking pasta", "reason": "Dinner.", "score": 0.1}
		]}"#,
	));
	let response = service
		.plan(Strategy::Llm, &rust_input(), 5, &PlanOptions::default())
		.await
		.expect("LLM planning failed.");

	assert_eq!(response.tabs.len(), 1);
	assert_eq!(response.tabs[0].title, "Rust Ownership Guide");
}

#[tokio::test]
async fn llm_output_is_truncated_to_limit() {
	let (service, _, _) = service(SpyChat::with_content(
		r#"{"tabs": [
			{"title": "Rust Ownership Guide", "url": "https://a", "reason": "r", "score": 0.9},
			{"title": "Cooking pasta", "url": "https://b", "reason": "r", "score": 0.1}
		]}"#,
	));
	let response = service
		.plan(Strategy::Llm, &rust_input(), 1, &PlanOptions::default())
		.await
		.expect("LLM planning failed.");

	assert_eq!(response.tabs.len(), 1);
	assert_eq!(response.tabs[0].url, "https://a/");
}

#[tokio::test]
async fn llm_untraceable_suggestion_does_not_consume_the_limit() {
	let (service, _, _) = service(SpyChat::with_content(
		r#"{"tabs": [
			{"title": "Invented", "url": "https://invented.example", "reason": "r", "score": 0.9},
			{"title": "Rust Ownership Guide", "url": "https://a", "reason": "Covers it.", "score": 0.7}
		]}"#,
	));
	let response = service
		.plan(Strategy::Llm, &rust_input(), 1, &PlanOptions::default())
		.await
		.expect("LLM planning failed.");

	assert_eq!(response.tabs.len(), 1);
	assert_eq!(response.tabs[0].title, "Rust Ownership Guide");
	assert_eq!(response.tabs[0].url, "https://a/");
}

#[tokio::test]
async fn llm_missing_tabs_key_is_a_planning_error() {
	let (service, _, _) = service(SpyChat::with_content(r#"{"suggestions": []}"#));
	let err = service
		.plan(Strategy::Llm, &rust_input(), 5, &PlanOptions::default())
		.await
		.expect_err("Missing tabs must fail.");

	assert!(matches!(err, Error::Planning { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn llm_without_choices_is_a_planning_error() {
	let (service, _, _) = service(SpyChat::new(Reply::Completion(ChatCompletion::default())));
	let err = service
		.plan(Strategy::Llm, &rust_input(), 5, &PlanOptions::default())
		.await
		.expect_err("No choices must fail.");

	assert!(matches!(err, Error::Planning { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn provider_failure_is_a_planning_error() {
	let (service, calls, _) = service(SpyChat::new(Reply::Failure("timed out".to_string())));
	let err = service
		.plan(Strategy::Llm, &rust_input(), 5, &PlanOptions::default())
		.await
		.expect_err("Provider failure must fail.");

	assert!(matches!(err, Error::Planning { .. }), "Unexpected error: {err:?}");
	assert!(err.to_string().contains("timed out"));
	assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn llm_with_no_usable_items_is_an_empty_result() {
	let (service, _, _) = service(SpyChat::with_content(
		r#"{"tabs": [{"title": "Invented", "url": "https://elsewhere.example", "reason": "r", "score": 0.9}]}"#,
	));
	let err = service
		.plan(Strategy::Llm, &rust_input(), 5, &PlanOptions::default())
		.await
		.expect_err("Untraceable output must fail.");

	assert!(matches!(err, Error::EmptyResult { .. }), "Unexpected error: {err:?}");
}
