use std::collections::HashSet;

use url::Url;

use tabplan_config::Strategy;
use tabplan_domain::{SelectionRequest, TabSuggestion};

use crate::{Error, Result, heuristic, llm};

/// Enforces the output contract shared by both strategies: bounded length, non-empty reasons,
/// URLs drawn from the request's bookmarks, and a non-empty result.
///
/// LLM scores are clamped into `[0, 1]`. Heuristic scores keep their overlap-count scale.
pub fn assemble(
	strategy: Strategy,
	request: &SelectionRequest,
	suggestions: Vec<TabSuggestion>,
) -> Result<Vec<TabSuggestion>> {
	let known: HashSet<&str> =
		request.bookmarks().iter().map(|bookmark| bookmark.url.as_str()).collect();
	let mut out = Vec::with_capacity(suggestions.len().min(request.max_tabs()));
	let mut discarded = 0_usize;

	for mut suggestion in suggestions {
		if out.len() >= request.max_tabs() {
			break;
		}

		let Some(url) = canonical_url(&suggestion.url).filter(|url| known.contains(url.as_str()))
		else {
			discarded += 1;

			continue;
		};

		suggestion.url = url.into();

		if suggestion.reason.trim().is_empty() {
			suggestion.reason = placeholder_reason(strategy).to_string();
		}
		if strategy == Strategy::Llm {
			suggestion.score = suggestion.score.clamp(0.0, 1.0);
		}

		out.push(suggestion);
	}

	if discarded > 0 {
		tracing::warn!(
			strategy = strategy.as_str(),
			discarded,
			"Discarded suggestions that do not match any supplied bookmark."
		);
	}

	if out.is_empty() {
		let message = match strategy {
			Strategy::Llm => "Language model returned no tab suggestions.",
			Strategy::Heuristic => "Heuristic planner produced no tab suggestions.",
		};

		return Err(Error::EmptyResult { message: message.to_string() });
	}

	Ok(out)
}

fn canonical_url(raw: &str) -> Option<Url> {
	Url::parse(raw.trim()).ok()
}

fn placeholder_reason(strategy: Strategy) -> &'static str {
	match strategy {
		Strategy::Llm => llm::DEFAULT_REASON,
		Strategy::Heuristic => heuristic::REASON_NO_MATCH,
	}
}
