use std::{cmp::Ordering, collections::BTreeSet};

use tabplan_domain::{Bookmark, SelectionRequest, TabSuggestion};

use crate::{BoxFuture, PlanOptions, Planner, Result, context};

pub const REASON_NO_PROMPT_KEYWORDS: &str = "no prompt keywords; preserving original order.";
pub const REASON_NO_BOOKMARK_TEXT: &str = "bookmark has no descriptive text to compare.";
pub const REASON_TITLE_SUBSTRING: &str = "prompt keywords appear within the bookmark title.";
pub const REASON_NO_MATCH: &str = "no keyword matches; keeping bookmark for context.";

pub const TITLE_SUBSTRING_SCORE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
	pub index: usize,
	pub score: f64,
	pub reason: String,
}

/// Offline keyword-overlap planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPlanner;
impl Planner for HeuristicPlanner {
	fn plan<'a>(
		&'a self,
		request: &'a SelectionRequest,
		_options: &'a PlanOptions,
	) -> BoxFuture<'a, Result<Vec<TabSuggestion>>> {
		let limit = i64::try_from(request.max_tabs()).unwrap_or(i64::MAX);
		let suggestions = suggest(request.bookmarks(), request.prompt(), limit);

		Box::pin(async move { Ok(suggestions) })
	}
}

pub fn score(bookmark: &Bookmark, prompt_tokens: &BTreeSet<String>) -> (f64, String) {
	if prompt_tokens.is_empty() {
		return (0.0, REASON_NO_PROMPT_KEYWORDS.to_string());
	}

	let bookmark_tokens = context::bookmark_tokens(bookmark);

	if bookmark_tokens.is_empty() {
		return (0.0, REASON_NO_BOOKMARK_TEXT.to_string());
	}

	let matched: Vec<&str> =
		prompt_tokens.intersection(&bookmark_tokens).map(String::as_str).collect();

	if !matched.is_empty() {
		return (matched.len() as f64, matched.join(", "));
	}

	let title = bookmark.title.to_lowercase();

	if prompt_tokens.iter().any(|token| title.contains(token.as_str())) {
		return (TITLE_SUBSTRING_SCORE, REASON_TITLE_SUBSTRING.to_string());
	}

	(0.0, REASON_NO_MATCH.to_string())
}

/// Scores every bookmark and orders by descending score, then by input position.
/// A `limit` of zero or less keeps every bookmark.
pub fn rank(bookmarks: &[Bookmark], prompt_tokens: &BTreeSet<String>, limit: i64) -> Vec<Scored> {
	let mut scored: Vec<Scored> = bookmarks
		.iter()
		.enumerate()
		.map(|(index, bookmark)| {
			let (score, reason) = score(bookmark, prompt_tokens);

			Scored { index, score, reason }
		})
		.collect();

	scored.sort_by(|a, b| match b.score.total_cmp(&a.score) {
		Ordering::Equal => a.index.cmp(&b.index),
		other => other,
	});

	if let Ok(limit) = usize::try_from(limit)
		&& limit > 0
	{
		scored.truncate(limit);
	}

	scored
}

pub fn suggest(bookmarks: &[Bookmark], prompt: &str, limit: i64) -> Vec<TabSuggestion> {
	let prompt_tokens = context::prompt_tokens(prompt);

	rank(bookmarks, &prompt_tokens, limit)
		.into_iter()
		.map(|scored| {
			let bookmark = &bookmarks[scored.index];

			TabSuggestion {
				title: bookmark.title.clone(),
				url: bookmark.url.to_string(),
				reason: scored.reason,
				score: scored.score,
			}
		})
		.collect()
}
