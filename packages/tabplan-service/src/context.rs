use std::collections::BTreeSet;

use tabplan_domain::{Bookmark, HistoryEntry, OpenTab, SelectionRequest, tokens};

pub const NO_BOOKMARKS: &str = "No bookmarks supplied.";
pub const NO_HISTORY: &str = "No history items supplied.";
pub const NO_OPEN_TABS: &str = "No open tabs supplied.";

/// Renders the single user message sent to the model.
pub fn render_user_message(request: &SelectionRequest) -> String {
	format!(
		"User prompt:\n{prompt}\n\n\
		Bookmarks:\n{bookmarks}\n\n\
		Recent history entries:\n{history}\n\n\
		Currently open tabs:\n{open_tabs}\n\n\
		Select up to {max_tabs} bookmarks that best satisfy the user's prompt. \
		You may reference history or existing tabs when explaining your choices.",
		prompt = request.prompt(),
		bookmarks = render_bookmarks(request.bookmarks()),
		history = render_history(request.history()),
		open_tabs = render_open_tabs(request.open_tabs()),
		max_tabs = request.max_tabs(),
	)
}

pub fn render_bookmarks(bookmarks: &[Bookmark]) -> String {
	if bookmarks.is_empty() {
		return NO_BOOKMARKS.to_string();
	}

	let lines: Vec<String> = bookmarks
		.iter()
		.enumerate()
		.map(|(index, bookmark)| {
			let mut line = format!("{}. {}\n    url: {}", index + 1, bookmark.title, bookmark.url);

			if let Some(tags) = bookmark.tags.as_ref().filter(|tags| !tags.is_empty()) {
				line.push_str(" | tags: ");
				line.push_str(&tags.join(", "));
			}
			if let Some(description) =
				bookmark.description.as_deref().filter(|description| !description.is_empty())
			{
				line.push_str("\n    description: ");
				line.push_str(description);
			}

			line
		})
		.collect();

	lines.join("\n")
}

pub fn render_history(history: &[HistoryEntry]) -> String {
	if history.is_empty() {
		return NO_HISTORY.to_string();
	}

	let lines: Vec<String> = history
		.iter()
		.enumerate()
		.map(|(index, entry)| {
			let suffix = entry
				.last_visited
				.as_deref()
				.filter(|ts| !ts.is_empty())
				.map(|ts| format!(" (last visited: {ts})"))
				.unwrap_or_default();

			format!("{}. {} — {}{suffix}", index + 1, entry.title, entry.url)
		})
		.collect();

	lines.join("\n")
}

pub fn render_open_tabs(open_tabs: &[OpenTab]) -> String {
	if open_tabs.is_empty() {
		return NO_OPEN_TABS.to_string();
	}

	let lines: Vec<String> = open_tabs
		.iter()
		.enumerate()
		.map(|(index, tab)| {
			let mut status = Vec::new();

			if let Some(pinned) = tab.pinned {
				status.push(if pinned { "pinned".to_string() } else { "unpinned".to_string() });
			}
			if let Some(opened_at) = tab.opened_at.as_deref().filter(|ts| !ts.is_empty()) {
				status.push(format!("opened at {opened_at}"));
			}

			let suffix =
				if status.is_empty() { String::new() } else { format!(" ({})", status.join(", ")) };

			format!("{}. {} — {}{suffix}", index + 1, tab.title, tab.url)
		})
		.collect();

	lines.join("\n")
}

pub fn prompt_tokens(prompt: &str) -> BTreeSet<String> {
	tokens::tokenize(prompt)
}

/// Tokens drawn from the bookmark's title, description and tags.
pub fn bookmark_tokens(bookmark: &Bookmark) -> BTreeSet<String> {
	tokens::tokenize(&bookmark.descriptive_text())
}
