use serde::{Deserialize, Serialize};

use crate::{
	Result, ValidationError,
	records::{
		self, Bookmark, BookmarkInput, HistoryEntry, HistoryInput, OpenTab, OpenTabInput,
	},
};

/// Request body as received from a caller, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionInput {
	#[serde(default)]
	pub prompt: String,
	#[serde(default)]
	pub bookmarks: Vec<BookmarkInput>,
	#[serde(default)]
	pub history: Option<Vec<HistoryInput>>,
	#[serde(default)]
	pub open_tabs: Option<Vec<OpenTabInput>>,
}
impl SelectionInput {
	/// Checks the request-level invariants first, then every record list in order.
	pub fn validate(&self, max_tabs: i64) -> Result<SelectionRequest> {
		let (prompt, max_tabs) = check_request_shape(&self.prompt, self.bookmarks.len(), max_tabs)?;
		let bookmarks = records::validate_bookmarks(&self.bookmarks)?;
		let history = self.history.as_deref().map(records::validate_history).transpose()?;
		let open_tabs = self.open_tabs.as_deref().map(records::validate_open_tabs).transpose()?;

		Ok(SelectionRequest { prompt, bookmarks, history, open_tabs, max_tabs })
	}
}

/// A validated selection request: non-empty prompt, at least one bookmark, positive cap.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest {
	prompt: String,
	bookmarks: Vec<Bookmark>,
	history: Option<Vec<HistoryEntry>>,
	open_tabs: Option<Vec<OpenTab>>,
	max_tabs: usize,
}
impl SelectionRequest {
	pub fn new(
		prompt: &str,
		bookmarks: Vec<Bookmark>,
		history: Option<Vec<HistoryEntry>>,
		open_tabs: Option<Vec<OpenTab>>,
		max_tabs: i64,
	) -> Result<Self> {
		let (prompt, max_tabs) = check_request_shape(prompt, bookmarks.len(), max_tabs)?;

		Ok(Self { prompt, bookmarks, history, open_tabs, max_tabs })
	}

	/// The prompt with surrounding whitespace removed.
	pub fn prompt(&self) -> &str {
		&self.prompt
	}

	pub fn bookmarks(&self) -> &[Bookmark] {
		&self.bookmarks
	}

	pub fn history(&self) -> &[HistoryEntry] {
		self.history.as_deref().unwrap_or(&[])
	}

	pub fn open_tabs(&self) -> &[OpenTab] {
		self.open_tabs.as_deref().unwrap_or(&[])
	}

	pub fn max_tabs(&self) -> usize {
		self.max_tabs
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSuggestion {
	pub title: String,
	pub url: String,
	pub reason: String,
	pub score: f64,
}

fn check_request_shape(prompt: &str, bookmark_count: usize, max_tabs: i64) -> Result<(String, usize)> {
	let prompt = prompt.trim();

	if prompt.is_empty() {
		return Err(ValidationError::new("prompt", "Prompt must not be empty."));
	}
	if bookmark_count == 0 {
		return Err(ValidationError::new("bookmarks", "At least one bookmark must be provided."));
	}
	if max_tabs <= 0 {
		return Err(ValidationError::new("max_tabs", "max_tabs must be greater than zero."));
	}

	let max_tabs = usize::try_from(max_tabs)
		.map_err(|_| ValidationError::new("max_tabs", "max_tabs is too large."))?;

	Ok((prompt.to_string(), max_tabs))
}
