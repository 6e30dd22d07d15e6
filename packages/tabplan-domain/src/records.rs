use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Result, ValidationError};

/// Bookmark as received from a caller. Missing `title` or `url` deserialize as empty strings so
/// the validator can name the offending field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmarkInput {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
	#[serde(default)]
	pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryInput {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub last_visited: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenTabInput {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub opened_at: Option<String>,
	#[serde(default)]
	pub pinned: Option<bool>,
}

/// A selectable bookmark. Identity is its position in the request, so duplicates are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
	pub title: String,
	pub url: Url,
	pub tags: Option<Vec<String>>,
	pub description: Option<String>,
}
impl Bookmark {
	/// Title, description and tags joined by spaces.
	pub fn descriptive_text(&self) -> String {
		let mut text = self.title.clone();

		if let Some(description) = self.description.as_deref() {
			text.push(' ');
			text.push_str(description);
		}

		for tag in self.tags.iter().flatten() {
			text.push(' ');
			text.push_str(tag);
		}

		text
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
	pub title: String,
	pub url: Url,
	pub last_visited: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenTab {
	pub title: String,
	pub url: Url,
	pub opened_at: Option<String>,
	pub pinned: Option<bool>,
}

/// Validates every bookmark, stopping at the first invalid record.
pub fn validate_bookmarks(items: &[BookmarkInput]) -> Result<Vec<Bookmark>> {
	items
		.iter()
		.enumerate()
		.map(|(index, item)| -> Result<Bookmark> {
			let field = |name: &str| format!("bookmarks[{index}].{name}");

			Ok(Bookmark {
				title: require_title(&item.title, field("title"))?,
				url: parse_url(&item.url, field("url"))?,
				tags: item.tags.clone(),
				description: item.description.clone(),
			})
		})
		.collect()
}

pub fn validate_history(items: &[HistoryInput]) -> Result<Vec<HistoryEntry>> {
	items
		.iter()
		.enumerate()
		.map(|(index, item)| -> Result<HistoryEntry> {
			let field = |name: &str| format!("history[{index}].{name}");

			Ok(HistoryEntry {
				title: require_title(&item.title, field("title"))?,
				url: parse_url(&item.url, field("url"))?,
				last_visited: item.last_visited.clone(),
			})
		})
		.collect()
}

pub fn validate_open_tabs(items: &[OpenTabInput]) -> Result<Vec<OpenTab>> {
	items
		.iter()
		.enumerate()
		.map(|(index, item)| -> Result<OpenTab> {
			let field = |name: &str| format!("open_tabs[{index}].{name}");

			Ok(OpenTab {
				title: require_title(&item.title, field("title"))?,
				url: parse_url(&item.url, field("url"))?,
				opened_at: item.opened_at.clone(),
				pinned: item.pinned,
			})
		})
		.collect()
}

/// Parses an absolute `http`/`https` URL with a host.
pub fn parse_url(raw: &str, field: String) -> Result<Url> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return Err(ValidationError::new(field, "URL is required."));
	}

	let url = Url::parse(trimmed)
		.map_err(|err| ValidationError::new(field.clone(), format!("URL is malformed: {err}.")))?;

	if !matches!(url.scheme(), "http" | "https") {
		return Err(ValidationError::new(field, "URL scheme must be http or https."));
	}
	if url.host_str().map(str::is_empty).unwrap_or(true) {
		return Err(ValidationError::new(field, "URL must include a host."));
	}

	Ok(url)
}

fn require_title(title: &str, field: String) -> Result<String> {
	if title.trim().is_empty() {
		return Err(ValidationError::new(field, "Title must be non-empty."));
	}

	Ok(title.to_string())
}
