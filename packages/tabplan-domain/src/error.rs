pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

/// A rejected input field. `field` is a path such as `bookmarks[2].url`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
	pub field: String,
	pub message: String,
}
impl ValidationError {
	pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self { field: field.into(), message: message.into() }
	}
}
