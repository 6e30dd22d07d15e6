use tabplan_domain::ValidationError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Caller input was malformed. Raised before any network call.
	#[error("Invalid request: {message}")]
	Validation { message: String, fields: Vec<String> },
	/// Deployment fault, such as a missing API credential.
	#[error("Configuration error: {message}")]
	Configuration { message: String },
	/// Any failure contacting or interpreting the language model.
	#[error("Planning failed: {message}")]
	Planning { message: String },
	#[error("{message}")]
	EmptyResult { message: String },
}
impl From<ValidationError> for Error {
	fn from(err: ValidationError) -> Self {
		Self::Validation { message: err.to_string(), fields: vec![err.field] }
	}
}

impl From<tabplan_providers::Error> for Error {
	fn from(err: tabplan_providers::Error) -> Self {
		Self::Planning { message: format!("LLM request failed: {err}") }
	}
}
