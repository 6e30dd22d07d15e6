pub mod records;
pub mod request;
pub mod tokens;

mod error;

pub use error::{Result, ValidationError};
pub use records::{Bookmark, BookmarkInput, HistoryEntry, HistoryInput, OpenTab, OpenTabInput};
pub use request::{SelectionInput, SelectionRequest, TabSuggestion};
