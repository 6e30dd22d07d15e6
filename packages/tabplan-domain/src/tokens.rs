use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

static WORD: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"[\p{Alphabetic}\p{N}]+(?:-[\p{Alphabetic}\p{N}]+)*")
		.expect("Word token pattern must compile.")
});

/// Lower-cases `text` and returns its unique word tokens. A token is a run of letters or digits,
/// optionally joined by single internal hyphens (`state-of-the-art`).
pub fn tokenize(text: &str) -> BTreeSet<String> {
	let lowered = text.to_lowercase();

	WORD.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}
