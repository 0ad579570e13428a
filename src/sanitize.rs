//! Fixture-name compaction.
//!
//! Cache ids embed JSON and can grow arbitrarily large; fixture names must be
//! usable as file and URL path segments. This module replaces forbidden
//! characters and collapses oversized embedded JSON spans into their MD5
//! digests until the name fits the length budget.

use crate::fingerprint::md5_hex;
use std::ops::Range;

/// Upper bound on a fixture name, extension included.
pub const MAX_NAME_LENGTH: usize = 175;

/// Extension every fixture name carries.
pub const NAME_EXTENSION: &str = ".json";

/// Maps a cache id to a bounded, filesystem- and URL-safe fixture name.
///
/// Quotes are stripped, colons become `=`, slashes become `-`, and the first
/// `-_` sequence collapses to `_`. While the name exceeds
/// [`MAX_NAME_LENGTH`], the longest embedded bracketed span is replaced with
/// its MD5 digest; a span is only replaced when the digest is strictly
/// shorter. If the name held any bracketed span and still exceeds the bound
/// after compaction, the entire pre-extension name is hashed instead.
///
/// The bound is best effort only for names that never contained a bracketed
/// span: those are returned over-length rather than truncated.
///
/// # Examples
///
/// ```
/// use replaykit::sanitize::sanitize_fixture_name;
///
/// let name = sanitize_fixture_name("v1/sessions_POST");
/// assert_eq!(name, "v1-sessions_POST.json");
/// ```
pub fn sanitize_fixture_name(cache_id: &str) -> String {
	let mut name = String::with_capacity(cache_id.len() + NAME_EXTENSION.len());
	for character in cache_id.chars() {
		match character {
			'"' => {}
			':' => name.push('='),
			'/' => name.push('-'),
			other => name.push(other),
		}
	}
	if let Some(position) = name.find("-_") {
		name.replace_range(position..position + 2, "_");
	}
	if !name.ends_with(NAME_EXTENSION) {
		name.push_str(NAME_EXTENSION);
	}

	let had_span = longest_bracketed_span(&name).is_some();
	while name.len() > MAX_NAME_LENGTH {
		let Some(span) = longest_bracketed_span(&name) else {
			break;
		};
		let digest = md5_hex(&name[span.clone()]);
		if digest.len() >= span.len() {
			// No further compaction possible on this span.
			break;
		}
		name.replace_range(span, &digest);
	}

	if name.len() > MAX_NAME_LENGTH && had_span {
		let stem_length = name.len() - NAME_EXTENSION.len();
		let digest = md5_hex(&name[..stem_length]);
		name = format!("{digest}{NAME_EXTENSION}");
	}
	name
}

/// Finds the longest top-level bracketed span in `input`.
///
/// Spans open at nesting depth 1 with `{` or `[` and close with `}` or `]`.
/// Ties break toward the earlier span; a later span wins only when strictly
/// longer. Single forward scan, no recursion.
fn longest_bracketed_span(input: &str) -> Option<Range<usize>> {
	let mut best: Option<Range<usize>> = None;
	let mut depth = 0usize;
	let mut start = 0usize;

	for (index, byte) in input.bytes().enumerate() {
		match byte {
			b'{' | b'[' => {
				depth += 1;
				if depth == 1 {
					start = index;
				}
			}
			b'}' | b']' if depth > 0 => {
				depth -= 1;
				if depth == 0 {
					let span = start..index + 1;
					let longer = best
						.as_ref()
						.map(|current| span.len() > current.len())
						.unwrap_or(true);
					if longer {
						best = Some(span);
					}
				}
			}
			_ => {}
		}
	}
	best
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_character_substitution() {
		assert_eq!(
			sanitize_fixture_name("host:443/v1/\"x\""),
			"host=443-v1-x.json",
		);
	}

	#[test]
	fn test_first_dash_underscore_collapsed() {
		assert_eq!(sanitize_fixture_name("a/_b/_c"), "a_b-_c.json");
	}

	#[test]
	fn test_short_names_untouched() {
		let name = sanitize_fixture_name("v1/payments_POST");
		assert_eq!(name, "v1-payments_POST.json");
		assert!(name.len() <= MAX_NAME_LENGTH);
	}

	#[test]
	fn test_long_embedded_object_hashed() {
		let payload: String = (0..40)
			.map(|index| format!("\"key{index}\"=\"value{index}\""))
			.collect::<Vec<_>>()
			.join(",");
		let cache_id = format!("v1/payments_POST_{{{payload}}}");
		let name = sanitize_fixture_name(&cache_id);
		assert!(name.len() <= MAX_NAME_LENGTH, "{} chars", name.len());
		assert!(name.starts_with("v1-payments_POST_"));
		assert!(name.ends_with(NAME_EXTENSION));
	}

	#[test]
	fn test_whole_name_hash_fallback() {
		// Many small spans, each not worth hashing: compaction stalls and the
		// whole stem is hashed instead.
		let spans: String = (0..30).map(|_| "{\"a\"=1}x").collect();
		let cache_id = format!("endpoint_{spans}");
		let name = sanitize_fixture_name(&cache_id);
		assert_eq!(name.len(), 32 + NAME_EXTENSION.len());
		assert!(name.ends_with(NAME_EXTENSION));
	}

	#[test]
	fn test_fallback_after_only_span_consumed() {
		// The embedded object is worth hashing, but the non-bracket prefix
		// alone already exceeds the bound: the whole stem must be hashed.
		let payload: String = (0..40)
			.map(|index| format!("\"key{index}\"=\"value{index}\""))
			.collect::<Vec<_>>()
			.join(",");
		let prefix = "x".repeat(180);
		let cache_id = format!("{prefix}_{{{payload}}}");
		let name = sanitize_fixture_name(&cache_id);
		assert_eq!(name.len(), 32 + NAME_EXTENSION.len());
		assert!(name.ends_with(NAME_EXTENSION));
	}

	#[test]
	fn test_no_span_overlength_accepted() {
		let cache_id = "x".repeat(200);
		let name = sanitize_fixture_name(&cache_id);
		assert_eq!(name.len(), 200 + NAME_EXTENSION.len());
	}

	#[test]
	fn test_longest_span_selected() {
		let input = "a{12}b{123456}c";
		let span = longest_bracketed_span(input).expect("span");
		assert_eq!(&input[span], "{123456}");
	}

	#[test]
	fn test_span_tie_breaks_to_earlier() {
		let input = "a{12}b{34}c";
		let span = longest_bracketed_span(input).expect("span");
		assert_eq!(&input[span], "{12}");
	}

	#[test]
	fn test_nested_spans_count_as_one() {
		let input = "x{a{b}c[d]}y";
		let span = longest_bracketed_span(input).expect("span");
		assert_eq!(&input[span], "{a{b}c[d]}");
	}

	#[test]
	fn test_unbalanced_closer_ignored() {
		assert_eq!(longest_bracketed_span("}}no spans here"), None);
	}
}
