//! Structural response comparison.
//!
//! Drift detection compares a replayed fixture against a freshly captured
//! live response. Volatile identifier fields and float formatting noise must
//! not count as drift, and a live-side session expiry must never invalidate a
//! recorded success.

use serde_json::Value;

/// Keys whose values are volatile between runs and never compared.
pub(crate) const VOLATILE_KEY_BLACKLIST: &[&str] =
	&["GWCLIENTID", "appUid", "prorated_price", "id", "created_at"];

/// Whether a response payload carries the error flag.
pub(crate) fn is_error_flagged(payload: &Value) -> bool {
	payload
		.get("isError")
		.and_then(Value::as_bool)
		.unwrap_or(false)
}

/// Deep-compares a recorded fixture against a live response.
///
/// Blacklisted keys are skipped, numeric-looking values containing a decimal
/// point compare as floats rounded to three decimal places, plain numbers
/// compare by value rather than textual form, and nested objects recurse. Only the recorded side's keys are visited; extra live
/// fields are ignored.
///
/// One-directional exception: a recorded non-error paired with a live error
/// is treated as equal, so an expired session on the live side never reads as
/// drift. The reverse pairing compares normally.
pub fn responses_match(recorded: &Value, live: &Value) -> bool {
	if !is_error_flagged(recorded) && is_error_flagged(live) {
		return true;
	}

	match (recorded, live) {
		(Value::Object(recorded_fields), Value::Object(live_fields)) => {
			let mut matched = true;
			for (key, recorded_value) in recorded_fields {
				if VOLATILE_KEY_BLACKLIST.contains(&key.as_str()) {
					continue;
				}
				let live_value = live_fields.get(key).unwrap_or(&Value::Null);
				if !values_match(recorded_value, live_value) {
					matched = false;
				}
			}
			matched
		}
		_ => values_match(recorded, live),
	}
}

fn values_match(recorded: &Value, live: &Value) -> bool {
	if let (Some(recorded_float), Some(live_float)) =
		(normalized_float(recorded), normalized_float(live))
	{
		return recorded_float == live_float;
	}
	// An integer and a float rendering of the same quantity are equal;
	// numbers compare by value, not by textual form.
	if let (Value::Number(recorded_number), Value::Number(live_number)) = (recorded, live) {
		return recorded_number.as_f64() == live_number.as_f64();
	}
	if recorded.is_object() && live.is_object() {
		return responses_match(recorded, live);
	}
	recorded == live
}

/// Parses a float out of a number or numeric string, rounded to a fixed
/// precision of three decimal places. Values without a decimal point are not
/// treated as floats.
fn normalized_float(value: &Value) -> Option<f64> {
	let text = match value {
		Value::String(text) => text.clone(),
		Value::Number(number) => number.to_string(),
		_ => return None,
	};
	if !text.contains('.') {
		return None;
	}
	let parsed: f64 = text.trim().parse().ok()?;
	Some((parsed * 1000.0).round() / 1000.0)
}
