use serde_json::Value;

/// Resolves a dotted path (e.g. `"system.traits.size"`) inside a
/// read-only attributes object.
///
/// Returns `None` for an empty path or any missing segment.
pub(crate) fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
	if path.is_empty() {
		return None;
	}

	let mut current = value;
	for segment in path.split('.') {
		current = current.get(segment)?;
	}
	Some(current)
}

/// Resolves a dotted path to a string slice, if the value is a string.
pub(crate) fn get_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
	get_path(value, path).and_then(Value::as_str)
}

/// Renders an attribute value the way language rules match it: bare
/// strings without quotes, everything else in its JSON form.
pub(crate) fn to_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
