use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::attr;

/// One randomization rule applied to a single token config field.
///
/// The shape is an explicit tagged variant chosen when the settings
/// are parsed; there is no field-presence sniffing at application time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OverwriteRule {
	/// Writes the configured value as-is.
	Fixed { value: Value },
	/// Multiplies the field's existing numeric value by a factor drawn
	/// uniformly in `[min, max)` and truncated to two decimals.
	Range { min: f64, max: f64 },
	/// Writes `{ "attribute": path }` as the field value.
	///
	/// Only meaningful for fields that are themselves attribute
	/// bindings (bar1/bar2 targets); kept as that special case rather
	/// than generalized.
	AttributeRef { attribute: String },
	/// Boolean coin flip.
	CoinFlip,
}

/// A field name paired with its overwrite rule.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldOverwrite {
	pub field: String,
	#[serde(rename = "use")]
	pub enabled: bool,
	#[serde(flatten)]
	pub rule: OverwriteRule,
}

/// Applies every enabled rule, writing only the decided fields into
/// `patch`.
///
/// # Parameters
/// - `actor`: read-only actor attributes, consulted by `AttributeRef`.
/// - `current`: the proposed record fields, read by `Range` rules; a
///   missing or zero value falls back to 1.
pub fn apply(fields: &[FieldOverwrite], actor: &Value, current: &Map<String, Value>, patch: &mut Map<String, Value>) {
	for overwrite in fields {
		if !overwrite.enabled {
			continue;
		}

		match &overwrite.rule {
			OverwriteRule::Fixed { value } => {
				patch.insert(overwrite.field.clone(), value.clone());
			}
			OverwriteRule::Range { min, max } => {
				let existing = current
					.get(&overwrite.field)
					.and_then(Value::as_f64)
					.filter(|value| *value != 0.0)
					.unwrap_or(1.0);
				patch.insert(overwrite.field.clone(), Value::from(existing * random_factor(*min, *max)));
			}
			OverwriteRule::AttributeRef { attribute } => {
				// Only write a binding that resolves on this actor; the
				// empty path clears the binding
				if attribute.is_empty() || attr::get_path(actor, attribute).is_some() {
					let mut binding = Map::new();
					binding.insert("attribute".to_owned(), Value::from(attribute.clone()));
					patch.insert(overwrite.field.clone(), Value::Object(binding));
				}
			}
			OverwriteRule::CoinFlip => {
				patch.insert(overwrite.field.clone(), Value::from(rand::rng().random_bool(0.5)));
			}
		}
	}
}

/// Uniform factor in `[min, max)`, truncated to two decimals. A
/// degenerate range collapses to `min`.
fn random_factor(min: f64, max: f64) -> f64 {
	let drawn = if max <= min {
		min
	} else {
		rand::rng().random_range(min..max)
	};
	(drawn * 100.0).floor() / 100.0
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn rule(field: &str, rule: OverwriteRule) -> FieldOverwrite {
		FieldOverwrite {
			field: field.to_owned(),
			enabled: true,
			rule,
		}
	}

	#[test]
	fn fixed_rules_copy_the_value() {
		let fields = vec![rule("displayBars", OverwriteRule::Fixed { value: json!(40) })];
		let mut patch = Map::new();

		apply(&fields, &Value::Null, &Map::new(), &mut patch);
		assert_eq!(patch.get("displayBars"), Some(&json!(40)));
	}

	#[test]
	fn disabled_rules_are_skipped() {
		let mut disabled = rule("vision", OverwriteRule::CoinFlip);
		disabled.enabled = false;
		let mut patch = Map::new();

		apply(&[disabled], &Value::Null, &Map::new(), &mut patch);
		assert!(patch.is_empty());
	}

	#[test]
	fn range_rules_scale_the_existing_value() {
		let fields = vec![rule("scale", OverwriteRule::Range { min: 0.8, max: 1.2 })];
		let current = Map::from_iter([("scale".to_owned(), json!(1.0))]);

		for _ in 0..200 {
			let mut patch = Map::new();
			apply(&fields, &Value::Null, &current, &mut patch);
			let value = patch.get("scale").and_then(Value::as_f64).unwrap();
			assert!((0.8..=1.2).contains(&value), "{value} out of range");
		}
	}

	#[test]
	fn range_rules_treat_missing_values_as_one() {
		let fields = vec![rule("rotation", OverwriteRule::Range { min: 2.0, max: 2.0 })];
		let mut patch = Map::new();

		apply(&fields, &Value::Null, &Map::new(), &mut patch);
		assert_eq!(patch.get("rotation").and_then(Value::as_f64), Some(2.0));
	}

	#[test]
	fn attribute_refs_write_a_binding_object() {
		let fields = vec![rule(
			"bar1",
			OverwriteRule::AttributeRef { attribute: "attributes.hp".to_owned() },
		)];
		let actor = json!({"attributes": {"hp": {"value": 10}}});
		let mut patch = Map::new();

		apply(&fields, &actor, &Map::new(), &mut patch);
		assert_eq!(patch.get("bar1"), Some(&json!({"attribute": "attributes.hp"})));
	}

	#[test]
	fn unresolvable_attribute_refs_write_nothing() {
		let fields = vec![rule(
			"bar1",
			OverwriteRule::AttributeRef { attribute: "attributes.mana".to_owned() },
		)];
		let actor = json!({"attributes": {"hp": {"value": 10}}});
		let mut patch = Map::new();

		apply(&fields, &actor, &Map::new(), &mut patch);
		assert!(patch.is_empty());
	}

	#[test]
	fn coin_flips_produce_booleans() {
		let fields = vec![rule("vision", OverwriteRule::CoinFlip)];
		let mut seen = [false, false];

		for _ in 0..200 {
			let mut patch = Map::new();
			apply(&fields, &Value::Null, &Map::new(), &mut patch);
			match patch.get("vision").and_then(Value::as_bool) {
				Some(true) => seen[0] = true,
				Some(false) => seen[1] = true,
				None => panic!("coin flip produced a non-boolean"),
			}
		}
		assert!(seen[0] && seen[1], "200 flips never produced both sides");
	}

	#[test]
	fn rules_parse_from_tagged_json() {
		let parsed: Vec<FieldOverwrite> = serde_json::from_str(
			r#"[
				{"field": "vision", "use": true, "mode": "fixed", "value": true},
				{"field": "rotation", "use": true, "mode": "range", "min": 0.0, "max": 360.0},
				{"field": "bar1", "use": false, "mode": "attribute_ref", "attribute": ""},
				{"field": "mirror", "use": true, "mode": "coin_flip"}
			]"#,
		)
		.unwrap();

		assert_eq!(parsed.len(), 4);
		assert_eq!(parsed[0].rule, OverwriteRule::Fixed { value: json!(true) });
		assert_eq!(parsed[1].rule, OverwriteRule::Range { min: 0.0, max: 360.0 });
		assert_eq!(parsed[3].rule, OverwriteRule::CoinFlip);
	}
}
