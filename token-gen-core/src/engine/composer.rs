use log::debug;
use rand::Rng;
use serde_json::Value;

use super::counter::{SequenceCounter, TokenSummary};
use super::language::LanguageRegistry;
use super::namegen;
use super::settings::{AffixPosition, NameSettings, ReplaceMode};

/// Everything the composer needs from a single placement event.
pub struct ComposeContext<'a> {
	pub scene_id: &'a str,
	pub actor_id: &'a str,
	/// Name the host proposed for the record.
	pub proposed_name: &'a str,
	/// Read-only actor attributes.
	pub actor: &'a Value,
	/// Tokens already present in the scene, oldest first.
	pub existing: &'a [TokenSummary],
	/// Externally supplied adjective table. Expected non-empty when the
	/// adjective stage is enabled; an empty table skips the stage.
	pub adjectives: &'a [String],
	/// Invocation-time modifier that keeps the base name despite a
	/// remove/replace mode (only honored with `base_name_override`).
	pub keep_base: bool,
}

/// Builds the final token name from the configured stages.
///
/// Stage order is fixed: base/replacement → adjective → numeric suffix.
/// The numeric suffix always comes last, regardless of the adjective
/// position, and the counter advances even when a later stage fails —
/// one placement, one number.
pub fn compose(
	settings: &NameSettings,
	context: &ComposeContext<'_>,
	languages: &mut LanguageRegistry,
	counter: &mut SequenceCounter,
) -> Result<String, String> {
	let mut name = context.proposed_name.to_owned();

	let drop_base = matches!(settings.replace, ReplaceMode::Remove | ReplaceMode::Replace)
		&& !(settings.base_name_override && context.keep_base);
	if drop_base {
		name.clear();
	}

	// The counter advances before the other stages so recovery sees the
	// scene exactly as it was at placement time
	let mut number_suffix = String::new();
	if settings.number.enabled {
		number_suffix = counter.next_suffix(context.scene_id, context.actor_id, &settings.number, context.existing);
	}

	if settings.replace == ReplaceMode::Replace {
		let key = namegen::select_language(&settings.options, context.actor, languages);
		let language = languages.get_or_load(&key).map_err(|e| e.to_string())?;
		let generated = namegen::generate(language, settings.options.min, settings.options.max)?;

		name = if name.is_empty() {
			generated
		} else {
			format!("{} {}", generated, name)
		};
	}

	if settings.adjective.enabled {
		match pick_adjective(context.adjectives) {
			Some(adjective) => {
				name = if name.is_empty() {
					adjective.clone()
				} else {
					match settings.adjective.position {
						AffixPosition::Front => format!("{} {}", adjective, name),
						AffixPosition::Back => format!("{} {}", name, adjective),
					}
				};
			}
			// Non-empty tables are a caller precondition; skip rather
			// than fail the whole placement
			None => debug!("adjective stage skipped: empty table"),
		}
	}

	name.push_str(&number_suffix);
	Ok(name)
}

/// Uniform pick over the adjective table.
fn pick_adjective(adjectives: &[String]) -> Option<&String> {
	if adjectives.is_empty() {
		return None;
	}
	adjectives.get(rand::rng().random_range(0..adjectives.len()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::language::LanguageModel;
	use crate::engine::settings::NameOptions;

	fn fixed_language() -> LanguageModel {
		// One trigram, no transitions: always generates "Zug"
		LanguageModel::from_json(
			r#"{"beg": {"Zug": 1.0}, "mid": {}, "end": {}, "all": {}, "upper": "GUZ", "lower": "guz"}"#,
		)
		.unwrap()
	}

	fn replace_settings() -> NameSettings {
		NameSettings {
			replace: ReplaceMode::Replace,
			options: NameOptions {
				default_language: "orcish".to_owned(),
				..NameOptions::default()
			},
			..NameSettings::default()
		}
	}

	fn context<'a>(proposed: &'a str, adjectives: &'a [String]) -> ComposeContext<'a> {
		ComposeContext {
			scene_id: "S",
			actor_id: "A",
			proposed_name: proposed,
			actor: &Value::Null,
			existing: &[],
			adjectives,
			keep_base: false,
		}
	}

	#[test]
	fn stage_order_is_base_adjective_number() {
		let mut languages = LanguageRegistry::new();
		languages.insert("orcish", fixed_language());
		let mut counter = SequenceCounter::new();

		let mut settings = replace_settings();
		settings.adjective.enabled = true;
		settings.adjective.position = AffixPosition::Front;

		let adjectives = vec!["Sneaky".to_owned()];
		let name = compose(&settings, &context("Goblin", &adjectives), &mut languages, &mut counter).unwrap();

		assert_eq!(name, "Sneaky Zug (1)");
	}

	#[test]
	fn number_suffix_is_last_even_with_a_back_adjective() {
		let mut languages = LanguageRegistry::new();
		languages.insert("orcish", fixed_language());
		let mut counter = SequenceCounter::new();

		let mut settings = replace_settings();
		settings.adjective.enabled = true;
		settings.adjective.position = AffixPosition::Back;

		let adjectives = vec!["Rabid".to_owned()];
		let name = compose(&settings, &context("Goblin", &adjectives), &mut languages, &mut counter).unwrap();

		assert_eq!(name, "Zug Rabid (1)");
	}

	#[test]
	fn remove_mode_keeps_only_the_enabled_stages() {
		let mut languages = LanguageRegistry::new();
		let mut counter = SequenceCounter::new();

		let mut settings = NameSettings {
			replace: ReplaceMode::Remove,
			..NameSettings::default()
		};
		settings.adjective.enabled = false;

		let name = compose(&settings, &context("Goblin", &[]), &mut languages, &mut counter).unwrap();
		assert_eq!(name, " (1)");
	}

	#[test]
	fn base_name_override_honors_the_modifier() {
		let mut languages = LanguageRegistry::new();
		languages.insert("orcish", fixed_language());
		let mut counter = SequenceCounter::new();

		let mut settings = replace_settings();
		settings.base_name_override = true;
		settings.adjective.enabled = false;

		let mut ctx = context("Goblin", &[]);
		ctx.keep_base = true;

		let name = compose(&settings, &ctx, &mut languages, &mut counter).unwrap();
		assert_eq!(name, "Zug Goblin (1)");
	}

	#[test]
	fn nothing_mode_keeps_the_proposed_name() {
		let mut languages = LanguageRegistry::new();
		let mut counter = SequenceCounter::new();

		let mut settings = NameSettings::default();
		settings.adjective.enabled = false;
		settings.number.enabled = false;

		let name = compose(&settings, &context("Goblin", &[]), &mut languages, &mut counter).unwrap();
		assert_eq!(name, "Goblin");
	}

	#[test]
	fn empty_adjective_table_skips_the_stage() {
		let mut languages = LanguageRegistry::new();
		let mut counter = SequenceCounter::new();

		let mut settings = NameSettings::default();
		settings.adjective.enabled = true;

		let name = compose(&settings, &context("Goblin", &[]), &mut languages, &mut counter).unwrap();
		assert_eq!(name, "Goblin (1)");
	}

	#[test]
	fn counter_advances_once_per_composition() {
		let mut languages = LanguageRegistry::new();
		let mut counter = SequenceCounter::new();

		let mut settings = NameSettings::default();
		settings.adjective.enabled = false;

		for expected in ["Goblin (1)", "Goblin (2)", "Goblin (3)"] {
			let name = compose(&settings, &context("Goblin", &[]), &mut languages, &mut counter).unwrap();
			assert_eq!(name, expected);
		}
	}
}
