use rand::Rng;
use serde_json::Value;

use super::attr;
use super::language::{LanguageModel, LanguageRegistry};
use super::sampler;
use super::settings::NameOptions;

/// Sentinel language key meaning "pick any registered language".
pub const RANDOM_LANGUAGE: &str = "random";

/// Selects the language key for an actor.
///
/// Walks the attribute rules in order: read the rule's attribute from
/// the actor, lower-case the value, look it up in the rule's language
/// map. The first rule producing a language wins; otherwise the
/// configured default applies. The `"random"` sentinel resolves to a
/// uniform pick among registered languages.
pub fn select_language(options: &NameOptions, actor: &Value, registry: &LanguageRegistry) -> String {
	let mut language = None;
	for rule in &options.attributes {
		let Some(value) = attr::get_path(actor, &rule.attribute) else {
			continue;
		};
		let value = attr::to_text(value).to_lowercase();

		if let Some(key) = rule.languages.get(&value) {
			language = Some(key.clone());
			break;
		}
	}

	let language = language.unwrap_or_else(|| options.default_language.clone());
	if language == RANDOM_LANGUAGE {
		// Keep the sentinel when nothing is registered; loading it
		// will fail with a clear error downstream
		return registry.random_key().unwrap_or(language);
	}
	language
}

/// Generates one name from a language model.
///
/// # Behavior
/// - The target length is drawn once, uniformly in
///   `[min_length, max_length]`, for the whole name.
/// - The name is seeded with a weighted starting trigram, then extended
///   one letter at a time from the last two letters emitted.
/// - At the final position the `end` table is consulted instead of
///   `mid`; both fall back to the `all` table.
/// - A repeated pair never draws its own letter again (no immediate
///   triple letter); an empty candidate set ends the name early,
///   shorter than the target.
/// - The first letter is kept as generated; the remainder is mapped to
///   the language's natural case.
///
/// # Errors
/// - Returns an error for a model with no starting trigrams.
pub fn generate(language: &LanguageModel, min_length: usize, max_length: usize) -> Result<String, String> {
	if language.is_empty() {
		return Err("Language model has no starting trigrams".to_owned());
	}

	let min_length = min_length.max(1);
	let max_length = max_length.max(min_length);
	let target = rand::rng().random_range(min_length..=max_length);

	let seed = language
		.starting_trigram()
		.ok_or_else(|| "No starting trigram could be drawn".to_owned())?;
	let mut name: Vec<char> = seed.chars().collect();

	for position in 4..=target {
		if name.len() < 2 {
			break;
		}
		let c1 = name[name.len() - 2];
		let c2 = name[name.len() - 1];

		let mut candidates = language.candidates(c1, c2, position == target);
		if c1 == c2 {
			// Never extend a double letter into a triple
			candidates.remove(&c1);
		}

		match sampler::choose_weighted(&candidates) {
			Some(next) => name.push(*next),
			// Dead-end: the name ends at the current length
			None => break,
		}
	}

	let mut chars = name.into_iter();
	let first = chars.next().ok_or_else(|| "Generated an empty name".to_owned())?;
	let rest: String = chars.collect();
	Ok(format!("{}{}", first, language.to_natural_case(&rest)))
}
