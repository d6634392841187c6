use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::attr;
use super::composer::{self, ComposeContext};
use super::counter::{SequenceCounter, TokenSummary};
use super::hp::{self, DiceRoller};
use super::language::LanguageRegistry;
use super::namegen;
use super::overwrite;
use super::scaler::{self, GridInfo, SizePatch};
use super::settings::Settings;

/// One token-creation intent, as supplied by the host.
///
/// Everything the engine reads arrives here as a plain value; the
/// engine never queries a live document store.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlacementInput {
	pub scene_id: String,
	pub grid: GridInfo,
	pub actor_id: String,
	/// Whether the token record is linked to its actor.
	#[serde(default)]
	pub actor_link: bool,
	/// Read-only actor attributes, dotted-path addressable.
	#[serde(default)]
	pub actor: Value,
	/// Proposed token record fields; `"name"` is the base name.
	#[serde(default)]
	pub proposed: Map<String, Value>,
	/// Tokens already present in the scene, oldest first. Only read for
	/// counter recovery on the first placement of a pair.
	#[serde(default)]
	pub existing_tokens: Vec<TokenSummary>,
	/// Invocation-time modifier that keeps the base name despite a
	/// remove/replace mode (see `NameSettings::base_name_override`).
	#[serde(default)]
	pub keep_base_name: bool,
}

/// Partial record patch: only the fields the engine decided to set.
/// Caller-owned fields are never overwritten wholesale.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TokenPatch {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub size: Option<SizePatch>,
	/// Config-overwrite fields, keyed by record field name.
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub fields: Map<String, Value>,
}

impl TokenPatch {
	pub fn is_empty(&self) -> bool {
		self.name.is_none() && self.size.is_none() && self.fields.is_empty()
	}
}

/// The engine instance: language registry, counter state, adjective
/// table and the resolved settings, behind one placement entry point.
///
/// # Responsibilities
/// - Apply the enabled mutation stages to each placement intent
/// - Own the process-lifetime counter state
/// - Resolve and lazily load languages
///
/// # Notes
/// - Single-writer discipline: one placement is processed fully before
///   the next begins. Hosts must not call `place_token` concurrently
///   for the same scene; a concurrent runtime needs an outer lock (the
///   server member uses a `Mutex`).
#[derive(Debug)]
pub struct TokenEngine {
	settings: Settings,
	languages: LanguageRegistry,
	counter: SequenceCounter,
	adjectives: Vec<String>,
}

impl TokenEngine {
	/// Creates an engine from resolved settings and a populated
	/// language registry.
	pub fn new(settings: Settings, languages: LanguageRegistry) -> Self {
		Self {
			settings,
			languages,
			counter: SequenceCounter::new(),
			adjectives: Vec::new(),
		}
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Replaces the resolved settings (the host re-resolves on change).
	pub fn set_settings(&mut self, settings: Settings) {
		self.settings = settings;
	}

	pub fn languages(&self) -> &LanguageRegistry {
		&self.languages
	}

	pub fn set_languages(&mut self, languages: LanguageRegistry) {
		self.languages = languages;
	}

	/// Supplies the pre-selected adjective table (externally fetched).
	pub fn set_adjectives(&mut self, adjectives: Vec<String>) {
		self.adjectives = adjectives;
	}

	pub fn counter(&self) -> &SequenceCounter {
		&self.counter
	}

	/// Applies the enabled mutation stages to one placement intent and
	/// returns the resulting partial patch.
	///
	/// # Behavior
	/// - Linked tokens are skipped entirely when `unlinked_only` is set.
	/// - Size scaling reads the configured size attribute; an unknown
	///   category leaves the footprint untouched.
	/// - Naming runs the composer (counter, replacement, adjective).
	/// - Config overwrites append to the patch's field map.
	///
	/// # Errors
	/// - Language loading or generation failures surface as `Err`; the
	///   counter may already have advanced by then (one placement, one
	///   number).
	pub fn place_token(&mut self, input: &PlacementInput) -> Result<TokenPatch, String> {
		debug!("place_token: scene={} actor={}", input.scene_id, input.actor_id);
		let mut patch = TokenPatch::default();

		if input.actor_link && self.settings.unlinked_only {
			// Linked tokens keep their records untouched
			return Ok(patch);
		}

		if self.settings.size.enabled {
			if let Some(size) = attr::get_str(&input.actor, &self.settings.size.attribute) {
				patch.size = scaler::scale_for(size, &input.grid);
			}
		}

		if self.settings.name.enabled {
			let proposed_name = input
				.proposed
				.get("name")
				.and_then(Value::as_str)
				.unwrap_or_default();
			let context = ComposeContext {
				scene_id: &input.scene_id,
				actor_id: &input.actor_id,
				proposed_name,
				actor: &input.actor,
				existing: &input.existing_tokens,
				adjectives: &self.adjectives,
				keep_base: input.keep_base_name,
			};
			patch.name = Some(composer::compose(
				&self.settings.name,
				&context,
				&mut self.languages,
				&mut self.counter,
			)?);
		}

		if self.settings.config.enabled {
			overwrite::apply(&self.settings.config.fields, &input.actor, &input.proposed, &mut patch.fields);
		}

		Ok(patch)
	}

	/// Rolls hit points through the host's dice roller, applying the
	/// engine's clamping policy. Returns `Ok(None)` when HP
	/// randomization is disabled or the formula is missing.
	pub fn randomize_hp(&self, formula: Option<&str>, roller: &mut dyn DiceRoller) -> Result<Option<i64>, String> {
		if !self.settings.hp.enabled {
			return Ok(None);
		}
		hp::randomize(formula, roller)
	}

	/// Generates one standalone name, outside any placement.
	///
	/// `language` may be a registered key, the `"random"` sentinel, or
	/// `None` (same as the sentinel).
	pub fn generate_name(&mut self, language: Option<&str>, min: usize, max: usize) -> Result<String, String> {
		let key = match language {
			Some(key) if key != namegen::RANDOM_LANGUAGE => key.to_owned(),
			_ => self
				.languages
				.random_key()
				.ok_or_else(|| "No languages registered".to_owned())?,
		};

		let model = self.languages.get_or_load(&key).map_err(|e| e.to_string())?;
		namegen::generate(model, min, max)
	}

	/// Clears a scene's counters; `reseed` lists actors to restart
	/// at 0.
	pub fn reset_counters(&mut self, scene_id: &str, reseed: Option<&[String]>) {
		debug!("reset_counters: scene={scene_id}");
		self.counter.reset_scene(scene_id, reseed);
	}
}
