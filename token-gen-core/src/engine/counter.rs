use std::collections::HashMap;

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::settings::NumberingConfig;

/// Summary of an already-placed token, used for history recovery.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TokenSummary {
	pub actor_id: String,
	pub name: String,
}

/// Per-scene, per-actor sequence counters.
///
/// # Responsibilities
/// - Track the last assigned number for each `(scene, actor)` pair
/// - Recover a starting value from existing token names on first use
/// - Advance by the configured increment policy and format the suffix
///
/// # Invariants
/// - Counter state lives for the process lifetime only; nothing is
///   persisted by the engine
/// - Recovery runs at most once per `(scene, actor)` pair: every later
///   request uses the in-memory value directly
/// - State is shared mutable data under single-writer discipline; the
///   caller serializes placements (see the engine docs)
#[derive(Debug, Default)]
pub struct SequenceCounter {
	/// `scene id -> actor id -> last assigned number`
	last: HashMap<String, HashMap<String, i64>>,
}

impl SequenceCounter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Advances the counter for `(scene_id, actor_id)` and returns the
	/// formatted suffix `prefix + encode(value) + suffix`.
	///
	/// # Parameters
	/// - `config`: numbering configuration (notation, affixes, range).
	/// - `existing`: tokens already present in the scene, oldest first;
	///   only read when the pair has no in-memory entry yet.
	///
	/// # Behavior
	/// - First request for a pair recovers the current value from the
	///   most recently created same-actor token name (0 when absent or
	///   unparseable).
	/// - The increment is +1, or uniform in `[1, range]` when
	///   `range > 1`.
	/// - The counter advances *before* formatting and the new value is
	///   stored immediately.
	pub fn next_suffix(&mut self, scene_id: &str, actor_id: &str, config: &NumberingConfig, existing: &[TokenSummary]) -> String {
		let scene = self.last.entry(scene_id.to_owned()).or_default();
		let current = match scene.get(actor_id) {
			Some(value) => *value,
			None => Self::recover(config, actor_id, existing),
		};

		let step = if config.range > 1 {
			rand::rng().random_range(1..=config.range)
		} else {
			1
		};
		let value = current + step;
		scene.insert(actor_id.to_owned(), value);

		let encoded = match config.notation.encode(value) {
			Some(encoded) => encoded,
			None => {
				warn!("counter value {value} is not representable in {:?}", config.notation);
				String::new()
			}
		};
		format!("{}{}{}", config.prefix, encoded, config.suffix)
	}

	/// Recovers the current counter value from the last created token
	/// of the same actor: strip the configured prefix and suffix, then
	/// decode the embedded numeral. Absent or unparseable ⇒ 0.
	fn recover(config: &NumberingConfig, actor_id: &str, existing: &[TokenSummary]) -> i64 {
		let Some(last) = existing.iter().rev().find(|token| token.actor_id == actor_id) else {
			return 0;
		};

		// Text after the last prefix occurrence; an empty prefix keeps
		// the whole name
		let tail = if config.prefix.is_empty() {
			last.name.as_str()
		} else {
			match last.name.rfind(&config.prefix) {
				Some(index) => &last.name[index + config.prefix.len()..],
				None => last.name.as_str(),
			}
		};
		if tail.is_empty() {
			return 0;
		}

		// Text before the first suffix occurrence
		let numeral = if config.suffix.is_empty() {
			tail
		} else {
			match tail.find(&config.suffix) {
				Some(index) => &tail[..index],
				None => tail,
			}
		};

		config.notation.decode(numeral).unwrap_or(0)
	}

	/// Returns the last assigned number for a pair, if any.
	pub fn current(&self, scene_id: &str, actor_id: &str) -> Option<i64> {
		self.last.get(scene_id)?.get(actor_id).copied()
	}

	/// Clears every counter of a scene.
	///
	/// With `reseed`, the listed actors are restarted at 0 instead of
	/// forgotten — their next suffix starts over at 1 without running
	/// history recovery again.
	pub fn reset_scene(&mut self, scene_id: &str, reseed: Option<&[String]>) {
		self.last.remove(scene_id);

		if let Some(actors) = reseed {
			let scene = self.last.entry(scene_id.to_owned()).or_default();
			for actor in actors {
				scene.insert(actor.clone(), 0);
			}
		}
	}
}
