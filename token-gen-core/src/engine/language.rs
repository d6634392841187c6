use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use log::debug;
use rand::prelude::IteratorRandom;
use serde::{Deserialize, Serialize};

use super::sampler;
use crate::io;

/// Letter-pair transition table: `c1 -> c2 -> next letter -> weight`.
pub type TransitionTable = HashMap<char, HashMap<char, HashMap<char, f64>>>;

/// Per-language trigram model.
///
/// This struct holds:
/// - `beg`: starting-trigram weights keyed by the trigram string
/// - `mid` / `end`: letter-pair transitions used mid-word vs. at the
///   final position
/// - `all`: fallback transitions consulted when `mid`/`end` have no
///   entry for the current pair
/// - `upper` / `lower`: parallel-indexed alphabets for case mapping
///
/// # Invariants
/// - Every weight is non-negative
/// - A pair with an empty next-letter set is a generation dead-end
/// - `upper` and `lower` always have the same character count
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct LanguageModel {
	beg: HashMap<String, f64>,
	mid: TransitionTable,
	end: TransitionTable,
	all: TransitionTable,
	upper: String,
	lower: String,
}

impl LanguageModel {
	/// Loads a dictionary from a JSON file if no binary cache exists,
	/// otherwise deserializes the compact cached form.
	///
	/// - `filepath` is the JSON dictionary (`{beg, mid, end, all,
	///   upper, lower}`).
	/// - Checks for a `.bin` sidecar for fast loading.
	/// - Uses `postcard` for compact serialization/deserialization.
	/// - Writes the sidecar after a successful JSON parse.
	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self, Box<dyn std::error::Error>> {
		let cache = io::cache_path(&filepath)?;
		if cache.exists() {
			let bytes = std::fs::read(cache)?;
			return Ok(postcard::from_bytes(&bytes)?);
		}

		let text = std::fs::read_to_string(&filepath)?;
		let model: LanguageModel = serde_json::from_str(&text)?;

		let bytes = postcard::to_stdvec(&model)?;
		std::fs::write(cache, bytes)?;

		Ok(model)
	}

	/// Parses a dictionary from its JSON form.
	pub fn from_json(text: &str) -> Result<Self, Box<dyn std::error::Error>> {
		Ok(serde_json::from_str(text)?)
	}

	/// Builds a model from a raw lexicon file (one word per line) with
	/// multithreaded merging.
	///
	/// # Behavior
	/// - Splits input lines into chunks (based on CPU cores * factor).
	/// - Spawns threads to build partial models for each chunk.
	/// - Merges all partial models sequentially.
	///
	/// # Errors
	/// - Returns an error if the file cannot be read or holds no words.
	pub fn from_lexicon<P: AsRef<Path>>(filepath: P) -> Result<Self, Box<dyn std::error::Error>> {
		let words = io::read_lines(&filepath)?;
		Self::from_words(&words)
	}

	/// Builds a model from a word list, chunked across worker threads.
	pub fn from_words(words: &[String]) -> Result<Self, Box<dyn std::error::Error>> {
		if words.is_empty() {
			return Err("Lexicon holds no words".into());
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = (words.len() + chunks - 1) / chunks;

		let (tx, rx) = mpsc::channel();
		for chunk in words.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			thread::spawn(move || {
				let mut partial_model = LanguageModel::default();
				for word in chunk {
					partial_model.add_word(&word);
				}
				tx.send(partial_model).expect("Failed to send from thread");
			});
		}
		drop(tx);

		let mut model = LanguageModel::default();
		for partial_model in rx.iter() {
			model.merge(&partial_model);
		}

		Ok(model)
	}

	/// Adds one word to the transition tables.
	///
	/// # Behavior
	/// - Normalizes to a capitalized first letter and lower-cased tail,
	///   the shape shipped dictionaries use.
	/// - The first three letters feed `beg`; every later letter feeds
	///   `mid` (or `end` at the last position) plus the `all` fallback.
	/// - Words shorter than three letters carry no trigram and are
	///   ignored.
	pub fn add_word(&mut self, word: &str) {
		let chars: Vec<char> = normalize_word(word.trim()).chars().collect();
		if chars.len() < 3 {
			return;
		}

		let trigram: String = chars[0..3].iter().collect();
		*self.beg.entry(trigram).or_insert(0.0) += 1.0;

		for i in 3..chars.len() {
			let c1 = chars[i - 2];
			let c2 = chars[i - 1];
			let c3 = chars[i];

			let table = if i == chars.len() - 1 { &mut self.end } else { &mut self.mid };
			bump(table, c1, c2, c3);
			bump(&mut self.all, c1, c2, c3);
		}

		for c in chars {
			self.register_case(c);
		}
	}

	/// Tracks the case pair of a letter, keeping `upper` and `lower`
	/// parallel.
	fn register_case(&mut self, c: char) {
		if !c.is_alphabetic() {
			return;
		}
		let Some(lower) = c.to_lowercase().next() else { return };
		let Some(upper) = c.to_uppercase().next() else { return };

		if !self.lower.contains(lower) {
			self.lower.push(lower);
			self.upper.push(upper);
		}
	}

	/// Merges another model into this one, summing weights.
	pub fn merge(&mut self, other: &Self) {
		for (trigram, weight) in &other.beg {
			*self.beg.entry(trigram.clone()).or_insert(0.0) += weight;
		}
		merge_table(&mut self.mid, &other.mid);
		merge_table(&mut self.end, &other.end);
		merge_table(&mut self.all, &other.all);

		for (upper, lower) in other.upper.chars().zip(other.lower.chars()) {
			if !self.lower.contains(lower) {
				self.upper.push(upper);
				self.lower.push(lower);
			}
		}
	}

	/// Draws a starting trigram, weighted by frequency.
	pub fn starting_trigram(&self) -> Option<String> {
		sampler::choose_weighted(&self.beg).cloned()
	}

	/// Returns the weighted next-letter candidates for a pair.
	///
	/// Looks up the position-specific table (`end` at the final
	/// position, `mid` otherwise) and falls back to `all`; a pair
	/// missing from both yields an empty set — a dead-end.
	pub fn candidates(&self, c1: char, c2: char, final_position: bool) -> HashMap<char, f64> {
		let table = if final_position { &self.end } else { &self.mid };
		lookup(table, c1, c2)
			.or_else(|| lookup(&self.all, c1, c2))
			.cloned()
			.unwrap_or_default()
	}

	/// Transliterates text to the language's natural (lower) case via
	/// the parallel alphabets; characters outside them pass through.
	pub fn to_natural_case(&self, text: &str) -> String {
		text.chars()
			.map(|c| match self.upper.chars().position(|u| u == c) {
				Some(index) => self.lower.chars().nth(index).unwrap_or(c),
				None => c,
			})
			.collect()
	}

	/// A model without starting trigrams can never generate.
	pub fn is_empty(&self) -> bool {
		self.beg.is_empty()
	}
}

/// Normalized dictionary shape: capitalized first letter, lower-cased
/// tail.
fn normalize_word(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		None => String::new(),
		Some(first) => {
			let first: String = first.to_uppercase().collect();
			format!("{}{}", first, chars.as_str().to_lowercase())
		}
	}
}

fn bump(table: &mut TransitionTable, c1: char, c2: char, c3: char) {
	*table
		.entry(c1)
		.or_default()
		.entry(c2)
		.or_default()
		.entry(c3)
		.or_insert(0.0) += 1.0;
}

fn merge_table(into: &mut TransitionTable, from: &TransitionTable) {
	for (c1, pairs) in from {
		let into_pairs = into.entry(*c1).or_default();
		for (c2, nexts) in pairs {
			let into_nexts = into_pairs.entry(*c2).or_default();
			for (c3, weight) in nexts {
				*into_nexts.entry(*c3).or_insert(0.0) += weight;
			}
		}
	}
}

fn lookup(table: &TransitionTable, c1: char, c2: char) -> Option<&HashMap<char, f64>> {
	let next = table.get(&c1)?.get(&c2)?;
	if next.is_empty() { None } else { Some(next) }
}

/// Explicit registry mapping language key → dictionary source.
///
/// # Responsibilities
/// - Hold the key → path mapping populated at initialization
/// - Load dictionaries lazily on first use, caching the parsed model
/// - Provide the uniform pick behind the `"random"` language sentinel
///
/// No path convention is baked into the engine: hosts either register
/// sources explicitly or scan a directory with `from_dir`.
#[derive(Debug, Default)]
pub struct LanguageRegistry {
	sources: HashMap<String, PathBuf>,
	loaded: HashMap<String, LanguageModel>,
}

impl LanguageRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry by scanning a directory for `.json`
	/// dictionaries, keyed by file stem.
	///
	/// # Errors
	/// - Returns an error if the path is not a directory.
	///
	/// # Notes
	/// - Dictionaries are only registered here; each is parsed lazily
	///   on first use.
	/// - Only files directly contained in the directory are considered.
	pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, Box<dyn std::error::Error>> {
		let dir = dir.as_ref();
		if !dir.is_dir() {
			return Err(format!("Expected a directory, got: {}", dir.display()).into());
		}

		let mut registry = Self::new();
		for file in io::list_files(dir, "json")? {
			let path = dir.join(&file);
			let key = io::language_key(&path)?;
			registry.register(&key, path);
		}
		Ok(registry)
	}

	/// Lists the dictionary keys available in a directory without
	/// registering anything.
	pub fn available_in<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, Box<dyn std::error::Error>> {
		let dir = dir.as_ref();
		let mut keys = Vec::new();
		for file in io::list_files(dir, "json")? {
			keys.push(io::language_key(dir.join(&file))?);
		}
		Ok(keys)
	}

	/// Registers a dictionary source for lazy loading.
	pub fn register(&mut self, key: &str, path: PathBuf) {
		self.sources.insert(key.to_owned(), path);
	}

	/// Inserts an already-built model (e.g. compiled from a lexicon).
	pub fn insert(&mut self, key: &str, model: LanguageModel) {
		self.loaded.insert(key.to_owned(), model);
	}

	/// Returns every registered key, loaded or not, sorted.
	pub fn keys(&self) -> Vec<String> {
		let mut keys: Vec<String> = self
			.sources
			.keys()
			.chain(self.loaded.keys().filter(|k| !self.sources.contains_key(*k)))
			.cloned()
			.collect();
		keys.sort();
		keys
	}

	/// Returns the keys of models already in memory.
	pub fn loaded_keys(&self) -> Vec<String> {
		let mut keys: Vec<String> = self.loaded.keys().cloned().collect();
		keys.sort();
		keys
	}

	/// Uniform pick among all registered keys, for the `"random"`
	/// language sentinel.
	pub fn random_key(&self) -> Option<String> {
		self.keys().into_iter().choose(&mut rand::rng())
	}

	/// Returns the model for a key, loading its dictionary on first
	/// use.
	///
	/// # Errors
	/// - Unknown key (never registered or inserted)
	/// - Dictionary file unreadable or malformed
	pub fn get_or_load(&mut self, key: &str) -> Result<&LanguageModel, Box<dyn std::error::Error>> {
		if !self.loaded.contains_key(key) {
			let path = self
				.sources
				.get(key)
				.ok_or_else(|| format!("Unknown language: {key}"))?;
			debug!("loading language '{}' from {}", key, path.display());
			let model = LanguageModel::load(path)?;
			self.loaded.insert(key.to_owned(), model);
		}

		// Just inserted or already present
		Ok(&self.loaded[key])
	}
}
