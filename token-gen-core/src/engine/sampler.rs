use std::collections::HashMap;
use std::hash::Hash;

use rand::Rng;

/// Draws one key from a weighted mapping.
///
/// The probability of selecting a key is proportional to its weight.
///
/// This function performs:
/// - an O(n) scan to sum the weights
/// - a cumulative subtraction to select a bucket
///
/// # Returns
/// - `Some(&Key)` for a successful draw
/// - `None` when the mapping is empty or every weight is zero — the draw
///   range collapses and nothing can be selected. Callers must treat this
///   as a dead-end and terminate the current step, never retry.
///
/// # Notes
/// - Weights are expected to be non-negative; negative weights break the
///   cumulative walk and are a caller bug.
/// - Iteration order does not affect the distribution.
pub fn choose_weighted<K>(weights: &HashMap<K, f64>) -> Option<&K>
where
	K: Eq + Hash,
{
	if weights.is_empty() {
		return None;
	}

	let total: f64 = weights.values().sum();
	if total <= 0.0 {
		// All-zero weights collapse the draw range
		return None;
	}

	// Draw in [0, total) and walk the cumulative sum
	let mut draw = rand::rng().random_range(0.0..total);

	let mut fallback: Option<&K> = None;
	for (key, weight) in weights {
		if draw < *weight {
			return Some(key);
		}
		draw -= weight;
		if *weight > 0.0 {
			fallback = Some(key);
		}
	}

	// Floating-point edge at the top of the range: should not happen,
	// but kept for safety.
	fallback
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_mapping_is_a_dead_end() {
		let weights: HashMap<char, f64> = HashMap::new();
		assert_eq!(choose_weighted(&weights), None);
	}

	#[test]
	fn zero_weights_are_a_dead_end() {
		let mut weights = HashMap::new();
		weights.insert('a', 0.0);
		weights.insert('b', 0.0);
		assert_eq!(choose_weighted(&weights), None);
	}

	#[test]
	fn single_key_always_wins() {
		let mut weights = HashMap::new();
		weights.insert("only", 0.25);
		for _ in 0..100 {
			assert_eq!(choose_weighted(&weights), Some(&"only"));
		}
	}

	#[test]
	fn zero_weight_key_is_never_drawn() {
		let mut weights = HashMap::new();
		weights.insert('a', 1.0);
		weights.insert('b', 0.0);
		for _ in 0..1000 {
			assert_eq!(choose_weighted(&weights), Some(&'a'));
		}
	}

	#[test]
	fn draws_follow_the_weights() {
		let mut weights = HashMap::new();
		weights.insert('A', 1.0);
		weights.insert('B', 3.0);

		let draws = 10_000;
		let mut b_count = 0;
		for _ in 0..draws {
			if choose_weighted(&weights) == Some(&'B') {
				b_count += 1;
			}
		}

		// Expected 75%, with a generous tolerance of ±5%
		let ratio = b_count as f64 / draws as f64;
		assert!(
			(0.70..=0.80).contains(&ratio),
			"expected ~0.75, got {}",
			ratio
		);
	}
}
