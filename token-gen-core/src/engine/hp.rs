use log::{debug, warn};

/// Result of one stochastic formula evaluation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RollOutcome {
	/// Total of the evaluated formula.
	pub total: f64,
	/// Number of dice rolled by the leading die term.
	pub dice_count: u32,
}

/// External dice evaluator.
///
/// The engine never parses dice formulas itself; the host supplies an
/// implementation backed by its roller. Two evaluations are requested
/// per randomization: one for the constant (non-random) component and
/// one full stochastic roll.
pub trait DiceRoller {
	/// Evaluates only the constant part of the formula (dice terms
	/// contribute nothing).
	fn constant_total(&mut self, formula: &str) -> Result<f64, String>;

	/// Evaluates the full formula, dice included.
	fn roll(&mut self, formula: &str) -> Result<RollOutcome, String>;
}

/// Rolls hit points for a formula and applies the clamping policy:
/// the result is never below `max(dice_count + constant, 1)`.
///
/// # Returns
/// - `Ok(Some(value))` with the clamped roll
/// - `Ok(None)` when the formula is missing or blank — the gap is
///   reported as a warning and the actor's current HP stays untouched
///
/// # Errors
/// - Propagates roller failures.
pub fn randomize(formula: Option<&str>, roller: &mut dyn DiceRoller) -> Result<Option<i64>, String> {
	let formula: String = formula.unwrap_or_default().split_whitespace().collect();
	if formula.is_empty() {
		warn!("can not randomize hp: no formula is set");
		return Ok(None);
	}

	let constant = roller.constant_total(&formula)?;
	let outcome = roller.roll(&formula)?;

	let floor = (f64::from(outcome.dice_count) + constant).max(1.0);
	let value = outcome.total.max(floor);
	debug!("hp roll: formula={formula} total={} floor={floor}", outcome.total);

	Ok(Some(value.round() as i64))
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Scripted roller: fixed constant and outcome, counts its calls.
	struct StubRoller {
		constant: f64,
		outcome: RollOutcome,
		calls: u32,
	}

	impl DiceRoller for StubRoller {
		fn constant_total(&mut self, _formula: &str) -> Result<f64, String> {
			self.calls += 1;
			Ok(self.constant)
		}

		fn roll(&mut self, _formula: &str) -> Result<RollOutcome, String> {
			self.calls += 1;
			Ok(self.outcome)
		}
	}

	#[test]
	fn good_rolls_pass_through() {
		// 2d8+6 rolled at 17: above the floor of 2 + 6 = 8
		let mut roller = StubRoller {
			constant: 6.0,
			outcome: RollOutcome { total: 17.0, dice_count: 2 },
			calls: 0,
		};

		assert_eq!(randomize(Some("2d8+6"), &mut roller), Ok(Some(17)));
		assert_eq!(roller.calls, 2);
	}

	#[test]
	fn low_rolls_are_clamped_to_dice_plus_constant() {
		// 3d6+2 rolled at 4: floor is 3 + 2 = 5
		let mut roller = StubRoller {
			constant: 2.0,
			outcome: RollOutcome { total: 4.0, dice_count: 3 },
			calls: 0,
		};

		assert_eq!(randomize(Some("3d6+2"), &mut roller), Ok(Some(5)));
	}

	#[test]
	fn the_floor_is_at_least_one() {
		// 1d4-5 rolled at -2: dice + constant is -4, clamped to 1
		let mut roller = StubRoller {
			constant: -5.0,
			outcome: RollOutcome { total: -2.0, dice_count: 1 },
			calls: 0,
		};

		assert_eq!(randomize(Some("1d4-5"), &mut roller), Ok(Some(1)));
	}

	#[test]
	fn missing_formula_means_no_mutation() {
		let mut roller = StubRoller {
			constant: 0.0,
			outcome: RollOutcome { total: 0.0, dice_count: 0 },
			calls: 0,
		};

		assert_eq!(randomize(None, &mut roller), Ok(None));
		assert_eq!(randomize(Some("   "), &mut roller), Ok(None));
		assert_eq!(roller.calls, 0, "the roller must not be consulted");
	}

	#[test]
	fn whitespace_is_stripped_from_the_formula() {
		struct CheckingRoller;
		impl DiceRoller for CheckingRoller {
			fn constant_total(&mut self, formula: &str) -> Result<f64, String> {
				assert_eq!(formula, "2d6+3");
				Ok(3.0)
			}
			fn roll(&mut self, formula: &str) -> Result<RollOutcome, String> {
				assert_eq!(formula, "2d6+3");
				Ok(RollOutcome { total: 10.0, dice_count: 2 })
			}
		}

		assert_eq!(randomize(Some(" 2d6 + 3 "), &mut CheckingRoller), Ok(Some(10)));
	}

	#[test]
	fn roller_failures_propagate() {
		struct FailingRoller;
		impl DiceRoller for FailingRoller {
			fn constant_total(&mut self, _formula: &str) -> Result<f64, String> {
				Err("bad formula".to_owned())
			}
			fn roll(&mut self, _formula: &str) -> Result<RollOutcome, String> {
				unreachable!()
			}
		}

		assert!(randomize(Some("what"), &mut FailingRoller).is_err());
	}
}
