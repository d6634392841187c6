use serde::{Deserialize, Serialize};

/// Scene grid metadata relevant to footprint computation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GridInfo {
	/// Grid type as reported by the host; 0 means gridless.
	#[serde(rename = "type")]
	pub grid_type: u8,
	/// Unit label of one grid square (`"ft"`, `"feet"`, `"m"`, ...).
	pub units: String,
	/// Distance covered by one grid square, in `units`.
	pub distance: f64,
}

/// Footprint and visual scale for a placed token.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct SizePatch {
	/// Footprint in grid squares; both dimensions are always equal.
	pub width: u32,
	pub height: u32,
	/// Visual scale applied on top of the footprint, `>= 0.2`.
	pub scale: f64,
}

/// Base multiplier for a creature size category.
fn base_multiplier(size: &str) -> Option<f64> {
	match size {
		"tiny" => Some(0.5),
		"sm" => Some(0.8),
		"med" => Some(1.0),
		"lg" => Some(2.0),
		"huge" => Some(3.0),
		"grg" => Some(4.0),
		_ => None,
	}
}

/// `true` when the unit label denotes feet (`"ft"`, `"feet"`, ...).
fn feet_units(units: &str) -> bool {
	units.contains("ft") || units.contains("eet")
}

/// Computes footprint and visual scale for a creature size category.
///
/// # Behavior
/// - Unknown categories yield `None`: the caller leaves the token
///   untouched.
/// - On a typed grid measured in feet the multiplier is renormalized by
///   `5 / distance` — 5 ft is the canonical unit square, so a 10 ft
///   grid halves the multiplier.
/// - A multiplier below 1 keeps a 1×1 footprint and shrinks the visual
///   scale (floored to tenths, clamped at 0.2); otherwise the footprint
///   is the integer part and the scale carries the remainder.
pub fn scale_for(size: &str, grid: &GridInfo) -> Option<SizePatch> {
	let mut multiplier = base_multiplier(size)?;

	if grid.grid_type != 0 && feet_units(&grid.units) && grid.distance > 0.0 {
		multiplier *= 5.0 / grid.distance;
	}

	if multiplier < 1.0 {
		let scale = ((multiplier * 10.0).floor() / 10.0).max(0.2);
		Some(SizePatch { width: 1, height: 1, scale })
	} else {
		let side = multiplier.floor();
		let scale = (multiplier / side).max(0.2);
		Some(SizePatch {
			width: side as u32,
			height: side as u32,
			scale,
		})
	}
}
