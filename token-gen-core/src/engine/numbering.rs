use serde::{Deserialize, Serialize};

/// Numbering notation used for sequence suffixes.
///
/// Serialized with the short codes the settings object uses
/// (`"ar"`, `"alu"`, `"all"`, `"ro"`).
///
/// Each notation is a matched encode/decode pair of pure functions;
/// `decode(encode(n)) == n` holds on the notation's supported range.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Notation {
	/// Plain decimal, any `n >= 0`.
	#[default]
	#[serde(rename = "ar")]
	Arabic,
	/// Repeating-letter scheme with uppercase letters, `n >= 1`.
	#[serde(rename = "alu")]
	AlphaUpper,
	/// Repeating-letter scheme with lowercase letters, `n >= 1`.
	#[serde(rename = "all")]
	AlphaLower,
	/// Subtractive roman numerals, `1..=3999`.
	#[serde(rename = "ro")]
	Roman,
}

impl Notation {
	/// Formats a counter value in this notation.
	///
	/// Returns `None` for values outside the notation's range
	/// (negative arabic, non-positive alphabetic, roman outside
	/// `1..=3999`).
	pub fn encode(&self, value: i64) -> Option<String> {
		match self {
			Notation::Arabic => {
				if value < 0 {
					None
				} else {
					Some(value.to_string())
				}
			}
			Notation::AlphaUpper => alphabetize(value, b'A'),
			Notation::AlphaLower => alphabetize(value, b'a'),
			Notation::Roman => romanize(value),
		}
	}

	/// Parses a suffix token back into a counter value.
	///
	/// Returns `None` for malformed input; the counter-recovery path
	/// treats that as 0.
	pub fn decode(&self, text: &str) -> Option<i64> {
		match self {
			Notation::Arabic => parse_arabic(text),
			Notation::AlphaUpper => dealphabetize(text, b'A'),
			Notation::AlphaLower => dealphabetize(text, b'a'),
			Notation::Roman => deromanize(text),
		}
	}
}

/// Leading-digit-run parse; anything without a leading digit is invalid.
fn parse_arabic(text: &str) -> Option<i64> {
	let digits: String = text
		.trim()
		.chars()
		.take_while(|c| c.is_ascii_digit())
		.collect();
	if digits.is_empty() {
		return None;
	}
	digits.parse().ok()
}

/// Repeating-letter encoding: one max letter (`Z`/`z`) per full 26, then
/// the remainder letter. A remainder of zero emits nothing, so 26 is
/// `"Z"`, 27 is `"ZA"` and 52 is `"ZZ"`.
///
/// This is NOT positional base-26; the matching decode simply sums
/// letter values.
fn alphabetize(mut value: i64, base: u8) -> Option<String> {
	if value <= 0 {
		return None;
	}

	let mut out = String::new();
	while value >= 26 {
		out.push((base + 25) as char);
		value -= 26;
	}
	if value > 0 {
		out.push((base + value as u8 - 1) as char);
	}

	Some(out)
}

/// Sums letter values (`A`=1 .. `Z`=26); the inverse of `alphabetize`
/// because repeated max letters sum back correctly.
fn dealphabetize(text: &str, base: u8) -> Option<i64> {
	if text == "0" {
		return Some(0);
	}
	if text.is_empty() {
		return None;
	}

	let mut total: i64 = 0;
	for c in text.chars() {
		let offset = (c as u32).wrapping_sub(base as u32);
		if offset >= 26 {
			return None;
		}
		total += i64::from(offset) + 1;
	}

	Some(total)
}

/// Digit expansions for hundreds, tens and ones, indexed `digit + group * 10`.
const ROMAN_KEY: [&str; 30] = [
	"", "C", "CC", "CCC", "CD", "D", "DC", "DCC", "DCCC", "CM", //
	"", "X", "XX", "XXX", "XL", "L", "LX", "LXX", "LXXX", "XC", //
	"", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX",
];

/// Standard subtractive notation for `1..=3999`.
fn romanize(value: i64) -> Option<String> {
	if !(1..=3999).contains(&value) {
		return None;
	}

	let mut out = "M".repeat((value / 1000) as usize);
	out.push_str(ROMAN_KEY[(value / 100 % 10) as usize]);
	out.push_str(ROMAN_KEY[10 + (value / 10 % 10) as usize]);
	out.push_str(ROMAN_KEY[20 + (value % 10) as usize]);

	Some(out)
}

/// Parses a roman numeral, validating the canonical grammar: optional
/// thousands (`M*`), then each of hundreds, tens and ones in
/// subtractive-additive form. Rejects malformed input such as `"IIII"`
/// or `"VX"`.
fn deromanize(text: &str) -> Option<i64> {
	let upper = text.trim().to_uppercase();
	if upper.is_empty() {
		return None;
	}
	let chars: Vec<char> = upper.chars().collect();

	let mut total: i64 = 0;
	let mut pos = 0;
	while pos < chars.len() && chars[pos] == 'M' {
		total += 1000;
		pos += 1;
	}

	for (one, five, ten, unit) in [('C', 'D', 'M', 100), ('X', 'L', 'C', 10), ('I', 'V', 'X', 1)] {
		let (value, next) = take_digit(&chars, pos, one, five, ten, unit);
		total += value;
		pos = next;
	}

	if pos != chars.len() {
		// Leftover characters mean the grammar was violated
		return None;
	}
	Some(total)
}

/// Consumes one decimal digit of a roman numeral: the subtractive pairs
/// (`one``ten` = 9, `one``five` = 4) or the additive form
/// (`five`? `one`{0,3}).
fn take_digit(chars: &[char], mut pos: usize, one: char, five: char, ten: char, unit: i64) -> (i64, usize) {
	if pos + 1 < chars.len() && chars[pos] == one {
		if chars[pos + 1] == ten {
			return (9 * unit, pos + 2);
		}
		if chars[pos + 1] == five {
			return (4 * unit, pos + 2);
		}
	}

	let mut value = 0;
	if pos < chars.len() && chars[pos] == five {
		value += 5 * unit;
		pos += 1;
	}
	let mut repeats = 0;
	while pos < chars.len() && chars[pos] == one && repeats < 3 {
		value += unit;
		pos += 1;
		repeats += 1;
	}

	(value, pos)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn arabic_round_trip() {
		for n in [0, 1, 7, 42, 999, 12345] {
			let encoded = Notation::Arabic.encode(n).unwrap();
			assert_eq!(Notation::Arabic.decode(&encoded), Some(n));
		}
	}

	#[test]
	fn arabic_rejects_non_numeric() {
		assert_eq!(Notation::Arabic.decode("Goblin"), None);
		assert_eq!(Notation::Arabic.decode(""), None);
		assert_eq!(Notation::Arabic.encode(-1), None);
	}

	#[test]
	fn alphabetic_known_values() {
		assert_eq!(Notation::AlphaUpper.encode(1).as_deref(), Some("A"));
		assert_eq!(Notation::AlphaUpper.encode(26).as_deref(), Some("Z"));
		assert_eq!(Notation::AlphaUpper.encode(27).as_deref(), Some("ZA"));
		assert_eq!(Notation::AlphaUpper.encode(52).as_deref(), Some("ZZ"));
		assert_eq!(Notation::AlphaLower.encode(53).as_deref(), Some("zza"));
		assert_eq!(Notation::AlphaUpper.encode(0), None);
	}

	#[test]
	fn alphabetic_round_trip() {
		for n in 1..=200 {
			let upper = Notation::AlphaUpper.encode(n).unwrap();
			assert_eq!(Notation::AlphaUpper.decode(&upper), Some(n), "upper {n}");
			let lower = Notation::AlphaLower.encode(n).unwrap();
			assert_eq!(Notation::AlphaLower.decode(&lower), Some(n), "lower {n}");
		}
	}

	#[test]
	fn alphabetic_rejects_foreign_characters() {
		assert_eq!(Notation::AlphaUpper.decode("A1"), None);
		assert_eq!(Notation::AlphaUpper.decode("ab"), None);
		assert_eq!(Notation::AlphaLower.decode("AB"), None);
		assert_eq!(Notation::AlphaUpper.decode("0"), Some(0));
	}

	#[test]
	fn roman_known_values() {
		assert_eq!(Notation::Roman.encode(1994).as_deref(), Some("MCMXCIV"));
		assert_eq!(Notation::Roman.decode("MCMXCIV"), Some(1994));
		assert_eq!(Notation::Roman.encode(3999).as_deref(), Some("MMMCMXCIX"));
		assert_eq!(Notation::Roman.decode("iv"), Some(4));
	}

	#[test]
	fn roman_round_trip() {
		for n in 1..=3999 {
			let encoded = Notation::Roman.encode(n).unwrap();
			assert_eq!(Notation::Roman.decode(&encoded), Some(n), "roman {n}");
		}
	}

	#[test]
	fn roman_rejects_invalid_input() {
		assert_eq!(Notation::Roman.encode(0), None);
		assert_eq!(Notation::Roman.encode(4000), None);
		for bad in ["", "IIII", "VX", "CCCC", "IC", "XM", "ABC", "MIXI"] {
			assert_eq!(Notation::Roman.decode(bad), None, "{bad:?} should be invalid");
		}
	}

	#[test]
	fn notation_codes_round_trip_through_serde() {
		for (notation, code) in [
			(Notation::Arabic, "\"ar\""),
			(Notation::AlphaUpper, "\"alu\""),
			(Notation::AlphaLower, "\"all\""),
			(Notation::Roman, "\"ro\""),
		] {
			assert_eq!(serde_json::to_string(&notation).unwrap(), code);
			assert_eq!(serde_json::from_str::<Notation>(code).unwrap(), notation);
		}
	}
}
