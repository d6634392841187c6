use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::numbering::Notation;
use super::overwrite::FieldOverwrite;

/// Fully-resolved engine configuration.
///
/// The host owns loading, migration and persistence of this object; the
/// engine only ever receives it resolved. Defaults mirror a sensible
/// out-of-the-box table setup: numbering on, adjectives on, size
/// scaling on, config overwrites off.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Settings {
	/// Skip tokens whose records are linked to their actor.
	pub unlinked_only: bool,
	pub name: NameSettings,
	pub hp: HpSettings,
	pub size: SizeSettings,
	pub config: OverwriteSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			unlinked_only: true,
			name: NameSettings::default(),
			hp: HpSettings::default(),
			size: SizeSettings::default(),
			config: OverwriteSettings::default(),
		}
	}
}

/// Configuration of the name composer and its stages.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct NameSettings {
	#[serde(rename = "use")]
	pub enabled: bool,
	pub number: NumberingConfig,
	pub replace: ReplaceMode,
	pub adjective: AdjectiveSettings,
	pub options: NameOptions,
	/// Allows an invocation-time modifier to keep the base name even in
	/// remove/replace mode.
	pub base_name_override: bool,
}

impl Default for NameSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			number: NumberingConfig::default(),
			replace: ReplaceMode::Nothing,
			adjective: AdjectiveSettings::default(),
			options: NameOptions::default(),
			base_name_override: false,
		}
	}
}

/// Numeric-suffix configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct NumberingConfig {
	#[serde(rename = "use")]
	pub enabled: bool,
	pub prefix: String,
	pub suffix: String,
	#[serde(rename = "type")]
	pub notation: Notation,
	/// Random increment step: `<= 1` always advances by one, otherwise
	/// by a uniform integer in `[1, range]`.
	pub range: i64,
}

impl Default for NumberingConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			prefix: " (".to_owned(),
			suffix: ")".to_owned(),
			notation: Notation::Arabic,
			range: 1,
		}
	}
}

/// What happens to the proposed record name.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplaceMode {
	/// Keep the base name untouched.
	#[default]
	#[serde(alias = "")]
	Nothing,
	/// Drop the base name.
	Remove,
	/// Drop the base name and generate a new one.
	Replace,
}

/// Adjective affix stage configuration. The candidate word table itself
/// is supplied externally.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct AdjectiveSettings {
	#[serde(rename = "use")]
	pub enabled: bool,
	pub position: AffixPosition,
}

impl Default for AdjectiveSettings {
	fn default() -> Self {
		Self { enabled: true, position: AffixPosition::Front }
	}
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AffixPosition {
	#[default]
	Front,
	Back,
}

/// Language selection and length bounds for generated names.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct NameOptions {
	/// Fallback language key; may be the `"random"` sentinel.
	#[serde(rename = "default")]
	pub default_language: String,
	/// Ordered rules mapping an actor attribute value to a language
	/// key; the first rule producing a registered language wins.
	pub attributes: Vec<AttributeLanguageRule>,
	pub min: usize,
	pub max: usize,
}

impl Default for NameOptions {
	fn default() -> Self {
		Self {
			default_language: "random".to_owned(),
			attributes: Vec::new(),
			min: 3,
			max: 9,
		}
	}
}

/// One language-selection rule: read `attribute` from the actor, then
/// look the lower-cased value up in `languages`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AttributeLanguageRule {
	pub attribute: String,
	pub languages: HashMap<String, String>,
}

/// HP randomization configuration. `to_chat` is a host concern (whether
/// the roll is announced); the engine carries it untouched.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct HpSettings {
	#[serde(rename = "use")]
	pub enabled: bool,
	pub to_chat: bool,
}

impl Default for HpSettings {
	fn default() -> Self {
		Self { enabled: true, to_chat: true }
	}
}

/// Creature-size scaling configuration.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SizeSettings {
	#[serde(rename = "use")]
	pub enabled: bool,
	/// Dotted path of the size category inside the actor attributes.
	pub attribute: String,
}

impl Default for SizeSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			attribute: "system.traits.size".to_owned(),
		}
	}
}

/// Token-config overwrite configuration.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct OverwriteSettings {
	#[serde(rename = "use")]
	pub enabled: bool,
	pub fields: Vec<FieldOverwrite>,
}
