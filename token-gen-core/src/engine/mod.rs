//! Top-level module for the naming and randomization engine.
//!
//! This crate provides a token-placement mutation engine, including:
//! - A per-language trigram name model (`language`, `namegen`)
//! - Sequence counters with numbering notations (`counter`, `numbering`)
//! - Name assembly from toggleable stages (`composer`)
//! - Size-driven footprint computation (`scaler`)
//! - Generic attribute overwrites and HP clamping (`overwrite`, `hp`)

/// High-level engine interface invoked once per placement intent.
///
/// Owns the language registry, counter state and adjective table, and
/// produces partial record patches.
pub mod token_engine;

/// Name assembly from base, replacement, adjective and numeric stages.
pub mod composer;

/// Trigram-chain name generation and language selection.
pub mod namegen;

/// Per-language transition tables and the language registry.
///
/// Supports loading JSON dictionaries (with a binary cache), building
/// models from raw lexicon files, and merging.
pub mod language;

/// Per-scene, per-actor sequence counters with history recovery.
pub mod counter;

/// Bidirectional numbering notations (arabic, alphabetic, roman).
pub mod numbering;

/// Weighted-choice sampling primitive.
///
/// Shared by the name model and the attribute randomizer.
pub mod sampler;

/// Creature-size to footprint/scale mapping under grid normalization.
pub mod scaler;

/// Tagged per-field overwrite rules for token config randomization.
pub mod overwrite;

/// HP randomization policy around an external dice roller.
pub mod hp;

/// Fully-resolved configuration shapes supplied by the host.
pub mod settings;

/// Dotted-path access into read-only attribute objects.
///
/// This module is not exposed publicly.
mod attr;
