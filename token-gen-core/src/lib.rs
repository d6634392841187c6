//! Procedural naming and randomization engine for virtual game tables.
//!
//! This crate provides the algorithmic core of a token-placement tool:
//! - Pronounceable fantasy-name generation from per-language trigram models
//! - Per-scene, per-actor sequence counters in several numbering notations
//! - Weighted random sampling shared by the name model and attribute rules
//! - Creature-size driven footprint and scale computation
//!
//! The surrounding host owns persistence, UI and the event lifecycle; it
//! invokes the engine once per placement intent and applies the returned
//! partial patch itself.

/// Core engine components and the placement orchestrator.
///
/// This module exposes the high-level engine interface together with the
/// individual components it is built from.
pub mod engine;

/// I/O utilities (dictionary listing, cache paths).
///
/// Not exposed
pub(crate) mod io;
