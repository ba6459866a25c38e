//! Lint issue model and engine adapters.
//!
//! This crate owns everything that happens on the far side of the worker
//! boundary: the [`LintIssue`] shape shared by every backend, the
//! [`LintEngine`] trait that backends implement, offset normalization from an
//! engine's native unit to char offsets, and the dual-dialect merge used when
//! two spelling variants are run side by side.
//!
//! # Offsets
//!
//! Engines report spans in whatever unit they tokenize in (see
//! [`OffsetEncoding`]). [`EngineAdapter`] converts those spans to Unicode
//! scalar value (char) offsets before they leave the adapter, so every span
//! seen by the interactive side is char-based.
//!
//! # Engines
//!
//! - [`DictionaryEngine`]: word-list spelling checker for one dialect.
//! - [`RuleEngine`]: pattern rules for grammar, capitalization, punctuation
//!   and style.
//!
//! [`EngineSet`] groups adapters into slots, where a slot is either one engine
//! or a dialect pair merged under a [`DialectMergePolicy`].

pub mod category;
pub mod encoding;
pub mod engine;
pub mod engines;
pub mod error;
pub mod issue;
pub mod merge;
pub mod set;

pub use category::{CategorySet, LintCategory};
pub use encoding::{OffsetEncoding, OffsetIndex};
pub use engine::{EngineAdapter, LintEngine};
pub use engines::dictionary::{Dialect, DictionaryEngine, WordList};
pub use engines::rules::RuleEngine;
pub use error::{EngineError, Result};
pub use issue::{IssueKey, LintIssue, Span};
pub use merge::{DialectMergePolicy, merge_dialects};
pub use set::{EngineSet, EngineSlot};
