//! Ordered collection of engine slots run over one text.

use tracing::trace;

use crate::{DialectMergePolicy, EngineAdapter, LintIssue, Result, merge_dialects};

/// One unit of analysis inside an [`EngineSet`].
#[derive(Debug)]
pub enum EngineSlot {
	/// A single engine.
	Single(EngineAdapter),
	/// Two dialect variants merged under a policy.
	Dialects {
		primary: EngineAdapter,
		secondary: EngineAdapter,
		policy: DialectMergePolicy,
	},
}

impl EngineSlot {
	fn lint(&mut self, text: &str) -> Result<Vec<LintIssue>> {
		match self {
			Self::Single(engine) => engine.lint(text),
			Self::Dialects { primary, secondary, policy } => {
				let a = primary.lint(text)?;
				let b = secondary.lint(text)?;
				Ok(merge_dialects(a, b, policy))
			}
		}
	}

	fn names(&self) -> Vec<&str> {
		match self {
			Self::Single(engine) => vec![engine.name()],
			Self::Dialects { primary, secondary, .. } => vec![primary.name(), secondary.name()],
		}
	}
}

/// Every engine a worker owns, run in slot order.
///
/// Results are concatenated in slot order. When a slot reports the same span
/// and category as an earlier issue, the earlier issue is kept and gains the
/// later one's suggestions. Issues of different categories may share a span.
#[derive(Debug, Default)]
pub struct EngineSet {
	slots: Vec<EngineSlot>,
}

impl EngineSet {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_slot(mut self, slot: EngineSlot) -> Self {
		self.slots.push(slot);
		self
	}

	pub fn push(&mut self, slot: EngineSlot) {
		self.slots.push(slot);
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Names of every engine, in slot order.
	pub fn engine_names(&self) -> Vec<&str> {
		self.slots.iter().flat_map(EngineSlot::names).collect()
	}

	/// Runs every slot over `text`. The first failing slot aborts the run.
	pub fn lint(&mut self, text: &str) -> Result<Vec<LintIssue>> {
		let mut out: Vec<LintIssue> = Vec::new();
		for slot in &mut self.slots {
			for issue in slot.lint(text)? {
				match out
					.iter_mut()
					.find(|existing| existing.span == issue.span && existing.category == issue.category)
				{
					Some(existing) => {
						trace!(start = issue.span.start, end = issue.span.end, "lint.set.duplicate_span");
						for suggestion in issue.suggestions {
							if !existing.suggestions.contains(&suggestion) {
								existing.suggestions.push(suggestion);
							}
						}
					}
					None => out.push(issue),
				}
			}
		}
		Ok(out)
	}
}
