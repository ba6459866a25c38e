//! One document's lint session on the interactive side.
//!
//! [`LintSession`] owns the surface and ties the coordinator, filtering and
//! rendering together. It never talks to a worker itself: every method that
//! may need the worker returns the [`WorkerCommand`]s to deliver.

use std::collections::BTreeMap;

use quill_config::LintConfig;
use quill_lint::{CategorySet, IssueKey, LintCategory, LintIssue, Span};
use quill_worker::{WorkerCommand, WorkerEvent};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::coordinator::{Coordinator, CoordinatorConfig, CoordinatorPhase, Reaction};
use crate::decoration::render;
use crate::filter::{IgnoreList, IgnoredSpan, filter_issues};
use crate::mapper::{map_span, span_text};
use crate::{Document, EditError, LintSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
	pub coordinator: CoordinatorConfig,
	/// Categories shown to the user.
	pub categories: CategorySet,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self::from(&LintConfig::default())
	}
}

impl From<&LintConfig> for SessionConfig {
	fn from(config: &LintConfig) -> Self {
		Self {
			coordinator: CoordinatorConfig::from(config),
			categories: config.category_set(),
		}
	}
}

/// What the user sees in the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
	/// Engines not loaded yet.
	Loading,
	Ready { issue_count: usize },
	/// `recoverable` is false when the engines never loaded.
	Error { recoverable: bool },
}

#[derive(Debug)]
pub struct LintSession<S = Document> {
	surface: S,
	coordinator: Coordinator,
	/// Last accepted cycle, in engine order.
	issues: Vec<LintIssue>,
	visible: Vec<LintIssue>,
	ignored: IgnoreList,
	categories: CategorySet,
	focused: Option<IssueKey>,
	status: SessionStatus,
	/// Text changed after the last accepted cycle, so spans no longer line
	/// up with the document and only the mapped decorations do.
	edited_since_cycle: bool,
	/// Document version of the last accepted cycle.
	accepted_version: Option<u64>,
}

impl<S: LintSurface> LintSession<S> {
	pub fn new(surface: S, config: SessionConfig) -> Self {
		Self {
			surface,
			coordinator: Coordinator::new(config.coordinator),
			issues: Vec::new(),
			visible: Vec::new(),
			ignored: IgnoreList::default(),
			categories: config.categories,
			focused: None,
			status: SessionStatus::Loading,
			edited_since_cycle: false,
			accepted_version: None,
		}
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn into_surface(self) -> S {
		self.surface
	}

	pub const fn status(&self) -> SessionStatus {
		self.status
	}

	pub const fn phase(&self) -> CoordinatorPhase {
		self.coordinator.phase()
	}

	pub const fn version(&self) -> u64 {
		self.coordinator.version()
	}

	pub const fn accepted_version(&self) -> Option<u64> {
		self.accepted_version
	}

	pub fn visible_issues(&self) -> &[LintIssue] {
		&self.visible
	}

	pub const fn focused(&self) -> Option<IssueKey> {
		self.focused
	}

	pub fn focused_issue(&self) -> Option<&LintIssue> {
		let key = self.focused?;
		self.visible.iter().find(|i| i.key() == key)
	}

	pub fn ignored(&self) -> &IgnoreList {
		&self.ignored
	}

	pub const fn categories(&self) -> CategorySet {
		self.categories
	}

	/// Visible issues per category.
	pub fn issue_counts(&self) -> BTreeMap<LintCategory, usize> {
		let mut counts = BTreeMap::new();
		for issue in &self.visible {
			*counts.entry(issue.category).or_insert(0) += 1;
		}
		counts
	}

	pub fn next_deadline(&self) -> Option<Instant> {
		self.coordinator.next_deadline()
	}

	/// The surface is on screen: start the lazy-init timer.
	pub fn mount(&mut self, now: Instant) {
		info!("lint.session.mount");
		self.coordinator.mount(now);
	}

	/// Applies `edit` to the surface, then records the resulting text.
	pub fn edit<R>(&mut self, now: Instant, edit: impl FnOnce(&mut S) -> R) -> R {
		let out = edit(&mut self.surface);
		self.text_changed(now);
		out
	}

	pub fn poll(&mut self, now: Instant) -> Vec<WorkerCommand> {
		self.coordinator.poll(now)
	}

	pub fn handle_event(&mut self, event: WorkerEvent) -> Vec<WorkerCommand> {
		let text = self.surface.plain_text();
		match self.coordinator.handle_event(event, &text) {
			Reaction::Ignore => Vec::new(),
			Reaction::Send(cmd) => {
				self.status = SessionStatus::Ready {
					issue_count: self.visible.len(),
				};
				vec![cmd]
			}
			Reaction::Accept(results) => {
				self.issues = results;
				self.edited_since_cycle = false;
				self.accepted_version = Some(self.coordinator.version());
				self.status = SessionStatus::Ready { issue_count: 0 };
				self.refresh();
				Vec::new()
			}
			Reaction::CycleFailed(_) => {
				self.fail(true);
				Vec::new()
			}
			Reaction::InitFailed(_) => {
				self.fail(false);
				Vec::new()
			}
		}
	}

	/// Replaces the issue's range with suggestion `index`.
	pub fn accept_suggestion(&mut self, key: IssueKey, index: usize, now: Instant) -> Result<(), EditError> {
		let issue = self.visible.iter().find(|i| i.key() == key).ok_or(EditError::UnknownIssue(key))?;
		let replacement = issue.suggestions.get(index).cloned().ok_or(EditError::NoSuggestion { key, index })?;
		let (from, to) = self.current_range(issue.span).ok_or(EditError::Unmappable(key))?;

		self.surface.replace_range(from, to, &replacement)?;
		info!(%key, index, "lint.session.accept");

		self.issues.retain(|i| i.key() != key);
		self.visible.retain(|i| i.key() != key);
		if self.focused == Some(key) {
			self.focused = None;
		}
		self.update_count();
		self.text_changed(now);
		Ok(())
	}

	/// Hides the issue, remembering its offsets and the text it covers now.
	pub fn ignore(&mut self, key: IssueKey) -> Result<(), EditError> {
		let issue = self.visible.iter().find(|i| i.key() == key).ok_or(EditError::UnknownIssue(key))?;
		let text = current_text(&self.surface, self.edited_since_cycle, issue.span);
		debug!(%key, text = %text, "lint.session.ignore");
		self.ignored.insert(IgnoredSpan::new(issue.span, text));
		self.refresh();
		Ok(())
	}

	pub fn clear_ignored(&mut self) {
		self.ignored.clear();
		self.refresh();
	}

	pub fn set_categories(&mut self, categories: CategorySet) {
		self.categories = categories;
		self.refresh();
	}

	/// Focuses a visible issue. Returns `false` when there is none with `key`.
	pub fn focus(&mut self, key: IssueKey) -> bool {
		if !self.visible.iter().any(|i| i.key() == key) {
			return false;
		}
		self.set_focus(Some(key));
		true
	}

	pub fn clear_focus(&mut self) {
		self.set_focus(None);
	}

	/// Moves focus to the next issue in document order, wrapping around.
	pub fn focus_next(&mut self) -> Option<IssueKey> {
		let keys = self.ordered_keys();
		let next = match self.focused {
			Some(current) => keys.iter().copied().find(|k| *k > current).or_else(|| keys.first().copied()),
			None => keys.first().copied(),
		};
		self.set_focus(next);
		next
	}

	/// Moves focus to the previous issue in document order, wrapping around.
	pub fn focus_prev(&mut self) -> Option<IssueKey> {
		let keys = self.ordered_keys();
		let prev = match self.focused {
			Some(current) => keys.iter().rev().copied().find(|k| *k < current).or_else(|| keys.last().copied()),
			None => keys.last().copied(),
		};
		self.set_focus(prev);
		prev
	}

	/// Cancels timers. Returns the `Dispose` command for the worker unless
	/// the session was already disposed.
	pub fn dispose(&mut self) -> Option<WorkerCommand> {
		let cmd = self.coordinator.dispose();
		if cmd.is_some() {
			info!("lint.session.dispose");
		}
		cmd
	}

	fn text_changed(&mut self, now: Instant) {
		let text = self.surface.plain_text();
		if self.coordinator.text_changed(&text, now) {
			self.edited_since_cycle = true;
		}
	}

	fn ordered_keys(&self) -> Vec<IssueKey> {
		let mut keys: Vec<IssueKey> = self.visible.iter().map(LintIssue::key).collect();
		keys.sort_unstable();
		keys.dedup();
		keys
	}

	fn set_focus(&mut self, focused: Option<IssueKey>) {
		self.focused = focused;
		let decorations = self.surface.decorations().with_focus(focused);
		self.surface.set_decorations(decorations);
	}

	/// Where a span of the last cycle sits in the current document.
	fn current_range(&self, span: Span) -> Option<(usize, usize)> {
		let key = IssueKey::new(span.start, span.end);
		if let Some(deco) = self.surface.decorations().get(key) {
			return Some((deco.from, deco.to));
		}
		if self.edited_since_cycle {
			return None;
		}
		let (from, to) = map_span(&self.surface, span);
		(to > from).then_some((from, to))
	}

	/// Re-applies filters to the last cycle and redraws.
	fn refresh(&mut self) {
		let surface = &self.surface;
		let edited = self.edited_since_cycle;
		self.visible = filter_issues(&self.issues, &self.ignored, self.categories, |span| current_text(surface, edited, span));
		if edited {
			// only issues whose decoration survived the edits can still be placed
			let decorations = self.surface.decorations();
			self.visible
				.retain(|issue| decorations.get(issue.key()).is_some_and(|deco| deco.category == issue.category));
		}

		if self.focused.is_some_and(|key| !self.visible.iter().any(|i| i.key() == key)) {
			debug!("lint.session.focus_lost");
			self.focused = None;
		}

		if self.edited_since_cycle {
			let keys: Vec<IssueKey> = self.visible.iter().map(LintIssue::key).collect();
			let kept = self.surface.decorations().retain_keys(&keys).with_focus(self.focused);
			self.surface.set_decorations(kept);
		} else {
			render(&mut self.surface, &self.visible, self.focused);
		}
		self.update_count();
	}

	fn update_count(&mut self) {
		if let SessionStatus::Ready { issue_count } = &mut self.status {
			*issue_count = self.visible.len();
		}
	}

	fn fail(&mut self, recoverable: bool) {
		self.issues.clear();
		self.visible.clear();
		self.focused = None;
		self.surface.clear_decorations();
		self.status = SessionStatus::Error { recoverable };
	}
}

/// Text the document shows for a span of the last cycle. After an edit the
/// span's decoration is the only reliable location.
fn current_text(surface: &impl LintSurface, edited: bool, span: Span) -> String {
	let key = IssueKey::new(span.start, span.end);
	match surface.decorations().get(key) {
		Some(deco) if edited => surface.text_between(deco.from, deco.to),
		_ => span_text(surface, span),
	}
}

#[cfg(test)]
mod tests;
