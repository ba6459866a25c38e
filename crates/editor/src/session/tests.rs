use std::time::Duration;

use pretty_assertions::assert_eq;
use quill_lint::{CategorySet, LintCategory, Span};
use quill_worker::LintResponse;

use super::*;

const INIT: Duration = Duration::from_millis(1000);
const DEBOUNCE: Duration = Duration::from_millis(500);

fn config() -> SessionConfig {
	SessionConfig {
		coordinator: CoordinatorConfig {
			lazy_init_delay: INIT,
			debounce: DEBOUNCE,
		},
		categories: CategorySet::all(),
	}
}

fn issue(category: LintCategory, start: usize, end: usize, suggestions: &[&str]) -> LintIssue {
	LintIssue::new(category, Span::new(start, end), "msg").with_suggestions(suggestions.iter().copied())
}

fn typo(start: usize, end: usize) -> LintIssue {
	issue(LintCategory::Spelling, start, end, &["world"])
}

/// Session past `Ready`, with the first lint (version 1) in flight.
fn ready_session(text: &str) -> (LintSession, Instant) {
	let t0 = Instant::now();
	let mut session = LintSession::new(Document::from_plain_text(text), config());
	session.mount(t0);
	assert_eq!(session.status(), SessionStatus::Loading);
	assert_eq!(session.poll(t0 + INIT), vec![WorkerCommand::Init]);
	let cmds = session.handle_event(WorkerEvent::Ready);
	assert!(matches!(cmds.as_slice(), [WorkerCommand::Lint(req)] if req.text == text && req.version == 1));
	(session, t0 + INIT)
}

fn deliver(session: &mut LintSession, results: Vec<LintIssue>) {
	let version = session.version();
	session.handle_event(WorkerEvent::Results(LintResponse { results, version }));
}

fn decoration_ranges(session: &LintSession) -> Vec<(usize, usize)> {
	session.surface().decorations().iter().map(|d| (d.from, d.to)).collect()
}

#[test]
fn results_become_decorations_and_status() {
	let (mut session, _) = ready_session("Hello wrold");
	assert_eq!(session.status(), SessionStatus::Ready { issue_count: 0 });
	assert_eq!(session.accepted_version(), None);

	deliver(&mut session, vec![typo(6, 11)]);
	assert_eq!(session.status(), SessionStatus::Ready { issue_count: 1 });
	assert_eq!(session.accepted_version(), Some(1));
	assert_eq!(decoration_ranges(&session), vec![(7, 12)]);
}

#[test]
fn accepting_a_suggestion_edits_and_schedules_a_new_cycle() {
	let (mut session, now) = ready_session("Hello wrold");
	deliver(&mut session, vec![typo(6, 11)]);

	session.accept_suggestion(IssueKey::new(6, 11), 0, now).unwrap();
	assert_eq!(session.surface().plain_text(), "Hello world");
	assert!(session.visible_issues().is_empty());
	assert!(session.surface().decorations().is_empty());
	assert_eq!(session.status(), SessionStatus::Ready { issue_count: 0 });

	let sent = session.poll(now + DEBOUNCE);
	assert!(matches!(sent.as_slice(), [WorkerCommand::Lint(req)] if req.text == "Hello world" && req.version == 2));
}

#[test]
fn accept_uses_the_mapped_decoration_after_edits() {
	let (mut session, now) = ready_session("Hello wrold");
	deliver(&mut session, vec![typo(6, 11)]);

	session.edit(now, |doc| doc.insert_text(1, "Oh, ").unwrap());
	assert_eq!(decoration_ranges(&session), vec![(11, 16)]);

	session.accept_suggestion(IssueKey::new(6, 11), 0, now).unwrap();
	assert_eq!(session.surface().plain_text(), "Oh, Hello world");
}

#[test]
fn accept_rejects_unknown_issues_and_suggestions() {
	let (mut session, now) = ready_session("Hello wrold");
	deliver(&mut session, vec![typo(6, 11)]);

	let missing = IssueKey::new(0, 5);
	assert_eq!(session.accept_suggestion(missing, 0, now), Err(EditError::UnknownIssue(missing)));
	let key = IssueKey::new(6, 11);
	assert_eq!(session.accept_suggestion(key, 3, now), Err(EditError::NoSuggestion { key, index: 3 }));
	assert_eq!(session.surface().plain_text(), "Hello wrold");
}

#[test]
fn ignore_does_not_follow_the_word_to_new_offsets() {
	let (mut session, now) = ready_session("The essay wrold ends.");
	deliver(&mut session, vec![typo(10, 15)]);

	session.ignore(IssueKey::new(10, 15)).unwrap();
	assert!(session.visible_issues().is_empty());
	assert!(session.surface().decorations().is_empty());

	// an edit before the word shifts it to 15..20
	session.edit(now, |doc| doc.insert_text(5, "long ").unwrap());
	session.poll(now + DEBOUNCE);
	deliver(&mut session, vec![typo(15, 20)]);
	assert_eq!(session.visible_issues(), &[typo(15, 20)]);
}

#[test]
fn ignore_holds_while_the_word_stays_put() {
	let (mut session, now) = ready_session("The essay wrold ends.");
	deliver(&mut session, vec![typo(10, 15)]);
	session.ignore(IssueKey::new(10, 15)).unwrap();

	session.edit(now, |doc| {
		let end = doc.content_bounds().1;
		doc.insert_text(end, " Really.").unwrap()
	});
	session.poll(now + DEBOUNCE);
	deliver(&mut session, vec![typo(10, 15)]);
	assert!(session.visible_issues().is_empty());

	session.clear_ignored();
	assert_eq!(session.visible_issues(), &[typo(10, 15)]);
}

#[test]
fn stale_results_leave_the_rendered_set_alone() {
	let (mut session, now) = ready_session("Hello wrold");
	deliver(&mut session, vec![typo(6, 11)]);

	session.edit(now, |doc| doc.insert_text(12, "!").unwrap());
	session.handle_event(WorkerEvent::Results(LintResponse {
		results: Vec::new(),
		version: 1,
	}));
	assert_eq!(session.visible_issues(), &[typo(6, 11)]);
	assert_eq!(decoration_ranges(&session), vec![(7, 12)]);
}

#[test]
fn an_empty_cycle_clears_decorations() {
	let (mut session, now) = ready_session("Hello wrold");
	deliver(&mut session, vec![typo(6, 11)]);
	assert_eq!(session.surface().decorations().len(), 1);

	session.edit(now, |doc| doc.insert_text(12, "!").unwrap());
	assert_eq!(session.surface().decorations().len(), 1);
	session.poll(now + DEBOUNCE);
	deliver(&mut session, Vec::new());
	assert!(session.surface().decorations().is_empty());
	assert_eq!(session.status(), SessionStatus::Ready { issue_count: 0 });
}

#[test]
fn focus_moves_in_document_order() {
	let (mut session, _) = ready_session("aaa bbb ccc");
	// engine order differs from document order
	deliver(
		&mut session,
		vec![typo(8, 11), issue(LintCategory::Grammar, 0, 3, &[]), typo(4, 7)],
	);
	assert_eq!(session.visible_issues()[0].span, Span::new(8, 11));

	assert_eq!(session.focus_next(), Some(IssueKey::new(0, 3)));
	assert_eq!(session.focus_next(), Some(IssueKey::new(4, 7)));
	assert_eq!(session.focus_next(), Some(IssueKey::new(8, 11)));
	assert_eq!(session.focus_next(), Some(IssueKey::new(0, 3)));
	assert_eq!(session.focus_prev(), Some(IssueKey::new(8, 11)));

	let focused: Vec<_> = session.surface().decorations().iter().filter(|d| d.focused).map(|d| d.key).collect();
	assert_eq!(focused, vec![IssueKey::new(8, 11)]);

	session.clear_focus();
	assert!(session.surface().decorations().iter().all(|d| !d.focused));
	assert!(!session.focus(IssueKey::new(1, 2)));
}

#[test]
fn focus_is_dropped_when_its_issue_disappears() {
	let (mut session, now) = ready_session("aaa bbb");
	deliver(&mut session, vec![typo(0, 3), typo(4, 7)]);
	assert!(session.focus(IssueKey::new(0, 3)));
	assert_eq!(session.focused_issue().map(|i| i.span), Some(Span::new(0, 3)));

	session.edit(now, |doc| doc.insert_text(8, ".").unwrap());
	session.poll(now + DEBOUNCE);
	deliver(&mut session, vec![typo(4, 7)]);
	assert_eq!(session.focused(), None);
}

#[test]
fn category_filter_hides_and_restores() {
	let (mut session, _) = ready_session("in order to wrold");
	deliver(
		&mut session,
		vec![issue(LintCategory::WordChoice, 0, 11, &["to"]), typo(12, 17)],
	);
	assert_eq!(
		session.issue_counts(),
		BTreeMap::from([(LintCategory::Spelling, 1), (LintCategory::WordChoice, 1)])
	);

	session.set_categories(CategorySet::SPELLING);
	assert_eq!(session.visible_issues(), &[typo(12, 17)]);
	assert_eq!(session.surface().decorations().len(), 1);
	assert_eq!(session.status(), SessionStatus::Ready { issue_count: 1 });

	session.set_categories(CategorySet::all());
	assert_eq!(session.surface().decorations().len(), 2);
}

#[test]
fn issues_unhidden_after_an_edit_wait_for_the_next_cycle() {
	let (mut session, now) = ready_session("in order to wrold");
	let wordy = issue(LintCategory::WordChoice, 0, 11, &["to"]);
	deliver(&mut session, vec![wordy.clone(), typo(12, 17)]);

	session.set_categories(CategorySet::SPELLING);
	session.edit(now, |doc| doc.insert_text(18, "!").unwrap());
	session.set_categories(CategorySet::all());

	assert_eq!(session.visible_issues(), &[typo(12, 17)]);
	assert_eq!(session.surface().decorations().len(), session.visible_issues().len());
	assert_eq!(session.status(), SessionStatus::Ready { issue_count: 1 });
	assert_eq!(
		session.accept_suggestion(wordy.key(), 0, now),
		Err(EditError::UnknownIssue(IssueKey::new(0, 11)))
	);

	session.poll(now + DEBOUNCE);
	deliver(&mut session, vec![wordy, typo(12, 17)]);
	assert_eq!(session.visible_issues().len(), 2);
	assert_eq!(session.surface().decorations().len(), 2);
}

#[test]
fn clearing_ignores_after_an_edit_keeps_issues_and_decorations_aligned() {
	let (mut session, now) = ready_session("in order to wrold");
	deliver(&mut session, vec![issue(LintCategory::WordChoice, 0, 11, &["to"]), typo(12, 17)]);

	session.ignore(IssueKey::new(12, 17)).unwrap();
	session.edit(now, |doc| doc.insert_text(18, "!").unwrap());
	session.clear_ignored();

	assert_eq!(session.visible_issues().len(), 1);
	assert_eq!(session.visible_issues()[0].category, LintCategory::WordChoice);
	assert_eq!(session.surface().decorations().len(), 1);
	session.accept_suggestion(IssueKey::new(0, 11), 0, now).unwrap();
	assert_eq!(session.surface().plain_text(), "to wrold!");
}

#[test]
fn failed_cycle_is_recoverable() {
	let (mut session, now) = ready_session("Hello wrold");
	deliver(&mut session, vec![typo(6, 11)]);

	session.edit(now, |doc| doc.insert_text(12, "!").unwrap());
	session.poll(now + DEBOUNCE);
	session.handle_event(WorkerEvent::Error {
		error: "engine panicked".into(),
		version: Some(session.version()),
	});
	assert_eq!(session.status(), SessionStatus::Error { recoverable: true });
	assert!(session.visible_issues().is_empty());
	assert!(session.surface().decorations().is_empty());

	session.edit(now + DEBOUNCE, |doc| doc.insert_text(13, "!").unwrap());
	session.poll(now + DEBOUNCE * 2);
	deliver(&mut session, vec![typo(6, 11)]);
	assert_eq!(session.status(), SessionStatus::Ready { issue_count: 1 });
}

#[test]
fn init_failure_is_a_terminal_status() {
	let t0 = Instant::now();
	let mut session = LintSession::new(Document::from_plain_text("text"), config());
	session.mount(t0);
	session.poll(t0 + INIT);
	session.handle_event(WorkerEvent::Error {
		error: "missing dictionary".into(),
		version: None,
	});
	assert_eq!(session.status(), SessionStatus::Error { recoverable: false });
	assert_eq!(session.phase(), CoordinatorPhase::Failed);
}

#[test]
fn dispose_once() {
	let (mut session, _) = ready_session("text");
	assert_eq!(session.dispose(), Some(WorkerCommand::Dispose));
	assert_eq!(session.dispose(), None);
	assert_eq!(session.next_deadline(), None);
}
