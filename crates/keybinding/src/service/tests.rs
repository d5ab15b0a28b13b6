use std::collections::HashMap;

use pretty_assertions::assert_eq;
use scribe_context::ContextValue;
use scribe_primitives::Chord;

use super::*;
use crate::layout::{UsLayout, keycodes};
use crate::rule::RuleProblemKind;

fn ctx(pairs: &[(&str, ContextValue)]) -> HashMap<String, ContextValue> {
	pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn key(code: u32) -> RawKeyEvent {
	RawKeyEvent::new(code).ctrl()
}

fn service() -> KeybindingService {
	KeybindingService::new(
		&[
			RuleDef::new("ctrl-s", "save").when("editorFocus"),
			RuleDef::new("ctrl-k ctrl-c", "comment"),
		],
		Box::new(UsLayout),
	)
}

/// Layout that maps like [`UsLayout`] but labels chords in lowercase,
/// standing in for a host-supplied layout table.
struct LowercaseLayout;

impl KeyboardLayout for LowercaseLayout {
	fn chord_of(&self, event: &RawKeyEvent) -> Option<Chord> {
		UsLayout.chord_of(event)
	}

	fn label(&self, chord: &Chord) -> String {
		UsLayout.label(chord).to_lowercase()
	}

	fn is_printable(&self, event: &RawKeyEvent) -> bool {
		UsLayout.is_printable(event)
	}
}

#[test]
fn dispatches_key_events_end_to_end() {
	let mut svc = service();
	let focused = ctx(&[("editorFocus", ContextValue::Bool(true))]);
	let mut invoked = Vec::new();
	let mut invoker = |cmd: &str| invoked.push(cmd.to_string());

	let s = key(keycodes::KEY_A + 18);
	assert_eq!(svc.dispatch(&s, &focused, &mut invoker), DispatchOutcome::Handled);
	assert_eq!(invoked, vec!["save"]);
}

#[test]
fn chord_sequence_flows_through_the_facade() {
	let mut svc = service();
	let mut invoked = Vec::new();
	let mut invoker = |cmd: &str| invoked.push(cmd.to_string());

	assert_eq!(svc.dispatch(&key(keycodes::KEY_A + 10), &(), &mut invoker), DispatchOutcome::Handled);
	assert!(svc.is_awaiting_chord());

	assert_eq!(svc.dispatch(&key(keycodes::KEY_A + 2), &(), &mut invoker), DispatchOutcome::Handled);
	assert!(!svc.is_awaiting_chord());
	assert_eq!(invoked, vec!["comment"]);
}

#[test]
fn update_rules_applies_on_the_next_event() {
	let mut svc = service();
	let mut invoked = Vec::new();
	let mut invoker = |cmd: &str| invoked.push(cmd.to_string());

	let q = key(keycodes::KEY_A + 16);
	assert_eq!(svc.dispatch(&q, &(), &mut invoker), DispatchOutcome::Unhandled);

	svc.update_rules(&[RuleDef::new("ctrl-q", "quit")]);
	assert_eq!(svc.dispatch(&q, &(), &mut invoker), DispatchOutcome::Handled);
	assert_eq!(invoked, vec!["quit"]);
}

#[test]
fn lookup_keybindings_renders_labels_for_the_active_layout() {
	let mut svc = service();

	let resolved = svc.lookup_keybindings("comment");
	assert_eq!(resolved.len(), 1);
	assert_eq!(resolved[0].label(), "Ctrl+K Ctrl+C");

	svc.set_layout(Box::new(LowercaseLayout));
	let resolved = svc.lookup_keybindings("comment");
	assert_eq!(resolved[0].label(), "ctrl+k ctrl+c");

	assert!(svc.lookup_keybindings("unknownCommand").is_empty());
}

#[test]
fn expire_pending_abandons_the_open_sequence() {
	let mut svc = service();
	let mut invoked = Vec::new();
	let mut invoker = |cmd: &str| invoked.push(cmd.to_string());

	svc.dispatch(&key(keycodes::KEY_A + 10), &(), &mut invoker);
	assert!(svc.is_awaiting_chord());

	svc.expire_pending();
	assert!(!svc.is_awaiting_chord());

	// The second half of the sequence no longer means anything.
	assert_eq!(svc.dispatch(&key(keycodes::KEY_A + 2), &(), &mut invoker), DispatchOutcome::Unhandled);
	assert!(invoked.is_empty());
}

#[test]
fn problems_surface_rejected_rules() {
	let svc = KeybindingService::new(
		&[
			RuleDef::new("ctrl-s", "save"),
			RuleDef::new("ctrl-x", "broken").when("a &&"),
		],
		Box::new(UsLayout),
	);

	let problems = svc.problems();
	assert_eq!(problems.len(), 1);
	assert_eq!(problems[0].kind, RuleProblemKind::InvalidGuard);
	assert_eq!(&*problems[0].command, "broken");
}

#[test]
fn printable_predicate_delegates_to_the_layout() {
	let svc = service();
	assert!(svc.might_produce_printable_character(&RawKeyEvent::new(keycodes::KEY_A)));
	assert!(!svc.might_produce_printable_character(&RawKeyEvent::new(keycodes::KEY_A).ctrl()));
	assert!(!svc.might_produce_printable_character(&RawKeyEvent::new(keycodes::ESCAPE)));
}
