use std::collections::HashMap;

use scribe_context::ContextValue;
use scribe_primitives::{Chord, parse_chord_seq};

use super::*;
use crate::rule::{RuleProblemKind, RuleSource};

fn ctx(pairs: &[(&str, ContextValue)]) -> HashMap<String, ContextValue> {
	pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn chords(s: &str) -> Vec<Chord> {
	parse_chord_seq(s).unwrap()
}

fn commit_command<'a>(resolution: &Resolution<'a>) -> Option<&'a str> {
	match resolution {
		Resolution::Commit(rule) => Some(rule.command()),
		_ => None,
	}
}

#[test]
fn resolves_guarded_binding_against_context() {
	let resolver = KeybindingResolver::new(&[RuleDef::new("ctrl-s", "save").when("editorFocus")]);

	let focused = ctx(&[("editorFocus", ContextValue::Bool(true))]);
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-s"), &focused)), Some("save"));

	let unfocused = ctx(&[("editorFocus", ContextValue::Bool(false))]);
	assert!(matches!(resolver.resolve(&chords("ctrl-s"), &unfocused), Resolution::NoMatch));
}

#[test]
fn unguarded_binding_always_active() {
	let resolver = KeybindingResolver::new(&[RuleDef::new("ctrl-p", "quickOpen")]);
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-p"), &())), Some("quickOpen"));
}

#[test]
fn later_registration_wins_at_equal_weight() {
	let resolver = KeybindingResolver::new(&[
		RuleDef::new("ctrl-s", "save"),
		RuleDef::new("ctrl-s", "saveAll"),
	]);
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-s"), &())), Some("saveAll"));
}

#[test]
fn guarded_override_falls_back_when_guard_fails() {
	let resolver = KeybindingResolver::new(&[
		RuleDef::new("ctrl-p", "quickOpen"),
		RuleDef::new("ctrl-p", "terminalPaste").when("inTerminal"),
	]);

	let in_terminal = ctx(&[("inTerminal", ContextValue::Bool(true))]);
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-p"), &in_terminal)), Some("terminalPaste"));

	let outside = ctx(&[("inTerminal", ContextValue::Bool(false))]);
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-p"), &outside)), Some("quickOpen"));
}

#[test]
fn higher_weight_beats_later_registration() {
	let resolver = KeybindingResolver::new(&[
		RuleDef::new("ctrl-s", "save").weight(10),
		RuleDef::new("ctrl-s", "saveAll"),
	]);
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-s"), &())), Some("save"));
}

#[test]
fn chord_prefix_awaits_more() {
	let resolver = KeybindingResolver::new(&[RuleDef::new("ctrl-k ctrl-c", "comment")]);
	assert!(matches!(resolver.resolve(&chords("ctrl-k"), &()), Resolution::AwaitMore));
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-k ctrl-c"), &())), Some("comment"));
	assert!(matches!(resolver.resolve(&chords("ctrl-k ctrl-x"), &()), Resolution::NoMatch));
}

#[test]
fn registered_chord_shadows_single_binding_on_same_prefix() {
	let resolver = KeybindingResolver::new(&[
		RuleDef::new("ctrl-k", "single"),
		RuleDef::new("ctrl-k ctrl-c", "comment"),
	]);
	assert!(matches!(resolver.resolve(&chords("ctrl-k"), &()), Resolution::AwaitMore));
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-k ctrl-c"), &())), Some("comment"));
}

#[test]
fn guard_disabled_chord_does_not_hold_prefix_open() {
	let resolver = KeybindingResolver::new(&[
		RuleDef::new("ctrl-k", "single"),
		RuleDef::new("ctrl-k ctrl-c", "comment").when("editorFocus"),
	]);

	// Guard fails: the longer candidate is inert, the single binding fires.
	let unfocused = ctx(&[("editorFocus", ContextValue::Bool(false))]);
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-k"), &unfocused)), Some("single"));

	let focused = ctx(&[("editorFocus", ContextValue::Bool(true))]);
	assert!(matches!(resolver.resolve(&chords("ctrl-k"), &focused), Resolution::AwaitMore));
}

#[test]
fn empty_input_never_matches() {
	let resolver = KeybindingResolver::new(&[RuleDef::new("ctrl-s", "save")]);
	assert!(matches!(resolver.resolve(&[], &()), Resolution::NoMatch));
}

#[test]
fn resolution_is_pure_across_repeated_calls() {
	let resolver = KeybindingResolver::new(&[
		RuleDef::new("ctrl-p", "quickOpen"),
		RuleDef::new("ctrl-p", "terminalPaste").when("inTerminal"),
		RuleDef::new("ctrl-k ctrl-c", "comment"),
	]);
	let c = ctx(&[("inTerminal", ContextValue::Bool(true))]);

	for _ in 0..10 {
		assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-p"), &c)), Some("terminalPaste"));
		assert!(matches!(resolver.resolve(&chords("ctrl-k"), &c), Resolution::AwaitMore));
	}
}

#[test]
fn malformed_rule_is_excluded_not_fatal() {
	let resolver = KeybindingResolver::new(&[
		RuleDef::new("ctrl-s", "save"),
		RuleDef::new("ctrl-!!bogus", "broken"),
		RuleDef::new("ctrl-q", "quit"),
	]);

	assert_eq!(resolver.rules().len(), 2);
	assert_eq!(resolver.problems().len(), 1);
	assert_eq!(resolver.problems()[0].kind, RuleProblemKind::InvalidChordSequence);
	assert_eq!(&*resolver.problems()[0].command, "broken");
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-s"), &())), Some("save"));
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-q"), &())), Some("quit"));
}

#[test]
fn malformed_guard_is_excluded_and_does_not_shadow() {
	let resolver = KeybindingResolver::new(&[
		RuleDef::new("ctrl-s", "save"),
		RuleDef::new("ctrl-s", "broken").when("editorFocus &&"),
	]);

	assert_eq!(resolver.problems().len(), 1);
	assert_eq!(resolver.problems()[0].kind, RuleProblemKind::InvalidGuard);
	// The valid earlier rule still wins.
	assert_eq!(commit_command(&resolver.resolve(&chords("ctrl-s"), &())), Some("save"));
}

#[test]
fn lookup_keybindings_orders_by_precedence() {
	let resolver = KeybindingResolver::new(&[
		RuleDef::new("ctrl-s", "save"),
		RuleDef::new("meta-s", "save").source(RuleSource::User),
		RuleDef::new("f2", "save").weight(10),
	]);

	let bindings = resolver.lookup_keybindings("save");
	let keys: Vec<String> = bindings.iter().map(|r| r.chords()[0].to_string()).collect();
	assert_eq!(keys, vec!["f2", "meta-s", "ctrl-s"]);
	assert_eq!(bindings[1].source(), RuleSource::User);

	assert!(resolver.lookup_keybindings("unknownCommand").is_empty());
}

#[test]
fn rule_defs_deserialize_from_config_shape() {
	let json = r#"[
		{"keys": "ctrl-s", "command": "save", "when": "editorFocus"},
		{"keys": "ctrl-k ctrl-c", "command": "comment", "source": "user", "weight": 1}
	]"#;
	let defs: Vec<RuleDef> = serde_json::from_str(json).unwrap();
	assert_eq!(defs[0].when.as_deref(), Some("editorFocus"));
	assert_eq!(defs[1].source, RuleSource::User);

	let resolver = KeybindingResolver::new(&defs);
	assert_eq!(resolver.rules().len(), 2);
}
