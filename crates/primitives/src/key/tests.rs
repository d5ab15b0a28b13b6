use super::*;

#[test]
fn modifier_builders_compose() {
	let mods = Modifiers::NONE.ctrl().shift();
	assert!(mods.ctrl);
	assert!(mods.shift);
	assert!(!mods.alt);
	assert!(!mods.is_empty());
	assert!(Modifiers::NONE.is_empty());
}

#[test]
fn chord_constructors() {
	assert_eq!(Chord::ctrl('s').modifiers, Modifiers::CTRL);
	assert_eq!(Chord::char('a').code, KeyCode::Char('a'));
	assert_eq!(Chord::new(KeyCode::Esc).with_alt().modifiers, Modifiers::ALT);
}

#[test]
fn display_round_trips_through_parser() {
	let chords = [
		Chord::ctrl('k'),
		Chord::char('g'),
		Chord::new(KeyCode::F(5)).with_shift(),
		Chord::new(KeyCode::PageDown).with_ctrl().with_alt(),
		Chord::meta('p'),
	];
	for chord in chords {
		let text = chord.to_string();
		assert_eq!(crate::parse_chord(&text).unwrap(), chord, "round trip of {text}");
	}
}

#[test]
fn codepoint_and_predicates() {
	assert_eq!(Chord::char('x').codepoint(), Some('x'));
	assert_eq!(Chord::new(KeyCode::Space).codepoint(), Some(' '));
	assert_eq!(Chord::new(KeyCode::Enter).codepoint(), None);
	assert!(Chord::new(KeyCode::Esc).is_escape());
	assert!(!Chord::new(KeyCode::Esc).with_ctrl().is_escape());
	assert!(Chord::char('q').is_char('q'));
}

#[test]
fn display_orders_modifiers_canonically() {
	let chord = Chord::char('z').with_shift().with_ctrl().with_meta().with_alt();
	assert_eq!(chord.to_string(), "ctrl-meta-alt-shift-z");
}
