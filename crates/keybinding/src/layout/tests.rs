use pretty_assertions::assert_eq;
use scribe_primitives::{Chord, KeyCode};

use super::*;

#[test]
fn us_layout_maps_letters_and_digits() {
	let layout = UsLayout;
	assert_eq!(layout.chord_of(&RawKeyEvent::new(keycodes::KEY_A)), Some(Chord::char('a')));
	assert_eq!(layout.chord_of(&RawKeyEvent::new(keycodes::KEY_A + 18).ctrl()), Some(Chord::ctrl('s')));
	assert_eq!(layout.chord_of(&RawKeyEvent::new(keycodes::DIGIT_0 + 7)), Some(Chord::char('7')));
}

#[test]
fn us_layout_maps_named_and_function_keys() {
	let layout = UsLayout;
	assert_eq!(layout.chord_of(&RawKeyEvent::new(keycodes::ESCAPE)), Some(Chord::new(KeyCode::Esc)));
	assert_eq!(layout.chord_of(&RawKeyEvent::new(keycodes::F1 + 4)), Some(Chord::new(KeyCode::F(5))));
	assert_eq!(
		layout.chord_of(&RawKeyEvent::new(keycodes::PAGE_DOWN).shift()),
		Some(Chord::new(KeyCode::PageDown).with_shift())
	);
}

#[test]
fn unknown_key_code_produces_no_chord() {
	assert_eq!(UsLayout.chord_of(&RawKeyEvent::new(999)), None);
	// Bare modifier key codes are not mapped.
	assert_eq!(UsLayout.chord_of(&RawKeyEvent::new(17).ctrl()), None);
}

#[test]
fn labels_render_modifiers_and_key() {
	let layout = UsLayout;
	assert_eq!(layout.label(&Chord::ctrl('k')), "Ctrl+K");
	assert_eq!(layout.label(&Chord::char('x').with_ctrl().with_shift()), "Ctrl+Shift+X");
	assert_eq!(layout.label(&Chord::new(KeyCode::F(11))), "F11");
	assert_eq!(layout.label(&Chord::new(KeyCode::Down).with_meta()), "Meta+DownArrow");
}

#[test]
fn printable_predicate_tracks_modifiers() {
	let layout = UsLayout;
	let s = RawKeyEvent::new(keycodes::KEY_A + 18);
	assert!(layout.is_printable(&s));
	assert!(layout.is_printable(&s.shift()));
	assert!(!layout.is_printable(&s.ctrl()));
	assert!(!layout.is_printable(&s.meta()));
	assert!(!layout.is_printable(&RawKeyEvent::new(keycodes::ESCAPE)));
	assert!(layout.is_printable(&RawKeyEvent::new(keycodes::SPACE)));
}

#[test]
fn resolved_keybinding_joins_chord_labels() {
	let resolved = ResolvedKeybinding::new(&[Chord::ctrl('k'), Chord::ctrl('c')], &UsLayout);
	assert_eq!(resolved.label(), "Ctrl+K Ctrl+C");
	assert_eq!(resolved.to_string(), "Ctrl+K Ctrl+C");
	assert_eq!(resolved.chords().len(), 2);
}
