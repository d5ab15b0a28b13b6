use super::*;

#[test]
fn parses_bare_char() {
	assert_eq!(parse_chord("a").unwrap(), Chord::char('a'));
	assert_eq!(parse_chord("?").unwrap(), Chord::char('?'));
}

#[test]
fn parses_modifier_combinations() {
	assert_eq!(parse_chord("ctrl-b").unwrap(), Chord::ctrl('b'));
	assert_eq!(parse_chord("ctrl-alt-x").unwrap(), Chord::char('x').with_ctrl().with_alt());
	assert_eq!(parse_chord("cmd-p").unwrap(), Chord::meta('p'));
	assert_eq!(parse_chord("meta-p").unwrap(), Chord::meta('p'));
	assert_eq!(parse_chord("shift-tab").unwrap(), Chord::new(KeyCode::Tab).with_shift());
}

#[test]
fn parses_function_keys() {
	assert_eq!(parse_chord("f1").unwrap(), Chord::new(KeyCode::F(1)));
	assert_eq!(parse_chord("f35").unwrap(), Chord::new(KeyCode::F(35)));
	assert_eq!(parse_chord("ctrl-f12").unwrap(), Chord::new(KeyCode::F(12)).with_ctrl());
}

#[test]
fn rejects_out_of_range_function_keys() {
	let err = parse_chord("f36").unwrap_err();
	assert!(err.message.contains("function key"));
	assert!(parse_chord("f0").is_err());
}

#[test]
fn parses_named_keys() {
	assert_eq!(parse_chord("esc").unwrap(), Chord::new(KeyCode::Esc));
	assert_eq!(parse_chord("pagedown").unwrap(), Chord::new(KeyCode::PageDown));
	assert_eq!(parse_chord("del").unwrap(), Chord::new(KeyCode::Delete));
	assert_eq!(parse_chord("space").unwrap(), Chord::new(KeyCode::Space));
}

#[test]
fn bare_f_is_a_char_key() {
	assert_eq!(parse_chord("f").unwrap(), Chord::char('f'));
}

#[test]
fn rejects_trailing_garbage() {
	let err = parse_chord("ctrl-ab").unwrap_err();
	assert!(err.message.contains("end of input"));
	assert_eq!(err.position, 6);
}

#[test]
fn rejects_empty_input() {
	assert!(parse_chord("").is_err());
	assert!(parse_chord_seq("").is_err());
	assert!(parse_chord_seq("   ").is_err());
}

#[test]
fn parses_sequences() {
	assert_eq!(
		parse_chord_seq("ctrl-k ctrl-c").unwrap(),
		vec![Chord::ctrl('k'), Chord::ctrl('c')]
	);
	assert_eq!(parse_chord_seq("g g").unwrap(), vec![Chord::char('g'), Chord::char('g')]);
}

#[test]
fn sequence_reports_error_in_later_chord() {
	assert!(parse_chord_seq("ctrl-k f99").is_err());
}

#[test]
fn from_str_matches_parse() {
	let chord: Chord = "ctrl-s".parse().unwrap();
	assert_eq!(chord, Chord::ctrl('s'));
}
