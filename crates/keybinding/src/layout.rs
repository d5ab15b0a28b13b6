//! Keyboard layout collaborator.
//!
//! The dispatch layer never inspects raw key codes itself: an injected
//! [`KeyboardLayout`] converts a [`RawKeyEvent`] into an abstract
//! [`Chord`] and renders chords into display labels. [`UsLayout`] is the
//! bundled US-layout implementation; hosts with OS layout tables supply
//! their own.

use scribe_primitives::{Chord, KeyCode, Modifiers};
use smallvec::SmallVec;

/// Virtual key code values used by [`RawKeyEvent`].
///
/// The numbering follows the common browser/Win32 virtual-key assignments;
/// letter and digit codes coincide with their uppercase ASCII values.
pub mod keycodes {
	pub const BACKSPACE: u32 = 8;
	pub const TAB: u32 = 9;
	pub const ENTER: u32 = 13;
	pub const ESCAPE: u32 = 27;
	pub const SPACE: u32 = 32;
	pub const PAGE_UP: u32 = 33;
	pub const PAGE_DOWN: u32 = 34;
	pub const END: u32 = 35;
	pub const HOME: u32 = 36;
	pub const LEFT: u32 = 37;
	pub const UP: u32 = 38;
	pub const RIGHT: u32 = 39;
	pub const DOWN: u32 = 40;
	pub const INSERT: u32 = 45;
	pub const DELETE: u32 = 46;
	/// `0`–`9` occupy 48–57; `A`–`Z` occupy 65–90.
	pub const DIGIT_0: u32 = 48;
	pub const KEY_A: u32 = 65;
	/// F1–F12 occupy 112–123.
	pub const F1: u32 = 112;
	pub const SEMICOLON: u32 = 186;
	pub const EQUAL: u32 = 187;
	pub const COMMA: u32 = 188;
	pub const MINUS: u32 = 189;
	pub const PERIOD: u32 = 190;
	pub const SLASH: u32 = 191;
	pub const BACKTICK: u32 = 192;
	pub const BRACKET_LEFT: u32 = 219;
	pub const BACKSLASH: u32 = 220;
	pub const BRACKET_RIGHT: u32 = 221;
	pub const QUOTE: u32 = 222;
}

/// A raw keyboard event as delivered by the host input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
	/// Virtual key code (see [`keycodes`]).
	pub key_code: u32,
	pub ctrl: bool,
	pub alt: bool,
	pub shift: bool,
	pub meta: bool,
}

impl RawKeyEvent {
	pub fn new(key_code: u32) -> Self {
		Self {
			key_code,
			ctrl: false,
			alt: false,
			shift: false,
			meta: false,
		}
	}

	pub fn ctrl(mut self) -> Self {
		self.ctrl = true;
		self
	}

	pub fn alt(mut self) -> Self {
		self.alt = true;
		self
	}

	pub fn shift(mut self) -> Self {
		self.shift = true;
		self
	}

	pub fn meta(mut self) -> Self {
		self.meta = true;
		self
	}

	fn modifiers(&self) -> Modifiers {
		Modifiers {
			ctrl: self.ctrl,
			alt: self.alt,
			shift: self.shift,
			meta: self.meta,
		}
	}
}

/// Layout collaborator: key codes in, chords and labels out.
///
/// Implementations are pure; the dispatcher may call them at any point
/// without affecting state.
pub trait KeyboardLayout {
	/// Converts a raw event into an abstract chord.
	///
	/// `None` marks an unrecognized key (dead keys, IME intermediates,
	/// bare modifiers); the dispatcher treats it as no-match.
	fn chord_of(&self, event: &RawKeyEvent) -> Option<Chord>;

	/// Display label for one chord, e.g. `"Ctrl+K"`.
	fn label(&self, chord: &Chord) -> String;

	/// Whether the event would insert a printable character if left alone.
	///
	/// Pure predicate used by callers deciding whether to suppress default
	/// text insertion before resolution completes.
	fn is_printable(&self, event: &RawKeyEvent) -> bool;
}

/// Standard US keyboard layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsLayout;

impl UsLayout {
	fn code_of(&self, key_code: u32) -> Option<KeyCode> {
		use keycodes as kc;

		Some(match key_code {
			kc::BACKSPACE => KeyCode::Backspace,
			kc::TAB => KeyCode::Tab,
			kc::ENTER => KeyCode::Enter,
			kc::ESCAPE => KeyCode::Esc,
			kc::SPACE => KeyCode::Space,
			kc::PAGE_UP => KeyCode::PageUp,
			kc::PAGE_DOWN => KeyCode::PageDown,
			kc::END => KeyCode::End,
			kc::HOME => KeyCode::Home,
			kc::LEFT => KeyCode::Left,
			kc::UP => KeyCode::Up,
			kc::RIGHT => KeyCode::Right,
			kc::DOWN => KeyCode::Down,
			kc::INSERT => KeyCode::Insert,
			kc::DELETE => KeyCode::Delete,
			48..=57 => KeyCode::Char((b'0' + (key_code - kc::DIGIT_0) as u8) as char),
			65..=90 => KeyCode::Char((b'a' + (key_code - kc::KEY_A) as u8) as char),
			112..=123 => KeyCode::F((key_code - kc::F1 + 1) as u8),
			kc::SEMICOLON => KeyCode::Char(';'),
			kc::EQUAL => KeyCode::Char('='),
			kc::COMMA => KeyCode::Char(','),
			kc::MINUS => KeyCode::Char('-'),
			kc::PERIOD => KeyCode::Char('.'),
			kc::SLASH => KeyCode::Char('/'),
			kc::BACKTICK => KeyCode::Char('`'),
			kc::BRACKET_LEFT => KeyCode::Char('['),
			kc::BACKSLASH => KeyCode::Char('\\'),
			kc::BRACKET_RIGHT => KeyCode::Char(']'),
			kc::QUOTE => KeyCode::Char('\''),
			_ => return None,
		})
	}
}

impl KeyboardLayout for UsLayout {
	fn chord_of(&self, event: &RawKeyEvent) -> Option<Chord> {
		Some(Chord {
			code: self.code_of(event.key_code)?,
			modifiers: event.modifiers(),
		})
	}

	fn label(&self, chord: &Chord) -> String {
		let mut label = String::new();
		if chord.modifiers.ctrl {
			label.push_str("Ctrl+");
		}
		if chord.modifiers.shift {
			label.push_str("Shift+");
		}
		if chord.modifiers.alt {
			label.push_str("Alt+");
		}
		if chord.modifiers.meta {
			label.push_str("Meta+");
		}
		match chord.code {
			KeyCode::Char(c) => label.push(c.to_ascii_uppercase()),
			KeyCode::F(n) => label.push_str(&format!("F{n}")),
			KeyCode::Esc => label.push_str("Escape"),
			KeyCode::Enter => label.push_str("Enter"),
			KeyCode::Tab => label.push_str("Tab"),
			KeyCode::Backspace => label.push_str("Backspace"),
			KeyCode::Delete => label.push_str("Delete"),
			KeyCode::Insert => label.push_str("Insert"),
			KeyCode::Home => label.push_str("Home"),
			KeyCode::End => label.push_str("End"),
			KeyCode::PageUp => label.push_str("PageUp"),
			KeyCode::PageDown => label.push_str("PageDown"),
			KeyCode::Up => label.push_str("UpArrow"),
			KeyCode::Down => label.push_str("DownArrow"),
			KeyCode::Left => label.push_str("LeftArrow"),
			KeyCode::Right => label.push_str("RightArrow"),
			KeyCode::Space => label.push_str("Space"),
		}
		label
	}

	fn is_printable(&self, event: &RawKeyEvent) -> bool {
		if event.ctrl || event.meta {
			return false;
		}
		matches!(self.chord_of(event), Some(chord) if chord.codepoint().is_some())
	}
}

/// Printable, layout-dependent rendering of one binding's chord sequence.
///
/// Derived from the active layout at construction; the service rebuilds
/// these whenever the layout changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKeybinding {
	chords: SmallVec<[Chord; 2]>,
	label: String,
}

impl ResolvedKeybinding {
	pub fn new(chords: &[Chord], layout: &dyn KeyboardLayout) -> Self {
		let label = chords.iter().map(|c| layout.label(c)).collect::<Vec<_>>().join(" ");
		Self {
			chords: SmallVec::from_slice(chords),
			label,
		}
	}

	pub fn chords(&self) -> &[Chord] {
		&self.chords
	}

	/// Space-separated chord labels, e.g. `"Ctrl+K Ctrl+C"`.
	pub fn label(&self) -> &str {
		&self.label
	}
}

impl std::fmt::Display for ResolvedKeybinding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.label)
	}
}

#[cfg(test)]
mod tests;
