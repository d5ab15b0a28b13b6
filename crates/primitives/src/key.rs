//! Chord representation for keybinding rules and dispatch.
//!
//! A [`Chord`] is one discrete key combination: a [`KeyCode`] plus a
//! [`Modifiers`] set. Chord *sequences* (multi-stroke bindings such as
//! `ctrl-k ctrl-c`) are ordered lists of chords and live in the keybinding
//! layer; this module only knows about single combinations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key modifiers (Ctrl, Alt, Shift, Meta).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
	pub ctrl: bool,
	pub alt: bool,
	pub shift: bool,
	/// Platform key: Cmd on macOS, Win/Super elsewhere.
	pub meta: bool,
}

impl Modifiers {
	pub const NONE: Self = Self {
		ctrl: false,
		alt: false,
		shift: false,
		meta: false,
	};

	pub const CTRL: Self = Self { ctrl: true, ..Self::NONE };

	pub const ALT: Self = Self { alt: true, ..Self::NONE };

	pub const SHIFT: Self = Self { shift: true, ..Self::NONE };

	pub const META: Self = Self { meta: true, ..Self::NONE };

	pub fn ctrl(self) -> Self {
		Self { ctrl: true, ..self }
	}

	pub fn alt(self) -> Self {
		Self { alt: true, ..self }
	}

	pub fn shift(self) -> Self {
		Self {
			shift: true,
			..self
		}
	}

	pub fn meta(self) -> Self {
		Self { meta: true, ..self }
	}

	pub fn is_empty(self) -> bool {
		!self.ctrl && !self.alt && !self.shift && !self.meta
	}
}

/// Layout-independent key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
	Char(char),
	F(u8),
	Esc,
	Enter,
	Tab,
	Backspace,
	Delete,
	Insert,
	Home,
	End,
	PageUp,
	PageDown,
	Up,
	Down,
	Left,
	Right,
	Space,
}

impl KeyCode {
	/// Named-key spelling used by the chord grammar, if this is a named key.
	pub fn name(self) -> Option<&'static str> {
		Some(match self {
			KeyCode::Esc => "esc",
			KeyCode::Enter => "enter",
			KeyCode::Tab => "tab",
			KeyCode::Backspace => "backspace",
			KeyCode::Delete => "del",
			KeyCode::Insert => "insert",
			KeyCode::Home => "home",
			KeyCode::End => "end",
			KeyCode::PageUp => "pageup",
			KeyCode::PageDown => "pagedown",
			KeyCode::Up => "up",
			KeyCode::Down => "down",
			KeyCode::Left => "left",
			KeyCode::Right => "right",
			KeyCode::Space => "space",
			KeyCode::Char(_) | KeyCode::F(_) => return None,
		})
	}
}

impl fmt::Display for KeyCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			KeyCode::Char(c) => write!(f, "{c}"),
			KeyCode::F(n) => write!(f, "f{n}"),
			other => write!(f, "{}", other.name().unwrap_or("?")),
		}
	}
}

/// One discrete key combination (modifiers + key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
	pub code: KeyCode,
	pub modifiers: Modifiers,
}

impl Chord {
	/// Chord from a key code with no modifiers.
	pub const fn new(code: KeyCode) -> Self {
		Self {
			code,
			modifiers: Modifiers::NONE,
		}
	}

	/// Chord from a bare character.
	pub const fn char(c: char) -> Self {
		Self::new(KeyCode::Char(c))
	}

	/// Chord from a character with Ctrl held.
	pub const fn ctrl(c: char) -> Self {
		Self {
			code: KeyCode::Char(c),
			modifiers: Modifiers::CTRL,
		}
	}

	/// Chord from a character with Meta held.
	pub const fn meta(c: char) -> Self {
		Self {
			code: KeyCode::Char(c),
			modifiers: Modifiers::META,
		}
	}

	pub const fn with_ctrl(self) -> Self {
		Self {
			modifiers: Modifiers {
				ctrl: true,
				..self.modifiers
			},
			..self
		}
	}

	pub const fn with_alt(self) -> Self {
		Self {
			modifiers: Modifiers {
				alt: true,
				..self.modifiers
			},
			..self
		}
	}

	pub const fn with_shift(self) -> Self {
		Self {
			modifiers: Modifiers {
				shift: true,
				..self.modifiers
			},
			..self
		}
	}

	pub const fn with_meta(self) -> Self {
		Self {
			modifiers: Modifiers {
				meta: true,
				..self.modifiers
			},
			..self
		}
	}

	/// Character carried by this chord, if any.
	pub fn codepoint(&self) -> Option<char> {
		match self.code {
			KeyCode::Char(c) => Some(c),
			KeyCode::Space => Some(' '),
			_ => None,
		}
	}

	pub fn is_char(&self, c: char) -> bool {
		matches!(self.code, KeyCode::Char(ch) if ch == c)
	}

	pub fn is_escape(&self) -> bool {
		matches!(self.code, KeyCode::Esc) && self.modifiers.is_empty()
	}
}

impl From<KeyCode> for Chord {
	fn from(code: KeyCode) -> Self {
		Self::new(code)
	}
}

impl fmt::Display for Chord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.modifiers.ctrl {
			write!(f, "ctrl-")?;
		}
		if self.modifiers.meta {
			write!(f, "meta-")?;
		}
		if self.modifiers.alt {
			write!(f, "alt-")?;
		}
		if self.modifiers.shift {
			write!(f, "shift-")?;
		}
		write!(f, "{}", self.code)
	}
}

#[cfg(test)]
mod tests;
