//! Chord-string parser.
//!
//! Parses plain-text chord definitions such as `"ctrl-s"`, `"meta-shift-p"`
//! or the two-stroke sequence `"ctrl-k ctrl-c"` into [`Chord`] values.
//!
//! ## Supported syntax
//!
//! ```text
//! seq       = chord (" " chord)*
//! chord     = (modifier "-")* key
//! modifier  = "ctrl" | "alt" | "shift" | "meta" | "cmd"
//! key       = fn-key | named-key | char
//! fn-key    = "f" digit digit?
//! named-key = "esc" | "enter" | "tab" | "backspace" | "del" | ...
//! char      = ascii-char
//! ```
//!
//! `cmd` is accepted as an alias for `meta`. Parsing is deterministic and
//! reports the byte offset of the first offending character.

use std::str::FromStr;

use thiserror::Error;

use crate::key::{Chord, KeyCode, Modifiers};

/// Function pointer type for parser alternatives.
type ParserFn<T> = fn(&mut Parser) -> Result<Option<T>, ParseError>;

/// Error produced when a chord string does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

/// Maintains the parser's state for recursive descent parsing.
struct Parser<'a> {
	input: &'a str,
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, position: 0 }
	}

	fn peek(&self) -> Option<char> {
		self.input.chars().next()
	}

	fn peek_at(&self, n: usize) -> Option<char> {
		self.input.chars().nth(n)
	}

	fn next(&mut self) -> Option<char> {
		if let Some(ch) = self.peek() {
			self.position += ch.len_utf8();
			self.input = &self.input[ch.len_utf8()..];
			Some(ch)
		} else {
			None
		}
	}

	fn is_end(&self) -> bool {
		self.input.is_empty()
	}

	/// Consumes the next character if it matches the expected one.
	fn take(&mut self, expected: char) -> Result<(), ParseError> {
		match self.next() {
			Some(ch) if ch == expected => Ok(()),
			Some(ch) => Err(ParseError {
				message: format!("expected '{expected}', found '{ch}'"),
				position: self.position - ch.len_utf8(),
			}),
			None => Err(ParseError {
				message: format!("expected '{expected}', found end of input"),
				position: self.position,
			}),
		}
	}

	/// Attempts to parse with a fallback: restores state if parsing fails.
	fn try_parse<T, F>(&mut self, f: F) -> Result<Option<T>, ParseError>
	where
		F: FnOnce(&mut Parser<'a>) -> Result<Option<T>, ParseError>,
	{
		let snapshot = (self.input, self.position);
		match f(self) {
			Ok(Some(val)) => Ok(Some(val)),
			Ok(None) | Err(_) => {
				self.input = snapshot.0;
				self.position = snapshot.1;
				Ok(None)
			}
		}
	}

	fn take_while<F>(&mut self, predicate: F) -> String
	where
		F: Fn(char) -> bool,
	{
		let mut result = String::new();
		while let Some(ch) = self.peek() {
			if predicate(ch) {
				result.push(ch);
				self.next();
			} else {
				break;
			}
		}
		result
	}

	/// Tries multiple parsers in sequence, returning the first success.
	fn alt<T>(&mut self, parsers: &[ParserFn<T>]) -> Result<Option<T>, ParseError> {
		for p in parsers {
			match p(self)? {
				Some(value) => return Ok(Some(value)),
				None => continue,
			}
		}
		Ok(None)
	}

	fn error(&self, message: String) -> ParseError {
		ParseError {
			message,
			position: self.position,
		}
	}
}

/// Parses a single chord expression such as `"ctrl-b"` or `"f1"`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input does not match the chord grammar.
pub fn parse_chord(s: &str) -> Result<Chord, ParseError> {
	let mut parser = Parser::new(s);
	let chord = parse_chord_inner(&mut parser)?;

	if !parser.is_end() {
		return Err(parser.error(format!("expected end of input, found: {}", parser.peek().unwrap())));
	}

	Ok(chord)
}

/// Parses a whitespace-separated chord sequence such as `"ctrl-k ctrl-c"`.
///
/// # Errors
///
/// Returns a [`ParseError`] if any segment fails to parse, or if the input
/// contains no chords at all.
pub fn parse_chord_seq(s: &str) -> Result<Vec<Chord>, ParseError> {
	let chords: Vec<Chord> = s.split_whitespace().map(parse_chord).collect::<Result<_, _>>()?;
	if chords.is_empty() {
		return Err(ParseError {
			message: "empty chord sequence".to_string(),
			position: 0,
		});
	}
	Ok(chords)
}

/// Grammar: `chord = (modifier "-")* key`
fn parse_chord_inner(parser: &mut Parser) -> Result<Chord, ParseError> {
	let mut modifiers = Modifiers::NONE;

	for _ in 0..4 {
		if let Some(m) = try_parse_modifier(parser)? {
			modifiers = m(modifiers);
		} else {
			break;
		}
	}

	let code = parse_key(parser)?;
	Ok(Chord { code, modifiers })
}

/// Attempts to parse a single modifier name followed by `-`.
fn try_parse_modifier(parser: &mut Parser) -> Result<Option<fn(Modifiers) -> Modifiers>, ParseError> {
	parser.try_parse(|p| {
		let name = p.take_while(|ch| ch.is_ascii_alphabetic());
		let apply: fn(Modifiers) -> Modifiers = match name.as_str() {
			"ctrl" => Modifiers::ctrl,
			"alt" => Modifiers::alt,
			"shift" => Modifiers::shift,
			"meta" | "cmd" => Modifiers::meta,
			_ => return Ok(None),
		};

		p.take('-')?;
		Ok(Some(apply))
	})
}

/// Parses a key value: function key, named key, or ASCII char.
fn parse_key(parser: &mut Parser) -> Result<KeyCode, ParseError> {
	match parser.alt(&[try_parse_fn_key, try_parse_named_key, try_parse_char])? {
		Some(key) => Ok(key),
		None => Err(parser.error("expected a valid key".to_string())),
	}
}

/// Attempts to parse a function key (`"f1"` to `"f35"`).
///
/// Only activates when the input starts with `f` followed by a digit. Once
/// activated, the digits must form a valid function key number or an error
/// is returned (no silent degradation to a char key).
fn try_parse_fn_key(parser: &mut Parser) -> Result<Option<KeyCode>, ParseError> {
	if parser.peek() != Some('f') {
		return Ok(None);
	}
	if !matches!(parser.peek_at(1), Some(ch) if ch.is_ascii_digit()) {
		return Ok(None);
	}

	parser.take('f')?;
	let num = parser.take_while(|ch| ch.is_ascii_digit());

	match num.parse::<u8>() {
		Ok(n) if (1..=35).contains(&n) => Ok(Some(KeyCode::F(n))),
		_ => Err(parser.error("invalid function key number (must be 1-35)".to_string())),
	}
}

/// Attempts to parse a named key such as `"esc"` or `"pagedown"`.
fn try_parse_named_key(parser: &mut Parser) -> Result<Option<KeyCode>, ParseError> {
	parser.try_parse(|p| {
		let name = p.take_while(|ch| ch.is_ascii_alphabetic());
		if name.len() < 2 {
			return Ok(None);
		}
		match name.parse::<KeyCode>() {
			Ok(key) => Ok(Some(key)),
			Err(_) => Ok(None),
		}
	})
}

/// Attempts to parse a single ASCII character as a key.
fn try_parse_char(parser: &mut Parser) -> Result<Option<KeyCode>, ParseError> {
	match parser.peek() {
		Some(ch) if ch.is_ascii() && !ch.is_whitespace() => {
			parser.next();
			Ok(Some(KeyCode::Char(ch)))
		}
		_ => Ok(None),
	}
}

impl FromStr for KeyCode {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"esc" | "escape" => KeyCode::Esc,
			"enter" | "ret" => KeyCode::Enter,
			"tab" => KeyCode::Tab,
			"backspace" => KeyCode::Backspace,
			"del" | "delete" => KeyCode::Delete,
			"insert" => KeyCode::Insert,
			"home" => KeyCode::Home,
			"end" => KeyCode::End,
			"pageup" => KeyCode::PageUp,
			"pagedown" => KeyCode::PageDown,
			"up" => KeyCode::Up,
			"down" => KeyCode::Down,
			"left" => KeyCode::Left,
			"right" => KeyCode::Right,
			"space" => KeyCode::Space,
			_ => return Err(()),
		})
	}
}

impl FromStr for Chord {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_chord(s)
	}
}

#[cfg(test)]
mod tests;
