//! Recursive descent parser for guard expressions.
//!
//! ## Supported syntax
//!
//! ```text
//! expr    = and ("||" and)*
//! and     = atom ("&&" atom)*
//! atom    = "!" key | key (op)?
//! op      = "==" literal | "!=" literal | "=~" regex | "in" key
//! key     = ident ("." ident)*
//! literal = "'" chars "'" | "true" | "false" | integer | bare-word
//! regex   = "/" pattern "/" "i"?
//! ```
//!
//! `||` binds loosest, then `&&`, then comparisons; there are no
//! parentheses. The parser is deterministic: each alternative is selected
//! by bounded lookahead, never by backtracking over committed input.

use std::sync::Arc;

use thiserror::Error;

use super::{ContextExpr, RegexMatcher};
use crate::value::ContextValue;

/// Error produced when an expression string does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expression parse error at position {position}: {message}")]
pub struct ExprParseError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

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

	fn skip_ws(&mut self) {
		while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
			self.next();
		}
	}

	/// Consumes `token` if the input starts with it.
	fn take_token(&mut self, token: &str) -> bool {
		if self.input.starts_with(token) {
			self.position += token.len();
			self.input = &self.input[token.len()..];
			true
		} else {
			false
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

	fn error(&self, message: impl Into<String>) -> ExprParseError {
		ExprParseError {
			message: message.into(),
			position: self.position,
		}
	}
}

/// Parses a complete expression, rejecting trailing input.
pub(super) fn parse(input: &str) -> Result<ContextExpr, ExprParseError> {
	let mut parser = Parser::new(input);
	parser.skip_ws();
	let expr = parse_or(&mut parser)?;
	parser.skip_ws();

	if !parser.is_end() {
		return Err(parser.error(format!("expected end of input, found: {}", parser.peek().unwrap())));
	}

	Ok(expr)
}

fn parse_or(parser: &mut Parser) -> Result<ContextExpr, ExprParseError> {
	let mut operands = vec![parse_and(parser)?];

	loop {
		parser.skip_ws();
		if !parser.take_token("||") {
			break;
		}
		parser.skip_ws();
		operands.push(parse_and(parser)?);
	}

	Ok(ContextExpr::or(operands))
}

fn parse_and(parser: &mut Parser) -> Result<ContextExpr, ExprParseError> {
	let mut operands = vec![parse_atom(parser)?];

	loop {
		parser.skip_ws();
		if !parser.take_token("&&") {
			break;
		}
		parser.skip_ws();
		operands.push(parse_atom(parser)?);
	}

	Ok(ContextExpr::and(operands))
}

fn parse_atom(parser: &mut Parser) -> Result<ContextExpr, ExprParseError> {
	if parser.peek() == Some('!') && parser.peek_at(1) != Some('=') {
		parser.next();
		parser.skip_ws();
		let key = parse_key(parser)?;
		return Ok(ContextExpr::Not(key));
	}

	let key = parse_key(parser)?;
	parser.skip_ws();

	if parser.take_token("==") {
		parser.skip_ws();
		let literal = parse_literal(parser)?;
		return Ok(ContextExpr::Equals(key, literal));
	}
	if parser.take_token("!=") {
		parser.skip_ws();
		let literal = parse_literal(parser)?;
		return Ok(ContextExpr::NotEquals(key, literal));
	}
	if parser.take_token("=~") {
		parser.skip_ws();
		let matcher = parse_regex(parser)?;
		return Ok(ContextExpr::Match(key, matcher));
	}
	if is_in_operator(parser) {
		parser.take_token("in");
		parser.skip_ws();
		let haystack = parse_key(parser)?;
		return Ok(ContextExpr::In(key, haystack));
	}

	Ok(ContextExpr::Defined(key))
}

/// `in` only acts as an operator when followed by whitespace, so keys such
/// as `inbox` never activate it.
fn is_in_operator(parser: &Parser) -> bool {
	parser.input.starts_with("in") && matches!(parser.peek_at(2), Some(ch) if ch.is_whitespace())
}

fn is_key_start(ch: char) -> bool {
	ch.is_ascii_alphabetic() || ch == '_'
}

fn is_key_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}

fn parse_key(parser: &mut Parser) -> Result<Arc<str>, ExprParseError> {
	if !matches!(parser.peek(), Some(ch) if is_key_start(ch)) {
		return Err(parser.error("expected a context key"));
	}
	let name = parser.take_while(is_key_char);
	Ok(Arc::from(name))
}

fn is_bare_literal_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-' | '/')
}

fn parse_literal(parser: &mut Parser) -> Result<ContextValue, ExprParseError> {
	if parser.peek() == Some('\'') {
		parser.next();
		let mut content = String::new();
		loop {
			match parser.next() {
				Some('\'') => return Ok(ContextValue::Str(content)),
				Some(ch) => content.push(ch),
				None => return Err(parser.error("unterminated string literal")),
			}
		}
	}

	let word = parser.take_while(is_bare_literal_char);
	if word.is_empty() {
		return Err(parser.error("expected a literal value"));
	}

	Ok(match word.as_str() {
		"true" => ContextValue::Bool(true),
		"false" => ContextValue::Bool(false),
		_ => match word.parse::<i64>() {
			Ok(n) => ContextValue::Int(n),
			Err(_) => ContextValue::Str(word),
		},
	})
}

fn parse_regex(parser: &mut Parser) -> Result<RegexMatcher, ExprParseError> {
	let start = parser.position;
	if parser.next() != Some('/') {
		return Err(ExprParseError {
			message: "expected a /regex/ literal".to_string(),
			position: start,
		});
	}

	let mut pattern = String::new();
	loop {
		match parser.next() {
			Some('\\') => {
				pattern.push('\\');
				match parser.next() {
					Some(ch) => pattern.push(ch),
					None => return Err(parser.error("unterminated regex literal")),
				}
			}
			Some('/') => break,
			Some(ch) => pattern.push(ch),
			None => return Err(parser.error("unterminated regex literal")),
		}
	}

	let case_insensitive = if parser.peek() == Some('i') {
		parser.next();
		true
	} else {
		false
	};

	RegexMatcher::new(&pattern, case_insensitive).map_err(|e| ExprParseError {
		message: format!("invalid regex: {e}"),
		position: start,
	})
}
