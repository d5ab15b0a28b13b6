//! Guard expressions over context keys.
//!
//! An expression is an immutable tree of boolean conditions over key names:
//! bare keys (truthiness), negation, equality against a literal, regex
//! match, list membership, and `&&`/`||` conjunction. Evaluation is pure
//! and total: unknown keys make their containing comparison false, and
//! `!key` of an unknown key is true.
//!
//! Expressions compare structurally and render to a canonical string, which
//! callers use as a cache/dedup key.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::value::{ContextLookup, ContextValue};

pub use parser::ExprParseError;

mod parser;

/// Compiled regex operand of a `=~` expression.
///
/// Equality and hashing use the source pattern, not the compiled automaton,
/// so structurally identical expressions stay equal.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
	source: Box<str>,
	case_insensitive: bool,
	regex: Regex,
}

impl RegexMatcher {
	/// Compiles `pattern`, as written between the `/` delimiters.
	pub fn new(pattern: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
		let regex = regex::RegexBuilder::new(pattern).case_insensitive(case_insensitive).build()?;
		Ok(Self {
			source: pattern.into(),
			case_insensitive,
			regex,
		})
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn is_match(&self, haystack: &str) -> bool {
		self.regex.is_match(haystack)
	}
}

impl PartialEq for RegexMatcher {
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source && self.case_insensitive == other.case_insensitive
	}
}

impl Eq for RegexMatcher {}

impl std::hash::Hash for RegexMatcher {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.source.hash(state);
		self.case_insensitive.hash(state);
	}
}

/// A boolean guard expression over context keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextExpr {
	/// Bare key: true when the key's value is defined and truthy.
	Defined(Arc<str>),
	/// `!key`: true when the key is undefined or falsy.
	Not(Arc<str>),
	/// `key == literal`.
	Equals(Arc<str>, ContextValue),
	/// `key != literal`. False when the key is undefined.
	NotEquals(Arc<str>, ContextValue),
	/// `key =~ /pattern/`.
	Match(Arc<str>, RegexMatcher),
	/// `key in other`: the left value is a member of the right key's list.
	In(Arc<str>, Arc<str>),
	/// Conjunction; flattened, never nests another `And` directly.
	And(Vec<ContextExpr>),
	/// Disjunction; flattened, never nests another `Or` directly.
	Or(Vec<ContextExpr>),
}

impl ContextExpr {
	/// Parses an expression string.
	///
	/// # Errors
	///
	/// Returns an [`ExprParseError`] describing the first offending position
	/// if the input does not match the grammar.
	pub fn parse(input: &str) -> Result<Self, ExprParseError> {
		parser::parse(input)
	}

	/// Conjunction of `exprs`, flattening nested `And` nodes.
	///
	/// Returns the sole operand unchanged instead of a one-element `And`.
	pub fn and(exprs: Vec<ContextExpr>) -> ContextExpr {
		let mut flat = Vec::with_capacity(exprs.len());
		for e in exprs {
			match e {
				ContextExpr::And(inner) => flat.extend(inner),
				other => flat.push(other),
			}
		}
		if flat.len() == 1 { flat.pop().unwrap() } else { ContextExpr::And(flat) }
	}

	/// Disjunction of `exprs`, flattening nested `Or` nodes.
	pub fn or(exprs: Vec<ContextExpr>) -> ContextExpr {
		let mut flat = Vec::with_capacity(exprs.len());
		for e in exprs {
			match e {
				ContextExpr::Or(inner) => flat.extend(inner),
				other => flat.push(other),
			}
		}
		if flat.len() == 1 { flat.pop().unwrap() } else { ContextExpr::Or(flat) }
	}

	/// Evaluates the expression against a context snapshot.
	///
	/// Pure and side-effect-free; `&&`/`||` short-circuit so context lookups
	/// are only performed while the outcome is still undecided.
	pub fn evaluate(&self, ctx: &dyn ContextLookup) -> bool {
		match self {
			ContextExpr::Defined(key) => ctx.value(key).is_some_and(|v| v.is_truthy()),
			ContextExpr::Not(key) => !ctx.value(key).is_some_and(|v| v.is_truthy()),
			ContextExpr::Equals(key, literal) => ctx.value(key).is_some_and(|v| v == *literal),
			ContextExpr::NotEquals(key, literal) => ctx.value(key).is_some_and(|v| v != *literal),
			ContextExpr::Match(key, matcher) => ctx.value(key).is_some_and(|v| match v {
				ContextValue::Str(s) => matcher.is_match(&s),
				ContextValue::Bool(_) | ContextValue::Int(_) => matcher.is_match(&v.to_string()),
				ContextValue::List(_) => false,
			}),
			ContextExpr::In(needle, haystack) => {
				let Some(needle) = ctx.value(needle) else {
					return false;
				};
				matches!(ctx.value(haystack), Some(ContextValue::List(items)) if items.contains(&needle))
			}
			ContextExpr::And(exprs) => exprs.iter().all(|e| e.evaluate(ctx)),
			ContextExpr::Or(exprs) => exprs.iter().any(|e| e.evaluate(ctx)),
		}
	}

	/// Key names referenced anywhere in the expression.
	pub fn keys(&self) -> Vec<&str> {
		let mut out = Vec::new();
		self.collect_keys(&mut out);
		out
	}

	fn collect_keys<'a>(&'a self, out: &mut Vec<&'a str>) {
		match self {
			ContextExpr::Defined(key) | ContextExpr::Not(key) | ContextExpr::Equals(key, _) | ContextExpr::NotEquals(key, _) | ContextExpr::Match(key, _) => {
				out.push(key);
			}
			ContextExpr::In(needle, haystack) => {
				out.push(needle);
				out.push(haystack);
			}
			ContextExpr::And(exprs) | ContextExpr::Or(exprs) => {
				for e in exprs {
					e.collect_keys(out);
				}
			}
		}
	}

	/// Canonical string form.
	///
	/// For any parsed expression, parsing the canonical form back yields an
	/// equal expression. The grammar has no parentheses, so a hand-built
	/// `And` containing an `Or` renders flat and does not round-trip.
	pub fn canonical(&self) -> String {
		self.to_string()
	}
}

fn write_literal(f: &mut fmt::Formatter<'_>, literal: &ContextValue) -> fmt::Result {
	match literal {
		ContextValue::Bool(b) => write!(f, "{b}"),
		ContextValue::Int(n) => write!(f, "{n}"),
		ContextValue::Str(s) => {
			// Strings that would re-parse as a bool or int must stay quoted,
			// or `a == '123'` and `a == 123` would share a canonical form.
			let bare = !s.is_empty()
				&& s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/'))
				&& s != "true"
				&& s != "false"
				&& s.parse::<i64>().is_err();
			if bare { write!(f, "{s}") } else { write!(f, "'{s}'") }
		}
		ContextValue::List(_) => write!(f, "'{literal}'"),
	}
}

impl fmt::Display for ContextExpr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ContextExpr::Defined(key) => write!(f, "{key}"),
			ContextExpr::Not(key) => write!(f, "!{key}"),
			ContextExpr::Equals(key, literal) => {
				write!(f, "{key} == ")?;
				write_literal(f, literal)
			}
			ContextExpr::NotEquals(key, literal) => {
				write!(f, "{key} != ")?;
				write_literal(f, literal)
			}
			ContextExpr::Match(key, matcher) => {
				write!(f, "{key} =~ /{}/", matcher.source)?;
				if matcher.case_insensitive {
					write!(f, "i")?;
				}
				Ok(())
			}
			ContextExpr::In(needle, haystack) => write!(f, "{needle} in {haystack}"),
			ContextExpr::And(exprs) => {
				for (i, e) in exprs.iter().enumerate() {
					if i > 0 {
						write!(f, " && ")?;
					}
					write!(f, "{e}")?;
				}
				Ok(())
			}
			ContextExpr::Or(exprs) => {
				for (i, e) in exprs.iter().enumerate() {
					if i > 0 {
						write!(f, " || ")?;
					}
					write!(f, "{e}")?;
				}
				Ok(())
			}
		}
	}
}
