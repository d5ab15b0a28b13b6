//! Typed context values.
//!
//! Context keys are typed at registration time: each key carries a
//! [`ContextKind`], and writes of a different kind are rejected instead of
//! silently coercing.

use std::fmt;

/// A value held by a context key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextValue {
	Bool(bool),
	Int(i64),
	Str(String),
	/// Set-like value consumed by the `in` operator.
	List(Vec<ContextValue>),
}

impl ContextValue {
	/// The kind tag for this value.
	pub fn kind(&self) -> ContextKind {
		match self {
			ContextValue::Bool(_) => ContextKind::Bool,
			ContextValue::Int(_) => ContextKind::Int,
			ContextValue::Str(_) => ContextKind::Str,
			ContextValue::List(_) => ContextKind::List,
		}
	}

	/// Truthiness used by bare-key and negation expressions.
	///
	/// `false`, `0`, the empty string and the empty list are falsy; an
	/// undefined key (represented as `None` at the lookup layer) is falsy.
	pub fn is_truthy(&self) -> bool {
		match self {
			ContextValue::Bool(b) => *b,
			ContextValue::Int(n) => *n != 0,
			ContextValue::Str(s) => !s.is_empty(),
			ContextValue::List(items) => !items.is_empty(),
		}
	}
}

impl fmt::Display for ContextValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ContextValue::Bool(b) => write!(f, "{b}"),
			ContextValue::Int(n) => write!(f, "{n}"),
			ContextValue::Str(s) => write!(f, "{s}"),
			ContextValue::List(items) => {
				write!(f, "[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{item}")?;
				}
				write!(f, "]")
			}
		}
	}
}

/// Kind tag for a context value, fixed per key at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
	Bool,
	Int,
	Str,
	List,
}

impl fmt::Display for ContextKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ContextKind::Bool => "bool",
			ContextKind::Int => "int",
			ContextKind::Str => "string",
			ContextKind::List => "list",
		};
		write!(f, "{name}")
	}
}

impl From<bool> for ContextValue {
	fn from(v: bool) -> Self {
		ContextValue::Bool(v)
	}
}

impl From<i64> for ContextValue {
	fn from(v: i64) -> Self {
		ContextValue::Int(v)
	}
}

impl From<&str> for ContextValue {
	fn from(v: &str) -> Self {
		ContextValue::Str(v.to_string())
	}
}

impl From<String> for ContextValue {
	fn from(v: String) -> Self {
		ContextValue::Str(v)
	}
}

impl From<Vec<ContextValue>> for ContextValue {
	fn from(v: Vec<ContextValue>) -> Self {
		ContextValue::List(v)
	}
}

/// Rust types usable as the payload of a typed [`ContextKey`].
///
/// [`ContextKey`]: crate::ContextKey
pub trait ContextValueType: Into<ContextValue> {
	const KIND: ContextKind;

	/// Extracts a typed copy from a dynamic value of the matching kind.
	fn from_value(value: &ContextValue) -> Option<Self>
	where
		Self: Sized;
}

impl ContextValueType for bool {
	const KIND: ContextKind = ContextKind::Bool;

	fn from_value(value: &ContextValue) -> Option<Self> {
		match value {
			ContextValue::Bool(b) => Some(*b),
			_ => None,
		}
	}
}

impl ContextValueType for i64 {
	const KIND: ContextKind = ContextKind::Int;

	fn from_value(value: &ContextValue) -> Option<Self> {
		match value {
			ContextValue::Int(n) => Some(*n),
			_ => None,
		}
	}
}

impl ContextValueType for String {
	const KIND: ContextKind = ContextKind::Str;

	fn from_value(value: &ContextValue) -> Option<Self> {
		match value {
			ContextValue::Str(s) => Some(s.clone()),
			_ => None,
		}
	}
}

impl ContextValueType for Vec<ContextValue> {
	const KIND: ContextKind = ContextKind::List;

	fn from_value(value: &ContextValue) -> Option<Self> {
		match value {
			ContextValue::List(items) => Some(items.clone()),
			_ => None,
		}
	}
}

/// Point-in-time read access to context values.
///
/// Implemented by store snapshots and, for tests, by plain hash maps.
/// Evaluation through this trait is read-only by construction.
pub trait ContextLookup {
	/// Returns the value of `key`, or `None` if undefined.
	fn value(&self, key: &str) -> Option<ContextValue>;
}

impl<S: std::hash::BuildHasher> ContextLookup for std::collections::HashMap<String, ContextValue, S> {
	fn value(&self, key: &str) -> Option<ContextValue> {
		self.get(key).cloned()
	}
}

/// The empty context: every key is undefined.
impl ContextLookup for () {
	fn value(&self, _key: &str) -> Option<ContextValue> {
		None
	}
}
