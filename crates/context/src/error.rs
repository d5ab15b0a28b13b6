//! Error types for the context store.

use thiserror::Error;

use crate::value::ContextKind;

/// Errors that can occur when registering or mutating context keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
	/// A key was re-registered in the same scope with a different value type.
	#[error("context key '{name}' already registered as {existing}, cannot re-register as {requested}")]
	TypeConflict {
		/// The contested key name.
		name: String,
		/// Kind recorded at first registration.
		existing: ContextKind,
		/// Kind requested by the conflicting registration.
		requested: ContextKind,
	},

	/// A handle referenced a scope that has been disposed.
	#[error("context scope {scope} has been disposed")]
	StaleScope {
		/// Index of the disposed scope.
		scope: u32,
	},

	/// A handle referenced a key no longer present in its scope.
	#[error("context key '{name}' is not registered in its scope")]
	StaleKey {
		/// The missing key name.
		name: String,
	},
}
