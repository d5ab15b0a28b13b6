//! Keybinding rule definitions and their compiled form.
//!
//! The rule-source collaborator hands the core an *ordered* list of
//! [`RuleDef`] values (chord string, command id, optional guard). The core
//! compiles them into immutable [`KeybindingRule`]s; definitions that fail
//! to parse are excluded and recorded as [`RuleProblem`]s instead of
//! aborting the whole set.

use std::sync::Arc;

use scribe_context::ContextExpr;
use scribe_context::ContextLookup;
use scribe_primitives::Chord;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Chord sequence of one binding; nearly always one or two strokes.
pub type ChordSeq = SmallVec<[Chord; 2]>;

/// Origin of a rule, for diagnostics and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSource {
	/// Shipped default binding.
	#[default]
	Default,
	/// User-defined binding.
	User,
}

/// One keybinding rule as supplied by the rule-source collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
	/// Chord sequence string, e.g. `"ctrl-s"` or `"ctrl-k ctrl-c"`.
	pub keys: String,
	/// Command id invoked when the rule fires.
	pub command: String,
	/// Optional guard expression string.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub when: Option<String>,
	#[serde(default)]
	pub source: RuleSource,
	/// Tie-break weight; higher wins, later registration wins at equal weight.
	#[serde(default)]
	pub weight: i32,
}

impl RuleDef {
	pub fn new(keys: impl Into<String>, command: impl Into<String>) -> Self {
		Self {
			keys: keys.into(),
			command: command.into(),
			when: None,
			source: RuleSource::Default,
			weight: 0,
		}
	}

	pub fn when(mut self, expr: impl Into<String>) -> Self {
		self.when = Some(expr.into());
		self
	}

	pub fn source(mut self, source: RuleSource) -> Self {
		self.source = source;
		self
	}

	pub fn weight(mut self, weight: i32) -> Self {
		self.weight = weight;
		self
	}
}

/// A compiled, immutable keybinding rule.
#[derive(Debug, Clone)]
pub struct KeybindingRule {
	chords: ChordSeq,
	command: Arc<str>,
	when: Option<ContextExpr>,
	source: RuleSource,
	weight: i32,
	/// Registration position; later entries override at equal weight.
	ordinal: usize,
}

impl KeybindingRule {
	pub(crate) fn new(chords: ChordSeq, command: Arc<str>, when: Option<ContextExpr>, source: RuleSource, weight: i32, ordinal: usize) -> Self {
		Self {
			chords,
			command,
			when,
			source,
			weight,
			ordinal,
		}
	}

	pub fn chords(&self) -> &[Chord] {
		&self.chords
	}

	pub fn command(&self) -> &str {
		&self.command
	}

	pub fn when(&self) -> Option<&ContextExpr> {
		self.when.as_ref()
	}

	pub fn source(&self) -> RuleSource {
		self.source
	}

	pub fn weight(&self) -> i32 {
		self.weight
	}

	/// Whether the guard (if any) passes against `ctx`.
	pub fn is_active(&self, ctx: &dyn ContextLookup) -> bool {
		self.when.as_ref().is_none_or(|expr| expr.evaluate(ctx))
	}

	/// Precedence sort key: higher weight wins, then later registration.
	pub(crate) fn precedence(&self) -> (i32, usize) {
		(self.weight, self.ordinal)
	}
}

/// Classification of a rejected rule definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleProblemKind {
	/// Chord sequence string couldn't be parsed.
	InvalidChordSequence,
	/// Guard expression string couldn't be parsed.
	InvalidGuard,
}

/// A rule definition excluded from the active set, with the reason.
#[derive(Debug, Clone)]
pub struct RuleProblem {
	/// Position of the definition in the supplied list.
	pub index: usize,
	pub keys: Arc<str>,
	pub command: Arc<str>,
	pub kind: RuleProblemKind,
	pub message: Arc<str>,
}
