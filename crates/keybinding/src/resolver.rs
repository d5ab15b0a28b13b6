//! Chord-sequence resolution against the registered rule set.
//!
//! A [`KeybindingResolver`] is an immutable snapshot built from the ordered
//! rule list. Resolution is a pure function of (rules, chords, context):
//! no state is cached across calls, so context mutations and rule updates
//! take effect on the next key event with no invalidation step.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use scribe_context::{ContextExpr, ContextLookup};
use scribe_primitives::{Chord, parse_chord_seq};
use smallvec::SmallVec;
use tracing::warn;

use crate::rule::{KeybindingRule, RuleDef, RuleProblem, RuleProblemKind};

/// Outcome of resolving a chord sequence.
#[derive(Debug)]
pub enum Resolution<'a> {
	/// Exact match; dispatch this rule's command.
	Commit(&'a KeybindingRule),
	/// Some active rule extends this prefix; wait for the next chord.
	AwaitMore,
	/// No active rule matches.
	NoMatch,
}

/// Immutable snapshot of the active keybinding rules.
pub struct KeybindingResolver {
	rules: Vec<KeybindingRule>,
	/// Rule indices grouped by first chord, in registration order.
	by_first_chord: FxHashMap<Chord, SmallVec<[usize; 4]>>,
	/// Rule indices per command, in descending override precedence.
	by_command: FxHashMap<Arc<str>, Vec<usize>>,
	problems: Vec<RuleProblem>,
}

impl KeybindingResolver {
	/// Compiles an ordered rule list into a resolver snapshot.
	///
	/// Definitions with a malformed chord sequence or guard expression are
	/// excluded from the active set and recorded as [`RuleProblem`]s; a bad
	/// entry never takes the rest of the configuration down with it.
	pub fn new(defs: &[RuleDef]) -> Self {
		let mut rules = Vec::with_capacity(defs.len());
		let mut problems = Vec::new();

		for (index, def) in defs.iter().enumerate() {
			let chords = match parse_chord_seq(&def.keys) {
				Ok(chords) => SmallVec::from_vec(chords),
				Err(e) => {
					warn!(keys = %def.keys, command = %def.command, error = %e, "excluding keybinding with invalid chord sequence");
					problems.push(RuleProblem {
						index,
						keys: Arc::from(def.keys.as_str()),
						command: Arc::from(def.command.as_str()),
						kind: RuleProblemKind::InvalidChordSequence,
						message: Arc::from(e.to_string().as_str()),
					});
					continue;
				}
			};

			let when = match &def.when {
				None => None,
				Some(raw) => match ContextExpr::parse(raw) {
					Ok(expr) => Some(expr),
					Err(e) => {
						warn!(keys = %def.keys, command = %def.command, error = %e, "excluding keybinding with invalid guard expression");
						problems.push(RuleProblem {
							index,
							keys: Arc::from(def.keys.as_str()),
							command: Arc::from(def.command.as_str()),
							kind: RuleProblemKind::InvalidGuard,
							message: Arc::from(e.to_string().as_str()),
						});
						continue;
					}
				},
			};

			let ordinal = rules.len();
			rules.push(KeybindingRule::new(
				chords,
				Arc::from(def.command.as_str()),
				when,
				def.source,
				def.weight,
				ordinal,
			));
		}

		let mut by_first_chord: FxHashMap<Chord, SmallVec<[usize; 4]>> = FxHashMap::default();
		let mut by_command: FxHashMap<Arc<str>, Vec<usize>> = FxHashMap::default();
		for (idx, rule) in rules.iter().enumerate() {
			by_first_chord.entry(rule.chords()[0]).or_default().push(idx);
			by_command.entry(Arc::from(rule.command())).or_default().push(idx);
		}
		for indices in by_command.values_mut() {
			indices.sort_by_key(|&i| std::cmp::Reverse(rules[i].precedence()));
		}

		Self {
			rules,
			by_first_chord,
			by_command,
			problems,
		}
	}

	/// Resolves the chords pressed so far against a context snapshot.
	///
	/// Only rules whose chord prefix equals `chords` and whose guard passes
	/// participate. An active rule extending the prefix holds the sequence
	/// open (a registered chord shadows a single binding on the same
	/// prefix). Among exact full-length matches the highest `(weight,
	/// registration order)` wins, so a later rule at equal weight overrides
	/// an earlier one.
	pub fn resolve(&self, chords: &[Chord], ctx: &dyn ContextLookup) -> Resolution<'_> {
		let Some(first) = chords.first() else {
			return Resolution::NoMatch;
		};
		let Some(candidates) = self.by_first_chord.get(first) else {
			return Resolution::NoMatch;
		};

		let mut best: Option<&KeybindingRule> = None;
		let mut has_longer = false;

		for &idx in candidates {
			let rule = &self.rules[idx];
			if rule.chords().len() < chords.len() || rule.chords()[..chords.len()] != *chords {
				continue;
			}
			if !rule.is_active(ctx) {
				continue;
			}
			if rule.chords().len() == chords.len() {
				if best.is_none_or(|b| rule.precedence() > b.precedence()) {
					best = Some(rule);
				}
			} else {
				has_longer = true;
			}
		}

		if has_longer {
			return Resolution::AwaitMore;
		}
		match best {
			Some(rule) => Resolution::Commit(rule),
			None => Resolution::NoMatch,
		}
	}

	/// Active rules bound to `command`, in descending override precedence.
	///
	/// Read-only reverse index for UI display of a command's shortcuts;
	/// never consulted during dispatch.
	pub fn lookup_keybindings(&self, command: &str) -> Vec<&KeybindingRule> {
		self.by_command.get(command).map_or_else(Vec::new, |indices| indices.iter().map(|&i| &self.rules[i]).collect())
	}

	/// All compiled rules in registration order.
	pub fn rules(&self) -> &[KeybindingRule] {
		&self.rules
	}

	/// Definitions rejected during compilation.
	pub fn problems(&self) -> &[RuleProblem] {
		&self.problems
	}
}

#[cfg(test)]
mod tests;
