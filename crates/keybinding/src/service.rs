//! Keybinding service facade.
//!
//! Owns the active resolver snapshot, the keyboard layout, and the dispatch
//! controller, wired together behind one explicitly constructed object.
//! Call sites receive a `&mut KeybindingService`; there is no ambient
//! global instance.

use std::sync::Arc;

use arc_swap::ArcSwap;
use scribe_context::ContextLookup;
use tracing::debug;

use crate::dispatch::{ChordTimer, CommandInvoker, DispatchController, DispatchOutcome};
use crate::layout::{KeyboardLayout, RawKeyEvent, ResolvedKeybinding};
use crate::resolver::KeybindingResolver;
use crate::rule::{RuleDef, RuleProblem};

/// Facade over rule snapshot, layout, and dispatch state.
///
/// Rule updates swap an immutable resolver snapshot; dispatch loads the
/// current snapshot per key event, so an update between keystrokes takes
/// effect on the next event with no invalidation step.
pub struct KeybindingService {
	resolver: ArcSwap<KeybindingResolver>,
	layout: Box<dyn KeyboardLayout>,
	controller: DispatchController,
	timer: Box<dyn ChordTimer>,
}

impl KeybindingService {
	/// Builds a service from the initial rule list and a layout.
	///
	/// Uses the no-op timer; hosts with a real timer wire one in through
	/// [`with_timer`](Self::with_timer).
	pub fn new(defs: &[RuleDef], layout: Box<dyn KeyboardLayout>) -> Self {
		Self {
			resolver: ArcSwap::from_pointee(KeybindingResolver::new(defs)),
			layout,
			controller: DispatchController::new(),
			timer: Box::new(()),
		}
	}

	pub fn with_timer(mut self, timer: Box<dyn ChordTimer>) -> Self {
		self.timer = timer;
		self
	}

	pub fn with_controller(mut self, controller: DispatchController) -> Self {
		self.controller = controller;
		self
	}

	/// Replaces the active rule set.
	///
	/// The rule-source collaborator calls this on its update notifications;
	/// in-flight chord state is left alone and the new rules apply from the
	/// next key event.
	pub fn update_rules(&self, defs: &[RuleDef]) {
		let resolver = KeybindingResolver::new(defs);
		debug!(rules = resolver.rules().len(), problems = resolver.problems().len(), "keybinding rule set updated");
		self.resolver.store(Arc::new(resolver));
	}

	/// The current resolver snapshot.
	pub fn resolver(&self) -> Arc<KeybindingResolver> {
		self.resolver.load_full()
	}

	/// Swaps the keyboard layout.
	///
	/// Labels returned by [`lookup_keybindings`](Self::lookup_keybindings)
	/// are derived from the layout at query time, so they pick up the new
	/// layout immediately.
	pub fn set_layout(&mut self, layout: Box<dyn KeyboardLayout>) {
		self.layout = layout;
	}

	/// Feeds one raw key event through dispatch.
	pub fn dispatch(&mut self, event: &RawKeyEvent, ctx: &dyn ContextLookup, invoker: &mut dyn CommandInvoker) -> DispatchOutcome {
		let resolver = self.resolver.load();
		self.controller.handle_key_event(event, &*self.layout, &resolver, ctx, invoker, &mut *self.timer)
	}

	/// Forces an open chord wait to expire; called when the timer fires.
	pub fn expire_pending(&mut self) {
		self.controller.expire_pending(&mut *self.timer);
	}

	/// Whether a chord sequence is currently open.
	pub fn is_awaiting_chord(&self) -> bool {
		self.controller.is_awaiting_chord()
	}

	/// Printable shortcuts bound to `command`, best match first.
	pub fn lookup_keybindings(&self, command: &str) -> Vec<ResolvedKeybinding> {
		self.resolver
			.load()
			.lookup_keybindings(command)
			.into_iter()
			.map(|rule| ResolvedKeybinding::new(rule.chords(), &*self.layout))
			.collect()
	}

	/// Whether the event would insert a printable character if unhandled.
	pub fn might_produce_printable_character(&self, event: &RawKeyEvent) -> bool {
		self.controller.might_produce_printable_character(event, &*self.layout)
	}

	/// Rule definitions rejected by the last rule-set build.
	pub fn problems(&self) -> Vec<RuleProblem> {
		self.resolver.load().problems().to_vec()
	}
}

#[cfg(test)]
mod tests;
