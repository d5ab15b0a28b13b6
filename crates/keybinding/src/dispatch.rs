//! Dispatch state machine for raw keyboard input.
//!
//! Consumes raw key events, normalizes them through the layout
//! collaborator, and drives the resolver: commit a command, hold the
//! sequence open for another chord, or let the event fall through to
//! normal text insertion. One controller exists per input surface; all of
//! its state is transient and resets on commit, mismatch, or timeout.

use std::time::{Duration, Instant};

use scribe_context::ContextLookup;
use scribe_primitives::Chord;
use tracing::{debug, trace};

use crate::layout::{KeyboardLayout, RawKeyEvent};
use crate::resolver::{KeybindingResolver, Resolution};

/// Default wait before an open chord sequence is abandoned.
pub const DEFAULT_CHORD_TIMEOUT: Duration = Duration::from_secs(5);

/// Command execution collaborator. Fire-and-forget: errors are the
/// invoker's concern, not the dispatcher's.
pub trait CommandInvoker {
	fn invoke(&mut self, command: &str);
}

impl<F: FnMut(&str)> CommandInvoker for F {
	fn invoke(&mut self, command: &str) {
		self(command)
	}
}

/// Cancellable one-shot timer collaborator for the chord wait.
///
/// At most one timer is active per controller: `schedule` replaces any
/// pending timer. When the timer fires, the host calls
/// [`DispatchController::expire_pending`].
pub trait ChordTimer {
	fn schedule(&mut self, timeout: Duration);
	fn cancel(&mut self);
}

/// No-op timer for hosts that rely on the controller's own deadline check.
impl ChordTimer for () {
	fn schedule(&mut self, _timeout: Duration) {}

	fn cancel(&mut self) {}
}

/// What the caller should do with the originating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
	/// Event consumed: a command fired or a chord sequence is open.
	/// Suppress default text insertion.
	Handled,
	/// Event not consumed; let text insertion proceed normally.
	Unhandled,
}

/// Per-input-surface dispatch state: idle, or awaiting chord N of M.
#[derive(Debug)]
pub struct DispatchController {
	pending: Vec<Chord>,
	deadline: Option<Instant>,
	timeout: Duration,
}

impl Default for DispatchController {
	fn default() -> Self {
		Self::new()
	}
}

impl DispatchController {
	pub fn new() -> Self {
		Self::with_timeout(DEFAULT_CHORD_TIMEOUT)
	}

	pub fn with_timeout(timeout: Duration) -> Self {
		Self {
			pending: Vec::new(),
			deadline: None,
			timeout,
		}
	}

	/// Whether a chord sequence is currently open.
	pub fn is_awaiting_chord(&self) -> bool {
		!self.pending.is_empty()
	}

	/// The chords accumulated so far in the open sequence.
	pub fn pending_chords(&self) -> &[Chord] {
		&self.pending
	}

	/// Normalizes a raw event and feeds it through the resolver.
	///
	/// An event arriving after the chord deadline sees the controller as
	/// idle again. An event the layout cannot convert resolves nothing and
	/// abandons any open sequence.
	pub fn handle_key_event(
		&mut self,
		event: &RawKeyEvent,
		layout: &dyn KeyboardLayout,
		resolver: &KeybindingResolver,
		ctx: &dyn ContextLookup,
		invoker: &mut dyn CommandInvoker,
		timer: &mut dyn ChordTimer,
	) -> DispatchOutcome {
		if self.deadline.is_some_and(|d| Instant::now() >= d) {
			debug!("pending chord sequence expired");
			self.reset(timer);
		}

		let Some(chord) = layout.chord_of(event) else {
			trace!(key_code = event.key_code, "layout produced no chord for key event");
			if self.is_awaiting_chord() {
				self.reset(timer);
			}
			return DispatchOutcome::Unhandled;
		};

		self.handle_chord(chord, resolver, ctx, invoker, timer)
	}

	/// Feeds one already-normalized chord through the resolver.
	pub fn handle_chord(
		&mut self,
		chord: Chord,
		resolver: &KeybindingResolver,
		ctx: &dyn ContextLookup,
		invoker: &mut dyn CommandInvoker,
		timer: &mut dyn ChordTimer,
	) -> DispatchOutcome {
		self.pending.push(chord);

		match resolver.resolve(&self.pending, ctx) {
			Resolution::Commit(rule) => {
				debug!(command = rule.command(), chords = self.pending.len(), "dispatching keybinding");
				invoker.invoke(rule.command());
				self.reset(timer);
				DispatchOutcome::Handled
			}
			Resolution::AwaitMore => {
				trace!(chords = self.pending.len(), "awaiting next chord");
				self.deadline = Some(Instant::now() + self.timeout);
				timer.schedule(self.timeout);
				DispatchOutcome::Handled
			}
			Resolution::NoMatch => {
				let was_awaiting = self.pending.len() > 1;
				self.reset(timer);
				if was_awaiting {
					// Replay the chord from idle so single-chord bindings
					// still fire after an abandoned sequence.
					self.handle_chord(chord, resolver, ctx, invoker, timer)
				} else {
					DispatchOutcome::Unhandled
				}
			}
		}
	}

	/// Forces the chord wait to expire; called when the timer fires.
	pub fn expire_pending(&mut self, timer: &mut dyn ChordTimer) {
		if self.is_awaiting_chord() {
			debug!(chords = self.pending.len(), "chord wait timed out");
			self.reset(timer);
		}
	}

	/// Whether the event would insert a printable character if unhandled.
	///
	/// Pure predicate over the event and layout; never touches dispatch
	/// state.
	pub fn might_produce_printable_character(&self, event: &RawKeyEvent, layout: &dyn KeyboardLayout) -> bool {
		layout.is_printable(event)
	}

	fn reset(&mut self, timer: &mut dyn ChordTimer) {
		self.pending.clear();
		self.deadline = None;
		timer.cancel();
	}
}
