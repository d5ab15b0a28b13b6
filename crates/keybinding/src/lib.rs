//! Keybinding resolution and dispatch.
//!
//! Maps physical keyboard input, through a layout collaborator, to commands
//! guarded by context expressions:
//!
//! - [`KeybindingResolver`]: immutable snapshot of registered rules;
//!   resolves a chord sequence plus a context snapshot to a command,
//!   a wait-for-more-chords state, or no match
//! - [`DispatchController`]: per-input-surface state machine feeding raw
//!   key events through the resolver and deciding whether to swallow the
//!   event or let it fall through to text insertion
//! - [`KeybindingService`]: explicitly constructed facade owning the active
//!   rule snapshot, the keyboard layout, and the dispatch state

pub use dispatch::{ChordTimer, CommandInvoker, DispatchController, DispatchOutcome};
pub use layout::{KeyboardLayout, RawKeyEvent, ResolvedKeybinding, UsLayout, keycodes};
pub use resolver::{KeybindingResolver, Resolution};
pub use rule::{ChordSeq, KeybindingRule, RuleDef, RuleProblem, RuleProblemKind, RuleSource};
pub use service::KeybindingService;

mod dispatch;
mod layout;
mod resolver;
mod rule;
mod service;
