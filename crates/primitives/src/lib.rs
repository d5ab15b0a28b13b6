//! Chord and key-code primitives for the scribe input stack.
//!
//! Provides the layout-independent representation of keyboard input:
//! - [`KeyCode`]: a physical key identity (character, function key, named key)
//! - [`Modifiers`]: ctrl/alt/shift/meta modifier set
//! - [`Chord`]: one discrete key combination (modifiers + key)
//! - [`parse_chord`] / [`parse_chord_seq`]: the chord-string grammar used by
//!   rule definitions (`"ctrl-k"`, `"ctrl-k ctrl-c"`)

pub use key::{Chord, KeyCode, Modifiers};
pub use parser::{ParseError, parse_chord, parse_chord_seq};

mod key;
mod parser;
