//! Scoped context-key store and guard expression engine.
//!
//! Tracks named facts about UI/editor state (`editorFocus`, `mode`, ...) in
//! a tree of scopes mirroring UI nesting, and evaluates boolean guard
//! expressions over them:
//!
//! - [`ContextStore`]: create/set/reset typed keys per scope, read-through
//!   lookup along the parent chain, batched change notifications
//! - [`ContextExpr`]: parsed, immutable guard expressions (`editorFocus &&
//!   mode == 'normal'`) with pure, short-circuiting evaluation
//!
//! Evaluation reads through the [`ContextLookup`] trait so resolvers can be
//! tested against plain maps without a store.

pub use error::ContextError;
pub use expr::{ContextExpr, ExprParseError, RegexMatcher};
pub use store::{ContextChange, ContextKey, ContextSnapshot, ContextStore, ScopeId};
pub use value::{ContextKind, ContextLookup, ContextValue, ContextValueType};

mod error;
pub mod expr;
mod store;
mod value;
