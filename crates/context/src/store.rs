//! Scoped context-key store.
//!
//! Scopes form a tree mirroring UI nesting: each scope owns the keys created
//! in it, and lookups for a name not present locally walk up the parent
//! chain (read-through, never write-through). Mutations accumulate into one
//! pending change set per logical update, drained as a single batched
//! [`ContextChange`].

use std::marker::PhantomData;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::error::ContextError;
use crate::expr::ContextExpr;
use crate::value::{ContextLookup, ContextValue, ContextValueType};

/// Identifier of a scope in a [`ContextStore`].
///
/// Scope slots are not reused after disposal, so a stale id is detected
/// rather than silently aliased to a new scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
	fn index(self) -> usize {
		self.0 as usize
	}
}

/// Typed handle to a context key, bound to the scope that created it.
///
/// The payload type is fixed at registration; writes go through
/// [`ContextStore::set`] and are checked against it.
#[derive(Debug, Clone)]
pub struct ContextKey<T> {
	scope: ScopeId,
	name: Arc<str>,
	_marker: PhantomData<fn() -> T>,
}

impl<T> ContextKey<T> {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn scope(&self) -> ScopeId {
		self.scope
	}
}

#[derive(Debug, Clone)]
struct KeySlot {
	kind: crate::value::ContextKind,
	default: Option<ContextValue>,
	value: Option<ContextValue>,
}

#[derive(Debug, Default)]
struct Scope {
	parent: Option<ScopeId>,
	keys: FxHashMap<Arc<str>, KeySlot>,
}

/// Hierarchical store of named context values.
#[derive(Debug)]
pub struct ContextStore {
	/// Indexed by [`ScopeId`]; `None` marks a disposed scope.
	scopes: Vec<Option<Scope>>,
	pending: FxHashSet<Arc<str>>,
}

impl Default for ContextStore {
	fn default() -> Self {
		Self::new()
	}
}

impl ContextStore {
	/// Creates a store with a single root scope.
	pub fn new() -> Self {
		Self {
			scopes: vec![Some(Scope::default())],
			pending: FxHashSet::default(),
		}
	}

	/// The root scope, parent of all others.
	pub fn root(&self) -> ScopeId {
		ScopeId(0)
	}

	/// Creates a child scope under `parent`.
	///
	/// The child sees the parent's keys unless it shadows them with its own
	/// registrations.
	pub fn create_scope(&mut self, parent: ScopeId) -> Result<ScopeId, ContextError> {
		self.scope(parent)?;
		let id = ScopeId(self.scopes.len() as u32);
		self.scopes.push(Some(Scope {
			parent: Some(parent),
			keys: FxHashMap::default(),
		}));
		Ok(id)
	}

	/// Disposes a scope, its keys, and all descendant scopes.
	///
	/// Keys that held a defined value are recorded in the pending change set,
	/// so guards referencing them get re-evaluated after the drain.
	/// Disposing the root is ignored; the root lives as long as the store.
	pub fn dispose_scope(&mut self, scope: ScopeId) {
		if scope == self.root() {
			warn!("ignoring attempt to dispose the root context scope");
			return;
		}
		if self.scopes.get(scope.index()).is_none_or(Option::is_none) {
			return;
		}

		let mut doomed = vec![scope];
		while let Some(current) = doomed.pop() {
			debug!(scope = current.0, "disposing context scope");
			if let Some(dead) = self.scopes[current.index()].take() {
				for (name, slot) in &dead.keys {
					if slot.value.is_some() {
						self.pending.insert(name.clone());
					}
				}
			}
			for (idx, slot) in self.scopes.iter().enumerate() {
				if let Some(s) = slot
					&& s.parent == Some(current)
				{
					doomed.push(ScopeId(idx as u32));
				}
			}
		}
	}

	/// Registers a typed key in `scope` with an optional default value.
	///
	/// Re-registering a name with the same value type replaces the default
	/// and re-arms the key; a conflicting type fails with
	/// [`ContextError::TypeConflict`]. Child scopes may shadow parent keys
	/// freely.
	pub fn create_key<T: ContextValueType>(&mut self, scope: ScopeId, name: &str, default: Option<T>) -> Result<ContextKey<T>, ContextError> {
		let default: Option<ContextValue> = default.map(Into::into);
		let slot = KeySlot {
			kind: T::KIND,
			default: default.clone(),
			value: default,
		};

		let scope_data = self.scope_mut(scope)?;
		let name: Arc<str> = Arc::from(name);
		if let Some(existing) = scope_data.keys.get(&name)
			&& existing.kind != T::KIND
		{
			return Err(ContextError::TypeConflict {
				name: name.to_string(),
				existing: existing.kind,
				requested: T::KIND,
			});
		}

		let changed = match scope_data.keys.insert(name.clone(), slot) {
			Some(old) => old.value != scope_data.keys[&name].value,
			None => scope_data.keys[&name].value.is_some(),
		};
		if changed {
			self.pending.insert(name.clone());
		}

		Ok(ContextKey {
			scope,
			name,
			_marker: PhantomData,
		})
	}

	/// Sets the value of a key, recording a change if the value differs.
	pub fn set<T: ContextValueType>(&mut self, key: &ContextKey<T>, value: T) -> Result<(), ContextError> {
		let value: ContextValue = value.into();
		let slot = self.slot_mut(key)?;
		if slot.value.as_ref() == Some(&value) {
			return Ok(());
		}
		slot.value = Some(value);
		self.pending.insert(key.name.clone());
		Ok(())
	}

	/// Resets a key back to its registration default.
	pub fn reset<T>(&mut self, key: &ContextKey<T>) -> Result<(), ContextError> {
		let slot = self.slot_mut(key)?;
		if slot.value == slot.default {
			return Ok(());
		}
		slot.value = slot.default.clone();
		self.pending.insert(key.name.clone());
		Ok(())
	}

	/// Typed read of a key's own slot (no parent-chain walk).
	pub fn get<T: ContextValueType>(&self, key: &ContextKey<T>) -> Option<T> {
		let scope = self.scopes.get(key.scope.index())?.as_ref()?;
		let slot = scope.keys.get(&key.name)?;
		slot.value.as_ref().and_then(T::from_value)
	}

	/// Looks up `name` starting at `scope` and walking the parent chain,
	/// returning the first defined value.
	pub fn value(&self, scope: ScopeId, name: &str) -> Option<ContextValue> {
		let mut current = Some(scope);
		while let Some(id) = current {
			let scope_data = self.scopes.get(id.index())?.as_ref()?;
			if let Some(slot) = scope_data.keys.get(name)
				&& let Some(value) = &slot.value
			{
				return Some(value.clone());
			}
			current = scope_data.parent;
		}
		None
	}

	/// Point-in-time read view rooted at `scope`, for guard evaluation.
	pub fn snapshot(&self, scope: ScopeId) -> ContextSnapshot<'_> {
		ContextSnapshot { store: self, scope }
	}

	/// Flushes the pending change set accumulated since the last drain.
	///
	/// Returns `None` when nothing changed. Called once per logical UI
	/// update so rapid mutations collapse into a single batch.
	pub fn drain_changes(&mut self) -> Option<ContextChange> {
		if self.pending.is_empty() {
			return None;
		}
		Some(ContextChange {
			changed: std::mem::take(&mut self.pending),
		})
	}

	fn scope(&self, id: ScopeId) -> Result<&Scope, ContextError> {
		self.scopes
			.get(id.index())
			.and_then(Option::as_ref)
			.ok_or(ContextError::StaleScope { scope: id.0 })
	}

	fn scope_mut(&mut self, id: ScopeId) -> Result<&mut Scope, ContextError> {
		self.scopes
			.get_mut(id.index())
			.and_then(Option::as_mut)
			.ok_or(ContextError::StaleScope { scope: id.0 })
	}

	fn slot_mut<T>(&mut self, key: &ContextKey<T>) -> Result<&mut KeySlot, ContextError> {
		let scope = self
			.scopes
			.get_mut(key.scope.index())
			.and_then(Option::as_mut)
			.ok_or(ContextError::StaleScope { scope: key.scope.0 })?;
		scope.keys.get_mut(&key.name).ok_or_else(|| ContextError::StaleKey {
			name: key.name.to_string(),
		})
	}
}

/// Read view of a store at one scope, implementing [`ContextLookup`].
#[derive(Debug, Clone, Copy)]
pub struct ContextSnapshot<'a> {
	store: &'a ContextStore,
	scope: ScopeId,
}

impl ContextLookup for ContextSnapshot<'_> {
	fn value(&self, key: &str) -> Option<ContextValue> {
		self.store.value(self.scope, key)
	}
}

/// One batched context-change notification.
///
/// Carries the set of key names whose values changed since the previous
/// drain; consumers re-evaluate whatever depends on them.
#[derive(Debug, Clone)]
pub struct ContextChange {
	changed: FxHashSet<Arc<str>>,
}

impl ContextChange {
	/// Whether `key` changed in this batch.
	pub fn affects_key(&self, key: &str) -> bool {
		self.changed.contains(key)
	}

	/// Whether any key referenced by `expr` changed in this batch.
	pub fn affects(&self, expr: &ContextExpr) -> bool {
		expr.keys().iter().any(|k| self.changed.contains(*k))
	}

	/// The changed key names.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.changed.iter().map(AsRef::as_ref)
	}

	pub fn len(&self) -> usize {
		self.changed.len()
	}

	pub fn is_empty(&self) -> bool {
		self.changed.is_empty()
	}
}
