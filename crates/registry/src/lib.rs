//! castor-registry: the type adapter registry.
//!
//! A `Registry` maps an origin tag to the `TypeAdapter` handling that kind
//! and exposes five generic primitives -- cast, encode, decode, can_cast,
//! summarize -- that adapters delegate back into per element type. New
//! kinds register by adding a table entry, never by modifying an existing
//! adapter.
//!
//! All operations are synchronous pure functions of their inputs: each
//! call allocates its own accumulators and blob map, so concurrent calls
//! from independent sites need no coordination. The only guarded resource
//! is recursion depth across nested parameterized types.

pub mod adapters;
pub mod error;
pub mod summary;

use std::collections::BTreeMap;
use std::sync::Arc;

use castor_core::{Compatibility, TypeDescriptor, Value};

pub use error::{CastError, CodecError};
pub use summary::{BlobMap, SummaryOutput, SUMMARY_BUDGET_BYTES};

/// Maximum nesting depth for recursive dispatch across parameterized
/// types. Deeper nestings fail rather than risk stack exhaustion.
pub const MAX_TYPE_DEPTH: usize = 64;

/// A handler for one container or scalar origin.
///
/// Every method receives the `Dispatch` context it must use for recursive
/// delegation to the element type's own adapter.
pub trait TypeAdapter: Send + Sync {
    /// Cast `value` into the parameterized form of `target`. All-or-nothing:
    /// on error, no partial result is returned.
    fn cast(
        &self,
        value: &Value,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<Value, CastError>;

    /// Serialize a value already satisfying `ty` to the transport tree.
    fn encode(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<serde_json::Value, CodecError>;

    /// Deserialize a tree previously produced by a compatible `encode`.
    fn decode(
        &self,
        tree: &serde_json::Value,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<Value, CodecError>;

    /// Type-level check that values of `source` can cast into `target`.
    /// Never inspects a concrete value and never fails.
    fn can_cast(
        &self,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Compatibility;

    /// Produce a size-bounded preview of the value plus extracted blobs.
    fn summarize(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<SummaryOutput, CodecError>;
}

// ── Registry ─────────────────────────────────────────────────────────

/// Table of adapters keyed by origin tag.
pub struct Registry {
    adapters: BTreeMap<String, Arc<dyn TypeAdapter>>,
}

impl Registry {
    /// An empty registry with no adapters installed.
    pub fn new() -> Self {
        Registry {
            adapters: BTreeMap::new(),
        }
    }

    /// A registry with every built-in adapter installed: the scalars
    /// (null, bool, int, float, str) and the containers (list, tuple,
    /// map, set).
    pub fn with_builtins() -> Self {
        let mut registry = Registry::new();
        adapters::install_builtins(&mut registry);
        registry
    }

    /// Register `adapter` as the handler for `origin`, replacing any
    /// previous entry.
    pub fn register(&mut self, origin: impl Into<String>, adapter: Arc<dyn TypeAdapter>) {
        self.adapters.insert(origin.into(), adapter);
    }

    /// Look up the adapter handling `origin`.
    pub fn adapter(&self, origin: &str) -> Option<&dyn TypeAdapter> {
        self.adapters.get(origin).map(|a| a.as_ref())
    }

    // ── Generic primitives, at depth zero ────────────────────────────

    pub fn cast(&self, value: &Value, target: &TypeDescriptor) -> Result<Value, CastError> {
        Dispatch::root(self).cast(value, target)
    }

    pub fn encode(&self, value: &Value, ty: &TypeDescriptor) -> Result<serde_json::Value, CodecError> {
        Dispatch::root(self).encode(value, ty)
    }

    pub fn decode(&self, tree: &serde_json::Value, target: &TypeDescriptor) -> Result<Value, CodecError> {
        Dispatch::root(self).decode(tree, target)
    }

    pub fn can_cast(&self, source: &TypeDescriptor, target: &TypeDescriptor) -> Compatibility {
        Dispatch::root(self).can_cast(source, target)
    }

    pub fn summarize(&self, value: &Value, ty: &TypeDescriptor) -> Result<SummaryOutput, CodecError> {
        Dispatch::root(self).summarize(value, ty)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::with_builtins()
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────

/// Depth-tracked delegation context handed to every adapter call.
///
/// Each primitive resolves the adapter for the descriptor's origin and
/// invokes it one level deeper; nesting past [`MAX_TYPE_DEPTH`] fails
/// instead of exhausting the stack.
pub struct Dispatch<'a> {
    registry: &'a Registry,
    depth: usize,
}

impl<'a> Dispatch<'a> {
    fn root(registry: &'a Registry) -> Self {
        Dispatch { registry, depth: 0 }
    }

    fn descend(&self) -> Option<Dispatch<'a>> {
        (self.depth < MAX_TYPE_DEPTH).then(|| Dispatch {
            registry: self.registry,
            depth: self.depth + 1,
        })
    }

    pub fn cast(&self, value: &Value, target: &TypeDescriptor) -> Result<Value, CastError> {
        let inner = self.descend().ok_or(CastError::DepthExceeded {
            limit: MAX_TYPE_DEPTH,
        })?;
        let adapter = self
            .registry
            .adapter(&target.origin)
            .ok_or_else(|| CastError::UnknownOrigin {
                origin: target.origin.clone(),
            })?;
        adapter.cast(value, target, &inner)
    }

    pub fn encode(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
    ) -> Result<serde_json::Value, CodecError> {
        let (adapter, inner) = self.resolve(ty)?;
        adapter.encode(value, ty, &inner)
    }

    pub fn decode(
        &self,
        tree: &serde_json::Value,
        target: &TypeDescriptor,
    ) -> Result<Value, CodecError> {
        let (adapter, inner) = self.resolve(target)?;
        adapter.decode(tree, target, &inner)
    }

    /// Never fails: depth overflow and unknown origins surface as
    /// incompatible verdicts.
    pub fn can_cast(&self, source: &TypeDescriptor, target: &TypeDescriptor) -> Compatibility {
        let Some(inner) = self.descend() else {
            return Compatibility::incompatible(format!(
                "type nesting exceeds the depth limit of {}",
                MAX_TYPE_DEPTH
            ));
        };
        match self.registry.adapter(&target.origin) {
            Some(adapter) => adapter.can_cast(source, target, &inner),
            None => Compatibility::incompatible(format!(
                "no adapter registered for origin '{}'",
                target.origin
            )),
        }
    }

    pub fn summarize(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
    ) -> Result<SummaryOutput, CodecError> {
        let (adapter, inner) = self.resolve(ty)?;
        adapter.summarize(value, ty, &inner)
    }

    fn resolve(&self, ty: &TypeDescriptor) -> Result<(&'a dyn TypeAdapter, Dispatch<'a>), CodecError> {
        let inner = self.descend().ok_or(CodecError::DepthExceeded {
            limit: MAX_TYPE_DEPTH,
        })?;
        let adapter = self
            .registry
            .adapter(&ty.origin)
            .ok_or_else(|| CodecError::UnknownOrigin {
                origin: ty.origin.clone(),
            })?;
        Ok((adapter, inner))
    }
}
