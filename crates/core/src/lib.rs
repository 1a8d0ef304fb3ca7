//! castor-core: type descriptors, runtime values, and compatibility verdicts.
//!
//! The shared data model for the castor registry. Consumers (the registry,
//! adapters, storage backends) depend on this crate for the descriptor and
//! value representations; the dispatch machinery lives in castor-registry.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`TypeDescriptor`] -- origin tag + ordered type arguments
//! - [`Value`] -- runtime value enum (decimal numerics, B-tree containers)
//! - [`Compatibility`] -- type-level compatibility verdict with reason

pub mod compat;
pub mod descriptor;
pub mod value;

pub use compat::Compatibility;
pub use descriptor::{is_iterable_origin, json_kind, origin, DescriptorError, TypeDescriptor};
pub use value::Value;
