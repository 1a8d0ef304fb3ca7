//! Built-in adapters, one per origin tag.
//!
//! Every container adapter follows the same construction: extract the
//! type argument(s) from the descriptor, delegate each element to the
//! registry primitive for its argument type, aggregate the results. The
//! scalar adapter is the recursion floor.

mod collection;
mod mapping;
mod scalar;
mod sequence;
mod tuple;

pub use collection::CollectionAdapter;
pub use mapping::MappingAdapter;
pub use scalar::{ScalarAdapter, ScalarKind};
pub use sequence::SequenceAdapter;
pub use tuple::TupleAdapter;

use std::sync::Arc;

use castor_core::origin;

use crate::Registry;

/// Install every built-in adapter into `registry`.
pub fn install_builtins(registry: &mut Registry) {
    registry.register(origin::NULL, Arc::new(ScalarAdapter::new(ScalarKind::Null)));
    registry.register(origin::BOOL, Arc::new(ScalarAdapter::new(ScalarKind::Bool)));
    registry.register(origin::INT, Arc::new(ScalarAdapter::new(ScalarKind::Int)));
    registry.register(origin::FLOAT, Arc::new(ScalarAdapter::new(ScalarKind::Float)));
    registry.register(origin::STR, Arc::new(ScalarAdapter::new(ScalarKind::Text)));
    registry.register(origin::LIST, Arc::new(SequenceAdapter));
    registry.register(origin::TUPLE, Arc::new(TupleAdapter));
    registry.register(origin::MAP, Arc::new(MappingAdapter));
    registry.register(origin::SET, Arc::new(CollectionAdapter));
}
