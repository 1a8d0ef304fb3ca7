//! Adapter for the fixed-arity tuple origin (`tuple[T1, ..., Tn]`).
//!
//! Slot i is handled by type argument i, so the element count must match
//! the arity exactly -- the one container where cardinality is part of
//! the type.

use castor_core::{json_kind, origin, Compatibility, TypeDescriptor, Value};

use crate::error::{CastError, CodecError};
use crate::summary::{budgeted_summary, SummaryOutput};
use crate::{Dispatch, TypeAdapter};

pub struct TupleAdapter;

impl TypeAdapter for TupleAdapter {
    fn cast(
        &self,
        value: &Value,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<Value, CastError> {
        let Some(elements) = value.iter_elements() else {
            return Err(CastError::NotIterable {
                value: value.to_string(),
            });
        };
        if elements.len() != target.args.len() {
            return Err(CastError::ArityMismatch {
                value: value.to_string(),
                target: target.to_string(),
                expected: target.args.len(),
                got: elements.len(),
            });
        }

        let mut result = Vec::with_capacity(elements.len());
        for (element, slot_type) in elements.into_iter().zip(&target.args) {
            let item =
                dispatch
                    .cast(element, slot_type)
                    .map_err(|source| CastError::ElementCastFailed {
                        value: value.to_string(),
                        target: target.to_string(),
                        source: Box::new(source),
                    })?;
            result.push(item);
        }
        Ok(Value::Tuple(result))
    }

    fn encode(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<serde_json::Value, CodecError> {
        let items = expect_tuple(value)?;
        let mut entries = Vec::with_capacity(items.len());
        for (item, slot_type) in items.iter().zip(&ty.args) {
            entries.push(dispatch.encode(item, slot_type)?);
        }
        Ok(serde_json::Value::Array(entries))
    }

    fn decode(
        &self,
        tree: &serde_json::Value,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<Value, CodecError> {
        let entries = tree.as_array().ok_or_else(|| CodecError::MalformedTree {
            expected: "a JSON array".to_string(),
            got: json_kind(tree).to_string(),
        })?;
        if entries.len() != target.args.len() {
            return Err(CodecError::MalformedTree {
                expected: format!("an array of {} entries", target.args.len()),
                got: format!("an array of {} entries", entries.len()),
            });
        }
        let mut result = Vec::with_capacity(entries.len());
        for (entry, slot_type) in entries.iter().zip(&target.args) {
            result.push(dispatch.decode(entry, slot_type)?);
        }
        Ok(Value::Tuple(result))
    }

    /// A tuple target requires a tuple source of the same arity with
    /// pairwise-castable slots.
    fn can_cast(
        &self,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Compatibility {
        if source.origin != origin::TUPLE {
            return Compatibility::incompatible(format!("{} is not a tuple type", source));
        }
        if source.args.len() != target.args.len() {
            return Compatibility::incompatible(format!(
                "cannot cast {} to {}: arity {} does not match {}",
                source,
                target,
                source.args.len(),
                target.args.len()
            ));
        }
        for (source_slot, target_slot) in source.args.iter().zip(&target.args) {
            if let Some(reason) = dispatch.can_cast(source_slot, target_slot).reason() {
                return Compatibility::incompatible(format!(
                    "cannot cast {} to {}: {}",
                    source, target, reason
                ));
            }
        }
        Compatibility::Compatible
    }

    fn summarize(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<SummaryOutput, CodecError> {
        let items = expect_tuple(value)?;
        let mut per_element = Vec::with_capacity(items.len());
        for (item, slot_type) in items.iter().zip(&ty.args) {
            let out = dispatch.summarize(item, slot_type)?;
            per_element.push((out.summary, out.blobs));
        }
        Ok(budgeted_summary(per_element, items.len()))
    }
}

fn expect_tuple(value: &Value) -> Result<&Vec<Value>, CodecError> {
    match value {
        Value::Tuple(items) => Ok(items),
        other => Err(CodecError::UnexpectedValue {
            expected: "a tuple value".to_string(),
            got: other.type_name().to_string(),
        }),
    }
}
