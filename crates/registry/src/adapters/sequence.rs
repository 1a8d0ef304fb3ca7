//! Adapter for the ordered sequence origin (`list[T]`).
//!
//! Same per-element delegation as the collection adapter, but the
//! accumulator is order-preserving and keeps duplicates.

use castor_core::{is_iterable_origin, json_kind, Compatibility, TypeDescriptor, Value};

use crate::error::{CastError, CodecError};
use crate::summary::{budgeted_summary, SummaryOutput};
use crate::{Dispatch, TypeAdapter};

pub struct SequenceAdapter;

impl TypeAdapter for SequenceAdapter {
    fn cast(
        &self,
        value: &Value,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<Value, CastError> {
        let element_type = target.element_type();
        let Some(elements) = value.iter_elements() else {
            return Err(CastError::NotIterable {
                value: value.to_string(),
            });
        };

        let mut result = Vec::with_capacity(elements.len());
        for element in elements {
            let item =
                dispatch
                    .cast(element, element_type)
                    .map_err(|source| CastError::ElementCastFailed {
                        value: value.to_string(),
                        target: target.to_string(),
                        source: Box::new(source),
                    })?;
            result.push(item);
        }
        Ok(Value::List(result))
    }

    fn encode(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<serde_json::Value, CodecError> {
        let element_type = ty.element_type();
        let items = expect_list(value)?;
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            entries.push(dispatch.encode(item, element_type)?);
        }
        Ok(serde_json::Value::Array(entries))
    }

    fn decode(
        &self,
        tree: &serde_json::Value,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<Value, CodecError> {
        let element_type = target.element_type();
        let entries = tree.as_array().ok_or_else(|| CodecError::MalformedTree {
            expected: "a JSON array".to_string(),
            got: json_kind(tree).to_string(),
        })?;
        let mut result = Vec::with_capacity(entries.len());
        for entry in entries {
            result.push(dispatch.decode(entry, element_type)?);
        }
        Ok(Value::List(result))
    }

    /// Same structural rule as the collection target: any parameterized
    /// iterable whose every type argument casts to the element type.
    fn can_cast(
        &self,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Compatibility {
        if !source.is_parameterized() {
            return Compatibility::incompatible(format!("{} is not a parameterized type", source));
        }
        if !is_iterable_origin(&source.origin) {
            return Compatibility::incompatible(format!("{} is not an iterable", source));
        }
        let element_type = target.element_type();
        for arg in &source.args {
            if let Some(reason) = dispatch.can_cast(arg, element_type).reason() {
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
        let element_type = ty.element_type();
        let items = expect_list(value)?;
        let mut per_element = Vec::with_capacity(items.len());
        for item in items {
            let out = dispatch.summarize(item, element_type)?;
            per_element.push((out.summary, out.blobs));
        }
        Ok(budgeted_summary(per_element, items.len()))
    }
}

fn expect_list(value: &Value) -> Result<&Vec<Value>, CodecError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(CodecError::UnexpectedValue {
            expected: "a list value".to_string(),
            got: other.type_name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;

    #[test]
    fn cast_preserves_order_and_duplicates() {
        let registry = Registry::with_builtins();
        let value = Value::Tuple(vec![Value::Int(2), Value::Int(1), Value::Int(2)]);
        let cast = registry
            .cast(&value, &TypeDescriptor::list(TypeDescriptor::int()))
            .unwrap();
        assert_eq!(
            cast,
            Value::List(vec![Value::Int(2), Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn round_trip_preserves_sequence() {
        let registry = Registry::with_builtins();
        let ty = TypeDescriptor::list(TypeDescriptor::str());
        let value = Value::List(vec![Value::Text("b".into()), Value::Text("a".into())]);
        let tree = registry.encode(&value, &ty).unwrap();
        assert_eq!(registry.decode(&tree, &ty).unwrap(), value);
    }

    #[test]
    fn set_source_is_castable_into_a_sequence() {
        let registry = Registry::with_builtins();
        let verdict = registry.can_cast(
            &TypeDescriptor::set(TypeDescriptor::int()),
            &TypeDescriptor::list(TypeDescriptor::float()),
        );
        assert!(verdict.is_compatible());
    }
}
