//! Adapter for the unordered collection origin (`set[T]`).
//!
//! The target container collapses duplicates: two distinct input elements
//! whose cast outputs compare equal become one member. That cardinality
//! reduction is collection semantics, not a defect to suppress.

use std::collections::BTreeSet;

use castor_core::{is_iterable_origin, json_kind, Compatibility, TypeDescriptor, Value};

use crate::error::{CastError, CodecError};
use crate::summary::{budgeted_summary, SummaryOutput};
use crate::{Dispatch, TypeAdapter};

pub struct CollectionAdapter;

impl TypeAdapter for CollectionAdapter {
    /// Casts every element of an iterable value to the element type and
    /// collects the outputs into a fresh set. Aborts on the first element
    /// failure; no partial result escapes.
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

        let mut result = BTreeSet::new();
        for element in elements {
            let member =
                dispatch
                    .cast(element, element_type)
                    .map_err(|source| CastError::ElementCastFailed {
                        value: value.to_string(),
                        target: target.to_string(),
                        source: Box::new(source),
                    })?;
            result.insert(member);
        }
        Ok(Value::Set(result))
    }

    /// Emits a JSON array of the per-member encodes, one entry per member
    /// at the time of encoding. No deduplication, no reordering.
    fn encode(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<serde_json::Value, CodecError> {
        let element_type = ty.element_type();
        let members = expect_set(value)?;
        let mut entries = Vec::with_capacity(members.len());
        for member in members {
            entries.push(dispatch.encode(member, element_type)?);
        }
        Ok(serde_json::Value::Array(entries))
    }

    /// Decodes each array entry and inserts it into a fresh set; duplicate
    /// decoded members collapse, symmetric to the caster.
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
        let mut result = BTreeSet::new();
        for entry in entries {
            result.insert(dispatch.decode(entry, element_type)?);
        }
        Ok(Value::Set(result))
    }

    /// A source type is castable into `set[T]` when it is itself a
    /// parameterized iterable and every one of its type arguments is
    /// castable to T. A mapping source contributes its key and value
    /// types as two separate arguments; tuple arity carries no
    /// constraint on the target.
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

    /// Summarizes every member, then applies the shared byte budget. The
    /// reported length is the true member count even when the summary
    /// list is truncated.
    fn summarize(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<SummaryOutput, CodecError> {
        let element_type = ty.element_type();
        let members = expect_set(value)?;
        let mut per_element = Vec::with_capacity(members.len());
        for member in members {
            let out = dispatch.summarize(member, element_type)?;
            per_element.push((out.summary, out.blobs));
        }
        Ok(budgeted_summary(per_element, members.len()))
    }
}

fn expect_set(value: &Value) -> Result<&BTreeSet<Value>, CodecError> {
    match value {
        Value::Set(members) => Ok(members),
        other => Err(CodecError::UnexpectedValue {
            expected: "a set value".to_string(),
            got: other.type_name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;

    fn set_of(items: Vec<Value>) -> Value {
        Value::Set(items.into_iter().collect())
    }

    #[test]
    fn cast_collapses_equal_outputs() {
        let registry = Registry::with_builtins();
        // 1 and 1.0 both cast to int 1.
        let value = Value::List(vec![
            Value::Int(1),
            Value::Float("1.0".parse().unwrap()),
            Value::Int(2),
        ]);
        let cast = registry
            .cast(&value, &TypeDescriptor::set(TypeDescriptor::int()))
            .unwrap();
        assert_eq!(cast, set_of(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn cast_aborts_on_first_element_failure() {
        let registry = Registry::with_builtins();
        let value = Value::List(vec![Value::Int(1), Value::Text("a".into())]);
        let err = registry
            .cast(&value, &TypeDescriptor::set(TypeDescriptor::int()))
            .unwrap_err();
        match err {
            CastError::ElementCastFailed { target, .. } => assert_eq!(target, "set[int]"),
            other => panic!("expected ElementCastFailed, got {:?}", other),
        }
    }

    #[test]
    fn cast_rejects_non_iterable() {
        let registry = Registry::with_builtins();
        let err = registry
            .cast(&Value::Int(5), &TypeDescriptor::set(TypeDescriptor::int()))
            .unwrap_err();
        assert_eq!(
            err,
            CastError::NotIterable {
                value: "5".to_string()
            }
        );
    }

    #[test]
    fn encode_length_equals_member_count() {
        let registry = Registry::with_builtins();
        let value = set_of(vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
        let tree = registry
            .encode(&value, &TypeDescriptor::set(TypeDescriptor::int()))
            .unwrap();
        assert_eq!(tree.as_array().unwrap().len(), 3);
    }

    #[test]
    fn decode_collapses_duplicate_entries() {
        let registry = Registry::with_builtins();
        let tree = serde_json::json!([1, 2, 1]);
        let decoded = registry
            .decode(&tree, &TypeDescriptor::set(TypeDescriptor::int()))
            .unwrap();
        assert_eq!(decoded, set_of(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn decode_rejects_non_array_tree() {
        let registry = Registry::with_builtins();
        let err = registry
            .decode(
                &serde_json::json!({"not": "an array"}),
                &TypeDescriptor::set(TypeDescriptor::int()),
            )
            .unwrap_err();
        assert!(matches!(err, CodecError::MalformedTree { .. }));
    }

    #[test]
    fn heterogeneous_tuple_casts_when_pairwise_compatible() {
        let registry = Registry::with_builtins();
        let target = TypeDescriptor::set(TypeDescriptor::int());

        let ok = registry.can_cast(
            &TypeDescriptor::tuple(vec![TypeDescriptor::int(), TypeDescriptor::float()]),
            &target,
        );
        assert!(ok.is_compatible());

        let bad = registry.can_cast(
            &TypeDescriptor::tuple(vec![TypeDescriptor::int(), TypeDescriptor::str()]),
            &target,
        );
        assert!(!bad.is_compatible());
        assert!(bad.reason().unwrap().contains("str"));
    }

    #[test]
    fn unparameterized_source_is_incompatible() {
        let registry = Registry::with_builtins();
        let verdict = registry.can_cast(
            &TypeDescriptor::int(),
            &TypeDescriptor::set(TypeDescriptor::int()),
        );
        assert_eq!(
            verdict.reason(),
            Some("int is not a parameterized type")
        );
    }

    #[test]
    fn mapping_source_checks_key_and_value_types() {
        let registry = Registry::with_builtins();
        let target = TypeDescriptor::set(TypeDescriptor::float());

        let ok = registry.can_cast(
            &TypeDescriptor::map(TypeDescriptor::int(), TypeDescriptor::float()),
            &target,
        );
        assert!(ok.is_compatible());

        let bad = registry.can_cast(
            &TypeDescriptor::map(TypeDescriptor::str(), TypeDescriptor::float()),
            &target,
        );
        assert!(!bad.is_compatible());
    }

    #[test]
    fn summarize_empty_set_needs_no_budgeting() {
        let registry = Registry::with_builtins();
        let out = registry
            .summarize(
                &set_of(Vec::new()),
                &TypeDescriptor::set(TypeDescriptor::int()),
            )
            .unwrap();
        assert_eq!(
            out.summary,
            serde_json::json!({ "length": 0, "summary": [] })
        );
        assert!(out.blobs.is_empty());
    }
}
