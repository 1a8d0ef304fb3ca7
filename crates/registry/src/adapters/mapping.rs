//! Adapter for the key/value mapping origin (`map[K, V]`).
//!
//! Keys and values each delegate to their own type argument. On the wire
//! a mapping is an array of `[key, value]` pairs rather than a JSON
//! object, so non-string keys survive transport.

use std::collections::BTreeMap;

use castor_core::{json_kind, origin, Compatibility, TypeDescriptor, Value};

use crate::error::{CastError, CodecError};
use crate::summary::{budgeted_summary, SummaryOutput};
use crate::{BlobMap, Dispatch, TypeAdapter};

pub struct MappingAdapter;

impl MappingAdapter {
    fn key_type(ty: &TypeDescriptor) -> &TypeDescriptor {
        &ty.args[0]
    }

    fn value_type(ty: &TypeDescriptor) -> &TypeDescriptor {
        &ty.args[1]
    }
}

impl TypeAdapter for MappingAdapter {
    /// Casts every entry's key against K and value against V. Keys whose
    /// cast outputs collide collapse to one entry, the later one winning.
    fn cast(
        &self,
        value: &Value,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<Value, CastError> {
        let Value::Map(entries) = value else {
            return Err(CastError::Incompatible {
                value: value.to_string(),
                target: target.to_string(),
                reason: format!("{} is not a mapping", value.type_name()),
            });
        };

        let element_failed = |source: CastError| CastError::ElementCastFailed {
            value: value.to_string(),
            target: target.to_string(),
            source: Box::new(source),
        };

        let mut result = BTreeMap::new();
        for (key, entry_value) in entries {
            let cast_key = dispatch
                .cast(key, Self::key_type(target))
                .map_err(element_failed)?;
            let cast_value = dispatch
                .cast(entry_value, Self::value_type(target))
                .map_err(element_failed)?;
            result.insert(cast_key, cast_value);
        }
        Ok(Value::Map(result))
    }

    fn encode(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<serde_json::Value, CodecError> {
        let entries = expect_map(value)?;
        let mut pairs = Vec::with_capacity(entries.len());
        for (key, entry_value) in entries {
            pairs.push(serde_json::Value::Array(vec![
                dispatch.encode(key, Self::key_type(ty))?,
                dispatch.encode(entry_value, Self::value_type(ty))?,
            ]));
        }
        Ok(serde_json::Value::Array(pairs))
    }

    fn decode(
        &self,
        tree: &serde_json::Value,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<Value, CodecError> {
        let pairs = tree.as_array().ok_or_else(|| CodecError::MalformedTree {
            expected: "a JSON array of pairs".to_string(),
            got: json_kind(tree).to_string(),
        })?;
        let mut result = BTreeMap::new();
        for pair in pairs {
            let entry = pair.as_array().filter(|p| p.len() == 2).ok_or_else(|| {
                CodecError::MalformedTree {
                    expected: "a [key, value] pair".to_string(),
                    got: json_kind(pair).to_string(),
                }
            })?;
            let key = dispatch.decode(&entry[0], Self::key_type(target))?;
            let entry_value = dispatch.decode(&entry[1], Self::value_type(target))?;
            result.insert(key, entry_value);
        }
        Ok(Value::Map(result))
    }

    /// A mapping target requires a mapping source with castable key and
    /// value types.
    fn can_cast(
        &self,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Compatibility {
        if source.origin != origin::MAP {
            return Compatibility::incompatible(format!("{} is not a mapping type", source));
        }
        let pairs = [
            (Self::key_type(source), Self::key_type(target)),
            (Self::value_type(source), Self::value_type(target)),
        ];
        for (source_arg, target_arg) in pairs {
            if let Some(reason) = dispatch.can_cast(source_arg, target_arg).reason() {
                return Compatibility::incompatible(format!(
                    "cannot cast {} to {}: {}",
                    source, target, reason
                ));
            }
        }
        Compatibility::Compatible
    }

    /// Each entry is summarized as a `[key summary, value summary]` pair;
    /// the pairs then share the container byte budget.
    fn summarize(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<SummaryOutput, CodecError> {
        let entries = expect_map(value)?;
        let mut per_element = Vec::with_capacity(entries.len());
        for (key, entry_value) in entries {
            let key_out = dispatch.summarize(key, Self::key_type(ty))?;
            let value_out = dispatch.summarize(entry_value, Self::value_type(ty))?;
            let mut blobs: BlobMap = key_out.blobs;
            blobs.extend(value_out.blobs);
            per_element.push((
                serde_json::Value::Array(vec![key_out.summary, value_out.summary]),
                blobs,
            ));
        }
        Ok(budgeted_summary(per_element, entries.len()))
    }
}

fn expect_map(value: &Value) -> Result<&BTreeMap<Value, Value>, CodecError> {
    match value {
        Value::Map(entries) => Ok(entries),
        other => Err(CodecError::UnexpectedValue {
            expected: "a map value".to_string(),
            got: other.type_name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;
    use rust_decimal::Decimal;

    fn map_of(entries: Vec<(Value, Value)>) -> Value {
        Value::Map(entries.into_iter().collect())
    }

    #[test]
    fn cast_converts_keys_and_values_independently() {
        let registry = Registry::with_builtins();
        let ty = TypeDescriptor::map(TypeDescriptor::float(), TypeDescriptor::int());
        let value = map_of(vec![(Value::Int(1), Value::Float("2.0".parse().unwrap()))]);
        let cast = registry.cast(&value, &ty).unwrap();
        assert_eq!(
            cast,
            map_of(vec![(Value::Float(Decimal::from(1)), Value::Int(2))])
        );
    }

    #[test]
    fn cast_fails_on_unconvertible_value() {
        let registry = Registry::with_builtins();
        let ty = TypeDescriptor::map(TypeDescriptor::str(), TypeDescriptor::int());
        let value = map_of(vec![(Value::Text("k".into()), Value::Text("v".into()))]);
        let err = registry.cast(&value, &ty).unwrap_err();
        assert!(matches!(err, CastError::ElementCastFailed { .. }));
    }

    #[test]
    fn non_mapping_value_is_rejected() {
        let registry = Registry::with_builtins();
        let ty = TypeDescriptor::map(TypeDescriptor::str(), TypeDescriptor::int());
        let err = registry.cast(&Value::List(vec![]), &ty).unwrap_err();
        assert!(err.to_string().contains("not a mapping"));
    }

    #[test]
    fn round_trip_preserves_non_string_keys() {
        let registry = Registry::with_builtins();
        let ty = TypeDescriptor::map(TypeDescriptor::int(), TypeDescriptor::str());
        let value = map_of(vec![
            (Value::Int(1), Value::Text("a".into())),
            (Value::Int(2), Value::Text("b".into())),
        ]);
        let tree = registry.encode(&value, &ty).unwrap();
        assert_eq!(registry.decode(&tree, &ty).unwrap(), value);
    }

    #[test]
    fn summarize_pairs_keys_with_values() {
        let registry = Registry::with_builtins();
        let ty = TypeDescriptor::map(TypeDescriptor::str(), TypeDescriptor::int());
        let value = map_of(vec![(Value::Text("k".into()), Value::Int(1))]);
        let out = registry.summarize(&value, &ty).unwrap();
        assert_eq!(out.summary["length"], 1);
        assert_eq!(out.summary["summary"], serde_json::json!([["k", 1]]));
    }
}
