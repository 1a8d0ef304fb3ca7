//! Adapter for the scalar origins: null, bool, int, float, str.
//!
//! Scalars are the recursion floor: no type arguments, no delegation.
//! Coercion rules: identity always succeeds, the numeric kinds coerce
//! into each other (float to int only for integral values), everything
//! else coerces only to itself.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use castor_core::{json_kind, origin, Compatibility, TypeDescriptor, Value};

use crate::error::{CastError, CodecError};
use crate::summary::{SummaryOutput, TEXT_BLOB_THRESHOLD, TEXT_PREVIEW_CHARS};
use crate::{BlobMap, Dispatch, TypeAdapter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
}

pub struct ScalarAdapter {
    kind: ScalarKind,
}

impl ScalarAdapter {
    pub fn new(kind: ScalarKind) -> Self {
        ScalarAdapter { kind }
    }
}

fn is_numeric_origin(tag: &str) -> bool {
    tag == origin::INT || tag == origin::FLOAT
}

fn incompatible(value: &Value, target: &TypeDescriptor, reason: String) -> CastError {
    CastError::Incompatible {
        value: value.to_string(),
        target: target.to_string(),
        reason,
    }
}

impl TypeAdapter for ScalarAdapter {
    fn cast(
        &self,
        value: &Value,
        target: &TypeDescriptor,
        _dispatch: &Dispatch,
    ) -> Result<Value, CastError> {
        match (self.kind, value) {
            (ScalarKind::Null, Value::Null) => Ok(Value::Null),
            (ScalarKind::Bool, Value::Bool(b)) => Ok(Value::Bool(*b)),
            (ScalarKind::Int, Value::Int(n)) => Ok(Value::Int(*n)),
            (ScalarKind::Int, Value::Float(d)) => {
                if d.fract() != Decimal::ZERO {
                    return Err(incompatible(
                        value,
                        target,
                        format!("{} has a fractional part", d),
                    ));
                }
                d.to_i64().map(Value::Int).ok_or_else(|| {
                    incompatible(value, target, format!("{} does not fit in an int", d))
                })
            }
            (ScalarKind::Float, Value::Float(d)) => Ok(Value::Float(*d)),
            (ScalarKind::Float, Value::Int(n)) => Ok(Value::Float(Decimal::from(*n))),
            (ScalarKind::Text, Value::Text(s)) => Ok(Value::Text(s.clone())),
            _ => Err(incompatible(
                value,
                target,
                format!("{} does not coerce to {}", value.type_name(), target),
            )),
        }
    }

    fn encode(
        &self,
        value: &Value,
        _ty: &TypeDescriptor,
        _dispatch: &Dispatch,
    ) -> Result<serde_json::Value, CodecError> {
        match (self.kind, value) {
            (ScalarKind::Null, Value::Null) => Ok(serde_json::Value::Null),
            (ScalarKind::Bool, Value::Bool(b)) => Ok(serde_json::json!(b)),
            (ScalarKind::Int, Value::Int(n)) => Ok(serde_json::json!(n)),
            // Floats travel as decimal strings so precision survives the
            // transport format.
            (ScalarKind::Float, Value::Float(d)) => Ok(serde_json::json!(d.to_string())),
            (ScalarKind::Text, Value::Text(s)) => Ok(serde_json::json!(s)),
            (_, other) => Err(CodecError::UnexpectedValue {
                expected: scalar_name(self.kind).to_string(),
                got: other.type_name().to_string(),
            }),
        }
    }

    fn decode(
        &self,
        tree: &serde_json::Value,
        _target: &TypeDescriptor,
        _dispatch: &Dispatch,
    ) -> Result<Value, CodecError> {
        let malformed = |expected: &str| CodecError::MalformedTree {
            expected: expected.to_string(),
            got: json_kind(tree).to_string(),
        };
        match self.kind {
            ScalarKind::Null => match tree {
                serde_json::Value::Null => Ok(Value::Null),
                _ => Err(malformed("null")),
            },
            ScalarKind::Bool => tree.as_bool().map(Value::Bool).ok_or_else(|| malformed("a boolean")),
            ScalarKind::Int => tree.as_i64().map(Value::Int).ok_or_else(|| malformed("an integer")),
            ScalarKind::Float => match tree {
                serde_json::Value::String(s) => s
                    .parse::<Decimal>()
                    .map(Value::Float)
                    .map_err(|_| CodecError::MalformedTree {
                        expected: "a decimal string".to_string(),
                        got: format!("the string {:?}", s),
                    }),
                // Tolerate bare integer numbers for hand-written trees.
                serde_json::Value::Number(n) if n.is_i64() => {
                    // SAFETY: is_i64 guarantees as_i64 is Some
                    Ok(Value::Float(Decimal::from(n.as_i64().unwrap())))
                }
                _ => Err(malformed("a decimal string")),
            },
            ScalarKind::Text => tree
                .as_str()
                .map(|s| Value::Text(s.to_string()))
                .ok_or_else(|| malformed("a string")),
        }
    }

    fn can_cast(
        &self,
        source: &TypeDescriptor,
        target: &TypeDescriptor,
        _dispatch: &Dispatch,
    ) -> Compatibility {
        if source.is_parameterized() {
            return Compatibility::incompatible(format!(
                "cannot cast {} to {}",
                source, target
            ));
        }
        if source.origin == target.origin {
            return Compatibility::Compatible;
        }
        if is_numeric_origin(&source.origin) && is_numeric_origin(&target.origin) {
            return Compatibility::Compatible;
        }
        Compatibility::incompatible(format!(
            "{} does not coerce to {}",
            source.origin, target.origin
        ))
    }

    /// Scalar summaries are the encoded value itself, except long strings:
    /// those keep a truncated preview inline and move the full payload to
    /// the blob map under its content hash.
    fn summarize(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        dispatch: &Dispatch,
    ) -> Result<SummaryOutput, CodecError> {
        if let (ScalarKind::Text, Value::Text(s)) = (self.kind, value) {
            if s.len() > TEXT_BLOB_THRESHOLD {
                let blob_id = sha256_hex(s.as_bytes());
                let preview: String = s.chars().take(TEXT_PREVIEW_CHARS).collect();
                let mut blobs = BlobMap::new();
                blobs.insert(blob_id.clone(), s.as_bytes().to_vec());
                return Ok(SummaryOutput {
                    summary: serde_json::json!({
                        "preview": preview,
                        "bytes": s.len(),
                        "blob": blob_id,
                    }),
                    blobs,
                });
            }
        }
        Ok(SummaryOutput::inline(self.encode(value, ty, dispatch)?))
    }
}

fn scalar_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Null => "null",
        ScalarKind::Bool => "a bool",
        ScalarKind::Int => "an int",
        ScalarKind::Float => "a float",
        ScalarKind::Text => "a str",
    }
}

/// Compute SHA-256 of bytes and return lowercase hex string.
fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;

    #[test]
    fn identity_casts_succeed() {
        let registry = Registry::with_builtins();
        assert_eq!(
            registry.cast(&Value::Int(7), &TypeDescriptor::int()).unwrap(),
            Value::Int(7)
        );
        assert_eq!(
            registry
                .cast(&Value::Text("a".into()), &TypeDescriptor::str())
                .unwrap(),
            Value::Text("a".into())
        );
    }

    #[test]
    fn int_widens_to_float() {
        let registry = Registry::with_builtins();
        let cast = registry.cast(&Value::Int(3), &TypeDescriptor::float()).unwrap();
        assert_eq!(cast, Value::Float(Decimal::from(3)));
    }

    #[test]
    fn integral_float_narrows_to_int() {
        let registry = Registry::with_builtins();
        let cast = registry
            .cast(&Value::Float("4.0".parse().unwrap()), &TypeDescriptor::int())
            .unwrap();
        assert_eq!(cast, Value::Int(4));
    }

    #[test]
    fn fractional_float_does_not_narrow() {
        let registry = Registry::with_builtins();
        let err = registry
            .cast(&Value::Float("4.5".parse().unwrap()), &TypeDescriptor::int())
            .unwrap_err();
        assert!(err.to_string().contains("fractional"));
    }

    #[test]
    fn str_does_not_coerce_to_int() {
        let registry = Registry::with_builtins();
        let err = registry
            .cast(&Value::Text("3".into()), &TypeDescriptor::int())
            .unwrap_err();
        assert!(matches!(err, CastError::Incompatible { .. }));

        let verdict = registry.can_cast(&TypeDescriptor::str(), &TypeDescriptor::int());
        assert_eq!(verdict.reason(), Some("str does not coerce to int"));
    }

    #[test]
    fn numeric_origins_are_mutually_castable() {
        let registry = Registry::with_builtins();
        assert!(registry
            .can_cast(&TypeDescriptor::float(), &TypeDescriptor::int())
            .is_compatible());
        assert!(registry
            .can_cast(&TypeDescriptor::int(), &TypeDescriptor::float())
            .is_compatible());
    }

    #[test]
    fn float_round_trips_through_decimal_strings() {
        let registry = Registry::with_builtins();
        let value = Value::Float("2.50".parse().unwrap());
        let tree = registry.encode(&value, &TypeDescriptor::float()).unwrap();
        assert_eq!(tree, serde_json::json!("2.50"));
        let decoded = registry.decode(&tree, &TypeDescriptor::float()).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn long_text_moves_to_the_blob_map() {
        let registry = Registry::with_builtins();
        let payload = "x".repeat(TEXT_BLOB_THRESHOLD + 1);
        let out = registry
            .summarize(&Value::Text(payload.clone()), &TypeDescriptor::str())
            .unwrap();

        let blob_id = out.summary["blob"].as_str().unwrap().to_string();
        assert_eq!(out.blobs[&blob_id], payload.as_bytes().to_vec());
        assert_eq!(out.summary["bytes"], payload.len());
        assert_eq!(
            out.summary["preview"].as_str().unwrap().len(),
            TEXT_PREVIEW_CHARS
        );
    }

    #[test]
    fn short_text_stays_inline() {
        let registry = Registry::with_builtins();
        let out = registry
            .summarize(&Value::Text("hello".into()), &TypeDescriptor::str())
            .unwrap();
        assert_eq!(out.summary, serde_json::json!("hello"));
        assert!(out.blobs.is_empty());
    }
}
