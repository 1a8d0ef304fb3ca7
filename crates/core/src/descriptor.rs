//! First-class runtime type descriptors.
//!
//! A `TypeDescriptor` is the tagged structure that travels alongside every
//! value wherever casting or serialization must be generic: an origin tag
//! naming the kind, plus the ordered type arguments bound to its generic
//! slots. Scalars carry zero arguments, `list` and `set` carry one, `map`
//! carries two (key, value), `tuple` carries one per slot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin tags for the built-in kinds.
pub mod origin {
    pub const NULL: &str = "null";
    pub const BOOL: &str = "bool";
    pub const INT: &str = "int";
    pub const FLOAT: &str = "float";
    pub const STR: &str = "str";
    pub const LIST: &str = "list";
    pub const TUPLE: &str = "tuple";
    pub const MAP: &str = "map";
    pub const SET: &str = "set";
}

/// Origins whose values support element-wise iteration.
pub const ITERABLE_ORIGINS: [&str; 4] = [origin::LIST, origin::TUPLE, origin::MAP, origin::SET];

/// Returns true if values of this origin can be iterated element-wise.
pub fn is_iterable_origin(tag: &str) -> bool {
    ITERABLE_ORIGINS.contains(&tag)
}

/// A parameterized runtime type: origin tag + ordered type arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub origin: String,
    #[serde(default)]
    pub args: Vec<TypeDescriptor>,
}

/// Error deserializing a descriptor from its JSON form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed type descriptor: {message}")]
pub struct DescriptorError {
    pub message: String,
}

impl TypeDescriptor {
    pub fn new(tag: impl Into<String>, args: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor {
            origin: tag.into(),
            args,
        }
    }

    pub fn scalar(tag: &str) -> Self {
        TypeDescriptor::new(tag, Vec::new())
    }

    pub fn null() -> Self {
        TypeDescriptor::scalar(origin::NULL)
    }

    pub fn bool() -> Self {
        TypeDescriptor::scalar(origin::BOOL)
    }

    pub fn int() -> Self {
        TypeDescriptor::scalar(origin::INT)
    }

    pub fn float() -> Self {
        TypeDescriptor::scalar(origin::FLOAT)
    }

    pub fn str() -> Self {
        TypeDescriptor::scalar(origin::STR)
    }

    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::new(origin::LIST, vec![element])
    }

    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::new(origin::SET, vec![element])
    }

    pub fn tuple(slots: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::new(origin::TUPLE, slots)
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::new(origin::MAP, vec![key, value])
    }

    /// True if this descriptor carries type arguments.
    pub fn is_parameterized(&self) -> bool {
        !self.args.is_empty()
    }

    /// The sole type argument of a single-parameter container.
    ///
    /// Calling this on a descriptor with no arguments is a precondition
    /// violation on the caller's side, not a recoverable condition.
    pub fn element_type(&self) -> &TypeDescriptor {
        self.args
            .first()
            .unwrap_or_else(|| panic!("{} carries no type arguments", self.origin))
    }

    /// Serialize to the JSON form `{"origin": ..., "args": [...]}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin,
            "args": self.args.iter().map(TypeDescriptor::to_json).collect::<Vec<_>>(),
        })
    }

    /// Parse a descriptor from its JSON form. `args` may be omitted for
    /// scalar descriptors.
    pub fn from_json(v: &serde_json::Value) -> Result<TypeDescriptor, DescriptorError> {
        let obj = v.as_object().ok_or_else(|| DescriptorError {
            message: "descriptor must be a JSON object".to_string(),
        })?;
        let tag = obj
            .get("origin")
            .and_then(|o| o.as_str())
            .ok_or_else(|| DescriptorError {
                message: "descriptor missing 'origin' field".to_string(),
            })?;

        let args = match obj.get("args") {
            None => Vec::new(),
            Some(serde_json::Value::Array(entries)) => {
                let mut parsed = Vec::with_capacity(entries.len());
                for entry in entries {
                    parsed.push(TypeDescriptor::from_json(entry)?);
                }
                parsed
            }
            Some(other) => {
                return Err(DescriptorError {
                    message: format!("'args' must be a JSON array, got {}", json_kind(other)),
                })
            }
        };

        Ok(TypeDescriptor::new(tag, args))
    }
}

impl fmt::Display for TypeDescriptor {
    /// Renders as `set[int]`, `map[str, int]`, `tuple[int, float]`, `bool`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.origin)?;
        if !self.args.is_empty() {
            write!(f, "[")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Human-readable name of a JSON value's kind, for diagnostics.
pub fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
