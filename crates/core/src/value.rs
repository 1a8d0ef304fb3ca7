//! Runtime values carried through the registry.
//!
//! All numerics are `rust_decimal::Decimal` or `i64` -- never `f64` -- so
//! the enum derives full ordering and hashing. That is what lets `Set` and
//! `Map` sit on B-tree containers: duplicate collapse and key uniqueness
//! come from `Ord`, with no tolerance games around float equality.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A runtime value. Values are transient: constructed for the duration of
/// one registry call, never cached, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(Decimal),
    Text(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Unordered, duplicate-collapsing collection. The B-tree iteration
    /// order is an implementation detail; callers must not rely on it.
    Set(BTreeSet<Value>),
    Map(BTreeMap<Value, Value>),
}

impl Value {
    /// Human-readable kind name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
        }
    }

    /// The value's elements, if it supports element-wise iteration.
    ///
    /// Lists, tuples, and sets yield their members; maps yield their keys.
    /// Scalars yield `None` -- the caster's not-iterable gate.
    pub fn iter_elements(&self) -> Option<Vec<&Value>> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items.iter().collect()),
            Value::Set(members) => Some(members.iter().collect()),
            Value::Map(entries) => Some(entries.keys().collect()),
            _ => None,
        }
    }

    /// Element count of an iterable value, or `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items.len()),
            Value::Set(members) => Some(members.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|n| n == 0)
    }
}

impl fmt::Display for Value {
    /// Literal-style rendering, used when a value is quoted in an error
    /// message: `{1, 2}`, `[1, "a"]`, `(1, 2.5)`, `{"k": 1}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(d) => write!(f, "{}", d),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::List(items) => render_seq(f, "[", items.iter(), "]"),
            Value::Tuple(items) => render_seq(f, "(", items.iter(), ")"),
            Value::Set(members) => render_seq(f, "{", members.iter(), "}"),
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn render_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(items: Vec<Value>) -> Value {
        Value::Set(items.into_iter().collect())
    }

    #[test]
    fn set_collapses_duplicates() {
        let v = set_of(vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
        assert_eq!(v.len(), Some(2));
    }

    #[test]
    fn scalars_are_not_iterable() {
        assert!(Value::Int(5).iter_elements().is_none());
        assert!(Value::Text("abc".into()).iter_elements().is_none());
    }

    #[test]
    fn map_iterates_keys() {
        let mut entries = BTreeMap::new();
        entries.insert(Value::Text("a".into()), Value::Int(1));
        entries.insert(Value::Text("b".into()), Value::Int(2));
        let map = Value::Map(entries);
        let elements = map.iter_elements().unwrap();
        assert_eq!(
            elements,
            vec![&Value::Text("a".into()), &Value::Text("b".into())]
        );
    }

    #[test]
    fn display_renders_literals() {
        let v = set_of(vec![Value::Int(2), Value::Int(1)]);
        assert_eq!(v.to_string(), "{1, 2}");
        assert_eq!(Value::Text("hi".into()).to_string(), "\"hi\"");
        assert_eq!(
            Value::Tuple(vec![Value::Int(1), Value::Bool(true)]).to_string(),
            "(1, true)"
        );
    }
}
