use super::{Document, Type};
use crate::Result;

/// A dynamically-typed value read from a source document.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// 64-bit floating point value
    F64(f64),

    /// Signed 64-bit integer
    I64(i64),

    /// A list of values
    List(Vec<Value>),

    /// A nested document
    Nested(Document),

    /// Null value
    #[default]
    Null,

    /// String value
    String(String),
}

impl Value {
    /// Returns a `Value` representing null
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True when the value counts as absent for defaulting purposes:
    /// null, or an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            _ => crate::bail!("cannot convert value to bool; value={self:#?}"),
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Self::I64(v) => Ok(v),
            _ => crate::bail!("cannot convert value to i64; value={self:#?}"),
        }
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_string(self) -> Result<String> {
        match self {
            Self::String(v) => Ok(v),
            _ => crate::bail!("cannot convert value to string; value={self:#?}"),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    pub fn expect_string(&self) -> &str {
        match self {
            Self::String(v) => v,
            _ => panic!("expected string value; value={self:#?}"),
        }
    }

    /// Whether this value can be stored in a column of the given type.
    /// Null is storable anywhere.
    pub fn is_a(&self, ty: Type) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(_) => ty.is_bool(),
            Self::F64(_) => ty.is_f64(),
            // i64 widens losslessly enough for a double column
            Self::I64(_) => ty.is_i64() || ty.is_f64(),
            Self::String(_) => ty.is_string(),
            Self::List(_) | Self::Nested(_) => false,
        }
    }

    /// Coerces this value for storage in a column of the given type.
    /// The only implicit coercion is integer-to-double widening.
    pub fn coerce(self, ty: Type) -> Result<Value> {
        match self {
            Self::I64(v) if ty.is_f64() => Ok(Self::F64(v as f64)),
            value if value.is_a(ty) => Ok(value),
            value => Err(crate::Error::type_conversion(&value, ty)),
        }
    }

    /// Parses a declared default literal. SQL-quoted strings keep their
    /// inner text; `true`/`false` and numerics parse to their scalar
    /// variants; anything else is taken verbatim as a string.
    pub fn from_literal(literal: &str) -> Value {
        if let Some(inner) = literal
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            return Self::String(inner.to_string());
        }

        match literal {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            "null" => Self::Null,
            _ => {
                if let Ok(v) = literal.parse::<i64>() {
                    Self::I64(v)
                } else if let Ok(v) = literal.parse::<f64>() {
                    Self::F64(v)
                } else {
                    Self::String(literal.to_string())
                }
            }
        }
    }

    pub(crate) fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "a bool",
            Self::F64(_) => "an f64",
            Self::I64(_) => "an i64",
            Self::List(_) => "a list",
            Self::Nested(_) => "a nested document",
            Self::Null => "null",
            Self::String(_) => "a string",
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Value {
        Value::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Value {
        Value::I64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Value {
        Value::F64(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Value {
        Value::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Value {
        Value::String(src)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Value {
        match src {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_quoted_string() {
        assert_eq!(
            Value::from_literal("'No bio set!'"),
            Value::String("No bio set!".to_string())
        );
        assert_eq!(Value::from_literal("''"), Value::String(String::new()));
    }

    #[test]
    fn literal_scalars() {
        assert_eq!(Value::from_literal("false"), Value::Bool(false));
        assert_eq!(Value::from_literal("true"), Value::Bool(true));
        assert_eq!(Value::from_literal("42"), Value::I64(42));
        assert_eq!(Value::from_literal("1.5"), Value::F64(1.5));
        assert_eq!(Value::from_literal("null"), Value::Null);
    }

    #[test]
    fn literal_bare_string() {
        assert_eq!(
            Value::from_literal("/landing.svg"),
            Value::String("/landing.svg".to_string())
        );
    }

    #[test]
    fn empty_detection() {
        assert!(Value::Null.is_empty());
        assert!(Value::String(String::new()).is_empty());
        assert!(!Value::String("x".to_string()).is_empty());
        assert!(!Value::Bool(false).is_empty());
        assert!(!Value::I64(0).is_empty());
    }

    #[test]
    fn coerce_widens_integers() {
        assert_eq!(Value::I64(3).coerce(Type::F64).unwrap(), Value::F64(3.0));
        assert_eq!(Value::I64(3).coerce(Type::I64).unwrap(), Value::I64(3));
        assert!(Value::Null.coerce(Type::Bool).unwrap().is_null());
        assert!(Value::Bool(true).coerce(Type::I64).is_err());
    }
}
