use std::fmt;

/// Scalar type a destination column is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    F64,
    I64,
    String,
}

impl Type {
    pub const fn is_bool(self) -> bool {
        matches!(self, Type::Bool)
    }

    pub const fn is_f64(self) -> bool {
        matches!(self, Type::F64)
    }

    pub const fn is_i64(self) -> bool {
        matches!(self, Type::I64)
    }

    pub const fn is_string(self) -> bool {
        matches!(self, Type::String)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("bool"),
            Type::F64 => f.write_str("f64"),
            Type::I64 => f.write_str("i64"),
            Type::String => f.write_str("string"),
        }
    }
}
