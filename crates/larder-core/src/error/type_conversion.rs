use crate::doc::Type;

use std::fmt;

#[derive(Debug)]
pub(crate) struct TypeConversionError {
    variant: &'static str,
    ty: Type,
}

impl TypeConversionError {
    pub(crate) fn new(variant: &'static str, ty: Type) -> Self {
        Self { variant, ty }
    }
}

impl fmt::Display for TypeConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot store {} in a {} column", self.variant, self.ty)
    }
}
