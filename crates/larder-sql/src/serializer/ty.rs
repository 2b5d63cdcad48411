use larder_core::doc::Type;

/// The PostgreSQL storage type for a declared column type.
pub(super) fn sql_type(ty: Type) -> &'static str {
    match ty {
        Type::Bool => "BOOLEAN",
        Type::F64 => "DOUBLE PRECISION",
        Type::I64 => "BIGINT",
        Type::String => "TEXT",
    }
}
