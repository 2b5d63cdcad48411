use larder_core::doc::Value;

use postgres::types::{accepts, private::BytesMut, to_sql_checked, IsNull, ToSql, Type};

/// Binds an engine [`Value`] as a statement parameter.
#[derive(Debug)]
pub(crate) struct PgValue(pub(crate) Value);

impl From<Value> for PgValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl ToSql for PgValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>>
    where
        Self: Sized,
    {
        match &self.0 {
            Value::Bool(value) => value.to_sql(ty, out),
            Value::I64(value) => {
                if *ty == Type::INT2 {
                    let value = i16::try_from(*value)?;
                    value.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    let value = i32::try_from(*value)?;
                    value.to_sql(ty, out)
                } else {
                    value.to_sql(ty, out)
                }
            }
            Value::F64(value) => value.to_sql(ty, out),
            Value::String(value) => value.to_sql(ty, out),
            Value::Null => Ok(IsNull::Yes),
            value => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("cannot bind {value:?} as a statement parameter"),
            ))),
        }
    }

    accepts!(BOOL, INT2, INT4, INT8, FLOAT4, FLOAT8, TEXT, VARCHAR);
    to_sql_checked!();
}
