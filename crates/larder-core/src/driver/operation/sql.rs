use super::Operation;
use crate::doc::Value;

#[derive(Debug, Clone)]
pub struct Sql {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Sql {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl From<Sql> for Operation {
    fn from(value: Sql) -> Self {
        Self::Sql(value)
    }
}
