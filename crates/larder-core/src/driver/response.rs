use crate::doc::Value;

/// Result of executing a driver [`Operation`](super::Operation).
#[derive(Debug)]
pub enum Response {
    /// Number of rows affected.
    Count(u64),

    /// Rows returned by a select, one value per requested column.
    Rows(Vec<Vec<Value>>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self::Count(count)
    }

    pub fn rows(rows: Vec<Vec<Value>>) -> Self {
        Self::Rows(rows)
    }

    pub fn into_count(self) -> crate::Result<u64> {
        match self {
            Self::Count(count) => Ok(count),
            Self::Rows(_) => crate::bail!("expected a count response, got rows"),
        }
    }

    pub fn into_rows(self) -> crate::Result<Vec<Vec<Value>>> {
        match self {
            Self::Rows(rows) => Ok(rows),
            Self::Count(_) => crate::bail!("expected a rows response, got a count"),
        }
    }
}
