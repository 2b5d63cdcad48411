use crate::Row;

use larder_core::{doc::Value, Result};

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

/// Inputs handed to a transform: the table and column being computed and
/// the row as filled so far for the current document.
#[derive(Debug)]
pub struct TransformContext<'a> {
    pub table: &'a str,
    pub column: &'a str,
    pub row: &'a Row,
}

/// A named, possibly side-effecting function that overrides how a
/// destination column's value is computed. Invoked exactly once per
/// document; results are never cached or reused across documents.
pub type TransformFn = Arc<dyn Fn(&TransformContext<'_>) -> Result<Value> + Send + Sync>;

/// Per-table mapping from destination column name to its transform.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    by_column: HashMap<(String, String), TransformFn>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, table: impl Into<String>, column: impl Into<String>, transform: F)
    where
        F: Fn(&TransformContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.by_column
            .insert((table.into(), column.into()), Arc::new(transform));
    }

    pub fn lookup(&self, table: &str, column: &str) -> Option<&TransformFn> {
        self.by_column
            .get(&(table.to_string(), column.to_string()))
    }

    /// The (table, column) pairs a transform is registered for; used to
    /// mark the compiled schema.
    pub(crate) fn columns(&self) -> HashSet<(String, String)> {
        self.by_column.keys().cloned().collect()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_column.keys()).finish()
    }
}
