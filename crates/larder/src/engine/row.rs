use larder_core::doc::Value;

use indexmap::IndexMap;

/// A destination row: an ordered mapping from destination column name to
/// its computed scalar value. Built fresh per document and consumed by the
/// write that stores it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value computed for a column so far. Transforms use this to read
    /// columns that were filled earlier for the same document.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, column: String, value: Value) {
        self.columns.insert(column, value);
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Value>) {
        self.columns.into_iter().unzip()
    }
}
