use super::Value;

use indexmap::IndexMap;

/// A single record read from a source collection: an ordered mapping from
/// field name to dynamically-typed [`Value`]. Never mutated by the engine
/// once produced by a source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a field. Missing keys yield `None`, not an error.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_absent_not_error() {
        let mut doc = Document::new();
        doc.insert("id", "u1");
        assert_eq!(doc.get("id"), Some(&Value::String("u1".to_string())));
        assert_eq!(doc.get("token"), None);
    }

    #[test]
    fn preserves_field_order() {
        let mut doc = Document::new();
        doc.insert("b", 1i64);
        doc.insert("a", 2i64);
        let keys: Vec<_> = doc.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
