//! Ordered free-form field bag for manifest injection.

use serde_json::Value;

/// An ordered mapping from field name to an opaque serializable value.
///
/// Later writes overwrite earlier ones for the same key while keeping the
/// key's original position, so the rendered manifest is stable across
/// re-configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBag {
    entries: Vec<(String, Value)>,
}

impl FieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, overwriting any earlier value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
            return;
        }
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insertion_order_is_preserved() {
        let mut bag = FieldBag::new();
        bag.set("zeta", json!(1));
        bag.set("alpha", json!(2));

        let keys: Vec<&str> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn rewriting_a_key_keeps_its_position() {
        let mut bag = FieldBag::new();
        bag.set("a", json!("first"));
        bag.set("b", json!("second"));
        bag.set("a", json!("rewritten"));

        let keys: Vec<&str> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(bag.get("a").unwrap(), &json!("rewritten"));
    }
}
