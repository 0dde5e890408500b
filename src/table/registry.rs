//! Uniqueness registry
//!
//! Ordered list of identifier values already in use within one table.
//! A value appears at most once; it is registered on insert and released on
//! delete of the owning record.

use serde::{Deserialize, Serialize};

/// Identifier values in use within a table, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniquenessRegistry(Vec<String>);

impl UniquenessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `value` is already registered
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    /// Registers `value`. Returns false if it was already present.
    pub fn register(&mut self, value: &str) -> bool {
        if self.contains(value) {
            return false;
        }
        self.0.push(value.to_string());
        true
    }

    /// Releases `value`. Returns false if it was not registered.
    pub fn release(&mut self, value: &str) -> bool {
        match self.0.iter().position(|v| v == value) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for UniquenessRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = UniquenessRegistry::new();
        assert!(registry.register("12345678901"));
        assert!(!registry.register("12345678901"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_release_keeps_order() {
        let mut registry: UniquenessRegistry =
            ["11111111111", "22222222222", "33333333333"].into_iter().collect();
        assert!(registry.release("22222222222"));
        assert!(!registry.release("22222222222"));
        let values: Vec<_> = registry.iter().collect();
        assert_eq!(values, vec!["11111111111", "33333333333"]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let registry: UniquenessRegistry = ["12345678901"].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&registry).unwrap(),
            r#"["12345678901"]"#
        );
        let empty: UniquenessRegistry = serde_json::from_str("[]").unwrap();
        assert!(empty.is_empty());
    }
}
