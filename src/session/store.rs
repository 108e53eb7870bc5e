//! In-memory workflow store
//!
//! Holds the documents a user has chosen to load this session, keyed by
//! file name. Entries exist only for fetches that returned a valid JSON
//! body; callers insert after success, never a placeholder before.

use serde_json::Value;
use std::collections::BTreeMap;

/// Session-scoped mapping from file name to parsed workflow document.
#[derive(Clone, Debug, Default)]
pub struct WorkflowStore {
    documents: BTreeMap<String, Value>,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a successfully fetched document, replacing any previous copy.
    pub fn insert(&mut self, file_name: impl Into<String>, document: Value) {
        self.documents.insert(file_name.into(), document);
    }

    /// Remove one document, returning it if it was loaded.
    pub fn remove(&mut self, file_name: &str) -> Option<Value> {
        self.documents.remove(file_name)
    }

    pub fn get(&self, file_name: &str) -> Option<&Value> {
        self.documents.get(file_name)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.documents.contains_key(file_name)
    }

    /// Loaded file names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.documents.iter().map(|(name, doc)| (name.as_str(), doc))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Drop every loaded document.
    pub fn clear(&mut self) {
        self.documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let mut store = WorkflowStore::new();
        store.insert("alpha.json", json!({"name": "Alpha"}));

        assert!(store.contains("alpha.json"));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("alpha.json").and_then(|doc| doc.get("name")),
            Some(&json!("Alpha"))
        );
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut store = WorkflowStore::new();
        store.insert("alpha.json", json!({"v": 1}));
        store.insert("alpha.json", json!({"v": 2}));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("alpha.json"), Some(&json!({"v": 2})));
    }

    #[test]
    fn test_remove_returns_document() {
        let mut store = WorkflowStore::new();
        store.insert("alpha.json", json!({}));

        assert_eq!(store.remove("alpha.json"), Some(json!({})));
        assert_eq!(store.remove("alpha.json"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_names_are_sorted() {
        let mut store = WorkflowStore::new();
        store.insert("zeta.json", json!({}));
        store.insert("alpha.json", json!({}));
        store.insert("mid.json", json!({}));

        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, vec!["alpha.json", "mid.json", "zeta.json"]);
    }

    #[test]
    fn test_clear() {
        let mut store = WorkflowStore::new();
        store.insert("alpha.json", json!({}));
        store.clear();
        assert!(store.is_empty());
    }
}
