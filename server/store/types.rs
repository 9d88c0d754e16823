use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,
    #[error("document must be a JSON object")]
    NotAnObject,
}

/// Equality filter over top-level document fields. Every entry must match
/// for a document to be selected.
#[derive(Clone, Debug, Default)]
pub struct Filter(Map<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().field("id", id)
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.0
            .iter()
            .all(|(key, expected)| doc.get(key) == Some(expected))
    }
}

/// Field-level set operations. Callers build these from typed update
/// structs so the store never sees an arbitrary merge payload.
#[derive(Clone, Debug, Default)]
pub struct Update(Map<String, Value>);

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn apply(&self, doc: &mut Value) -> Result<(), StoreError> {
        let obj = doc.as_object_mut().ok_or(StoreError::NotAnObject)?;
        for (key, value) in &self.0 {
            obj.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

/// Collection-agnostic document store. Documents are JSON objects keyed by
/// a store-assigned opaque `id`. `find_one_and_update` must apply its
/// update atomically per document; the task workflow relies on that for
/// racing approvals.
pub trait DocumentStore: Send + Sync {
    fn create(&self, collection: &str, doc: Value) -> Result<String, StoreError>;

    fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError>;

    fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError>;

    fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<Value>, StoreError>;

    fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, StoreError>;

    fn collection_names(&self) -> Result<Vec<String>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_matches_on_all_fields() {
        let doc = json!({"id": "t1", "user_id": "u1", "status": "queued"});
        assert!(Filter::new().field("user_id", "u1").matches(&doc));
        assert!(Filter::new()
            .field("user_id", "u1")
            .field("status", "queued")
            .matches(&doc));
        assert!(!Filter::new()
            .field("user_id", "u1")
            .field("status", "running")
            .matches(&doc));
        assert!(!Filter::new().field("missing", "x").matches(&doc));
    }

    #[test]
    fn update_sets_fields_in_place() {
        let mut doc = json!({"id": "t1", "status": "queued"});
        let update = Update::new().set("status", "succeeded").set("extra", 1);
        update.apply(&mut doc).unwrap();
        assert_eq!(doc, json!({"id": "t1", "status": "succeeded", "extra": 1}));
    }

    #[test]
    fn update_rejects_non_object_documents() {
        let mut doc = json!([1, 2, 3]);
        let err = Update::new().set("a", 1).apply(&mut doc).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject));
    }
}
