use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use super::types::{DocumentStore, Filter, StoreError, Update};

/// In-memory document store. Collections keep insertion order, which is the
/// "natural order" reads return. Updates run under the write lock, so the
/// per-document atomicity the trait promises holds trivially.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn create(&self, collection: &str, mut doc: Value) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let obj = doc.as_object_mut().ok_or(StoreError::NotAnObject)?;
        obj.insert("id".to_string(), Value::String(id.clone()));

        let mut map = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        map.entry(collection.to_string()).or_default().push(doc);
        Ok(id)
    }

    fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError> {
        let map = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let docs = match map.get(collection) {
            Some(docs) => docs,
            None => return Ok(None),
        };
        Ok(docs.iter().find(|doc| filter.matches(doc)).cloned())
    }

    fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let map = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let docs = match map.get(collection) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };
        Ok(docs
            .iter()
            .filter(|doc| filter.matches(doc))
            .take(limit)
            .cloned()
            .collect())
    }

    fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<Value>, StoreError> {
        let mut map = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let docs = match map.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(None),
        };
        for doc in docs.iter_mut() {
            if filter.matches(doc) {
                update.apply(doc)?;
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, StoreError> {
        let mut map = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let docs = match map.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(false),
        };
        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let map = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_assigns_id_and_round_trips() {
        let store = MemoryStore::new();
        let id = store.create("task", json!({"prompt": "mouse"})).unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let doc = store.find_one("task", &Filter::by_id(&id)).unwrap().unwrap();
        assert_eq!(doc["id"], id);
        assert_eq!(doc["prompt"], "mouse");
    }

    #[test]
    fn create_rejects_non_object_documents() {
        let store = MemoryStore::new();
        let err = store.create("task", json!("nope")).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject));
    }

    #[test]
    fn find_many_filters_and_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.create("task", json!({"user_id": "u1", "n": 1})).unwrap();
        store.create("task", json!({"user_id": "u2", "n": 2})).unwrap();
        store.create("task", json!({"user_id": "u1", "n": 3})).unwrap();

        let docs = store
            .find_many("task", &Filter::new().field("user_id", "u1"), 50)
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["n"], 1);
        assert_eq!(docs[1]["n"], 3);
    }

    #[test]
    fn find_many_honors_limit() {
        let store = MemoryStore::new();
        for n in 0..5 {
            store.create("task", json!({"user_id": "u1", "n": n})).unwrap();
        }
        let docs = store
            .find_many("task", &Filter::new().field("user_id", "u1"), 3)
            .unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn find_one_and_update_applies_sets() {
        let store = MemoryStore::new();
        let id = store
            .create("task", json!({"status": "awaiting_approval"}))
            .unwrap();

        let updated = store
            .find_one_and_update(
                "task",
                &Filter::by_id(&id),
                &Update::new().set("status", "succeeded"),
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated["status"], "succeeded");

        let doc = store.find_one("task", &Filter::by_id(&id)).unwrap().unwrap();
        assert_eq!(doc["status"], "succeeded");
    }

    #[test]
    fn conditional_update_misses_when_guard_fails() {
        let store = MemoryStore::new();
        let id = store.create("task", json!({"status": "succeeded"})).unwrap();

        let result = store
            .find_one_and_update(
                "task",
                &Filter::by_id(&id).field("status", "awaiting_approval"),
                &Update::new().set("status", "succeeded"),
            )
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn delete_one_removes_a_single_document() {
        let store = MemoryStore::new();
        let id = store.create("bot", json!({"name": "b"})).unwrap();
        assert!(store.delete_one("bot", &Filter::by_id(&id)).unwrap());
        assert!(!store.delete_one("bot", &Filter::by_id(&id)).unwrap());
        assert!(store.find_one("bot", &Filter::by_id(&id)).unwrap().is_none());
    }

    #[test]
    fn collection_names_are_sorted() {
        let store = MemoryStore::new();
        store.create("task", json!({})).unwrap();
        store.create("bot", json!({})).unwrap();
        assert_eq!(store.collection_names().unwrap(), vec!["bot", "task"]);
    }
}
