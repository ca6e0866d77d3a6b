use crate::shared::error::StorageError;
use crate::shared::traits::DataStorage;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Mutex;
use uuid::Uuid;

/// Keeps serialized documents in process memory. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    documents: Mutex<Vec<(String, Value)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> Vec<Value> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, document)| document.clone())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Value> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|(stored_id, _)| stored_id == id)
            .map(|(_, document)| document.clone())
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<T: Serialize + Send + Sync> DataStorage<T> for MemoryStorage {
    async fn store(&self, data: &T) -> Result<String, StorageError> {
        let document = serde_json::to_value(data)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let id = Uuid::new_v4().simple().to_string();

        self.documents
            .lock()
            .map_err(|_| StorageError::Write("memory store lock poisoned".to_string()))?
            .push((id.clone(), document));
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
