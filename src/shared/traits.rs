use async_trait::async_trait;
use crate::shared::error::{CollectionError, StorageError};

pub trait DataCollector<T> {
    fn collect(&mut self) -> Result<T, CollectionError>;
    fn validate(&self) -> Result<(), CollectionError>;

    fn health_check(&self) -> bool {
        self.validate().is_ok()
    }
}

#[async_trait]
pub trait AsyncDataCollector<T: Send> {
    async fn collect(&mut self) -> Result<T, CollectionError>;
    async fn validate(&self) -> Result<(), CollectionError>;

    async fn health_check(&self) -> bool {
        self.validate().await.is_ok()
    }
}

/// A document sink. `store` returns the identifier the backend assigned.
#[async_trait]
pub trait DataStorage<T: Send + Sync>: Send + Sync {
    async fn store(&self, data: &T) -> Result<String, StorageError>;
    async fn ping(&self) -> Result<(), StorageError>;

    async fn health_check(&self) -> bool {
        self.ping().await.is_ok()
    }
}

pub trait Validatable {
    fn validate(&self) -> Result<(), String>;
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
