mod elasticsearch_storage;
mod memory_storage;
mod mongodb_storage;

use std::sync::Arc;

use log::info;

pub use elasticsearch_storage::ElasticsearchStorage;
pub use memory_storage::MemoryStorage;
pub use mongodb_storage::MongoStorage;

use crate::features::user_details::LogRecord;
use crate::shared::config::StoreConfig;
use crate::shared::error::StorageError;
use crate::shared::traits::DataStorage;

/// Builds the configured store and checks it answers a ping.
pub async fn connect(
    config: &StoreConfig,
) -> Result<Arc<dyn DataStorage<LogRecord>>, StorageError> {
    let storage: Arc<dyn DataStorage<LogRecord>> = match config {
        StoreConfig::MongoDb { uri, database, collection } => {
            Arc::new(MongoStorage::connect(uri, database, collection).await?)
        }
        StoreConfig::Elasticsearch { url, index, username, password } => {
            Arc::new(ElasticsearchStorage::new(
                url,
                index,
                username.as_deref(),
                password.as_deref(),
            )?)
        }
        StoreConfig::Memory => Arc::new(MemoryStorage::new()),
    };

    storage.ping().await?;
    info!("{} connection successful", config.kind());
    Ok(storage)
}
