use crate::shared::error::StorageError;
use crate::shared::traits::DataStorage;
use async_trait::async_trait;
use log::{debug, info};
use mongodb::{
    bson::{self, doc, Bson, Document},
    options::ClientOptions,
    Client, Collection, Database,
};
use serde::Serialize;

pub struct MongoStorage {
    database: Database,
    collection: Collection<Document>,
}

impl MongoStorage {
    /// Parses `uri` and builds a pooled client. No connection is made until
    /// the first operation; call [`DataStorage::ping`] to test reachability.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
    ) -> Result<Self, StorageError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let database = client.database(database);
        let collection = database.collection::<Document>(collection);

        info!("Using MongoDB collection {}.{}", database.name(), collection.name());
        Ok(Self { database, collection })
    }
}

fn inserted_id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl<T: Serialize + Send + Sync> DataStorage<T> for MongoStorage {
    async fn store(&self, data: &T) -> Result<String, StorageError> {
        let document = bson::to_document(data)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        let id = inserted_id_to_string(result.inserted_id);
        debug!("Inserted document {} into {}", id, self.collection.name());
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
