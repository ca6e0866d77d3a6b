use crate::shared::error::StorageError;
use crate::shared::traits::DataStorage;
use async_trait::async_trait;
use elasticsearch::{
    auth::Credentials,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    Elasticsearch, IndexParts,
};
use log::{debug, error};
use serde::Serialize;
use serde_json::Value;
use url::Url;

pub struct ElasticsearchStorage {
    client: Elasticsearch,
    index: String,
}

impl ElasticsearchStorage {
    pub fn new(
        url: &str,
        index: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, StorageError> {
        let url = Url::parse(url)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool);

        if let (Some(username), Some(password)) = (username, password) {
            builder = builder.auth(Credentials::Basic(
                username.to_string(),
                password.to_string(),
            ));
        }

        let transport = builder
            .build()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            index: index.to_string(),
        })
    }
}

#[async_trait]
impl<T: Serialize + Send + Sync> DataStorage<T> for ElasticsearchStorage {
    async fn store(&self, data: &T) -> Result<String, StorageError> {
        let response = self
            .client
            .index(IndexParts::Index(&self.index))
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        if !response.status_code().is_success() {
            error!("Failed to index document: {:?}", response);
            return Err(StorageError::Write(format!(
                "Elasticsearch returned error status: {}",
                response.status_code()
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        let id = response_body["_id"]
            .as_str()
            .ok_or_else(|| StorageError::Write("response carried no _id".to_string()))?
            .to_string();

        debug!("Indexed document {} into {}", id, self.index);
        Ok(id)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if response.status_code().is_success() {
            Ok(())
        } else {
            Err(StorageError::Connection(format!(
                "Elasticsearch ping returned status: {}",
                response.status_code()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_url() {
        let result = ElasticsearchStorage::new("not a url", "user_logs", None, None);
        assert!(matches!(result, Err(StorageError::Connection(_))));
    }

    #[tokio::test]
    async fn unreachable_node_fails_ping() {
        let storage =
            ElasticsearchStorage::new("http://127.0.0.1:9", "user_logs", None, None).unwrap();
        assert!(!DataStorage::<Value>::health_check(&storage).await);
    }
}
