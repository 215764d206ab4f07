//! MongoDB document store.

use async_trait::async_trait;
use catalog_ingest_common::{Error, Result};
use mongodb::bson::{doc, Document};
use mongodb::options::InsertManyOptions;
use mongodb::{Client, Database};
use serde_json::Value;

use crate::DocumentStore;

/// Store writing into collections of one MongoDB database.
///
/// The client connects lazily; the first insert surfaces connection errors.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| Error::database(format!("Failed to create MongoDB client: {e}")))?;

        Ok(Self {
            db: client.database(database),
        })
    }

    pub fn database_name(&self) -> &str {
        self.db.name()
    }
}

/// Convert one catalog record into a BSON document.
fn to_document(value: &Value) -> Result<Document> {
    if !value.is_object() {
        return Err(Error::invalid_input(format!(
            "MongoDB documents must be JSON objects, got: {value}"
        )));
    }
    mongodb::bson::to_document(value)
        .map_err(|e| Error::invalid_input(format!("cannot convert document to BSON: {e}")))
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Value>) -> Result<usize> {
        // The driver rejects an empty insert_many
        if documents.is_empty() {
            return Ok(0);
        }

        let docs = documents
            .iter()
            .map(to_document)
            .collect::<Result<Vec<_>>>()?;

        let options = InsertManyOptions::builder().ordered(false).build();
        let result = self
            .db
            .collection::<Document>(collection)
            .insert_many(docs, options)
            .await
            .map_err(|e| Error::database(format!("insert into {collection} failed: {e}")))?;

        Ok(result.inserted_ids.len())
    }

    async fn count(&self, collection: &str) -> Result<u64> {
        self.db
            .collection::<Document>(collection)
            .count_documents(doc! {}, None)
            .await
            .map_err(|e| Error::database(format!("count on {collection} failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_objects() {
        let doc = to_document(&json!({"id": 550, "title": "Fight Club", "adult": false})).unwrap();
        assert_eq!(doc.get_str("title").unwrap(), "Fight Club");
        assert!(!doc.get_bool("adult").unwrap());
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(
            to_document(&json!([1, 2, 3])),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(to_document(&json!(7)), Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn connect_is_lazy() {
        // No server is listening; building the client must still succeed
        let store = MongoStore::connect("mongodb://127.0.0.1:1", "movie_db")
            .await
            .unwrap();
        assert_eq!(store.backend(), "mongodb");
        assert_eq!(store.database_name(), "movie_db");
    }

    #[tokio::test]
    async fn empty_batch_skips_the_server() {
        let store = MongoStore::connect("mongodb://127.0.0.1:1", "movie_db")
            .await
            .unwrap();
        assert_eq!(store.insert_many("movies", Vec::new()).await.unwrap(), 0);
    }
}
