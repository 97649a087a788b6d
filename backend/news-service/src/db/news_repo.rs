//! News repository - the only component that talks to the document store

use crate::error::{AppError, Result};
use crate::models::{NewsDocument, NewsFieldSet};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Client, Collection, Database};

/// Which documents a listing should return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsQuery {
    All,
    /// Case-insensitive literal substring match on title, description or author
    Text(String),
}

impl NewsQuery {
    /// Whether an in-memory document satisfies the query.
    pub fn matches(&self, doc: &NewsDocument) -> bool {
        match self {
            NewsQuery::All => true,
            NewsQuery::Text(text) => {
                let needle = text.to_lowercase();
                [&doc.title, &doc.description, &doc.author]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Counts reported by a single-document update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Insert a new document and return the identifier the store recorded.
    async fn insert(&self, doc: &NewsDocument) -> Result<ObjectId>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<NewsDocument>>;

    /// Read at most `limit` documents in the store's natural order.
    async fn find(&self, query: &NewsQuery, limit: i64) -> Result<Vec<NewsDocument>>;

    /// `$set` the given fields on the document with identifier `id`.
    async fn update_fields(&self, id: ObjectId, fields: &NewsFieldSet) -> Result<UpdateOutcome>;

    /// Delete the document with identifier `id`, returning how many were removed.
    async fn delete(&self, id: ObjectId) -> Result<u64>;

    async fn ping(&self) -> Result<()>;
}

/// `NewsRepository` backed by a MongoDB collection
#[derive(Clone)]
pub struct MongoNewsRepository {
    database: Database,
    collection: Collection<NewsDocument>,
}

impl MongoNewsRepository {
    pub fn new(client: &Client, database: &str, collection: &str) -> Self {
        let database = client.database(database);
        let collection = database.collection::<NewsDocument>(collection);
        Self {
            database,
            collection,
        }
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

fn id_filter(id: ObjectId) -> Document {
    doc! { "_id": id }
}

pub(crate) fn query_filter(query: &NewsQuery) -> Document {
    match query {
        NewsQuery::All => doc! {},
        NewsQuery::Text(text) => {
            let pattern = regex::escape(text);
            let clauses: Vec<Document> = ["title", "description", "author"]
                .iter()
                .map(|field| {
                    let mut clause = Document::new();
                    clause.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
                    clause
                })
                .collect();
            doc! { "$or": clauses }
        }
    }
}

pub(crate) fn set_document(fields: &NewsFieldSet) -> Document {
    let mut set = Document::new();
    for (field, value) in fields.iter() {
        set.insert(field.as_str(), value);
    }
    doc! { "$set": set }
}

#[async_trait]
impl NewsRepository for MongoNewsRepository {
    async fn insert(&self, doc: &NewsDocument) -> Result<ObjectId> {
        let result = self.collection.insert_one(doc).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::Internal(format!(
                "store returned non-ObjectId identifier {}",
                result.inserted_id
            ))
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<NewsDocument>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    async fn find(&self, query: &NewsQuery, limit: i64) -> Result<Vec<NewsDocument>> {
        let cursor = self.collection.find(query_filter(query)).limit(limit).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_fields(&self, id: ObjectId, fields: &NewsFieldSet) -> Result<UpdateOutcome> {
        let result = self
            .collection
            .update_one(id_filter(id), set_document(fields))
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<u64> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
