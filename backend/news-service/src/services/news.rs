//! News service - handles news creation, listing, search, update and deletion

use crate::db::{NewsQuery, NewsRepository};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{parse_news_id, CreateNewsRequest, News, UpdateNewsRequest};
use mongodb::bson::oid::ObjectId;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Upper bound on the number of records a listing returns.
pub const LIST_LIMIT: i64 = 1000;

#[derive(Clone)]
pub struct NewsService {
    repo: Arc<dyn NewsRepository>,
    timeout: Duration,
}

impl NewsService {
    /// `timeout` bounds every individual store round trip.
    pub fn new(repo: Arc<dyn NewsRepository>, timeout: Duration) -> Self {
        Self { repo, timeout }
    }

    async fn store<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(AppError::Timeout(operation)));
        metrics::record_store_duration(operation, start.elapsed());
        result
    }

    /// Insert a news item and return it as stored.
    pub async fn create(&self, req: CreateNewsRequest) -> Result<News> {
        let result = self.create_inner(req).await;
        metrics::record_operation("create", &result);
        result
    }

    async fn create_inner(&self, req: CreateNewsRequest) -> Result<News> {
        req.validate()?;
        let doc = req.into_document();

        let id = self.store("insert_one", self.repo.insert(&doc)).await?;
        let created = self
            .store("find_one", self.repo.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::Internal(format!("news {} missing after insert", id)))?;

        info!(news_id = %id, "news created");
        Ok(created.into())
    }

    /// Every news item, capped at [`LIST_LIMIT`].
    pub async fn list(&self) -> Result<Vec<News>> {
        let result = self.find(NewsQuery::All).await;
        metrics::record_operation("list", &result);
        result
    }

    /// News items whose title, description or author contain `q`, capped at [`LIST_LIMIT`].
    pub async fn search(&self, q: &str) -> Result<Vec<News>> {
        let result = self.find(NewsQuery::Text(q.to_string())).await;
        metrics::record_operation("search", &result);
        result
    }

    async fn find(&self, query: NewsQuery) -> Result<Vec<News>> {
        let docs = self
            .store("find", self.repo.find(&query, LIST_LIMIT))
            .await?;
        debug!(?query, count = docs.len(), "news listed");
        Ok(docs.into_iter().map(News::from).collect())
    }

    /// Apply the non-null members of `req` and return the resulting record.
    ///
    /// The record is returned unchanged when nothing was modified; only a
    /// missing record is an error.
    pub async fn update(&self, raw_id: &str, req: UpdateNewsRequest) -> Result<News> {
        let result = self.update_inner(raw_id, req).await;
        metrics::record_operation("update", &result);
        result
    }

    async fn update_inner(&self, raw_id: &str, req: UpdateNewsRequest) -> Result<News> {
        let id = resolve_id(raw_id)?;
        let fields = req.into_field_set();

        if !fields.is_empty() {
            let outcome = self
                .store("update_one", self.repo.update_fields(id, &fields))
                .await?;
            debug!(
                news_id = %id,
                fields = fields.len(),
                matched = outcome.matched,
                modified = outcome.modified,
                "news update applied"
            );

            if outcome.modified == 1 {
                if let Some(updated) = self.store("find_one", self.repo.find_by_id(id)).await? {
                    info!(news_id = %id, "news updated");
                    return Ok(updated.into());
                }
            }
        }

        match self.store("find_one", self.repo.find_by_id(id)).await? {
            Some(existing) => Ok(existing.into()),
            None => Err(AppError::NotFound(raw_id.to_string())),
        }
    }

    /// Remove a news item; fails unless exactly one document was deleted.
    pub async fn delete(&self, raw_id: &str) -> Result<()> {
        let result = self.delete_inner(raw_id).await;
        metrics::record_operation("delete", &result);
        result
    }

    async fn delete_inner(&self, raw_id: &str) -> Result<()> {
        let id = resolve_id(raw_id)?;
        let deleted = self.store("delete_one", self.repo.delete(id)).await?;

        if deleted == 1 {
            info!(news_id = %id, "news deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(raw_id.to_string()))
        }
    }

    /// Round trip to the store, for readiness probes.
    pub async fn ping(&self) -> Result<()> {
        self.store("ping", self.repo.ping()).await
    }
}

/// A malformed identifier cannot name any stored record.
fn resolve_id(raw_id: &str) -> Result<ObjectId> {
    parse_news_id(raw_id).map_err(|err| {
        debug!(error = %err, "rejecting malformed news id");
        AppError::NotFound(raw_id.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::UpdateOutcome;
    use crate::models::{NewsDocument, NewsFieldSet, Patch};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Repository that records calls and never finds anything.
    #[derive(Default)]
    struct EmptyRepo {
        calls: Mutex<Vec<&'static str>>,
    }

    impl EmptyRepo {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NewsRepository for EmptyRepo {
        async fn insert(&self, doc: &NewsDocument) -> Result<ObjectId> {
            self.calls.lock().unwrap().push("insert");
            Ok(doc.id)
        }

        async fn find_by_id(&self, _id: ObjectId) -> Result<Option<NewsDocument>> {
            self.calls.lock().unwrap().push("find_by_id");
            Ok(None)
        }

        async fn find(&self, _query: &NewsQuery, _limit: i64) -> Result<Vec<NewsDocument>> {
            self.calls.lock().unwrap().push("find");
            Ok(Vec::new())
        }

        async fn update_fields(&self, _id: ObjectId, _fields: &NewsFieldSet) -> Result<UpdateOutcome> {
            self.calls.lock().unwrap().push("update_fields");
            Ok(UpdateOutcome::default())
        }

        async fn delete(&self, _id: ObjectId) -> Result<u64> {
            self.calls.lock().unwrap().push("delete");
            Ok(0)
        }

        async fn ping(&self) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    fn service(repo: Arc<EmptyRepo>) -> NewsService {
        NewsService::new(repo, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn malformed_id_is_not_found_without_store_call() {
        let repo = Arc::new(EmptyRepo::default());
        let svc = service(repo.clone());

        let err = svc.delete("not-an-id").await.unwrap_err();
        assert_eq!(err.to_string(), "news not-an-id not found");
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_update_skips_write() {
        let repo = Arc::new(EmptyRepo::default());
        let svc = service(repo.clone());
        let id = ObjectId::new().to_hex();

        let err = svc.update(&id, UpdateNewsRequest::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref raw) if *raw == id));
        assert_eq!(repo.calls(), vec!["find_by_id"]);
    }

    #[tokio::test]
    async fn unmodified_update_falls_back_to_read() {
        let repo = Arc::new(EmptyRepo::default());
        let svc = service(repo.clone());
        let req = UpdateNewsRequest {
            title: Patch::Value("Z".to_string()),
            ..Default::default()
        };

        let err = svc.update(&ObjectId::new().to_hex(), req).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(repo.calls(), vec!["update_fields", "find_by_id"]);
    }

    #[tokio::test]
    async fn create_fails_when_record_cannot_be_read_back() {
        let repo = Arc::new(EmptyRepo::default());
        let svc = service(repo.clone());
        let req = CreateNewsRequest {
            id: None,
            title: "A".into(),
            description: "B".into(),
            author: "C".into(),
        };

        assert!(matches!(svc.create(req).await, Err(AppError::Internal(_))));
        assert_eq!(repo.calls(), vec!["insert", "find_by_id"]);
    }

    #[tokio::test]
    async fn slow_store_call_times_out() {
        let svc = service(Arc::new(EmptyRepo::default()));
        assert!(matches!(svc.ping().await, Err(AppError::Timeout("ping"))));
    }
}
