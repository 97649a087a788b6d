//! In-memory NewsRepository for HTTP tests
//!
//! Keeps documents in insertion order, counts writes, and can simulate an
//! unreachable store so error mapping can be exercised without MongoDB.

#![allow(dead_code)]

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use news_service::db::{NewsQuery, NewsRepository, UpdateOutcome};
use news_service::error::{AppError, Result};
use news_service::models::{NewsDocument, NewsFieldSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryNewsRepository {
    docs: Mutex<Vec<NewsDocument>>,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryNewsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `count` documents directly, bypassing the HTTP layer.
    pub fn seed(&self, count: usize) {
        let mut docs = self.docs.lock().unwrap();
        for i in 0..count {
            docs.push(NewsDocument {
                id: ObjectId::new(),
                title: format!("title {i}"),
                description: format!("description {i}"),
                author: format!("author {i}"),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn get(&self, id: &str) -> Option<NewsDocument> {
        self.docs
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id.to_hex() == id)
            .cloned()
    }

    /// Number of insert, update and delete calls received.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(AppError::StoreUnavailable(
                "server selection timeout: no available servers".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NewsRepository for InMemoryNewsRepository {
    async fn insert(&self, doc: &NewsDocument) -> Result<ObjectId> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.docs.lock().unwrap().push(doc.clone());
        Ok(doc.id)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<NewsDocument>> {
        self.check_available()?;
        Ok(self.docs.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn find(&self, query: &NewsQuery, limit: i64) -> Result<Vec<NewsDocument>> {
        self.check_available()?;
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .filter(|d| query.matches(d))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_fields(&self, id: ObjectId, fields: &NewsFieldSet) -> Result<UpdateOutcome> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock().unwrap();
        Ok(match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => UpdateOutcome {
                matched: 1,
                modified: u64::from(fields.apply_to(doc)),
            },
            None => UpdateOutcome::default(),
        })
    }

    async fn delete(&self, id: ObjectId) -> Result<u64> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok((before - docs.len()) as u64)
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}

/// Build an initialized actix test service around the given repository.
macro_rules! init_news_app {
    ($repo:expr) => {{
        let service = news_service::services::NewsService::new(
            $repo.clone(),
            std::time::Duration::from_secs(5),
        );
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(service))
                .configure(news_service::handlers::configure),
        )
        .await
    }};
}
