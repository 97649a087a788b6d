//! Data models for news-service
//!
//! This module defines structures for:
//! - NewsDocument: the stored BSON shape of a news item
//! - News: the JSON record returned to API clients
//! - CreateNewsRequest / UpdateNewsRequest: request payloads
//! - Patch: tri-state field used by partial updates

pub mod news;
pub mod object_id;
pub mod patch;

pub use news::{CreateNewsRequest, News, NewsDocument, NewsField, NewsFieldSet, UpdateNewsRequest};
pub use object_id::{parse_news_id, InvalidNewsId};
pub use patch::Patch;
