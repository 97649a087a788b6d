//! Business logic layer for news-service
//!
//! Composes payload validation and store gateway calls into the behaviour
//! of each news endpoint.

pub mod news;

pub use news::{NewsService, LIST_LIMIT};
