//! Store gateway
//!
//! This module provides:
//! - MongoDB client construction and teardown (`mongo`)
//! - The `NewsRepository` trait and its MongoDB implementation (`news_repo`)

pub mod mongo;
pub mod news_repo;

pub use mongo::{connect, MongoSettings};
pub use news_repo::{MongoNewsRepository, NewsQuery, NewsRepository, UpdateOutcome};
