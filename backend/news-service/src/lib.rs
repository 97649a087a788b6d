//! News Service Library
//!
//! A CRUD service for news items stored in a MongoDB collection and exposed
//! over a small REST surface at the root path.
//!
//! # Modules
//!
//! - `handlers`: HTTP request handlers and route registration
//! - `models`: Stored document, API record, request payloads, identifier parsing
//! - `services`: Endpoint behaviour on top of the store gateway
//! - `db`: MongoDB client setup and the news repository
//! - `error`: Error types and their HTTP rendering
//! - `config`: Configuration management
//! - `metrics`: Prometheus collectors
//! - `openapi`: API documentation
//! - `telemetry`: Tracing subscriber setup

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod services;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
