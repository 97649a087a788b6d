//! HTTP handlers for news-service
//!
//! This module contains handlers for:
//! - News: create, list, search, update and delete news items at the root path
//! - Health: liveness, readiness and summary probes under `/api/v1/health`

pub mod health;
pub mod news;

use crate::error::{AppError, FieldError};
use actix_web::error::JsonPayloadError;
use actix_web::web;

// Re-export handler functions at module level
pub use health::{health_summary, liveness_check, readiness_summary};
pub use news::{create_news, delete_news, list_news, search_news, update_news};

/// Register every route served by news-service.
///
/// Operational routes span two or more path segments so they never shadow
/// the single-segment `/{id}` news routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/api/v1/health", web::get().to(health_summary))
        .route("/api/v1/health/ready", web::get().to(readiness_summary))
        .route("/api/v1/health/live", web::get().to(liveness_check))
        .route("/api/v1/metrics", web::get().to(crate::metrics::serve_metrics))
        .route("/api/v1/openapi.json", web::get().to(crate::openapi::openapi_json))
        .service(
            web::resource("/")
                .route(web::post().to(create_news))
                .route(web::get().to(list_news)),
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(search_news))
                .route(web::put().to(update_news))
                .route(web::delete().to(delete_news)),
        );
}

/// Largest JSON body accepted by the news endpoints.
pub const JSON_BODY_LIMIT: usize = 256 * 1024;

/// JSON extractor settings: oversized bodies become 413, every other body
/// error a 422 validation failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| match err {
            JsonPayloadError::Overflow { limit }
            | JsonPayloadError::OverflowKnownLength { limit, .. } => {
                AppError::PayloadTooLarge(limit).into()
            }
            other => AppError::Validation(vec![describe_payload_error(&other)]).into(),
        })
}

/// Bodies are extracted as JSON objects, so a data error here means the
/// top-level value was not an object. Member errors are reported later,
/// field by field, by the request conversions.
fn describe_payload_error(err: &JsonPayloadError) -> FieldError {
    match err {
        JsonPayloadError::Deserialize(e) if e.is_data() => {
            FieldError::new(&["body"], "expected a JSON object", "object_type")
        }
        JsonPayloadError::Deserialize(e) => {
            let full = e.to_string();
            let msg = full.split(" at line ").next().unwrap_or(&full);
            FieldError::new(&["body"], msg, "json_invalid")
        }
        JsonPayloadError::ContentType => FieldError::new(
            &["body"],
            "expected Content-Type: application/json",
            "content_type",
        ),
        other => FieldError::new(&["body"], other.to_string(), "body_error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    fn deserialize_error(json: &str) -> JsonPayloadError {
        let err = serde_json::from_str::<Map<String, Value>>(json).unwrap_err();
        JsonPayloadError::Deserialize(err)
    }

    #[test]
    fn non_object_body_is_rejected() {
        for json in ["[null,\"A\",\"B\",\"C\"]", "[]", "\"text\"", "5"] {
            let err = describe_payload_error(&deserialize_error(json));
            assert_eq!(err.loc, vec!["body"]);
            assert_eq!(err.kind, "object_type");
        }
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = describe_payload_error(&deserialize_error("{"));
        assert_eq!(err.kind, "json_invalid");
        assert!(!err.msg.contains("line"));
    }

    #[test]
    fn wrong_content_type_is_reported() {
        let err = describe_payload_error(&JsonPayloadError::ContentType);
        assert_eq!(err.kind, "content_type");
    }
}
