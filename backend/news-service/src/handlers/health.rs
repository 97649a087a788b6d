//! Health handlers - liveness, readiness and summary probes

use crate::services::NewsService;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

pub async fn health_summary(service: web::Data<NewsService>) -> HttpResponse {
    match service.ping().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "news-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("MongoDB ping failed: {}", e),
            "service": "news-service"
        })),
    }
}

pub async fn readiness_summary(service: web::Data<NewsService>) -> HttpResponse {
    let start = Instant::now();
    let result = service.ping().await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    let (ready, mongodb_check) = match result {
        Ok(_) => (
            true,
            ComponentCheck {
                status: ComponentStatus::Healthy,
                message: "MongoDB ping successful".to_string(),
                latency_ms,
            },
        ),
        Err(e) => (
            false,
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("MongoDB ping failed: {}", e),
                latency_ms,
            },
        ),
    };

    let status = mongodb_check.status.clone();
    let mut checks = HashMap::new();
    checks.insert("mongodb".to_string(), mongodb_check);

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
