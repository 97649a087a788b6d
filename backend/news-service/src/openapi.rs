//! OpenAPI documentation for News Service

use crate::error::{ErrorResponse, FieldError, ValidationErrorResponse};
use crate::handlers::news;
use crate::models::{CreateNewsRequest, News, UpdateNewsRequest};
use actix_web::HttpResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "News Service API",
        version = "1.0.0",
        description = "CRUD service for news items backed by MongoDB. Records are created, listed, searched, partially updated and deleted at the root path.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    paths(
        news::create_news,
        news::list_news,
        news::search_news,
        news::update_news,
        news::delete_news,
    ),
    components(schemas(
        News,
        CreateNewsRequest,
        UpdateNewsRequest,
        ErrorResponse,
        ValidationErrorResponse,
        FieldError,
    )),
    tags(
        (name = "news", description = "News creation, listing, search, updates and deletion"),
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}

pub async fn openapi_json() -> actix_web::Result<HttpResponse> {
    let body = ApiDoc::openapi().to_json().map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}
