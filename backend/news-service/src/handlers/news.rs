//! News handlers - HTTP endpoints for news operations

use crate::error::{ErrorResponse, Result, ValidationErrorResponse};
use crate::models::{CreateNewsRequest, News, UpdateNewsRequest};
use crate::services::NewsService;
use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

/// Add a news item
#[utoipa::path(
    post,
    path = "/",
    tag = "news",
    request_body = CreateNewsRequest,
    responses(
        (status = 201, description = "News created", body = News),
        (status = 413, description = "Payload too large", body = ErrorResponse),
        (status = 422, description = "Invalid payload", body = ValidationErrorResponse)
    )
)]
pub async fn create_news(
    service: web::Data<NewsService>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse> {
    let req = CreateNewsRequest::try_from(body.into_inner())?;
    let news = service.create(req).await?;
    Ok(HttpResponse::Created().json(news))
}

/// List all news (at most 1000 items)
#[utoipa::path(
    get,
    path = "/",
    tag = "news",
    responses(
        (status = 200, description = "News items in store order", body = [News])
    )
)]
pub async fn list_news(service: web::Data<NewsService>) -> Result<HttpResponse> {
    let news = service.list().await?;
    Ok(HttpResponse::Ok().json(news))
}

/// Search news by title, description or author
#[utoipa::path(
    get,
    path = "/{q}",
    tag = "news",
    params(
        ("q" = String, Path, description = "Case-insensitive text to look for")
    ),
    responses(
        (status = 200, description = "Matching news items (at most 1000)", body = [News])
    )
)]
pub async fn search_news(
    service: web::Data<NewsService>,
    q: web::Path<String>,
) -> Result<HttpResponse> {
    let news = service.search(&q).await?;
    Ok(HttpResponse::Ok().json(news))
}

/// Update a news item
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "news",
    params(
        ("id" = String, Path, description = "News identifier")
    ),
    request_body = UpdateNewsRequest,
    responses(
        (status = 200, description = "Current state of the news item", body = News),
        (status = 404, description = "News not found", body = ErrorResponse),
        (status = 413, description = "Payload too large", body = ErrorResponse),
        (status = 422, description = "Invalid payload", body = ValidationErrorResponse)
    )
)]
pub async fn update_news(
    service: web::Data<NewsService>,
    id: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> Result<HttpResponse> {
    let req = UpdateNewsRequest::try_from(body.into_inner())?;
    let news = service.update(&id, req).await?;
    Ok(HttpResponse::Ok().json(news))
}

/// Delete a news item
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "news",
    params(
        ("id" = String, Path, description = "News identifier")
    ),
    responses(
        (status = 204, description = "News deleted"),
        (status = 404, description = "News not found", body = ErrorResponse)
    )
)]
pub async fn delete_news(
    service: web::Data<NewsService>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    service.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
