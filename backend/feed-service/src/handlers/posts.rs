/// Post handlers - HTTP endpoints for listings, posts, reactions, and replies
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, FieldError, Result};
use crate::metrics::FEED_QUERIES_TOTAL;
use crate::middleware::{MaybeUserId, UserId};
use crate::models::{NewPost, PostFilter};
use crate::services::{FeedService, ReactionService};
use crate::validators;

/// Hard ceiling on page size; the engine trusts its inputs, so the cap lives
/// here at the boundary.
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(rename = "postType")]
    pub post_type: Option<String>,
    pub author: Option<String>,
    pub location: Option<String>,
    pub filter: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Resolve the query string into exactly one filter variant. Precedence:
/// location > bookmarked > postType > author.
fn build_filter(params: &FeedQueryParams, viewer: Option<Uuid>) -> Result<PostFilter> {
    if let Some(raw) = &params.location {
        if let Some((longitude, latitude, max_distance_meters)) =
            validators::parse_location_param(raw)
        {
            return Ok(PostFilter::Near {
                longitude,
                latitude,
                max_distance_meters,
            });
        }
        // Matches the legacy API: a location value that is not coordinates
        // does not restrict the listing.
        debug!(location = %raw, "ignoring unparseable location parameter");
    }

    if params.filter.as_deref() == Some("bookmarked") {
        let user_id = viewer.ok_or_else(|| {
            AppError::Unauthorized("Authentication required for bookmarked filter".to_string())
        })?;
        return Ok(PostFilter::BookmarkedBy(user_id));
    }

    if let Some(raw) = &params.post_type {
        let post_type = raw.parse().map_err(|_| {
            AppError::invalid_field(
                "postType",
                "must be one of recommend_place, ask_help, local_update, event_announcement",
            )
        })?;
        return Ok(PostFilter::ByType(post_type));
    }

    if let Some(raw) = &params.author {
        let author_id = Uuid::parse_str(raw)
            .map_err(|_| AppError::invalid_field("author", "must be a valid user id"))?;
        return Ok(PostFilter::ByAuthor(author_id));
    }

    Ok(PostFilter::All)
}

/// List posts for a filter, paginated
pub async fn list_posts(
    pool: web::Data<PgPool>,
    viewer: MaybeUserId,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse> {
    let page = query.page.max(1);
    let limit = query.limit.min(MAX_PAGE_SIZE).max(1);
    let filter = build_filter(&query, viewer.0)?;

    FEED_QUERIES_TOTAL
        .with_label_values(&[filter.kind()])
        .inc();

    let service = FeedService::new((**pool).clone());
    let feed = service.list_posts(&filter, page, limit).await?;
    Ok(HttpResponse::Ok().json(feed))
}

/// Get a single post with reactions and replies
pub async fn get_post(pool: web::Data<PgPool>, path: web::Path<String>) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let service = FeedService::new((**pool).clone());
    let post = service.get_post(post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(rename = "postType")]
    pub post_type: String,
    pub image: Option<String>,
    #[serde(rename = "locationName")]
    pub location_name: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// Create a new post
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let draft = validate_draft(req.into_inner())?;
    let service = FeedService::new((**pool).clone());
    let post = service.create_post(user_id.0, draft).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post; only the author may do this
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let service = ReactionService::new((**pool).clone());
    service.delete_post(post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Post removed" })))
}

/// Toggle a like on a post
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let service = ReactionService::new((**pool).clone());
    let snapshot = service.toggle_like(post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// Toggle a dislike on a post
pub async fn toggle_dislike(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let service = ReactionService::new((**pool).clone());
    let snapshot = service.toggle_dislike(post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// Toggle a bookmark on a post
pub async fn toggle_bookmark(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let service = ReactionService::new((**pool).clone());
    let snapshot = service.toggle_bookmark(post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// Remove a bookmark if present; idempotent
pub async fn remove_bookmark(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let service = ReactionService::new((**pool).clone());
    let snapshot = service.remove_bookmark(post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub content: String,
}

/// Add a reply to a post
pub async fn add_reply(
    pool: web::Data<PgPool>,
    user_id: UserId,
    path: web::Path<String>,
    req: web::Json<ReplyRequest>,
) -> Result<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    if !validators::validate_content(&req.content) {
        return Err(AppError::invalid_field(
            "content",
            "must be 1-280 characters",
        ));
    }

    let service = ReactionService::new((**pool).clone());
    let thread = service.add_reply(post_id, user_id.0, &req.content).await?;
    Ok(HttpResponse::Ok().json(thread))
}

/// A malformed id is indistinguishable from an absent post.
fn parse_post_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Post"))
}

fn validate_draft(req: CreatePostRequest) -> Result<NewPost> {
    let mut errors = Vec::new();

    if !validators::validate_content(&req.content) {
        errors.push(FieldError::new("content", "must be 1-280 characters"));
    }

    let post_type = match req.post_type.parse() {
        Ok(ty) => Some(ty),
        Err(_) => {
            errors.push(FieldError::new(
                "postType",
                "must be one of recommend_place, ask_help, local_update, event_announcement",
            ));
            None
        }
    };

    if let Some(image) = &req.image {
        if !validators::validate_image_url(image) {
            errors.push(FieldError::new("image", "must be a valid URL"));
        }
    }

    if let Some(name) = &req.location_name {
        if !validators::validate_location_name(name) {
            errors.push(FieldError::new(
                "locationName",
                "must be at most 100 characters",
            ));
        }
    }

    match (req.longitude, req.latitude) {
        (Some(longitude), Some(latitude)) => {
            if !validators::validate_longitude(longitude) {
                errors.push(FieldError::new("longitude", "must be between -180 and 180"));
            }
            if !validators::validate_latitude(latitude) {
                errors.push(FieldError::new("latitude", "must be between -90 and 90"));
            }
        }
        (None, None) => {}
        _ => {
            errors.push(FieldError::new(
                "location",
                "longitude and latitude must be provided together",
            ));
        }
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // post_type is always Some when no error was pushed
    let post_type = post_type.ok_or_else(|| {
        AppError::Internal("post type missing after validation".to_string())
    })?;

    Ok(NewPost {
        content: req.content,
        post_type,
        image: req.image,
        location_name: req.location_name,
        longitude: req.longitude,
        latitude: req.latitude,
    })
}
