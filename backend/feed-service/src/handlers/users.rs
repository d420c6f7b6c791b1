/// User handlers - public profiles, per-user listings, and profile updates
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{AppError, FieldError, Result};
use crate::middleware::UserId;
use crate::models::PublicUser;
use crate::services::FeedService;
use crate::validators;

#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Get a user's public profile
pub async fn get_user(pool: web::Data<PgPool>, path: web::Path<String>) -> Result<HttpResponse> {
    let user_id = parse_user_id(&path)?;
    let row = user_repo::find_public_by_id(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(HttpResponse::Ok().json(PublicUser::from(row)))
}

/// List a user's posts, newest first
pub async fn get_user_posts(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = parse_user_id(&path)?;
    let page = query.page.max(1);
    let limit = query.limit.min(100).max(1);

    let service = FeedService::new((**pool).clone());
    let feed = service.user_posts(user_id, page, limit).await?;
    Ok(HttpResponse::Ok().json(feed))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    #[serde(rename = "profileImage")]
    pub profile_image: Option<String>,
    pub location: Option<String>,
}

/// Update the caller's profile; absent fields are left untouched
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let mut errors = Vec::new();

    if let Some(bio) = &req.bio {
        if !validators::validate_bio(bio) {
            errors.push(FieldError::new("bio", "must be at most 160 characters"));
        }
    }
    if let Some(image) = &req.profile_image {
        if !validators::validate_image_url(image) {
            errors.push(FieldError::new("profileImage", "must be a valid URL"));
        }
    }
    if let Some(location) = &req.location {
        if !validators::validate_location_name(location) {
            errors.push(FieldError::new(
                "location",
                "must be at most 100 characters",
            ));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let row = user_repo::update_profile(
        &pool,
        user_id.0,
        req.bio.as_deref(),
        req.profile_image.as_deref(),
        req.location.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(row)))
}

/// A malformed id is indistinguishable from an absent user.
fn parse_user_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("User"))
}
