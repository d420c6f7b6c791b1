use sqlx::PgPool;
use uuid::Uuid;

use crate::models::PublicUserRow;

const PUBLIC_COLUMNS: &str = "id, username, bio, profile_image, location, created_at";

/// Fetch a user's public profile. Email and password hash are never selected.
pub async fn find_public_by_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<PublicUserRow>, sqlx::Error> {
    let sql = format!("SELECT {PUBLIC_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, PublicUserRow>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn exists(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query_scalar::<_, i32>("SELECT 1 FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Partial profile update; absent fields keep their stored value.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    bio: Option<&str>,
    profile_image: Option<&str>,
    location: Option<&str>,
) -> Result<Option<PublicUserRow>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE users
        SET bio = COALESCE($2, bio),
            profile_image = COALESCE($3, profile_image),
            location = COALESCE($4, location)
        WHERE id = $1
        RETURNING {PUBLIC_COLUMNS}
        "#
    );
    sqlx::query_as::<_, PublicUserRow>(&sql)
        .bind(user_id)
        .bind(bio)
        .bind(profile_image)
        .bind(location)
        .fetch_optional(pool)
        .await
}
