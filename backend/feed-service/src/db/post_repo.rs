use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::{NewPost, PostFilter, PostWithAuthor};

const POST_COLUMNS: &str = r#"
    p.id, p.user_id, p.content, p.post_type, p.image, p.location_name,
    p.longitude, p.latitude, p.created_at,
    u.username AS author_username, u.profile_image AS author_profile_image
"#;

/// Great-circle distance in meters from the bound point ($1 = lng, $2 = lat)
/// to a post's coordinates, spherical law of cosines on a 6371 km sphere.
const DISTANCE_EXPR: &str = r#"
    6371000.0 * acos(LEAST(1.0, GREATEST(-1.0,
        cos(radians($2)) * cos(radians(p.latitude))
            * cos(radians(p.longitude) - radians($1))
        + sin(radians($2)) * sin(radians(p.latitude))
    )))
"#;

/// Fetch one page of posts for a filter. Ordering is newest-first, except
/// `Near` which orders by distance ascending with recency as the tie-break.
pub async fn list(
    pool: &PgPool,
    filter: &PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    match filter {
        PostFilter::All => {
            let sql = format!(
                r#"
                SELECT {POST_COLUMNS}
                FROM posts p
                JOIN users u ON u.id = p.user_id
                ORDER BY p.created_at DESC
                LIMIT $1 OFFSET $2
                "#
            );
            sqlx::query_as::<_, PostWithAuthor>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
        PostFilter::ByType(post_type) => {
            let sql = format!(
                r#"
                SELECT {POST_COLUMNS}
                FROM posts p
                JOIN users u ON u.id = p.user_id
                WHERE p.post_type = $1
                ORDER BY p.created_at DESC
                LIMIT $2 OFFSET $3
                "#
            );
            sqlx::query_as::<_, PostWithAuthor>(&sql)
                .bind(post_type.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
        PostFilter::ByAuthor(author_id) => {
            let sql = format!(
                r#"
                SELECT {POST_COLUMNS}
                FROM posts p
                JOIN users u ON u.id = p.user_id
                WHERE p.user_id = $1
                ORDER BY p.created_at DESC
                LIMIT $2 OFFSET $3
                "#
            );
            sqlx::query_as::<_, PostWithAuthor>(&sql)
                .bind(author_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
        PostFilter::Near {
            longitude,
            latitude,
            max_distance_meters,
        } => {
            let sql = format!(
                r#"
                SELECT id, user_id, content, post_type, image, location_name,
                       longitude, latitude, created_at,
                       author_username, author_profile_image
                FROM (
                    SELECT {POST_COLUMNS}, {DISTANCE_EXPR} AS distance_m
                    FROM posts p
                    JOIN users u ON u.id = p.user_id
                    WHERE p.longitude IS NOT NULL AND p.latitude IS NOT NULL
                ) nearby
                WHERE distance_m <= $3
                ORDER BY distance_m ASC, created_at DESC
                LIMIT $4 OFFSET $5
                "#
            );
            sqlx::query_as::<_, PostWithAuthor>(&sql)
                .bind(longitude)
                .bind(latitude)
                .bind(max_distance_meters)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
        PostFilter::BookmarkedBy(user_id) => {
            let sql = format!(
                r#"
                SELECT {POST_COLUMNS}
                FROM posts p
                JOIN users u ON u.id = p.user_id
                JOIN post_bookmarks b ON b.post_id = p.id
                WHERE b.user_id = $1
                ORDER BY p.created_at DESC
                LIMIT $2 OFFSET $3
                "#
            );
            sqlx::query_as::<_, PostWithAuthor>(&sql)
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
    }
}

/// Count every post matching a filter. Must stay predicate-for-predicate in
/// sync with [`list`].
pub async fn count(pool: &PgPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
    match filter {
        PostFilter::All => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
                .fetch_one(pool)
                .await
        }
        PostFilter::ByType(post_type) => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE post_type = $1")
                .bind(post_type.as_str())
                .fetch_one(pool)
                .await
        }
        PostFilter::ByAuthor(author_id) => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE user_id = $1")
                .bind(author_id)
                .fetch_one(pool)
                .await
        }
        PostFilter::Near {
            longitude,
            latitude,
            max_distance_meters,
        } => {
            let sql = format!(
                r#"
                SELECT COUNT(*)
                FROM posts p
                WHERE p.longitude IS NOT NULL AND p.latitude IS NOT NULL
                  AND {DISTANCE_EXPR} <= $3
                "#
            );
            sqlx::query_scalar::<_, i64>(&sql)
                .bind(longitude)
                .bind(latitude)
                .bind(max_distance_meters)
                .fetch_one(pool)
                .await
        }
        PostFilter::BookmarkedBy(user_id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM post_bookmarks WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_one(pool)
            .await
        }
    }
}

/// Fetch a single post with its author.
pub async fn find_by_id(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostWithAuthor>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.user_id
        WHERE p.id = $1
        "#
    );
    sqlx::query_as::<_, PostWithAuthor>(&sql)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// Insert a new post and return its id.
pub async fn insert(pool: &PgPool, author_id: Uuid, post: &NewPost) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO posts (user_id, content, post_type, image, location_name, longitude, latitude)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(&post.content)
    .bind(post.post_type.as_str())
    .bind(&post.image)
    .bind(&post.location_name)
    .bind(post.longitude)
    .bind(post.latitude)
    .fetch_one(pool)
    .await
}

/// Read a post's owner while locking the row for the rest of the transaction.
pub async fn owner_for_update(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM posts WHERE id = $1 FOR UPDATE")
        .bind(post_id)
        .fetch_optional(&mut **tx)
        .await
}

/// Hard-delete a post; replies and reaction rows cascade at the schema level.
pub async fn delete(tx: &mut Transaction<'_, Postgres>, post_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}
