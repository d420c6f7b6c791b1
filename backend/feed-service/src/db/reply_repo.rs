use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::ReplyWithAuthor;

const REPLY_COLUMNS: &str = r#"
    r.id, r.post_id, r.user_id, r.content, r.created_at,
    u.username AS author_username, u.profile_image AS author_profile_image
"#;

/// Append a reply with a fresh id and server timestamp.
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    user_id: Uuid,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO post_replies (post_id, user_id, content)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(content)
    .fetch_one(&mut **tx)
    .await
}

/// Full reply thread for one post, newest-first, authors resolved. Runs in
/// the transaction so a fresh reply is part of the returned thread.
pub async fn thread_of(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<Vec<ReplyWithAuthor>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {REPLY_COLUMNS}
        FROM post_replies r
        JOIN users u ON u.id = r.user_id
        WHERE r.post_id = $1
        ORDER BY r.created_at DESC
        "#
    );
    sqlx::query_as::<_, ReplyWithAuthor>(&sql)
        .bind(post_id)
        .fetch_all(&mut **tx)
        .await
}

/// Reply threads for a batch of posts, newest-first within each post.
pub async fn replies_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<ReplyWithAuthor>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {REPLY_COLUMNS}
        FROM post_replies r
        JOIN users u ON u.id = r.user_id
        WHERE r.post_id = ANY($1)
        ORDER BY r.created_at DESC
        "#
    );
    sqlx::query_as::<_, ReplyWithAuthor>(&sql)
        .bind(post_ids)
        .fetch_all(pool)
        .await
}
