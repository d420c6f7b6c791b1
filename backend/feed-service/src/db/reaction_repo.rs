use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::ReactionMember;

/// The three per-post membership tables share one shape; this selects which
/// one a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionSet {
    Likes,
    Dislikes,
    Bookmarks,
}

impl ReactionSet {
    fn table(self) -> &'static str {
        match self {
            ReactionSet::Likes => "post_likes",
            ReactionSet::Dislikes => "post_dislikes",
            ReactionSet::Bookmarks => "post_bookmarks",
        }
    }

    /// Label used for metrics and logging.
    pub fn label(self) -> &'static str {
        match self {
            ReactionSet::Likes => "like",
            ReactionSet::Dislikes => "dislike",
            ReactionSet::Bookmarks => "bookmark",
        }
    }
}

/// Lock the post row for the rest of the transaction. Returns false when the
/// post does not exist.
pub async fn lock_post(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query_scalar::<_, i32>("SELECT 1 FROM posts WHERE id = $1 FOR UPDATE")
        .bind(post_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.is_some())
}

/// Add a user to a reaction set. Re-adding an existing member is a no-op.
pub async fn add(
    tx: &mut Transaction<'_, Postgres>,
    set: ReactionSet,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let sql = format!(
        "INSERT INTO {} (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        set.table()
    );
    let result = sqlx::query(&sql)
        .bind(post_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

/// Remove a user from a reaction set. Returns the number of rows removed.
pub async fn remove(
    tx: &mut Transaction<'_, Postgres>,
    set: ReactionSet,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let sql = format!(
        "DELETE FROM {} WHERE post_id = $1 AND user_id = $2",
        set.table()
    );
    let result = sqlx::query(&sql)
        .bind(post_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

/// Current membership of one post's reaction set, most-recent-first. Runs in
/// the transaction so a toggle observes its own writes.
pub async fn members_of(
    tx: &mut Transaction<'_, Postgres>,
    set: ReactionSet,
    post_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let sql = format!(
        "SELECT user_id FROM {} WHERE post_id = $1 ORDER BY created_at DESC",
        set.table()
    );
    sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(post_id)
        .fetch_all(&mut **tx)
        .await
}

/// Membership rows for a batch of posts, most-recent-first within each post.
pub async fn members_for_posts(
    pool: &PgPool,
    set: ReactionSet,
    post_ids: &[Uuid],
) -> Result<Vec<ReactionMember>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT post_id, user_id
        FROM {}
        WHERE post_id = ANY($1)
        ORDER BY created_at DESC
        "#,
        set.table()
    );
    sqlx::query_as::<_, ReactionMember>(&sql)
        .bind(post_ids)
        .fetch_all(pool)
        .await
}
