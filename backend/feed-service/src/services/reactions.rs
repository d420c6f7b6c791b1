/// Reaction engine: like/dislike toggles with mutual exclusion, bookmark
/// toggles, reply appends, and author-only deletion.
///
/// Every mutation runs in one transaction that locks the target post row
/// first, so concurrent toggles on a post serialize and a missing post is
/// rejected before any write.
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::reaction_repo::{self, ReactionSet};
use crate::db::{post_repo, reply_repo};
use crate::error::{AppError, Result};
use crate::metrics::REACTION_TOGGLES_TOTAL;
use crate::models::{BookmarkSnapshot, ReactionSnapshot, ReplyThread};

pub struct ReactionService {
    pool: PgPool,
}

impl ReactionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toggle the caller's like. Un-liking leaves dislikes alone; liking
    /// removes any standing dislike.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<ReactionSnapshot> {
        self.toggle_exclusive(post_id, user_id, ReactionSet::Likes, ReactionSet::Dislikes)
            .await
    }

    /// Toggle the caller's dislike; mirror image of [`toggle_like`].
    ///
    /// [`toggle_like`]: ReactionService::toggle_like
    pub async fn toggle_dislike(&self, post_id: Uuid, user_id: Uuid) -> Result<ReactionSnapshot> {
        self.toggle_exclusive(post_id, user_id, ReactionSet::Dislikes, ReactionSet::Likes)
            .await
    }

    /// Shared toggle: remove if present, otherwise add and clear the opposite
    /// set. The opposite set is only touched on the add path.
    async fn toggle_exclusive(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        target: ReactionSet,
        opposite: ReactionSet,
    ) -> Result<ReactionSnapshot> {
        let mut tx = self.pool.begin().await?;

        if !reaction_repo::lock_post(&mut tx, post_id).await? {
            return Err(AppError::NotFound("Post"));
        }

        let removed = reaction_repo::remove(&mut tx, target, post_id, user_id).await?;
        if removed == 0 {
            reaction_repo::add(&mut tx, target, post_id, user_id).await?;
            reaction_repo::remove(&mut tx, opposite, post_id, user_id).await?;
        }

        let likes = reaction_repo::members_of(&mut tx, ReactionSet::Likes, post_id).await?;
        let dislikes = reaction_repo::members_of(&mut tx, ReactionSet::Dislikes, post_id).await?;
        tx.commit().await?;

        let action = if removed == 0 { "added" } else { "removed" };
        REACTION_TOGGLES_TOTAL
            .with_label_values(&[target.label(), action])
            .inc();
        debug!(%post_id, %user_id, kind = target.label(), action, "reaction toggled");

        Ok(ReactionSnapshot { likes, dislikes })
    }

    /// Toggle the caller's bookmark. Independent of likes and dislikes.
    pub async fn toggle_bookmark(&self, post_id: Uuid, user_id: Uuid) -> Result<BookmarkSnapshot> {
        let mut tx = self.pool.begin().await?;

        if !reaction_repo::lock_post(&mut tx, post_id).await? {
            return Err(AppError::NotFound("Post"));
        }

        let removed = reaction_repo::remove(&mut tx, ReactionSet::Bookmarks, post_id, user_id).await?;
        if removed == 0 {
            reaction_repo::add(&mut tx, ReactionSet::Bookmarks, post_id, user_id).await?;
        }

        let bookmarks = reaction_repo::members_of(&mut tx, ReactionSet::Bookmarks, post_id).await?;
        tx.commit().await?;

        let action = if removed == 0 { "added" } else { "removed" };
        REACTION_TOGGLES_TOTAL
            .with_label_values(&["bookmark", action])
            .inc();
        debug!(%post_id, %user_id, action, "bookmark toggled");

        Ok(BookmarkSnapshot { bookmarks })
    }

    /// Remove the caller's bookmark if present. Idempotent.
    pub async fn remove_bookmark(&self, post_id: Uuid, user_id: Uuid) -> Result<BookmarkSnapshot> {
        let mut tx = self.pool.begin().await?;

        if !reaction_repo::lock_post(&mut tx, post_id).await? {
            return Err(AppError::NotFound("Post"));
        }

        let removed = reaction_repo::remove(&mut tx, ReactionSet::Bookmarks, post_id, user_id).await?;
        let bookmarks = reaction_repo::members_of(&mut tx, ReactionSet::Bookmarks, post_id).await?;
        tx.commit().await?;

        if removed > 0 {
            REACTION_TOGGLES_TOTAL
                .with_label_values(&["bookmark", "removed"])
                .inc();
        }

        Ok(BookmarkSnapshot { bookmarks })
    }

    /// Append a reply and return the post's thread, newest-first.
    pub async fn add_reply(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<ReplyThread> {
        let mut tx = self.pool.begin().await?;

        if !reaction_repo::lock_post(&mut tx, post_id).await? {
            return Err(AppError::NotFound("Post"));
        }

        let reply_id = reply_repo::insert(&mut tx, post_id, user_id, content)
            .await
            .map_err(super::map_user_fk)?;
        let thread = reply_repo::thread_of(&mut tx, post_id).await?;
        tx.commit().await?;

        debug!(%post_id, %user_id, %reply_id, "reply added");
        Ok(ReplyThread {
            replies: thread.into_iter().map(Into::into).collect(),
        })
    }

    /// Hard-delete a post. Only the author may delete; replies and reaction
    /// rows go with it.
    pub async fn delete_post(&self, post_id: Uuid, caller_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let owner = post_repo::owner_for_update(&mut tx, post_id)
            .await?
            .ok_or(AppError::NotFound("Post"))?;
        if owner != caller_id {
            return Err(AppError::NotAuthorized);
        }

        post_repo::delete(&mut tx, post_id).await?;
        tx.commit().await?;

        info!(%post_id, %caller_id, "post deleted");
        Ok(())
    }
}
