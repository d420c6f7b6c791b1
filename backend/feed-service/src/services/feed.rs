/// Feed query engine: filtered listings, single-post reads, post creation.
///
/// Listings resolve in three steps: count everything the filter matches, fetch
/// one page of rows, then hydrate the page (reaction sets and reply threads in
/// batch). The count and page queries share their predicate in the repo layer.
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::db::reaction_repo::{self, ReactionSet};
use crate::db::{post_repo, reply_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{
    FeedPage, GeoPoint, NewPost, PostFilter, PostResponse, PostWithAuthor, ReplyResponse,
    UserSummary,
};

pub struct FeedService {
    pool: PgPool,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of the feed for a filter. `page` is 1-based.
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        page: i64,
        page_size: i64,
    ) -> Result<FeedPage> {
        let offset = (page - 1) * page_size;
        let total = post_repo::count(&self.pool, filter).await?;
        let rows = post_repo::list(&self.pool, filter, page_size, offset).await?;

        debug!(
            filter = filter.kind(),
            page,
            page_size,
            total,
            returned = rows.len(),
            "feed page resolved"
        );

        let posts = self.hydrate(rows).await?;
        Ok(FeedPage {
            posts,
            total_pages: total_pages(total, page_size),
            current_page: page,
            total,
        })
    }

    /// Full payload for a single post.
    pub async fn get_post(&self, post_id: Uuid) -> Result<PostResponse> {
        let row = post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or(AppError::NotFound("Post"))?;

        let mut posts = self.hydrate(vec![row]).await?;
        posts.pop().ok_or(AppError::NotFound("Post"))
    }

    /// Persist a validated draft and return the full payload (empty reaction
    /// sets, no replies).
    pub async fn create_post(&self, author_id: Uuid, draft: NewPost) -> Result<PostResponse> {
        let post_id = post_repo::insert(&self.pool, author_id, &draft)
            .await
            .map_err(super::map_user_fk)?;

        debug!(%post_id, %author_id, post_type = %draft.post_type, "post created");
        self.get_post(post_id).await
    }

    /// Listing scoped to one author; the author must exist.
    pub async fn user_posts(&self, user_id: Uuid, page: i64, page_size: i64) -> Result<FeedPage> {
        if !user_repo::exists(&self.pool, user_id).await? {
            return Err(AppError::NotFound("User"));
        }
        self.list_posts(&PostFilter::ByAuthor(user_id), page, page_size)
            .await
    }

    /// Attach reaction id arrays and reply threads to a page of rows. Batch
    /// queries keyed by post id; per-post ordering comes from the repo layer.
    async fn hydrate(&self, rows: Vec<PostWithAuthor>) -> Result<Vec<PostResponse>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let likes = reaction_repo::members_for_posts(&self.pool, ReactionSet::Likes, &ids).await?;
        let dislikes =
            reaction_repo::members_for_posts(&self.pool, ReactionSet::Dislikes, &ids).await?;
        let bookmarks =
            reaction_repo::members_for_posts(&self.pool, ReactionSet::Bookmarks, &ids).await?;
        let replies = reply_repo::replies_for_posts(&self.pool, &ids).await?;

        let mut likes_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for member in likes {
            likes_by_post.entry(member.post_id).or_default().push(member.user_id);
        }
        let mut dislikes_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for member in dislikes {
            dislikes_by_post.entry(member.post_id).or_default().push(member.user_id);
        }
        let mut bookmarks_by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for member in bookmarks {
            bookmarks_by_post.entry(member.post_id).or_default().push(member.user_id);
        }
        let mut replies_by_post: HashMap<Uuid, Vec<ReplyResponse>> = HashMap::new();
        for reply in replies {
            replies_by_post
                .entry(reply.post_id)
                .or_default()
                .push(reply.into());
        }

        rows.into_iter()
            .map(|row| {
                let post_type = row.post_type.parse().map_err(|_| {
                    AppError::Internal(format!("unknown post type in store: {}", row.post_type))
                })?;
                let location = match (row.longitude, row.latitude) {
                    (Some(lng), Some(lat)) => Some(GeoPoint::new(lng, lat)),
                    _ => None,
                };

                Ok(PostResponse {
                    id: row.id,
                    user: UserSummary {
                        id: row.user_id,
                        username: row.author_username,
                        profile_image: row.author_profile_image,
                    },
                    content: row.content,
                    post_type,
                    image: row.image,
                    location_name: row.location_name,
                    location,
                    likes: likes_by_post.remove(&row.id).unwrap_or_default(),
                    dislikes: dislikes_by_post.remove(&row.id).unwrap_or_default(),
                    bookmarks: bookmarks_by_post.remove(&row.id).unwrap_or_default(),
                    replies: replies_by_post.remove(&row.id).unwrap_or_default(),
                    created_at: row.created_at,
                })
            })
            .collect()
    }
}

/// Ceiling division; zero matching posts means zero pages.
fn total_pages(total: i64, page_size: i64) -> i64 {
    (total + page_size - 1) / page_size
}
