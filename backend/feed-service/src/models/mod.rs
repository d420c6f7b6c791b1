use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of post categories. The wire format is snake_case
/// (`recommend_place`), matching the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    RecommendPlace,
    AskHelp,
    LocalUpdate,
    EventAnnouncement,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::RecommendPlace => "recommend_place",
            PostType::AskHelp => "ask_help",
            PostType::LocalUpdate => "local_update",
            PostType::EventAnnouncement => "event_announcement",
        }
    }
}

impl FromStr for PostType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommend_place" => Ok(PostType::RecommendPlace),
            "ask_help" => Ok(PostType::AskHelp),
            "local_update" => Ok(PostType::LocalUpdate),
            "event_announcement" => Ok(PostType::EventAnnouncement),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing scope, built once at the HTTP boundary. The engine only ever sees
/// one of these variants, never raw query strings.
#[derive(Debug, Clone, PartialEq)]
pub enum PostFilter {
    All,
    ByType(PostType),
    ByAuthor(Uuid),
    Near {
        longitude: f64,
        latitude: f64,
        max_distance_meters: f64,
    },
    BookmarkedBy(Uuid),
}

impl PostFilter {
    /// Label used for metrics and logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PostFilter::All => "all",
            PostFilter::ByType(_) => "by_type",
            PostFilter::ByAuthor(_) => "by_author",
            PostFilter::Near { .. } => "near",
            PostFilter::BookmarkedBy(_) => "bookmarked_by",
        }
    }
}

/// Post row joined with its author, as read from the store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub post_type: String,
    pub image: Option<String>,
    pub location_name: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
    pub author_profile_image: Option<String>,
}

/// Reply row joined with its author.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReplyWithAuthor {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
    pub author_profile_image: Option<String>,
}

/// Reaction membership row; ordering comes from the query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReactionMember {
    pub post_id: Uuid,
    pub user_id: Uuid,
}

/// Public profile row. Email and password hash are never selected.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PublicUserRow {
    pub id: Uuid,
    pub username: String,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new post, produced by the handler layer.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub post_type: PostType,
    pub image: Option<String>,
    pub location_name: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

/// The only shape in which other users appear inside post payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub profile_image: Option<String>,
}

/// GeoJSON-style point, `coordinates` as `[longitude, latitude]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: Uuid,
    pub user: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReplyWithAuthor> for ReplyResponse {
    fn from(row: ReplyWithAuthor) -> Self {
        Self {
            id: row.id,
            user: UserSummary {
                id: row.user_id,
                username: row.author_username,
                profile_image: row.author_profile_image,
            },
            content: row.content,
            created_at: row.created_at,
        }
    }
}

/// Full post payload: author projection, reaction id arrays ordered
/// most-recent-first, replies newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub user: UserSummary,
    pub content: String,
    pub post_type: PostType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
    pub bookmarks: Vec<Uuid>,
    pub replies: Vec<ReplyResponse>,
    pub created_at: DateTime<Utc>,
}

/// Listing envelope. `total` counts every post matching the filter, not just
/// the returned page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub posts: Vec<PostResponse>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total: i64,
}

/// Updated like/dislike membership after a toggle, most-recent-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionSnapshot {
    pub likes: Vec<Uuid>,
    pub dislikes: Vec<Uuid>,
}

/// Updated bookmark membership after a toggle or removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkSnapshot {
    pub bookmarks: Vec<Uuid>,
}

/// Reply thread after an append, newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyThread {
    pub replies: Vec<ReplyResponse>,
}

/// Public profile payload; email and password never leave the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PublicUserRow> for PublicUser {
    fn from(row: PublicUserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            bio: row.bio,
            profile_image: row.profile_image,
            location: row.location,
            created_at: row.created_at,
        }
    }
}
