pub mod feed;
pub mod reactions;

pub use feed::FeedService;
pub use reactions::ReactionService;

use crate::error::AppError;

/// A foreign-key miss on `user_id` means the caller references a user this
/// service has never seen; surfaced as a user lookup failure.
pub(crate) fn map_user_fk(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = err {
        if db.constraint().map_or(false, |c| c.contains("user_id")) {
            return AppError::NotFound("User");
        }
    }
    AppError::Database(err)
}
