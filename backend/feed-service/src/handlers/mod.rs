/// HTTP handlers for the feed service
///
/// This module contains handlers for:
/// - Posts: feed listings, creation, deletion, reactions, replies
/// - Users: public profiles, per-author listings, profile updates
pub mod posts;
pub mod users;

use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::auth::TokenVerifier;
use crate::middleware::{AuthMiddleware, MetricsMiddleware};

/// The `/api/v1` route tree. Kept as a factory so the binary and the
/// integration tests mount the exact same tree.
pub fn api_scope(verifier: TokenVerifier) -> impl HttpServiceFactory {
    web::scope("/api/v1")
        .wrap(AuthMiddleware::new(verifier))
        .wrap(MetricsMiddleware)
        .service(
            web::scope("/posts")
                .service(
                    web::resource("")
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post)),
                )
                .service(
                    web::resource("/{post_id}")
                        .route(web::get().to(posts::get_post))
                        .route(web::delete().to(posts::delete_post)),
                )
                .service(web::resource("/{post_id}/like").route(web::put().to(posts::toggle_like)))
                .service(
                    web::resource("/{post_id}/dislike")
                        .route(web::put().to(posts::toggle_dislike)),
                )
                .service(
                    web::resource("/{post_id}/bookmark")
                        .route(web::put().to(posts::toggle_bookmark))
                        .route(web::delete().to(posts::remove_bookmark)),
                )
                .service(
                    web::resource("/{post_id}/reply").route(web::post().to(posts::add_reply)),
                ),
        )
        .service(
            web::scope("/users")
                .service(
                    web::resource("/profile").route(web::put().to(users::update_profile)),
                )
                .service(web::resource("/{user_id}").route(web::get().to(users::get_user)))
                .service(
                    web::resource("/{user_id}/posts")
                        .route(web::get().to(users::get_user_posts)),
                ),
        )
}
