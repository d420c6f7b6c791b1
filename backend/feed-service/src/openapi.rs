/// OpenAPI documentation for the Porch Feed Service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Porch Feed Service API",
        version = "1.0.0",
        description = "Neighborhood feed service: filtered, paginated, geo-aware post listings plus per-post interactions (likes, dislikes, bookmarks, replies). Listing and single-post reads are public; mutations require a bearer token from the identity service.",
        contact(
            name = "Porch Team",
            email = "team@porchapp.dev"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
        (url = "https://feed-api.porchapp.dev", description = "Production server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "posts", description = "Feed listings, post creation and deletion, reactions, replies"),
        (name = "users", description = "Public profiles and profile updates"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("JWT Bearer token from the identity service"))
                    .build(),
            ),
        )
    }
}
