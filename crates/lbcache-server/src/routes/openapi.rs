//! OpenAPI documentation configuration.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::{health, users};
use crate::error::ErrorResponse;

/// OpenAPI documentation for the proxy.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LetterboxdPY Wrapper",
        description = "Simple API endpoints for Letterboxd user data via letterboxdpy",
        version = "0.1.0",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Local server"),
    ),
    paths(
        health::health,
        users::profile_handler,
        users::following_handler,
        users::followers_handler,
        users::films_handler,
    ),
    components(
        schemas(
            health::HealthResponse,
            users::ProfileResponse,
            users::FollowingResponse,
            users::FollowersResponse,
            users::FilmsResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Letterboxd user views"),
    )
)]
pub struct ApiDoc;

/// Path of the OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Create the Swagger UI router, serving the document at [`OPENAPI_PATH`].
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url(OPENAPI_PATH, ApiDoc::openapi())
}
