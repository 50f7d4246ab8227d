//! API routes.

pub mod health;
pub mod openapi;
pub mod users;

pub use health::{HealthResponse, health_routes};
pub use openapi::{ApiDoc, swagger_ui};
pub use users::{
    FilmsResponse, FollowersResponse, FollowingResponse, ProfileResponse, films_handler,
    followers_handler, following_handler, profile_handler, user_routes,
};
