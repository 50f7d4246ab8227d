//! User view endpoints.
//!
//! Each handler maps the path username to a cache key for its view and
//! asks the freshness cache for it, fetching from the backend on a miss.

use std::future::Future;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use lbcache_backend::{Film, Profile, View};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, Result, ServerError};
use crate::state::AppState;

/// A user's profile attributes. The set of fields is not fixed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ProfileResponse(pub Profile);

/// Usernames the user follows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FollowingResponse {
    pub following: Vec<String>,
}

/// Usernames following the user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FollowersResponse {
    pub followers: Vec<String>,
}

/// Films the user has watched, as `[title, slug]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FilmsResponse {
    #[schema(value_type = Vec<Vec<String>>)]
    pub films: Vec<Film>,
}

/// Serve `view` for `username` through the cache.
async fn cached<T, F, Fut>(state: &AppState, view: View, username: &str, fetch: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = lbcache_backend::Result<T>>,
{
    let key = state.cache.key(view.as_str(), username);
    state
        .cache
        .get_or_refresh(&key, state.cache.refresh_window(), fetch)
        .await
        .map_err(|e| ServerError::unavailable(view, e))
}

/// Get a user's profile.
#[utoipa::path(
    get,
    path = "/user/{username}",
    params(("username" = String, Path, description = "Letterboxd username")),
    responses(
        (status = 200, description = "Profile attributes", body = ProfileResponse),
        (status = 404, description = "Profile could not be fetched", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn profile_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let profile = cached(&state, View::Profile, &username, || {
        state.backend.profile(&username)
    })
    .await?;

    Ok(Json(ProfileResponse(profile)))
}

/// Get the users a user follows.
#[utoipa::path(
    get,
    path = "/user/{username}/following",
    params(("username" = String, Path, description = "Letterboxd username")),
    responses(
        (status = 200, description = "Followed usernames", body = FollowingResponse),
        (status = 404, description = "Following list could not be fetched", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn following_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<FollowingResponse>> {
    let following = cached(&state, View::Following, &username, || {
        state.backend.following(&username)
    })
    .await?;

    Ok(Json(FollowingResponse { following }))
}

/// Get a user's followers.
#[utoipa::path(
    get,
    path = "/user/{username}/followers",
    params(("username" = String, Path, description = "Letterboxd username")),
    responses(
        (status = 200, description = "Follower usernames", body = FollowersResponse),
        (status = 404, description = "Followers could not be fetched", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn followers_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<FollowersResponse>> {
    let followers = cached(&state, View::Followers, &username, || {
        state.backend.followers(&username)
    })
    .await?;

    Ok(Json(FollowersResponse { followers }))
}

/// Get the films a user has watched.
#[utoipa::path(
    get,
    path = "/user/{username}/films",
    params(("username" = String, Path, description = "Letterboxd username")),
    responses(
        (status = 200, description = "Watched films", body = FilmsResponse),
        (status = 404, description = "Watched films could not be fetched", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn films_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<FilmsResponse>> {
    let films = cached(&state, View::WatchedFilms, &username, || {
        state.backend.watched_films(&username)
    })
    .await?;

    Ok(Json(FilmsResponse { films }))
}

/// Create the user view routes.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/{username}", get(profile_handler))
        .route("/user/{username}/following", get(following_handler))
        .route("/user/{username}/followers", get(followers_handler))
        .route("/user/{username}/films", get(films_handler))
}
