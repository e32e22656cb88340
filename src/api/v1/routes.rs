/*
 * Responsibility
 * - v1 URL layout
 * - Each method on a path carries its own permission through access::guard
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::v1::handlers::{
    actors::{create_actor, delete_actor, list_actors, patch_actor},
    health::health,
    movies::{create_movie, delete_movie, list_movies, patch_movie},
};
use crate::middleware::auth::guard;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/actors",
            guard(get(list_actors), state, "read:actor")
                .merge(guard(post(create_actor), state, "add:actor"))
                .merge(guard(patch(patch_actor), state, "modify:actor")),
        )
        .route(
            "/actors/{id}",
            guard(delete(delete_actor), state, "delete:actor"),
        )
        .route(
            "/movies",
            guard(get(list_movies), state, "read:movie")
                .merge(guard(post(create_movie), state, "add:movie"))
                .merge(guard(patch(patch_movie), state, "modify:movie")),
        )
        .route(
            "/movies/{id}",
            guard(delete(delete_movie), state, "delete:movie"),
        )
}
