/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - auth: TokenAuthorizer, actors/movies: catalog repos
 * - Cloned per request, so everything inside is behind Arc
 */
use std::sync::Arc;

use crate::repos::{ActorRepo, MovieRepo};
use crate::services::auth::TokenAuthorizer;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<TokenAuthorizer>,
    pub actors: Arc<dyn ActorRepo>,
    pub movies: Arc<dyn MovieRepo>,
}

impl AppState {
    pub fn new(
        auth: Arc<TokenAuthorizer>,
        actors: Arc<dyn ActorRepo>,
        movies: Arc<dyn MovieRepo>,
    ) -> Self {
        Self {
            auth,
            actors,
            movies,
        }
    }
}
