/*
 * Responsibility
 * - /movies CRUD handlers, same error mapping as /actors
 */
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            CreatedResponse,
            movies::{
                CreateMovieRequest, MovieDeletedResponse, MovieListResponse, MoviePatchedResponse,
                PatchMovieRequest,
            },
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn list_movies(
    State(state): State<AppState>,
) -> Result<Json<MovieListResponse>, AppError> {
    let movies = state.movies.list().await?;

    Ok(Json(MovieListResponse {
        success: true,
        movies,
    }))
}

pub async fn create_movie(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let movie = req.into_new_movie().map_err(AppError::unprocessable)?;

    let row = state.movies.create(movie).await?;
    tracing::info!(
        movie_id = row.id,
        sub = %ctx.subject,
        permission = ctx.granted,
        "movie created"
    );

    Ok((StatusCode::CREATED, Json(CreatedResponse::new(row.id))))
}

pub async fn patch_movie(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<PatchMovieRequest>, JsonRejection>,
) -> Result<Json<MoviePatchedResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let id = req.id.ok_or_else(|| AppError::bad_request("id is required"))?;
    let changes = req.into_changes().map_err(AppError::unprocessable)?;

    let movie = state
        .movies
        .update(id, changes)
        .await?
        .ok_or(AppError::not_found("movie"))?;
    tracing::info!(
        movie_id = id,
        sub = %ctx.subject,
        permission = ctx.granted,
        "movie patched"
    );

    Ok(Json(MoviePatchedResponse {
        success: true,
        movie,
    }))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MovieDeletedResponse>, AppError> {
    let Path(id) = id.map_err(|e| AppError::bad_request(e.body_text()))?;

    let deleted = state
        .movies
        .delete(id)
        .await?
        .ok_or(AppError::not_found("movie"))?;
    tracing::info!(
        movie_id = id,
        sub = %ctx.subject,
        permission = ctx.granted,
        "movie deleted"
    );

    Ok(Json(MovieDeletedResponse {
        success: true,
        deleted,
    }))
}
