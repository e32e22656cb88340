/*
 * Responsibility
 * - /actors CRUD handlers
 * - Body rejection → 400, DTO validation → 422, unknown id → 404
 * - Permission checks already happened in the route guard
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
            actors::{
                ActorDeletedResponse, ActorListResponse, ActorPatchedResponse, CreateActorRequest,
                PatchActorRequest,
            },
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn list_actors(
    State(state): State<AppState>,
) -> Result<Json<ActorListResponse>, AppError> {
    let actors = state.actors.list().await?;

    Ok(Json(ActorListResponse {
        success: true,
        actors,
    }))
}

pub async fn create_actor(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<CreateActorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let actor = req.into_new_actor().map_err(AppError::unprocessable)?;

    let row = state.actors.create(actor).await?;
    tracing::info!(
        actor_id = row.id,
        sub = %ctx.subject,
        permission = ctx.granted,
        "actor created"
    );

    Ok((StatusCode::CREATED, Json(CreatedResponse::new(row.id))))
}

pub async fn patch_actor(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<PatchActorRequest>, JsonRejection>,
) -> Result<Json<ActorPatchedResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let id = req.id.ok_or_else(|| AppError::bad_request("id is required"))?;
    let changes = req.into_changes().map_err(AppError::unprocessable)?;

    let patched = state
        .actors
        .update(id, changes)
        .await?
        .ok_or(AppError::not_found("actor"))?;
    tracing::info!(
        actor_id = id,
        sub = %ctx.subject,
        permission = ctx.granted,
        "actor patched"
    );

    Ok(Json(ActorPatchedResponse {
        success: true,
        patched,
    }))
}

pub async fn delete_actor(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ActorDeletedResponse>, AppError> {
    let Path(id) = id.map_err(|e| AppError::bad_request(e.body_text()))?;

    let deleted = state
        .actors
        .delete(id)
        .await?
        .ok_or(AppError::not_found("actor"))?;
    tracing::info!(
        actor_id = id,
        sub = %ctx.subject,
        permission = ctx.granted,
        "actor deleted"
    );

    Ok(Json(ActorDeletedResponse {
        success: true,
        deleted,
    }))
}
