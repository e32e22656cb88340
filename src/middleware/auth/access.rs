//! Per-route permission guard: bearer token → `TokenAuthorizer` → `AuthCtx` in extensions.
//!
//! Every protected route declares the one permission it needs:
//! ```ignore
//! .route("/actors", access::guard(get(list_actors), &state, "read:actor"))
//! ```
//! Failures short-circuit with the status `AuthFailure::status()` picks
//! (401 authentication, 403 scope, 503 key fetch).

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::AuthFailure;
use crate::state::AppState;

#[derive(Clone)]
struct Guard {
    state: AppState,
    permission: &'static str,
}

/// Wrap `route` so every request must carry a token granting `permission`.
pub fn guard(
    route: MethodRouter<AppState>,
    state: &AppState,
    permission: &'static str,
) -> MethodRouter<AppState> {
    let guard = Guard {
        state: state.clone(),
        permission,
    };
    // from_fn_with_state: the middleware gets its own state (app state + permission)
    route.route_layer(middleware::from_fn_with_state(guard, access_middleware))
}

async fn access_middleware(
    State(guard): State<Guard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthFailure::MalformedHeader)?;

    let claims = match guard
        .state
        .auth
        .authorize(header_value, guard.permission)
        .await
    {
        Ok(claims) => claims,
        Err(err) => {
            match &err {
                AuthFailure::KeyFetch(_) => {
                    tracing::error!(error = %err, permission = guard.permission, "authorization unavailable")
                }
                AuthFailure::InsufficientScope { .. } => {
                    tracing::info!(error = %err, "permission denied")
                }
                _ => tracing::warn!(
                    error = %err,
                    permission = guard.permission,
                    "access token verification failed"
                ),
            }
            return Err(err.into());
        }
    };

    tracing::debug!(
        sub = %claims.subject(),
        permission = guard.permission,
        "request authorized"
    );

    req.extensions_mut()
        .insert(AuthCtx::new(&claims, guard.permission));

    Ok(next.run(req).await)
}
