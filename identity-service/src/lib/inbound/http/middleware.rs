use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::Principal;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Request-scoped binding between a validated token's subject and the
/// resolved user's authorities. Stored in the request extensions for the
/// duration of one request.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
    pub email: String,
    pub authorities: Vec<String>,
}

const BEARER_PREFIX: &str = "Bearer ";

/// Bearer-token authenticator.
///
/// Establishes an identity when the request carries a valid token; every
/// non-establishing branch passes the request through unmodified and leaves
/// the accept/reject decision to a later stage. Token failures are logged
/// and never surfaced to the client from this layer.
pub async fn authenticate<R: UserRepository>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        // No header, or not the bearer scheme: continue anonymous
        return next.run(req).await;
    };

    let subject = match state.authenticator.extract_subject(&token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::debug!(error = %e, "Token rejected");
            return next.run(req).await;
        }
    };

    // Idempotent: a second authenticator run leaves an established identity
    // alone
    if req.extensions().get::<AuthenticatedIdentity>().is_some() {
        return next.run(req).await;
    }

    let user = match state.user_repository.find_by_email(&subject).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!(subject = %subject, "Token subject has no matching user");
            return next.run(req).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Credential store lookup failed during request authentication");
            return next.run(req).await;
        }
    };

    if state.authenticator.is_valid(&token, user.email.as_str()) {
        req.extensions_mut().insert(AuthenticatedIdentity {
            user_id: user.id,
            email: user.email.as_str().to_string(),
            authorities: user.authorities(),
        });
    }

    next.run(req).await
}

/// Authorization gate for protected routes.
///
/// Separate, later stage than the authenticator: rejects with 401 when no
/// identity was established for this request.
pub async fn require_authentication(req: Request, next: Next) -> Result<Response, ApiError> {
    if req.extensions().get::<AuthenticatedIdentity>().is_none() {
        return Err(ApiError::Unauthorized("Authentication required".to_string()));
    }

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<String> {
    let header = req.headers().get(http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    value.strip_prefix(BEARER_PREFIX).map(str::to_owned)
}
