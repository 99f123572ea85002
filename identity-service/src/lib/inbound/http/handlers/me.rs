use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedIdentity;

/// Return the identity established for this request.
///
/// Routed behind the authorization gate, so the extension is always present.
pub async fn current_user(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> ApiSuccess<CurrentUserData> {
    ApiSuccess::new(
        StatusCode::OK,
        CurrentUserData {
            email: identity.email,
            authorities: identity.authorities,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserData {
    pub email: String,
    pub authorities: Vec<String>,
}
