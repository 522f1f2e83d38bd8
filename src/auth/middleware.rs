//! Request authentication pipeline
//!
//! `authenticate` runs on every API request: it resolves a bearer token,
//! validates it as an access token and, on success, attaches the
//! request-scoped [`AuthUser`] identity. It never fails the request itself;
//! any credential defect (missing, malformed, expired, tampered, wrong
//! category) leaves the request unauthenticated and indistinguishable from
//! the others. `require_auth` is the separate authorization layer that
//! rejects unauthenticated access to protected routes.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    accounts::AccountRole,
    auth::jwt::{Claims, JwtManager},
    error::ApiError,
};

/// State handed to the authentication middleware; read-only after startup
#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtManager,
}

/// Request-scoped authenticated identity, derived from a validated access
/// token and discarded when the request completes.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: AccountRole,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}

/// Resolve the token from an `Authorization: Bearer <token>` header.
/// Any other scheme reads as "no credential".
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Authentication middleware: establish the identity if a valid access token
/// is presented, then continue regardless of the outcome.
pub async fn authenticate(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers()).map(ToOwned::to_owned);

    if let Some(token) = token {
        match auth.jwt.validate_access_token(&token) {
            Ok(claims) => {
                let user = AuthUser::from(claims);
                tracing::debug!(account_id = %user.id, "authenticate: identity established");
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                // Swallowed on purpose: the caller sees the same
                // unauthenticated outcome for every credential defect.
                tracing::debug!(error = %e, "authenticate: rejected bearer token");
            }
        }
    }

    next.run(req).await
}

/// Authorization layer for protected routes: reject requests that carry no
/// authenticated identity.
pub async fn require_auth(req: Request, next: Next) -> Result<Response, ApiError> {
    if req.extensions().get::<AuthUser>().is_none() {
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(req).await)
}
