use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use intake::UserId;
use std::sync::Arc;
use tracing::debug;

use crate::domains::auth::routes::AUTH_COOKIE;
use crate::domains::auth::JwtService;
use crate::error::ApiError;

/// Authenticated user information from the session cookie
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
}

/// Session-cookie authentication middleware
///
/// Reads the `authToken` cookie, verifies it, and adds AuthUser to request
/// extensions. If no cookie or an invalid token, the request continues
/// without AuthUser; protected handlers reject it via the extractor below.
pub async fn cookie_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());

    if let Some(user) = extract_auth_user(&jar, &jwt_service) {
        debug!(user_id = %user.user_id, "authenticated request");
        request.extensions_mut().insert(user);
    } else {
        debug!("no valid session cookie");
    }

    next.run(request).await
}

/// Extract and verify the session token from the cookie jar
fn extract_auth_user(jar: &CookieJar, jwt_service: &JwtService) -> Option<AuthUser> {
    let cookie = jar.get(AUTH_COOKIE)?;
    let claims = jwt_service.verify_token(cookie.value()).ok()?;

    Some(AuthUser {
        user_id: UserId::from_uuid(claims.user_id),
        email: claims.email,
    })
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            ApiError::Unauthorized("Unauthorized: No token provided".to_string())
        })
    }
}
