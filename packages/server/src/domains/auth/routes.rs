//! Auth endpoints: signup, login, logout, and session check.
//!
//! Sessions are a JWT carried in the `authToken` HTTP-only cookie; logout
//! clears the cookie (the token itself is stateless and simply expires).

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::domains::auth::users::UserStoreError;
use crate::error::ApiError;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

pub const AUTH_COOKIE: &str = "authToken";

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("hash task failed: {e}")))?
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("verify task failed: {e}")))?
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password verification failed: {e}")))
}

fn auth_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub async fn signup(
    Extension(state): Extension<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let email = credentials.email.trim().to_ascii_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation("a valid email is required".into()));
    }
    if credentials.password.len() < 8 {
        return Err(ApiError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }

    let password_hash = hash_password(credentials.password).await?;
    let user = state
        .users
        .create(&email, &password_hash)
        .await
        .map_err(|e| match e {
            UserStoreError::DuplicateEmail => ApiError::Conflict("email already registered".into()),
            UserStoreError::Storage(e) => ApiError::Internal(e),
        })?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "User registered successfully",
        })),
    ))
}

pub async fn login(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let email = credentials.email.trim().to_ascii_lowercase();
    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;

    // One generic message for unknown email and wrong password
    let invalid = || ApiError::Unauthorized("Invalid email or password".into());
    let user = user.ok_or_else(invalid)?;

    if !verify_password(credentials.password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = state
        .jwt
        .create_token(user.id, user.email.clone())
        .map_err(ApiError::Internal)?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok((
        jar.add(auth_cookie(token)),
        Json(serde_json::json!({
            "success": true,
            "user": {
                "userId": user.id,
                "email": user.email,
            },
        })),
    ))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let removal = Cookie::build((AUTH_COOKIE, "")).path("/").build();
    (
        jar.remove(removal),
        Json(serde_json::json!({
            "success": true,
            "message": "User logged out successfully",
        })),
    )
}

pub async fn check(user: AuthUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "user": {
            "userId": user.user_id,
            "email": user.email,
        },
    }))
}
