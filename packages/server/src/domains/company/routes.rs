//! Company-details endpoints.
//!
//! The POST path is the canonical user-scoped create-or-update flow; the
//! PUT-by-id path is kept for older clients and resolves to the same flow
//! after an ownership check.

use axum::extract::{Extension, Multipart, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use intake::{ConstitutionOption, DocumentSlot, RecordId, Submission, UploadedDocument};

use crate::error::ApiError;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// `POST /api/company-details`: create or update the caller's record.
pub async fn create_company_details(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    tracing::info!(user_id = %user.user_id, "received company details submission");
    let submission = parse_submission(multipart).await?;
    submit_and_respond(&state, user, submission).await
}

/// `GET /api/company-details`: the caller's populated record.
pub async fn get_company_details(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let data = state.pipeline.fetch_populated(user.user_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "data": data,
    })))
}

/// `PUT /api/company-details/:id`: legacy record-id path.
pub async fn update_company_details(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let record_id =
        RecordId::parse(&id).map_err(|_| ApiError::Validation("invalid record id".into()))?;

    let record = state
        .record_store
        .find_by_id(record_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Company details not found".into()))?;

    if record.user_id != user.user_id {
        return Err(ApiError::Forbidden(
            "record does not belong to the caller".into(),
        ));
    }

    let submission = parse_submission(multipart).await?;
    submit_and_respond(&state, user, submission).await
}

async fn submit_and_respond(
    state: &AppState,
    user: AuthUser,
    submission: Submission,
) -> Result<Response, ApiError> {
    let outcome = state.pipeline.submit(user.user_id, submission).await?;
    let data = state.pipeline.populate(&outcome.record).await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Company details created successfully")
    } else {
        (StatusCode::OK, "Company details updated successfully")
    };

    let body = Json(serde_json::json!({
        "success": true,
        "message": message,
        "data": data,
    }));
    Ok((status, body).into_response())
}

/// Parse a multipart body into a [`Submission`].
///
/// Recognized parts: the `option` text field and one file per document
/// slot. Unknown fields are ignored with a warning, matching the lenient
/// behavior browsers rely on when forms grow extra inputs.
async fn parse_submission(mut multipart: Multipart) -> Result<Submission, ApiError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "option" {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(format!("unreadable option field: {e}")))?;
            if value.trim().is_empty() {
                continue;
            }
            let option = ConstitutionOption::parse(&value).ok_or_else(|| {
                ApiError::Validation(format!("invalid constitution option: {value}"))
            })?;
            submission.option = Some(option);
        } else if let Some(slot) = DocumentSlot::from_wire_name(&name) {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| "unknown".to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("unreadable file for {name}: {e}")))?;
            // Browsers submit empty parts for file inputs left blank
            if bytes.is_empty() {
                continue;
            }
            submission.documents.push(UploadedDocument {
                slot,
                file_name,
                bytes: bytes.to_vec(),
            });
        } else {
            tracing::warn!(field = %name, "ignoring unknown multipart field");
        }
    }

    Ok(submission)
}
