use crate::error::AppError;
use crate::models::{SuccessResponse, WebhookEvent};
use crate::routes::notification::dispatch;
use crate::services::attendance::{resolve_recipient, Recipient};
use crate::services::notification::compose_attendance;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Non-error endings of the attendance webhook. All answer 200.
#[derive(Debug, PartialEq)]
pub enum WebhookOutcome {
    Ignored,
    NoParent,
    NoToken,
    Sent,
}

impl IntoResponse for WebhookOutcome {
    fn into_response(self) -> Response {
        match self {
            WebhookOutcome::Ignored => (StatusCode::OK, "Ignored").into_response(),
            WebhookOutcome::NoParent => (StatusCode::OK, "No parent assigned").into_response(),
            WebhookOutcome::NoToken => (StatusCode::OK, "No FCM token").into_response(),
            WebhookOutcome::Sent => {
                (StatusCode::OK, Json(SuccessResponse { success: true })).into_response()
            }
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("record.{} is required", field)))
}

/// POST /webhook/attendance: Database webhook for new attendance rows.
///
/// Redeliveries are not deduplicated: the same event posted twice sends twice.
pub async fn attendance(
    State(state): State<AppState>,
    Json(event): Json<WebhookEvent>,
) -> Result<WebhookOutcome, AppError> {
    tracing::info!(
        event_type = %event.kind,
        table = %event.table,
        schema = event.schema.as_deref().unwrap_or("-"),
        "webhook received"
    );

    if !event.is_attendance_insert() {
        return Ok(WebhookOutcome::Ignored);
    }

    let record = event
        .attendance_record()
        .map_err(|e| AppError::BadRequest(format!("invalid attendance record: {}", e)))?;
    let student_id = required(record.student_id, "student_id")?;
    let kind = required(record.kind, "type")?;

    let (student, fcm_token) = match resolve_recipient(state.directory.as_ref(), &student_id).await {
        Recipient::StudentNotFound => return Err(AppError::NotFound("Student not found".into())),
        Recipient::NoParent => return Ok(WebhookOutcome::NoParent),
        Recipient::NoToken => return Ok(WebhookOutcome::NoToken),
        Recipient::Found { student, fcm_token } => (student, fcm_token),
    };

    let notification = compose_attendance(&fcm_token, &student_id, student.display_name(), &kind);
    tracing::info!(
        parent_id = student.parent_id.as_deref().unwrap_or_default(),
        %student_id,
        "sending attendance push"
    );
    dispatch(&state, &notification).await?;

    Ok(WebhookOutcome::Sent)
}
