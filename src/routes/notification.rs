use crate::error::{AppError, DispatchError};
use crate::models::{DirectNotifyRequest, PushNotification, SuccessResponse};
use crate::services::notification::compose_attendance;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

/// Hand one notification to the configured notifier.
pub async fn dispatch(state: &AppState, notification: &PushNotification) -> Result<(), AppError> {
    match state.notifier.send(notification).await {
        Ok(message_id) => {
            tracing::info!(%message_id, "notification sent");
            Ok(())
        }
        Err(e) => {
            match &e {
                DispatchError::Rejected { status, .. } => {
                    tracing::error!(provider_status = status, error = %e, "provider rejected notification")
                }
                _ => tracing::error!(error = %e, "notification dispatch failed"),
            }
            Err(AppError::from(e).redact(state.config.expose_error_details))
        }
    }
}

/// POST /notify/attendance: The caller already knows the parent's device token.
pub async fn attendance(
    State(state): State<AppState>,
    Json(req): Json<DirectNotifyRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    if req.fcm_token.trim().is_empty() {
        return Err(AppError::BadRequest("fcm_token is required".into()));
    }
    if req.student_id.is_empty() {
        return Err(AppError::BadRequest("student_id is required".into()));
    }

    let notification = compose_attendance(&req.fcm_token, &req.student_id, &req.student_name, &req.kind);
    tracing::info!(student_id = %req.student_id, kind = %req.kind, "direct attendance notification");
    dispatch(&state, &notification).await?;

    Ok(Json(SuccessResponse { success: true }))
}
