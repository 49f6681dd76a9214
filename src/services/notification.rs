use crate::error::DispatchError;
use crate::models::{AttendanceKind, PushNotification};
use async_trait::async_trait;
use std::collections::BTreeMap;

pub const ATTENDANCE_TITLE: &str = "SGE - Notificación de Asistencia";
pub const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";

/// Delivers one push notification. Shared by both notification entry points.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the provider's message id on success.
    async fn send(&self, notification: &PushNotification) -> Result<String, DispatchError>;
}

pub fn attendance_body(full_name: &str, kind: AttendanceKind) -> String {
    match kind {
        AttendanceKind::Entry => format!("✅ {} ha INGRESADO al colegio.", full_name),
        AttendanceKind::Exit => format!("🏠 {} ha SALIDO del colegio.", full_name),
    }
}

/// Build the attendance push for a parent device. `raw_kind` is forwarded
/// untouched in the data payload; only the body text collapses it to entry/exit.
pub fn compose_attendance(
    token: &str,
    student_id: &str,
    full_name: &str,
    raw_kind: &str,
) -> PushNotification {
    let mut data = BTreeMap::new();
    data.insert("studentId".to_string(), student_id.to_string());
    data.insert("type".to_string(), raw_kind.to_string());
    data.insert("click_action".to_string(), CLICK_ACTION.to_string());

    PushNotification {
        token: token.to_string(),
        title: ATTENDANCE_TITLE.to_string(),
        body: attendance_body(full_name, AttendanceKind::from_raw(raw_kind)),
        data,
    }
}
