use crate::db::Directory;
use crate::models::Student;

/// Where the student → parent → token chain stopped.
#[derive(Debug, PartialEq)]
pub enum Recipient {
    StudentNotFound,
    NoParent,
    NoToken,
    Found { student: Student, fcm_token: String },
}

/// Resolve the parent device for a student. Lookup errors are logged and
/// treated the same as a missing row.
pub async fn resolve_recipient(directory: &dyn Directory, student_id: &str) -> Recipient {
    let student = match directory.find_student(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            tracing::warn!(student_id, "student not found");
            return Recipient::StudentNotFound;
        }
        Err(e) => {
            tracing::error!(student_id, error = %e, "student lookup failed");
            return Recipient::StudentNotFound;
        }
    };

    let Some(parent_id) = student.parent_id.clone() else {
        tracing::info!(student_id, "student has no parent assigned");
        return Recipient::NoParent;
    };

    let parent = match directory.find_parent(&parent_id).await {
        Ok(parent) => parent,
        Err(e) => {
            tracing::error!(%parent_id, error = %e, "parent lookup failed");
            None
        }
    };

    match parent.and_then(|p| p.fcm_token).filter(|t| !t.is_empty()) {
        Some(fcm_token) => Recipient::Found { student, fcm_token },
        None => {
            tracing::info!(%parent_id, "parent has no FCM token");
            Recipient::NoToken
        }
    }
}
