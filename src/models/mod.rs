use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const ATTENDANCE_TABLE: &str = "attendance_records";
pub const INSERT_EVENT: &str = "INSERT";

// --- Inbound webhook ---

/// Database webhook body as posted by Supabase on a row change.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub table: String,
    #[serde(default)]
    pub schema: Option<String>,
    /// Null for DELETE events. Left untyped: other tables post other shapes.
    #[serde(default)]
    pub record: Option<serde_json::Value>,
}

impl WebhookEvent {
    pub fn is_attendance_insert(&self) -> bool {
        self.kind == INSERT_EVENT && self.table == ATTENDANCE_TABLE
    }

    /// Read `record` as an attendance row. A missing or null record reads as empty.
    pub fn attendance_record(&self) -> Result<AttendanceRecord, serde_json::Error> {
        match &self.record {
            Some(value) if !value.is_null() => AttendanceRecord::deserialize(value),
            _ => Ok(AttendanceRecord::default()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, deserialize_with = "optional_id")]
    pub student_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Row ids arrive as uuid strings or bigint numbers depending on the schema.
fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceKind {
    Entry,
    Exit,
}

impl AttendanceKind {
    /// Anything other than exactly `entry` reads as an exit.
    pub fn from_raw(raw: &str) -> Self {
        if raw == "entry" {
            AttendanceKind::Entry
        } else {
            AttendanceKind::Exit
        }
    }
}

// --- Alternate entry point ---

#[derive(Debug, Clone, Deserialize)]
pub struct DirectNotifyRequest {
    pub fcm_token: String,
    #[serde(deserialize_with = "required_id")]
    pub student_id: String,
    pub student_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_id(deserializer)?.ok_or_else(|| serde::de::Error::custom("student_id is null"))
}

// --- Directory rows ---

/// Used in the message body when a student row has no name.
pub const UNNAMED_STUDENT: &str = "Su estudiante";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub parent_id: Option<String>,
}

impl Student {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED_STUDENT)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parent {
    #[serde(default)]
    pub fcm_token: Option<String>,
}

// --- Outbound ---

#[derive(Debug, Clone, PartialEq)]
pub struct PushNotification {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
