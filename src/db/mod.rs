pub mod supabase;

use crate::models::{Parent, Student};
use anyhow::Result;
use async_trait::async_trait;

/// Point lookups against the school database. `Ok(None)` means no such row.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn find_student(&self, student_id: &str) -> Result<Option<Student>>;

    async fn find_parent(&self, parent_id: &str) -> Result<Option<Parent>>;
}
