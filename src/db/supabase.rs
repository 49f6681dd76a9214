use super::Directory;
use crate::models::{Parent, Student};
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Reads `students` and `users` through the Supabase PostgREST endpoint.
pub struct SupabaseDirectory {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseDirectory {
    pub fn new(client: reqwest::Client, base_url: &str, service_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    /// `select <columns> from <table> where id = <id>`, expecting at most one row.
    async fn single<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        id: &str,
    ) -> Result<Option<T>> {
        if self.base_url.is_empty() {
            anyhow::bail!("Supabase URL is not configured");
        }

        let resp = self
            .client
            .get(format!("{}/rest/v1/{}", self.base_url, table))
            .query(&[
                ("select", columns.to_string()),
                ("id", format!("eq.{}", id)),
                ("limit", "2".to_string()),
            ])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Supabase query on {} failed {}: {}", table, status, body);
        }

        let mut rows: Vec<T> = resp.json().await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => anyhow::bail!("expected a single {} row for id {}, got {}", table, id, n),
        }
    }
}

#[async_trait]
impl Directory for SupabaseDirectory {
    async fn find_student(&self, student_id: &str) -> Result<Option<Student>> {
        self.single("students", "full_name,parent_id", student_id).await
    }

    async fn find_parent(&self, parent_id: &str) -> Result<Option<Parent>> {
        self.single("users", "fcm_token", parent_id).await
    }
}
