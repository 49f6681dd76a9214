use anyhow::{Context, Result};

pub const DEFAULT_PROJECT_ID: &str = "asistencia-inicial";
pub const DEFAULT_FCM_BASE_URL: &str = "https://fcm.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub firebase_project_id: String,
    /// Base64 service-account document. Checked lazily, per dispatch.
    pub firebase_credentials_base64: Option<String>,
    pub fcm_base_url: String,
    pub http_timeout_secs: u64,
    pub expose_error_details: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Config {
            port: var("PORT")
                .unwrap_or_else(|| "3000".into())
                .parse()
                .context("PORT must be a number")?,
            supabase_url: var("SUPABASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            supabase_service_key: var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),
            firebase_project_id: var("FIREBASE_PROJECT_ID")
                .unwrap_or_else(|| DEFAULT_PROJECT_ID.into()),
            firebase_credentials_base64: var("FIREBASE_CREDENTIALS_BASE64"),
            fcm_base_url: var("FCM_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_FCM_BASE_URL.into()),
            http_timeout_secs: var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".into())
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a number of seconds")?,
            expose_error_details: match var("EXPOSE_ERROR_DETAILS") {
                Some(v) => parse_flag(&v).context("EXPOSE_ERROR_DETAILS must be true or false")?,
                None => true,
            },
        };

        if config.supabase_url.is_empty() || config.supabase_service_key.is_empty() {
            // Keep serving: health and wake-up routes stay useful without a database.
            tracing::error!("Missing env vars: SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY");
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value {:?}", other),
    }
}
