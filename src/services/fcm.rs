use super::google_auth::TokenProvider;
use super::notification::Notifier;
use crate::error::DispatchError;
use crate::models::PushNotification;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ANDROID_CHANNEL_ID: &str = "high_importance_channel";

#[derive(Serialize)]
struct SendRequest<'a> {
    message: Message<'a>,
}

#[derive(Serialize)]
struct Message<'a> {
    token: &'a str,
    notification: Notification<'a>,
    data: &'a BTreeMap<String, String>,
    android: AndroidConfig,
}

#[derive(Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct AndroidConfig {
    priority: &'static str,
    notification: AndroidNotification,
}

#[derive(Serialize)]
struct AndroidNotification {
    sound: &'static str,
    channel_id: &'static str,
}

#[derive(Deserialize)]
struct SendResponse {
    #[serde(default)]
    name: String,
}

fn send_request(notification: &PushNotification) -> SendRequest<'_> {
    SendRequest {
        message: Message {
            token: &notification.token,
            notification: Notification {
                title: &notification.title,
                body: &notification.body,
            },
            data: &notification.data,
            android: AndroidConfig {
                priority: "high",
                notification: AndroidNotification {
                    sound: "default",
                    channel_id: ANDROID_CHANNEL_ID,
                },
            },
        },
    }
}

/// FCM HTTP v1 sender for a single Firebase project.
pub struct FcmClient {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    tokens: TokenProvider,
}

impl FcmClient {
    pub fn new(client: reqwest::Client, base_url: &str, project_id: &str, tokens: TokenProvider) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            tokens,
        }
    }

    fn send_url(&self) -> String {
        format!("{}/v1/projects/{}/messages:send", self.base_url, self.project_id)
    }
}

#[async_trait]
impl Notifier for FcmClient {
    async fn send(&self, notification: &PushNotification) -> Result<String, DispatchError> {
        let access_token = self.tokens.access_token().await?;

        let resp = self
            .client
            .post(self.send_url())
            .bearer_auth(access_token)
            .json(&send_request(notification))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = serde_json::from_str(&body).unwrap_or(SendResponse { name: String::new() });
        tracing::info!(message = %sent.name, "FCM accepted notification");
        Ok(sent.name)
    }
}
