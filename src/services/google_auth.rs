use crate::error::DispatchError;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the provider's stated expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.into()
}

/// Padding optional, stray trailing bits tolerated.
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Decode the base64 service-account document kept in configuration.
pub fn decode_service_account(blob: &str) -> Result<ServiceAccountKey, DispatchError> {
    let compact: String = blob.chars().filter(|c| !c.is_whitespace()).collect();
    let engine = if compact.contains(['-', '_']) {
        &LENIENT_URL_SAFE
    } else {
        &LENIENT_STANDARD
    };
    let bytes = engine
        .decode(compact.as_bytes())
        .map_err(|e| DispatchError::InvalidCredentials(format!("not valid base64: {}", e)))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| DispatchError::InvalidCredentials(format!("not valid UTF-8: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| DispatchError::InvalidCredentials(format!("not a service account: {}", e)))
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Exchanges the configured service account for short-lived messaging tokens.
pub struct TokenProvider {
    client: reqwest::Client,
    credentials_base64: Option<String>,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(client: reqwest::Client, credentials_base64: Option<String>) -> Self {
        Self {
            client,
            credentials_base64,
            cache: Mutex::new(None),
        }
    }

    pub async fn access_token(&self) -> Result<String, DispatchError> {
        // Held across the exchange so concurrent misses share one request.
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Utc::now() {
                return Ok(cached.access_token.clone());
            }
        }

        let blob = self
            .credentials_base64
            .as_deref()
            .ok_or(DispatchError::MissingCredentials)?;
        let key = decode_service_account(blob)?;
        let fresh = self.exchange(&key).await?;
        let token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(token)
    }

    async fn exchange(&self, key: &ServiceAccountKey) -> Result<CachedToken, DispatchError> {
        let assertion = sign_assertion(key, Utc::now())?;

        let resp = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DispatchError::Auth(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| DispatchError::Auth(format!("unreadable token response: {}", e)))?;

        let lifetime = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        tracing::debug!(client_email = %key.client_email, lifetime, "obtained messaging access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(lifetime - EXPIRY_MARGIN_SECS),
        })
    }
}

fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, DispatchError> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| DispatchError::InvalidCredentials(format!("bad private_key: {}", e)))?;

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let iat = now.timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: MESSAGING_SCOPE,
        aud: &key.token_uri,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    jsonwebtoken::encode(&header, &claims, &encoding_key)
        .map_err(|e| DispatchError::InvalidCredentials(format!("cannot sign assertion: {}", e)))
}
