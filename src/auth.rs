//! Long-lived credential handling and bearer token refresh.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tokio::sync::Mutex;
use url::form_urlencoded;

use crate::error::{PhotosError, Result};

/// Keys a credential string must carry to be accepted.
pub const REQUIRED_CREDENTIAL_KEYS: [&str; 7] = [
    "androidId",
    "app",
    "client_sig",
    "Email",
    "Token",
    "lang",
    "service",
];

/// Keys forwarded to the token exchange when present. `callerPkg` is not
/// listed because it is always sent, forced to the photos package.
const OPTIONAL_EXCHANGE_KEYS: [&str; 5] = [
    "callerSig",
    "device_country",
    "google_play_services_version",
    "oauth2_foreground",
    "sdk_version",
];

const PHOTOS_PACKAGE: &str = "com.google.android.apps.photos";
const AUTH_USER_AGENT: &str = "GoogleAuth/1.4 (Pixel XL PQ2A.190205.001); gzip";

/// Parsed long-lived credential material (URL-encoded key/value pairs).
#[derive(Debug, Clone)]
pub struct Credentials {
    raw: String,
    values: HashMap<String, String>,
}

impl Credentials {
    /// Parses and validates a credential string. Missing required keys
    /// fail with a `Config` error naming every absent field.
    pub fn parse(auth_data: &str) -> Result<Self> {
        let raw = auth_data.trim().to_string();
        if raw.is_empty() {
            return Err(PhotosError::Config("credential string is empty".into()));
        }

        let mut values = HashMap::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            values.insert(key.into_owned(), value.into_owned());
        }

        let missing: Vec<&str> = REQUIRED_CREDENTIAL_KEYS
            .iter()
            .copied()
            .filter(|key| values.get(*key).map_or(true, |v| v.is_empty()))
            .collect();
        if !missing.is_empty() {
            return Err(PhotosError::Config(format!(
                "credential string missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { raw, values })
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn email(&self) -> &str {
        self.get("Email")
    }

    pub fn language(&self) -> &str {
        self.get("lang")
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// URL-encoded body for the token exchange: required keys, the fixed
    /// package identity, and whichever optional keys are present.
    fn exchange_body(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = vec![
            ("androidId", self.get("androidId")),
            ("app", PHOTOS_PACKAGE),
            ("client_sig", self.get("client_sig")),
            ("callerPkg", PHOTOS_PACKAGE),
            ("Email", self.get("Email")),
            ("lang", self.get("lang")),
            ("service", self.get("service")),
            ("Token", self.get("Token")),
        ];
        for key in OPTIONAL_EXCHANGE_KEYS {
            let value = self.get(key);
            if !value.is_empty() {
                pairs.push((key, value));
            }
        }
        pairs.sort();

        let mut body = form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            body.append_pair(key, value);
        }
        body.finish()
    }
}

/// Storage seam for the bearer token. Implementations must serialise
/// `get` and `set` themselves; the auth manager adds its own lock around
/// the whole get-or-refresh sequence.
pub trait TokenCache: Send + Sync {
    fn get(&self) -> (String, i64);
    fn set(&self, token: &str, expiry: i64);
}

/// In-memory token cache.
#[derive(Default)]
pub struct MemoryTokenCache {
    inner: RwLock<(String, i64)>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenCache for MemoryTokenCache {
    fn get(&self) -> (String, i64) {
        self.inner.read().clone()
    }

    fn set(&self, token: &str, expiry: i64) {
        *self.inner.write() = (token.to_string(), expiry);
    }
}

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Owns the credential material and keeps a valid bearer token on hand.
pub(crate) struct AuthManager {
    credentials: Credentials,
    cache: Arc<dyn TokenCache>,
    http: reqwest::Client,
    auth_url: String,
    // Covers the whole read-check-refresh-write sequence so concurrent
    // callers during an expired-token window share one exchange.
    refresh_lock: Mutex<()>,
}

impl AuthManager {
    pub(crate) fn new(
        credentials: Credentials,
        cache: Arc<dyn TokenCache>,
        http: reqwest::Client,
        auth_url: String,
    ) -> Self {
        Self {
            credentials,
            cache,
            http,
            auth_url,
            refresh_lock: Mutex::new(()),
        }
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns a valid bearer token, refreshing through the exchange
    /// endpoint when the cached one is missing or expired.
    pub(crate) async fn get_token(&self) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        let (token, expiry) = self.cache.get();
        if !token.is_empty() && expiry > now_epoch() {
            return Ok(token);
        }

        let (token, expiry) = self.refresh_access_token().await?;
        self.cache.set(&token, expiry);
        Ok(token)
    }

    async fn refresh_access_token(&self) -> Result<(String, i64)> {
        let response = self
            .http
            .post(&self.auth_url)
            .header("Accept-Encoding", "gzip")
            .header("app", PHOTOS_PACKAGE)
            .header("Connection", "Keep-Alive")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("device", self.credentials.get("androidId"))
            .header("User-Agent", AUTH_USER_AGENT)
            .body(self.credentials.exchange_body())
            .send()
            .await?;

        let status = response.status();
        let encoding = response
            .headers()
            .get(reqwest::header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let raw = response.bytes().await?;
        let body = crate::client::decode_body(&encoding, &raw).unwrap_or_else(|_| raw.to_vec());

        if !status.is_success() {
            return Err(PhotosError::Auth(format!(
                "token exchange failed with status {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body)
            )));
        }

        // Reply is key=value lines.
        let mut fields = HashMap::new();
        for line in String::from_utf8_lossy(&body).lines() {
            if let Some((key, value)) = line.trim().split_once('=') {
                fields.insert(key.to_string(), value.to_string());
            }
        }

        let token = fields.get("Auth").cloned().unwrap_or_default();
        let expiry_raw = fields.get("Expiry").cloned().unwrap_or_default();
        if token.is_empty() || expiry_raw.is_empty() {
            return Err(PhotosError::Auth(
                "exchange reply missing Auth or Expiry".into(),
            ));
        }

        let expiry: i64 = expiry_raw
            .parse()
            .map_err(|_| PhotosError::Auth(format!("unparseable expiry '{expiry_raw}'")))?;

        Ok((token, expiry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CREDS: &str = "androidId=3abc&app=com.google.android.apps.photos&client_sig=38918a453d07199354f8b19af05ec6562ced5788&Email=user%40gmail.com&Token=aas_et%2Fxyz&lang=en&service=oauth2%3Ahttps%3A%2F%2Fwww.googleapis.com%2Fauth%2Fphotos";

    #[test]
    fn parse_accepts_complete_credentials() {
        let creds = Credentials::parse(FULL_CREDS).unwrap();
        assert_eq!(creds.email(), "user@gmail.com");
        assert_eq!(creds.language(), "en");
        assert_eq!(creds.get("androidId"), "3abc");
    }

    #[test]
    fn parse_lists_every_missing_field() {
        let err = Credentials::parse("androidId=3abc&lang=en").unwrap_err();
        match err {
            PhotosError::Config(msg) => {
                for key in ["app", "client_sig", "Email", "Token", "service"] {
                    assert!(msg.contains(key), "missing {key} in: {msg}");
                }
                assert!(!msg.contains("androidId"));
                assert!(!msg.contains("lang"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(matches!(
            Credentials::parse("   "),
            Err(PhotosError::Config(_))
        ));
    }

    #[test]
    fn exchange_body_forces_package_identity() {
        let creds = Credentials::parse(FULL_CREDS).unwrap();
        let body = creds.exchange_body();
        assert!(body.contains("app=com.google.android.apps.photos"));
        assert!(body.contains("callerPkg=com.google.android.apps.photos"));
        assert!(body.contains("Email=user%40gmail.com"));
        // Optional keys absent from the credential stay out of the body.
        assert!(!body.contains("device_country"));
    }

    #[test]
    fn memory_cache_round_trip() {
        let cache = MemoryTokenCache::new();
        assert_eq!(cache.get(), (String::new(), 0));
        cache.set("ya29.token", 9_999_999_999);
        assert_eq!(cache.get(), ("ya29.token".to_string(), 9_999_999_999));
    }
}
