//! Core API client: device identity, request engine, response handling.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use flate2::read::GzDecoder;
use parking_lot::RwLock;
use prost::Message;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_ENCODING};
use reqwest::Method;

use crate::auth::{AuthManager, Credentials, MemoryTokenCache, TokenCache};
use crate::error::{PhotosError, Result};
use crate::types::Quality;

const ANDROID_AUTH_URL: &str = "https://android.googleapis.com/auth";
const DATA_BASE_URL: &str = "https://photosdata-pa.googleapis.com";
const UPLOAD_BASE_URL: &str = "https://photos.googleapis.com";

const ANDROID_API_VERSION: i64 = 28;
const DEFAULT_MODEL: &str = "Pixel XL";
const DEVICE_MAKE: &str = "Google";
const CLIENT_VERSION_CODE: i64 = 49029607;

/// Configuration for [`PhotosClient`].
///
/// The base URLs default to the production endpoints; override them to
/// point the client at a test server.
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Long-lived credential string (URL-encoded key/value pairs).
    pub auth_data: String,
    /// Proxy URL applied to every request.
    pub proxy: Option<String>,
    /// Default upload quality; individual batches can override.
    pub quality: Quality,
    /// If true, uploads count against the storage quota by default.
    pub use_quota: bool,
    /// Token store; defaults to an in-memory cache.
    pub token_cache: Option<Arc<dyn TokenCache>>,
    pub auth_url: Option<String>,
    pub data_base_url: Option<String>,
    pub upload_base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(auth_data: impl Into<String>) -> Self {
        Self {
            auth_data: auth_data.into(),
            ..Self::default()
        }
    }
}

/// Composable per-request options for [`PhotosClient::do_request`].
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    method: Option<Method>,
    auth: bool,
    common_headers: bool,
    check_status: bool,
    headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the HTTP method (default POST).
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Injects `Authorization: Bearer <token>` via the auth manager.
    pub fn auth(mut self) -> Self {
        self.auth = true;
        self
    }

    /// Includes the service-identifying header set.
    pub fn common_headers(mut self) -> Self {
        self.common_headers = true;
        self
    }

    /// Fails the request when the status is outside 2xx, surfacing the
    /// decoded body as the error detail.
    pub fn check_status(mut self) -> Self {
        self.check_status = true;
        self
    }

    /// Adds a custom header; custom headers are merged last and override
    /// the defaults on collision.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Inflates a response body when the reply declares gzip encoding.
pub(crate) fn decode_body(content_encoding: &str, body: &[u8]) -> Result<Vec<u8>> {
    if content_encoding.eq_ignore_ascii_case("gzip") {
        let mut decoded = Vec::new();
        GzDecoder::new(body)
            .read_to_end(&mut decoded)
            .map_err(|e| PhotosError::Protocol(format!("gzip decode failed: {e}")))?;
        Ok(decoded)
    } else {
        Ok(body.to_vec())
    }
}

/// Google Photos mobile API client.
///
/// All state hangs off the client instance: the HTTP connection pool,
/// the auth manager and its token cache, the declared device identity,
/// and the per-client upload batch lock. Wrap it in an [`Arc`] to share
/// it with the upload pipeline.
pub struct PhotosClient {
    pub(crate) http: reqwest::Client,
    pub(crate) auth: AuthManager,
    language: String,
    model: RwLock<String>,
    pub(crate) quality: Quality,
    pub(crate) use_quota: bool,
    data_base_url: String,
    upload_base_url: String,
    pub(crate) upload_lock: tokio::sync::Mutex<()>,
}

impl PhotosClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let credentials = Credentials::parse(&config.auth_data)?;
        let language = credentials.language().to_string();

        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(30));
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        let http = builder.build()?;

        let cache = config
            .token_cache
            .unwrap_or_else(|| Arc::new(MemoryTokenCache::new()));
        let auth_url = config
            .auth_url
            .unwrap_or_else(|| ANDROID_AUTH_URL.to_string());
        let auth = AuthManager::new(credentials, cache, http.clone(), auth_url);

        Ok(Self {
            http,
            auth,
            language,
            model: RwLock::new(DEFAULT_MODEL.to_string()),
            quality: config.quality,
            use_quota: config.use_quota,
            data_base_url: config
                .data_base_url
                .unwrap_or_else(|| DATA_BASE_URL.to_string()),
            upload_base_url: config
                .upload_base_url
                .unwrap_or_else(|| UPLOAD_BASE_URL.to_string()),
            upload_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Returns a valid bearer token, refreshing it if necessary.
    pub async fn get_token(&self) -> Result<String> {
        self.auth.get_token().await
    }

    pub fn credentials(&self) -> &Credentials {
        self.auth.credentials()
    }

    /// Updates the declared device model (the server keys storage
    /// behaviour off it).
    pub fn set_device_model(&self, model: &str) {
        *self.model.write() = model.to_string();
    }

    pub fn device_model(&self) -> String {
        self.model.read().clone()
    }

    /// Declared device identity: (model, make, android api version).
    pub fn device_info(&self) -> (String, &'static str, i64) {
        (self.device_model(), DEVICE_MAKE, ANDROID_API_VERSION)
    }

    pub fn client_version_code(&self) -> i64 {
        CLIENT_VERSION_CODE
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn user_agent(&self) -> String {
        format!(
            "com.google.android.apps.photos/{} (Linux; U; Android 9; {}; {}; Build/PQ2A.190205.001; Cronet/127.0.6510.5) (gzip)",
            CLIENT_VERSION_CODE,
            self.language,
            self.device_model(),
        )
    }

    pub(crate) fn data_url(&self, path: &str) -> String {
        format!("{}{}", self.data_base_url, path)
    }

    pub(crate) fn upload_url(&self, path: &str) -> String {
        format!("{}{}", self.upload_base_url, path)
    }

    /// Standard headers for data-plane requests. The two `x-goog-ext`
    /// values are required verbatim by the server.
    fn common_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Accept-Encoding", "gzip".to_string()),
            ("Accept-Language", self.language.clone()),
            ("Content-Type", "application/x-protobuf".to_string()),
            ("User-Agent", self.user_agent()),
            ("x-goog-ext-173412678-bin", "CgcIAhClARgC".to_string()),
            ("x-goog-ext-174067345-bin", "CgIIAg==".to_string()),
        ]
    }

    async fn build_headers(&self, opts: &RequestOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let insert = |headers: &mut HeaderMap, name: &str, value: &str| -> Result<()> {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| PhotosError::Input(format!("invalid header name: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| PhotosError::Input(format!("invalid header value: {e}")))?;
            headers.insert(name, value);
            Ok(())
        };

        if opts.common_headers {
            for (name, value) in self.common_headers() {
                insert(&mut headers, name, &value)?;
            }
        }
        if opts.auth {
            let token = self.auth.get_token().await?;
            insert(&mut headers, "Authorization", &format!("Bearer {token}"))?;
            insert(&mut headers, "User-Agent", &self.user_agent())?;
        }
        // Custom headers override defaults on collision.
        for (name, value) in &opts.headers {
            insert(&mut headers, name, value)?;
        }

        Ok(headers)
    }

    async fn execute(
        &self,
        url: &str,
        body: reqwest::Body,
        opts: &RequestOptions,
    ) -> Result<reqwest::Response> {
        let method = opts.method.clone().unwrap_or(Method::POST);
        let headers = self.build_headers(opts).await?;

        let response = self
            .http
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        if opts.check_status && !response.status().is_success() {
            let status = response.status().as_u16();
            let encoding = content_encoding(response.headers());
            let raw = response.bytes().await.unwrap_or_default();
            let message = decode_body(&encoding, &raw)
                .map(|b| String::from_utf8_lossy(&b).into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&raw).into_owned());
            return Err(PhotosError::Api { message, status });
        }

        Ok(response)
    }

    /// Executes a request and returns the (decompressed) body bytes
    /// together with the reply headers.
    pub async fn do_request(
        &self,
        url: &str,
        body: impl Into<reqwest::Body>,
        opts: RequestOptions,
    ) -> Result<(Vec<u8>, HeaderMap)> {
        let response = self.execute(url, body.into(), &opts).await?;
        let headers = response.headers().clone();
        let encoding = content_encoding(&headers);
        let bytes = response.bytes().await?;
        Ok((decode_body(&encoding, &bytes)?, headers))
    }

    /// Streaming variant: returns the open response with its body
    /// untouched (and undecompressed). Dropping the response closes it.
    pub async fn do_request_stream(
        &self,
        url: &str,
        body: impl Into<reqwest::Body>,
        opts: RequestOptions,
    ) -> Result<reqwest::Response> {
        self.execute(url, body.into(), &opts).await
    }

    /// Marshals a request message, posts it, and unmarshals the reply.
    pub async fn do_proto_request<Req, Resp>(
        &self,
        url: &str,
        request: &Req,
        opts: RequestOptions,
    ) -> Result<Resp>
    where
        Req: Message,
        Resp: Message + Default,
    {
        let (body, _) = self.do_request(url, request.encode_to_vec(), opts).await?;
        Ok(Resp::decode(body.as_slice())?)
    }

    /// Marshals a request message and posts it, ignoring the reply body.
    pub async fn do_proto_send<Req: Message>(
        &self,
        url: &str,
        request: &Req,
        opts: RequestOptions,
    ) -> Result<()> {
        self.do_request(url, request.encode_to_vec(), opts).await?;
        Ok(())
    }
}

fn content_encoding(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
