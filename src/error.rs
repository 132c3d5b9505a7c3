use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotosError {
    /// Malformed or incomplete credential string.
    #[error("invalid credentials: {0}")]
    Config(String),

    /// Token exchange failed or returned an unusable reply.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Socket, TLS or request construction failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered outside the 2xx range; `message` carries the
    /// decoded response body verbatim.
    #[error("request failed with status {status}: {message}")]
    Api { message: String, status: u16 },

    /// Wire-level encode/decode failure, or a field the protocol
    /// guarantees was absent from a success response.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The three-phase upload broke down (missing reservation header,
    /// commit reply without a media key).
    #[error("upload failed: {0}")]
    Upload(String),

    /// Hash lookup came back empty for a key the caller asserted exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller's cancellation signal fired.
    #[error("operation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument at the API boundary.
    #[error("invalid input: {0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, PhotosError>;

impl From<prost::DecodeError> for PhotosError {
    fn from(err: prost::DecodeError) -> Self {
        PhotosError::Protocol(err.to_string())
    }
}
