/// Errors from the image host layer.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host answered with a non-2xx status or refused the operation.
    #[error("Image host error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The host answered 2xx but the body was not what we expected.
    #[error("Unexpected image host response: {0}")]
    Decode(String),
}
