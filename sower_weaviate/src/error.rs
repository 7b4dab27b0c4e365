use reqwest::StatusCode;
use snafu::Snafu;

/// Errors returned by the Weaviate client.
///
/// The split between [`ClientError::Server`] and [`ClientError::Rejected`]
/// drives retry classification: server-side and connection failures are
/// plausibly transient, rejections are not.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, ...).
    #[snafu(display("request error"))]
    Request { source: reqwest::Error },
    /// The server answered with a 5xx status.
    #[snafu(display("server error: status={status}, message={message}"))]
    Server { status: StatusCode, message: String },
    /// The server rejected the request with a 4xx status.
    #[snafu(display("request rejected: status={status}, message={message}"))]
    Rejected { status: StatusCode, message: String },
    /// The response body could not be decoded.
    #[snafu(display("failed to decode response body"))]
    Decode { source: reqwest::Error },
    /// The readiness probe gave up.
    #[snafu(display("server not ready after {attempts} attempts"))]
    NotReady { attempts: u32 },
}

impl ClientError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Request { .. } | ClientError::Server { .. })
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
