use std::time::Duration;

use crate::coap::Code;

/// All error types that can occur when talking to a gateway.
///
/// Every variant is terminal for the operation that produced it; nothing in
/// this crate retries on its own.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A datagram channel operation failed (dial, send, receive, framing).
    #[error("transport {action} error: {err}")]
    Transport { action: String, err: std::io::Error },

    /// The gateway did not answer within the operation timeout.
    #[error("{action} timed out after {after:?}")]
    Timeout { action: String, after: Duration },

    /// The gateway address could not be parsed.
    #[error("invalid gateway address {address:?}: {reason}")]
    InvalidGateway { address: String, reason: String },

    /// The dialer cannot open a session for the requested scheme.
    #[error("unsupported gateway scheme {0:?}")]
    UnsupportedScheme(String),

    /// A pre-shared key was handed to a dialer that cannot protect it.
    #[error("refusing to send credentials to {gateway} over an unsecured session")]
    InsecureCredentials { gateway: String },

    /// The gateway refused to issue a pre-shared key.
    ///
    /// Setup codes are short-lived; run the bootstrap again with a fresh one.
    #[error("authentication rejected with response code {code}")]
    AuthenticationRejected { code: Code },

    /// An addressed GET hit a resource that does not exist.
    #[error("resource {path} not found")]
    ResourceNotFound { path: String },

    /// An addressed GET was answered with a failure code other than not-found.
    #[error("request to {path} failed with response code {code}")]
    RequestFailed { path: String, code: Code },

    /// An addressed write was answered with a failure code.
    #[error("write to {path} rejected with response code {code}")]
    WriteRejected { path: String, code: Code },

    /// A payload did not have the shape expected for its resource.
    #[error("malformed payload from {path}: {reason}")]
    MalformedPayload { path: String, reason: String },

    /// Failed to serialize a request payload.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Attempted to send a [`crate::LightControlUpdate`] with no attributes set.
    #[error("invalid update; no attributes set")]
    NoAttribute,
}

impl Error {
    /// Create a new transport error
    pub fn transport(action: &str, err: std::io::Error) -> Self {
        Error::Transport {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new timeout error
    pub fn timeout(action: &str, after: Duration) -> Self {
        Error::Timeout {
            action: action.to_string(),
            after,
        }
    }

    /// Create a new invalid gateway error
    pub fn invalid_gateway(address: &str, reason: &str) -> Self {
        Error::InvalidGateway {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new malformed payload error
    pub fn malformed(path: &str, reason: impl Into<String>) -> Self {
        Error::MalformedPayload {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from the channel rather than from the gateway's answer.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Timeout { .. })
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
