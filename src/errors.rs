// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Reconnaissance Error Types
 * Error taxonomy for source adapters, retry classification, and persistence
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary - Enterprise Edition
 */

use std::time::Duration;
use thiserror::Error;

/// Main reconnaissance error type
#[derive(Error, Debug)]
pub enum ReconError {
    /// Network-related errors
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// HTTP-related errors
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Source adapter errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Input domain could not be normalized
    #[error("Invalid domain input: {0}")]
    InvalidDomain(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout errors
    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// General errors
    #[error("Recon error: {0}")]
    General(String),
}

/// Network-specific errors with retry classification
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection timeout after {timeout:?} to {url}")]
    ConnectionTimeout { url: String, timeout: Duration },

    #[error("Connection reset by peer for {url}")]
    ConnectionReset { url: String },

    #[error("Connection refused for {url}")]
    ConnectionRefused { url: String },

    #[error("DNS resolution failed for {host}: {reason}")]
    DnsResolutionFailed { host: String, reason: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Network error: {0}")]
    Other(String),
}

/// HTTP-specific errors with status code classification
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP {status_code} Client Error for {url}")]
    ClientError { status_code: u16, url: String },

    #[error("HTTP {status_code} Server Error for {url}")]
    ServerError { status_code: u16, url: String },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Response body too large ({size} bytes) from {url}, max: {max_size}")]
    BodyTooLarge {
        url: String,
        size: usize,
        max_size: usize,
    },

    #[error("HTTP error: {0}")]
    Other(String),
}

/// Source adapter errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Payload came back but did not match the expected schema
    #[error("Unparseable payload from {origin}: {reason}")]
    UnparseablePayload { origin: String, reason: String },

    /// A field the adapter depends on was absent after a successful parse
    #[error("Missing expected field '{field}' in {origin} response")]
    MissingField { origin: String, field: String },

    /// Session establishment (CSRF token, cookies) failed
    #[error("Session establishment failed for {origin}: {reason}")]
    SessionFailed { origin: String, reason: String },

    #[error("Source error: {0}")]
    Other(String),
}

/// Persistence errors surfaced by the reconciler
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Constraint violation: {constraint}")]
    ConstraintViolation { constraint: String },

    #[error("Store error: {0}")]
    Other(String),
}

impl NetworkError {
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionTimeout { .. } => true,
            NetworkError::ConnectionReset { .. } => true,
            NetworkError::ConnectionRefused { .. } => false,
            NetworkError::DnsResolutionFailed { .. } => false,
            NetworkError::InvalidUrl { .. } => false,
            NetworkError::Other(_) => true,
        }
    }
}

impl HttpError {
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::ServerError { status_code, .. } => {
                matches!(status_code, 500 | 502 | 503 | 504)
            }
            HttpError::ClientError { status_code, .. } => {
                // 429 (Too Many Requests) and 408 (Request Timeout)
                matches!(status_code, 408 | 429)
            }
            // Flaky upstreams (crt.sh) intermittently return truncated or
            // non-JSON bodies under load; a later attempt usually parses.
            HttpError::MalformedResponse { .. } => true,
            _ => false,
        }
    }

    /// Suggested retry delay derived from the response class.
    ///
    /// Only explicit rate-limiting (429) carries a hint; 5xx responses,
    /// 503 included, follow the caller's exponential schedule so the
    /// inter-attempt delay keeps growing until the cap.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            HttpError::ClientError {
                status_code: 429, ..
            } => Some(Duration::from_secs(60)),
            _ => None,
        }
    }
}

impl SourceError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::UnparseablePayload { .. } => true,
            SourceError::MissingField { .. } => false,
            SourceError::SessionFailed { .. } => false,
            SourceError::Other(_) => false,
        }
    }
}

impl ReconError {
    /// Check if the error is worth another attempt under the backoff policy
    pub fn is_retryable(&self) -> bool {
        match self {
            ReconError::Network(e) => e.is_retryable(),
            ReconError::Http(e) => e.is_retryable(),
            ReconError::Source(e) => e.is_retryable(),
            ReconError::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Get suggested retry delay for this error
    pub fn retry_delay(&self) -> Option<Duration> {
        match self {
            ReconError::Http(e) => e.retry_after(),
            _ => None,
        }
    }
}

/// Convert reqwest errors to our error types
impl From<reqwest::Error> for ReconError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();

        if err.is_timeout() {
            ReconError::Network(NetworkError::ConnectionTimeout {
                url,
                timeout: Duration::from_secs(30),
            })
        } else if err.is_connect() {
            ReconError::Network(NetworkError::ConnectionRefused { url })
        } else if err.is_status() {
            let status = err.status().map(|s| s.as_u16()).unwrap_or(0);
            if (400..500).contains(&status) {
                ReconError::Http(HttpError::ClientError {
                    status_code: status,
                    url,
                })
            } else {
                ReconError::Http(HttpError::ServerError {
                    status_code: status,
                    url,
                })
            }
        } else {
            ReconError::Network(NetworkError::Other(err.to_string()))
        }
    }
}

/// Convert tokio-postgres errors to our error types
impl From<tokio_postgres::Error> for ReconError {
    fn from(err: tokio_postgres::Error) -> Self {
        ReconError::Store(StoreError::Other(err.to_string()))
    }
}

/// Convert deadpool errors to our error types
impl From<deadpool_postgres::PoolError> for ReconError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        ReconError::Store(StoreError::ConnectionFailed {
            reason: err.to_string(),
        })
    }
}

/// Result type for reconnaissance operations
pub type ReconResult<T> = Result<T, ReconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        for code in [500u16, 502, 503, 504] {
            let err = ReconError::Http(HttpError::ServerError {
                status_code: code,
                url: "https://crt.sh".to_string(),
            });
            assert!(err.is_retryable(), "expected {} to be retryable", code);
        }
    }

    #[test]
    fn test_plain_client_errors_are_not_retryable() {
        for code in [400u16, 401, 403, 404] {
            let err = ReconError::Http(HttpError::ClientError {
                status_code: code,
                url: "https://crt.sh".to_string(),
            });
            assert!(!err.is_retryable(), "expected {} to be permanent", code);
        }
    }

    #[test]
    fn test_rate_limit_carries_delay_hint() {
        let err = ReconError::Http(HttpError::ClientError {
            status_code: 429,
            url: "https://crt.sh".to_string(),
        });
        assert!(err.is_retryable());
        assert_eq!(err.retry_delay(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_malformed_payload_is_retryable() {
        let err = ReconError::Source(SourceError::UnparseablePayload {
            origin: "crtsh".to_string(),
            reason: "unexpected EOF".to_string(),
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn test_unavailable_upstream_has_no_delay_hint() {
        // 503 defers to the exponential schedule instead of pinning a
        // constant inter-attempt delay.
        let err = ReconError::Http(HttpError::ServerError {
            status_code: 503,
            url: "https://crt.sh".to_string(),
        });
        assert!(err.is_retryable());
        assert_eq!(err.retry_delay(), None);
    }

    #[test]
    fn test_source_errors_name_their_origin() {
        let err = ReconError::Source(SourceError::SessionFailed {
            origin: "dnsdumpster".to_string(),
            reason: "token missing".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Source error: Session establishment failed for dnsdumpster: token missing"
        );

        let err = ReconError::Source(SourceError::MissingField {
            origin: "virustotal".to_string(),
            field: "data".to_string(),
        });
        assert!(err.to_string().contains("'data' in virustotal response"));
    }

    #[test]
    fn test_store_errors_are_not_retryable() {
        let err = ReconError::Store(StoreError::ConstraintViolation {
            constraint: "hostnames_domain_id_hostname_key".to_string(),
        });
        assert!(!err.is_retryable());
    }
}
