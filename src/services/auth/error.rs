use thiserror::Error;

/// Every way authentication can fail.
///
/// Callers treat all variants the same (deny), but each one is kept apart so
/// logs can say why a request was rejected. Messages never contain the raw
/// token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no authorization header")]
    MissingHeader,
    #[error("authorization header is not a bearer credential")]
    MalformedHeader,
    #[error("token is not a well-formed signed token: {0}")]
    InvalidTokenFormat(String),
    #[error("no signing key matches the token key id")]
    NoMatchingKey,
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),
    #[error("signing key is unusable: {0}")]
    InvalidKey(String),
    #[error("token algorithm is not accepted")]
    UnsupportedAlgorithm,
    #[error("token signature does not verify")]
    InvalidSignature,
    #[error("token expired")]
    TokenExpired,
    #[error("token claims are invalid: {0}")]
    TokenInvalid(String),
}

impl AuthError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader => "malformed_header",
            Self::InvalidTokenFormat(_) => "invalid_token_format",
            Self::NoMatchingKey => "no_matching_key",
            Self::KeyFetch(_) => "key_fetch",
            Self::InvalidKey(_) => "invalid_key",
            Self::UnsupportedAlgorithm => "unsupported_algorithm",
            Self::InvalidSignature => "invalid_signature",
            Self::TokenExpired => "token_expired",
            Self::TokenInvalid(_) => "token_invalid",
        }
    }

    /// True for failures that happen after the token was parsed, i.e. the
    /// cryptographic or key-resolution part of verification.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::NoMatchingKey
                | Self::KeyFetch(_)
                | Self::InvalidKey(_)
                | Self::UnsupportedAlgorithm
                | Self::InvalidSignature
                | Self::TokenExpired
                | Self::TokenInvalid(_)
        )
    }
}
