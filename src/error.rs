//! use sshcertkit::error::SshCertError;

use thiserror::Error;

/// Boxed error reported by an external signer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents errors that can occur in the sshcertkit library.
///
/// Every error is fatal to the call that produced it. Certificates are assembled in memory,
/// so a failure never leaves a partially written certificate behind.
#[derive(Debug, Error)]
pub enum SshCertError {
    /// Malformed key or certificate text, or an unsupported algorithm.
    #[error("Malformed input: {0}")]
    FormatError(String),

    /// A wire read asked for more bytes than the buffer holds.
    #[error("Truncated wire data: needed {needed} bytes but only {remaining} remain")]
    TruncationError { needed: usize, remaining: usize },

    /// Certificate request failed validation before signing.
    #[error("Invalid certificate request: {0}")]
    ValidationError(String),

    /// The signer reported a failure. The original error is kept as the source.
    #[error("Signing failed: {0}")]
    SigningError(#[source] BoxError),

    /// Signing was cancelled before the signer returned.
    #[error("Signing was cancelled")]
    Cancelled,

    /// Error from RSA, PKCS#1 or PKCS#8 handling.
    #[error("Key error: {0}")]
    KeyError(String),

    /// Certificate signature did not verify.
    #[error("Verification failed: {0}")]
    VerificationError(String),
}

pub type Result<T> = std::result::Result<T, SshCertError>;

impl From<base64::DecodeError> for SshCertError {
    fn from(err: base64::DecodeError) -> Self {
        SshCertError::FormatError(format!("invalid base64: {err}"))
    }
}

impl From<std::string::FromUtf8Error> for SshCertError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        SshCertError::FormatError(format!("invalid UTF-8 string field: {err}"))
    }
}

impl From<rsa::Error> for SshCertError {
    fn from(err: rsa::Error) -> Self {
        SshCertError::KeyError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for SshCertError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        SshCertError::KeyError(err.to_string())
    }
}

impl From<rsa::pkcs8::Error> for SshCertError {
    fn from(err: rsa::pkcs8::Error) -> Self {
        SshCertError::KeyError(err.to_string())
    }
}

impl From<rsa::pkcs8::spki::Error> for SshCertError {
    fn from(err: rsa::pkcs8::spki::Error) -> Self {
        SshCertError::KeyError(err.to_string())
    }
}
