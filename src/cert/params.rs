use bon::Builder;
use rand_core::{OsRng, RngCore};
use time::Duration;
use time::OffsetDateTime;

use crate::error::{Result, SshCertError};
use crate::key::PublicKey;

/// Required nonce length in bytes.
pub const NONCE_LEN: usize = 32;

/// Certificate type code for user certificates. Host certificates (`2`) are not supported.
pub const USER_CERT_TYPE: u32 = 1;

/// Returns a fresh nonce drawn from the operating system CSPRNG.
pub fn random_nonce() -> Vec<u8> {
    let mut nonce = vec![0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Parameters for a user certificate.
///
/// The key being certified and the CA key are fixed at construction. The remaining fields may
/// be adjusted before the request is handed to a
/// [`CertificateAuthority`](crate::issuer::CertificateAuthority).
///
/// # Fields
/// * `nonce` - 32 random bytes making otherwise identical certificates unique.
/// * `public_key` - The key being certified.
/// * `serial` - CA assigned serial number.
/// * `key_id` - Free-form identifier, logged by `sshd` on authentication.
/// * `principals` - Login names the certificate is valid for.
/// * `validity` - The validity window.
/// * `critical_options` - Critical option names.
/// * `extensions` - Extension names.
/// * `ca_public_key` - Public half of the signing CA key.
#[derive(Clone, Debug, Builder)]
pub struct CertificateInfo {
    #[builder(default = random_nonce())]
    nonce: Vec<u8>,
    public_key: PublicKey,
    #[builder(default)]
    pub serial: u64,
    #[builder(default, into)]
    pub key_id: String,
    #[builder(default)]
    pub principals: Vec<String>,
    pub validity: Validity,
    #[builder(default)]
    pub critical_options: Vec<String>,
    #[builder(default)]
    pub extensions: Vec<String>,
    ca_public_key: PublicKey,
}

impl CertificateInfo {
    /// Creates a request with an explicit nonce, rejecting nonces that are not 32 bytes long.
    ///
    /// The validity window starts now and lasts one hour; adjust `validity` as needed.
    pub fn new(public_key: PublicKey, ca_public_key: PublicKey, nonce: Vec<u8>) -> Result<Self> {
        validate_nonce(&nonce)?;
        Ok(Self {
            nonce,
            public_key,
            serial: 0,
            key_id: String::new(),
            principals: Vec::new(),
            validity: Validity::starting_now(Duration::hours(1)),
            critical_options: Vec::new(),
            extensions: Vec::new(),
            ca_public_key,
        })
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn ca_public_key(&self) -> &PublicKey {
        &self.ca_public_key
    }

    /// Checks the request before anything is encoded or signed.
    pub fn validate(&self) -> Result<()> {
        validate_nonce(&self.nonce)?;
        if self.validity.valid_before < self.validity.valid_after {
            return Err(SshCertError::ValidationError(format!(
                "valid_before ({}) is earlier than valid_after ({})",
                self.validity.valid_before, self.validity.valid_after
            )));
        }
        Ok(())
    }
}

fn validate_nonce(nonce: &[u8]) -> Result<()> {
    if nonce.len() != NONCE_LEN {
        return Err(SshCertError::ValidationError(format!(
            "nonce must be {NONCE_LEN} bytes, got {}",
            nonce.len()
        )));
    }
    Ok(())
}

/// Certificate validity window.
///
/// Encoded as Unix epoch seconds, so sub-second precision is dropped.
///
/// # Fields
/// * `valid_after` - The start of the validity period.
/// * `valid_before` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub valid_after: OffsetDateTime,
    pub valid_before: OffsetDateTime,
}

impl Validity {
    pub fn new(valid_after: OffsetDateTime, valid_before: OffsetDateTime) -> Self {
        Self {
            valid_after,
            valid_before,
        }
    }

    /// Creates a validity window starting now and lasting `duration`.
    pub fn starting_now(duration: Duration) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            valid_after: now,
            valid_before: now + duration,
        }
    }

    /// Creates a validity window starting now for the given number of days.
    pub fn for_days(days: i64) -> Self {
        Self::starting_now(Duration::days(days))
    }

    /// Rebuilds a window from epoch seconds as found on the wire.
    pub fn from_unix_timestamps(valid_after: i64, valid_before: i64) -> Result<Self> {
        let to_time = |secs: i64| {
            OffsetDateTime::from_unix_timestamp(secs).map_err(|e| {
                SshCertError::FormatError(format!("timestamp {secs} out of range: {e}"))
            })
        };
        Ok(Self {
            valid_after: to_time(valid_after)?,
            valid_before: to_time(valid_before)?,
        })
    }
}
