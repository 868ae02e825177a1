use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::cert::Certificate;
use crate::cert::params::CertificateInfo;
use crate::error::{Result, SshCertError};
use crate::key::{KeyPair, PublicKey};
use crate::signer::{AsyncSigner, Signer};
use crate::tbs_certificate::TbsCertificate;
use crate::wire::WireBuffer;

/// Issues OpenSSH user certificates with an injected signer.
///
/// Each call validates the request, encodes the unsigned fields, hands them to the signer,
/// appends the signature block and returns the finished [`Certificate`]. Nothing is kept between
/// calls, so one authority can serve concurrent requests as long as its signer allows it.
pub struct CertificateAuthority<S> {
    signer: S,
}

impl<S> CertificateAuthority<S> {
    pub fn new(signer: S) -> Self {
        Self { signer }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Validates and encodes the unsigned part of the certificate.
    fn prepare(cert_info: &CertificateInfo) -> Result<WireBuffer> {
        cert_info.validate()?;
        debug!(
            "building certificate for {} with key id {:?}",
            cert_info.public_key().algorithm(),
            cert_info.key_id
        );
        TbsCertificate::new(cert_info).to_wire_buffer()
    }

    fn finish(
        cert_info: &CertificateInfo,
        unsigned: WireBuffer,
        signature: &[u8],
        comment: Option<&str>,
    ) -> Result<Certificate> {
        let cert = Certificate::from_unsigned(unsigned, signature, comment)?;
        info!(
            "issued certificate key_id={:?} serial={} principals={}",
            cert_info.key_id,
            cert_info.serial,
            cert_info.principals.len()
        );
        Ok(cert)
    }
}

impl<S: Signer> CertificateAuthority<S> {
    /// Signs `cert_info` and returns the certificate.
    ///
    /// The request is consumed; a new one must be built for every certificate. Signer failures
    /// are returned as [`SshCertError::SigningError`] and are not retried.
    ///
    /// # Arguments
    /// * `cert_info` - The certificate request.
    /// * `comment` - Optional comment appended to the text form.
    pub fn sign(&self, cert_info: CertificateInfo, comment: Option<&str>) -> Result<Certificate> {
        let unsigned = Self::prepare(&cert_info)?;
        let signature = self.signer.sign(unsigned.as_bytes()).map_err(|e| {
            error!("signer failed: {e}");
            SshCertError::SigningError(e)
        })?;
        Self::finish(&cert_info, unsigned, &signature, comment)
    }
}

impl<S: AsyncSigner> CertificateAuthority<S> {
    /// Signs `cert_info` with an asynchronous signer.
    ///
    /// When `cancel` fires before the signer finishes, the signing future is dropped and
    /// [`SshCertError::Cancelled`] is returned. The cancellation applies to this call only.
    pub async fn sign_async(
        &self,
        cert_info: CertificateInfo,
        comment: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Certificate> {
        let unsigned = Self::prepare(&cert_info)?;
        if cancel.is_cancelled() {
            warn!("signing of key id {:?} cancelled", cert_info.key_id);
            return Err(SshCertError::Cancelled);
        }

        let signature = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("signing of key id {:?} cancelled", cert_info.key_id);
                return Err(SshCertError::Cancelled);
            }
            result = self.signer.sign_async(unsigned.as_bytes()) => {
                result.map_err(|e| {
                    error!("signer failed: {e}");
                    SshCertError::SigningError(e)
                })?
            }
        };
        Self::finish(&cert_info, unsigned, &signature, comment)
    }
}

impl CertificateAuthority<KeyPair> {
    /// Public half of the CA key, as distributed through `TrustedUserCAKeys`.
    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }
}
