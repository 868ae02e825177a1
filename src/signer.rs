//! Signing capabilities.
//!
//! Certificates are signed by whatever holds the CA key: a local [`KeyPair`], an HSM, or a
//! remote KMS. This crate only ever sees the capability, never the key material. Any
//! implementation must return a raw RSA PKCS#1 v1.5 signature over SHA-512 of exactly the bytes
//! it was given.

use std::future::Future;

use rsa::pkcs1v15::{Signature, SigningKey as RsaSigningKey, VerifyingKey as RsaVerifyingKey};
use rsa::signature::{SignatureEncoding, Signer as RsaSigner, Verifier};
use sha2::Sha512;

use crate::error::{BoxError, Result, SshCertError};
use crate::key::KeyPair;

/// SSH signature algorithm name for RSA PKCS#1 v1.5 with SHA-512.
pub const RSA_SHA2_512: &str = "rsa-sha2-512";

/// Synchronous signing capability.
pub trait Signer {
    /// Returns the raw signature over `data`.
    fn sign(&self, data: &[u8]) -> std::result::Result<Vec<u8>, BoxError>;
}

/// Any `Fn(&[u8]) -> Result<Vec<u8>, E>` can sign.
impl<F, E> Signer for F
where
    F: Fn(&[u8]) -> std::result::Result<Vec<u8>, E>,
    E: Into<BoxError>,
{
    fn sign(&self, data: &[u8]) -> std::result::Result<Vec<u8>, BoxError> {
        self(data).map_err(Into::into)
    }
}

/// Asynchronous signing capability, for signers that wait on a device or a network call.
///
/// Cancellation is handled by the caller dropping the returned future.
pub trait AsyncSigner {
    fn sign_async(
        &self,
        data: &[u8],
    ) -> impl Future<Output = std::result::Result<Vec<u8>, BoxError>> + Send;
}

/// Any `Fn(Vec<u8>) -> impl Future<Output = Result<Vec<u8>, E>>` can sign asynchronously.
impl<F, Fut, E> AsyncSigner for F
where
    F: Fn(Vec<u8>) -> Fut,
    Fut: Future<Output = std::result::Result<Vec<u8>, E>> + Send,
    E: Into<BoxError>,
{
    fn sign_async(
        &self,
        data: &[u8],
    ) -> impl Future<Output = std::result::Result<Vec<u8>, BoxError>> + Send {
        let fut = self(data.to_vec());
        async move { fut.await.map_err(Into::into) }
    }
}

impl Signer for KeyPair {
    fn sign(&self, data: &[u8]) -> std::result::Result<Vec<u8>, BoxError> {
        match self {
            KeyPair::Rsa { private, .. } => {
                let signing_key: RsaSigningKey<Sha512> = RsaSigningKey::new(*(private.clone()));
                let signature = signing_key.try_sign(data)?;
                Ok(signature.to_vec())
            }
        }
    }
}

impl AsyncSigner for KeyPair {
    fn sign_async(
        &self,
        data: &[u8],
    ) -> impl Future<Output = std::result::Result<Vec<u8>, BoxError>> + Send {
        std::future::ready(Signer::sign(self, data))
    }
}

/// Checks an RSA PKCS#1 v1.5 SHA-512 signature.
pub fn verify_rsa_sha512(key: &rsa::RsaPublicKey, data: &[u8], signature: &[u8]) -> Result<()> {
    let verifying_key: RsaVerifyingKey<Sha512> = RsaVerifyingKey::new(key.clone());
    let signature = Signature::try_from(signature)
        .map_err(|e| SshCertError::VerificationError(e.to_string()))?;
    verifying_key
        .verify(data, &signature)
        .map_err(|e| SshCertError::VerificationError(e.to_string()))
}
