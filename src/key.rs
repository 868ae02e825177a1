use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use log::warn;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPublicKey, LineEnding};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey};
use sha2::{Digest, Sha256};

use crate::error::{Result, SshCertError};
use crate::wire::WireBuffer;

/// SSH algorithm identifier for RSA public keys.
pub const SSH_RSA: &str = "ssh-rsa";

/// RSA public parameters in SSH wire form.
///
/// Both values are unsigned big-endian integers that follow the SSH `mpint` convention,
/// so they can be written to the wire as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    e: Vec<u8>,
    n: Vec<u8>,
}

impl RsaPublicKey {
    /// Builds a key from exponent and modulus bytes exactly as they appear on the wire.
    pub fn new(e: Vec<u8>, n: Vec<u8>) -> Self {
        Self { e, n }
    }

    /// Builds a key from raw RSA parameters exported by a crypto provider.
    ///
    /// A zero byte is always prepended to the modulus, even when its top bit is already clear,
    /// so the stored value can never read as a negative `mpint`.
    pub fn from_rsa_parameters(exponent: &[u8], modulus: &[u8]) -> Self {
        let mut n = Vec::with_capacity(modulus.len() + 1);
        n.push(0);
        n.extend_from_slice(modulus);
        Self {
            e: exponent.to_vec(),
            n,
        }
    }

    /// Returns `(exponent, modulus)` unchanged, ready for a crypto provider.
    pub fn to_rsa_parameters(&self) -> (Vec<u8>, Vec<u8>) {
        (self.e.clone(), self.n.clone())
    }

    pub fn e(&self) -> &[u8] {
        &self.e
    }

    pub fn n(&self) -> &[u8] {
        &self.n
    }

    /// Writes exponent and modulus as two framed fields.
    pub(crate) fn encode(&self, buf: &mut WireBuffer) -> Result<()> {
        buf.write_field(&self.e)?;
        buf.write_field(&self.n)
    }

    /// Reads exponent and modulus as two framed fields.
    pub(crate) fn decode(buf: &mut WireBuffer) -> Result<Self> {
        let e = buf.read_field()?;
        let n = buf.read_field()?;
        Ok(Self { e, n })
    }

    /// Converts to the `rsa` crate representation for verification or PEM export.
    pub fn to_rsa_key(&self) -> Result<rsa::RsaPublicKey> {
        let (e, n) = self.to_rsa_parameters();
        Ok(rsa::RsaPublicKey::new(
            BigUint::from_bytes_be(&n),
            BigUint::from_bytes_be(&e),
        )?)
    }
}

impl From<&rsa::RsaPublicKey> for RsaPublicKey {
    fn from(key: &rsa::RsaPublicKey) -> Self {
        RsaPublicKey::from_rsa_parameters(&key.e().to_bytes_be(), &key.n().to_bytes_be())
    }
}

/// Algorithm specific key material.
///
/// Only RSA is supported today; other algorithms become new variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyData {
    Rsa(RsaPublicKey),
}

impl KeyData {
    /// SSH algorithm name of this key.
    pub fn algorithm(&self) -> &'static str {
        match self {
            KeyData::Rsa(_) => SSH_RSA,
        }
    }
}

/// An SSH public key with an optional comment.
///
/// Immutable once constructed. Created by parsing an `authorized_keys` style line, by decoding a
/// wire blob, or from PEM encoded RSA key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    key_data: KeyData,
    comment: Option<String>,
}

impl PublicKey {
    pub fn new(key_data: KeyData, comment: Option<String>) -> Self {
        Self {
            key_data,
            comment: comment.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Builds an RSA key from raw public parameters. See [`RsaPublicKey::from_rsa_parameters`].
    pub fn from_rsa_parameters(exponent: &[u8], modulus: &[u8]) -> Self {
        Self::new(
            KeyData::Rsa(RsaPublicKey::from_rsa_parameters(exponent, modulus)),
            None,
        )
    }

    /// Returns the stored `(exponent, modulus)` pair.
    pub fn to_rsa_parameters(&self) -> (Vec<u8>, Vec<u8>) {
        match &self.key_data {
            KeyData::Rsa(key) => key.to_rsa_parameters(),
        }
    }

    /// Returns a copy of this key carrying `comment`.
    pub fn with_comment(self, comment: impl Into<String>) -> Self {
        Self::new(self.key_data, Some(comment.into()))
    }

    pub fn algorithm(&self) -> &'static str {
        self.key_data.algorithm()
    }

    pub fn key_data(&self) -> &KeyData {
        &self.key_data
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Parses a one-line public key such as `ssh-rsa AAAAB3Nza... user@host`.
    ///
    /// Tokens after the second are joined with single spaces to form the comment.
    pub fn from_openssh(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(SshCertError::FormatError(format!(
                "expected at least 2 whitespace separated tokens in key line, found {}",
                tokens.len()
            )));
        }

        let blob = STANDARD.decode(tokens[1])?;
        let key = Self::from_wire(&blob).map_err(|e| match e {
            SshCertError::TruncationError { .. } => {
                SshCertError::FormatError(format!("truncated public key blob: {e}"))
            }
            other => other,
        })?;

        if tokens[0] != key.algorithm() {
            warn!(
                "key line algorithm {:?} does not match encoded algorithm {:?}",
                tokens[0],
                key.algorithm()
            );
        }

        let comment = tokens[2..].join(" ");
        Ok(Self::new(key.key_data, Some(comment)))
    }

    /// Formats the key as `<algorithm> <base64> [<comment>]`.
    pub fn to_openssh(&self) -> Result<String> {
        let encoded = STANDARD.encode(self.to_wire()?);
        Ok(match &self.comment {
            Some(comment) => format!("{} {} {}", self.algorithm(), encoded, comment),
            None => format!("{} {}", self.algorithm(), encoded),
        })
    }

    /// Decodes a public key blob: `[len]"ssh-rsa" [len]e [len]n`.
    pub fn from_wire(blob: &[u8]) -> Result<Self> {
        let mut buf = WireBuffer::from_bytes(blob);
        let algorithm = buf.read_string()?;
        let key_data = match algorithm.as_str() {
            SSH_RSA => KeyData::Rsa(RsaPublicKey::decode(&mut buf)?),
            other => {
                return Err(SshCertError::FormatError(format!(
                    "unsupported key algorithm: {other}"
                )));
            }
        };
        Ok(Self::new(key_data, None))
    }

    /// Encodes the public key blob. The comment is not part of the blob.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut buf = WireBuffer::new();
        buf.write_string(self.algorithm())?;
        match &self.key_data {
            KeyData::Rsa(key) => key.encode(&mut buf)?,
        }
        Ok(buf.into_bytes())
    }

    /// OpenSSH style fingerprint, `SHA256:` followed by the unpadded base64 digest of the blob.
    pub fn fingerprint(&self) -> Result<String> {
        let digest = Sha256::digest(self.to_wire()?);
        Ok(format!("SHA256:{}", STANDARD_NO_PAD.encode(digest)))
    }

    /// Imports an RSA public key from PEM.
    ///
    /// Accepts both `BEGIN PUBLIC KEY` (SPKI) and `BEGIN RSA PUBLIC KEY` (PKCS#1) documents.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key = match rsa::RsaPublicKey::from_public_key_pem(pem) {
            Ok(key) => key,
            Err(_) => rsa::RsaPublicKey::from_pkcs1_pem(pem)?,
        };
        Ok(Self::new(KeyData::Rsa(RsaPublicKey::from(&key)), None))
    }

    /// Exports the key as a PKCS#1 `BEGIN RSA PUBLIC KEY` document.
    pub fn to_pem(&self) -> Result<String> {
        let key = match &self.key_data {
            KeyData::Rsa(key) => key.to_rsa_key()?,
        };
        Ok(key.to_pkcs1_pem(LineEnding::LF)?)
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_openssh() {
            Ok(line) => f.write_str(&line),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

/// Supported key pairs for signing certificates.
pub enum KeyPair {
    Rsa {
        private: Box<RsaPrivateKey>,
        public: rsa::RsaPublicKey,
    },
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)?;
        Ok(Self::from_rsa_private_key(private))
    }

    pub fn from_rsa_private_key(private: RsaPrivateKey) -> Self {
        let public = rsa::RsaPublicKey::from(&private);
        KeyPair::Rsa {
            private: Box::new(private),
            public,
        }
    }

    /// Imports a `BEGIN RSA PRIVATE KEY` document.
    pub fn from_pkcs1_pem(pem: &str) -> Result<Self> {
        Ok(Self::from_rsa_private_key(RsaPrivateKey::from_pkcs1_pem(
            pem,
        )?))
    }

    /// Imports a `BEGIN PRIVATE KEY` document.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self> {
        Ok(Self::from_rsa_private_key(RsaPrivateKey::from_pkcs8_pem(
            pem,
        )?))
    }

    pub fn to_pkcs8_pem(&self) -> Result<String> {
        match self {
            KeyPair::Rsa { private, .. } => {
                let pem = private.to_pkcs8_pem(LineEnding::LF)?;
                Ok(pem.as_str().to_owned())
            }
        }
    }

    /// SSH public half of this key pair, without a comment.
    pub fn public_key(&self) -> PublicKey {
        match self {
            KeyPair::Rsa { public, .. } => {
                PublicKey::new(KeyData::Rsa(RsaPublicKey::from(public)), None)
            }
        }
    }
}
