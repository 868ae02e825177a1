//! # sshcertkit - OpenSSH User Certificates in Pure Rust
//!
//! sshcertkit encodes and signs OpenSSH user certificates (`ssh-rsa-cert-v01@openssh.com`)
//! using rustcrypto libraries. Signing is delegated to a caller supplied capability, so the CA
//! key may live in memory, on an HSM, or in a remote key management service.
//!
//! ## Supported Key Types
//!
//! - **RSA**: certified keys and CA keys, signatures are `rsa-sha2-512`
//!
//! ## Supported Formats
//!
//! - **SSH wire format**: the length-prefixed big-endian encoding used by OpenSSH
//! - **OpenSSH text lines**: `id_rsa.pub`, `authorized_keys` and `id_rsa-cert.pub` style lines
//! - **PEM**: RSA public keys as SPKI or PKCS#1, private keys as PKCS#1 or PKCS#8
//!
//! ## Quick Start
//!
//! ### Issuing a User Certificate
//!
//! ```rust,no_run
//! use sshcertkit::{
//!     cert::params::{CertificateInfo, Validity},
//!     issuer::CertificateAuthority,
//!     key::{KeyPair, PublicKey},
//! };
//!
//! # fn main() -> Result<(), sshcertkit::error::SshCertError> {
//! // The CA key pair signs locally
//! let ca = CertificateAuthority::new(KeyPair::generate_rsa(3072)?);
//!
//! // The key being certified, e.g. read from id_rsa.pub
//! let user_key = KeyPair::generate_rsa(2048)?.public_key();
//!
//! let cert_info = CertificateInfo::builder()
//!     .public_key(user_key)
//!     .ca_public_key(ca.public_key())
//!     .key_id("alice")
//!     .principals(vec!["alice".to_string()])
//!     .validity(Validity::for_days(1))
//!     .build();
//!
//! let certificate = ca.sign(cert_info, Some("alice@example.com"))?;
//! println!("{}", certificate.to_openssh());
//! # Ok(())
//! # }
//! ```
//!
//! ### Signing with an External Signer
//!
//! Any closure returning raw PKCS#1 v1.5 SHA-512 signature bytes can act as the CA:
//!
//! ```rust,no_run
//! use sshcertkit::{
//!     cert::params::{CertificateInfo, Validity},
//!     issuer::CertificateAuthority,
//!     key::PublicKey,
//! };
//!
//! # fn remote_sign(_data: &[u8]) -> Result<Vec<u8>, std::io::Error> { Ok(vec![]) }
//! # fn main() -> Result<(), sshcertkit::error::SshCertError> {
//! let ca_public_key = PublicKey::from_pem(&std::fs::read_to_string("ca.pem").unwrap())?;
//! let user_key = PublicKey::from_openssh(&std::fs::read_to_string("id_rsa.pub").unwrap())?;
//!
//! let ca = CertificateAuthority::new(|data: &[u8]| remote_sign(data));
//! let cert_info = CertificateInfo::builder()
//!     .public_key(user_key)
//!     .ca_public_key(ca_public_key)
//!     .principals(vec!["deploy".to_string()])
//!     .validity(Validity::for_days(7))
//!     .build();
//! let certificate = ca.sign(cert_info, None)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Working with the Wire Format
//!
//! ```rust
//! use sshcertkit::wire::WireBuffer;
//!
//! let mut buf = WireBuffer::new();
//! buf.write_string("ssh-rsa").unwrap();
//! buf.write_u32(1);
//! assert_eq!(&buf.as_bytes()[..4], &[0, 0, 0, 7]);
//!
//! assert_eq!(buf.read_string().unwrap(), "ssh-rsa");
//! assert_eq!(buf.read_u32().unwrap(), 1);
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use sshcertkit::{key::PublicKey, error::SshCertError};
//!
//! match PublicKey::from_openssh("ssh-rsa") {
//!     Ok(key) => println!("Key parsed: {}", key),
//!     Err(SshCertError::FormatError(msg)) => println!("Malformed key line: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`wire`]: SSH wire buffer codec
//! - [`key`]: Public keys, PEM bridge and local key pairs
//! - [`cert`]: Certificate parameters, signed certificates and well-known extensions
//! - [`tbs_certificate`]: Encoding of the unsigned certificate fields
//! - [`signer`]: Signing capabilities
//! - [`issuer`]: The certificate authority that ties them together
//! - [`error`]: Error types

pub mod cert;
pub mod error;
pub mod issuer;
pub mod key;
pub mod signer;
pub mod tbs_certificate;
pub mod wire;
