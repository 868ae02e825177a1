#![allow(dead_code)]

use sshcertkit::cert::params::{CertificateInfo, Validity};
use sshcertkit::issuer::CertificateAuthority;
use sshcertkit::key::{KeyPair, PublicKey};

pub const CA_PKCS1_PEM: &str = include_str!("data/ca_rsa.pem");
pub const CA_PKCS8_PEM: &str = include_str!("data/ca_rsa_pkcs8.pem");
pub const CA_PUBLIC_LINE: &str = include_str!("data/ca_rsa.pub");
pub const USER_PUBLIC_PEM: &str = include_str!("data/user_rsa_public.pem");
pub const USER_PUBLIC_LINE: &str = include_str!("data/user_rsa.pub");
/// Certificate for the fixture keys, produced independently and accepted by `ssh-keygen -L`.
pub const USER_CERT_LINE: &str = include_str!("data/user_rsa-cert.pub");

/// 2025-06-13T08:00:00Z
pub const VALID_AFTER: i64 = 1_749_801_600;
/// 2025-06-13T10:00:00Z
pub const VALID_BEFORE: i64 = 1_749_808_800;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fixture_ca() -> CertificateAuthority<KeyPair> {
    let key_pair = KeyPair::from_pkcs1_pem(CA_PKCS1_PEM).expect("fixture CA key");
    CertificateAuthority::new(key_pair)
}

pub fn fixture_user_key() -> PublicKey {
    PublicKey::from_pem(USER_PUBLIC_PEM).expect("fixture user key")
}

/// The fixed request: zero nonce, key id "testkey", serial 0, one principal, two hour window.
pub fn fixture_request(ca_public_key: PublicKey) -> CertificateInfo {
    CertificateInfo::builder()
        .nonce(vec![0u8; 32])
        .public_key(fixture_user_key())
        .ca_public_key(ca_public_key)
        .serial(0)
        .key_id("testkey")
        .principals(vec!["someUser".to_string()])
        .validity(Validity::from_unix_timestamps(VALID_AFTER, VALID_BEFORE).expect("timestamps"))
        .build()
}
