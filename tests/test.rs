mod util;

use sshcertkit::cert::Certificate;
use sshcertkit::cert::params::{CertificateInfo, Validity};
use sshcertkit::cert::extensions::{CriticalOption, Extension, default_extensions};
use sshcertkit::error::SshCertError;
use sshcertkit::issuer::CertificateAuthority;
use sshcertkit::key::{KeyPair, PublicKey};
use sshcertkit::tbs_certificate::TbsCertificate;
pub type Result<T> = std::result::Result<T, SshCertError>;

/// Signs the fixed request with the fixture CA and checks it against the reference certificate.
#[test]
fn signed_certificate_matches_reference() -> Result<()> {
    util::init_logging();
    let ca = util::fixture_ca();
    let cert_info = util::fixture_request(ca.public_key());

    let cert = ca.sign(cert_info, Some("testkey@domain"))?;

    assert!(cert.to_openssh().starts_with("ssh-rsa-cert-v01@openssh.com "));
    assert_eq!(cert.to_openssh(), util::USER_CERT_LINE.trim_end());
    Ok(())
}

#[test]
fn signed_certificate_reports_requested_fields() -> Result<()> {
    let ca = util::fixture_ca();
    let cert = ca.sign(util::fixture_request(ca.public_key()), Some("testkey@domain"))?;

    let info = cert.to_cert_info()?;
    assert_eq!(info.key_id, "testkey");
    assert_eq!(info.serial, 0);
    assert_eq!(info.validity.valid_after.unix_timestamp(), util::VALID_AFTER);
    assert_eq!(info.validity.valid_before.unix_timestamp(), util::VALID_BEFORE);
    assert_eq!(info.principals, vec!["someUser"]);
    assert!(info.critical_options.is_empty());
    assert!(info.extensions.is_empty());
    assert_eq!(info.public_key(), &util::fixture_user_key());
    assert_eq!(info.ca_public_key(), &ca.public_key());
    assert_eq!(cert.comment(), Some("testkey@domain"));
    cert.verify()?;
    Ok(())
}

#[test]
fn unsigned_bytes_are_deterministic() -> Result<()> {
    let ca = util::fixture_ca();
    let info = util::fixture_request(ca.public_key());

    let first = TbsCertificate::new(&info).to_bytes()?;
    let second = TbsCertificate::new(&util::fixture_request(ca.public_key())).to_bytes()?;
    assert_eq!(first, second);

    let reference = Certificate::from_openssh(util::USER_CERT_LINE)?;
    assert_eq!(first.as_slice(), reference.signed_bytes());
    Ok(())
}

#[test]
fn reference_certificate_parses_and_verifies() -> Result<()> {
    let cert = Certificate::from_openssh(util::USER_CERT_LINE)?;
    assert_eq!(cert.comment(), Some("testkey@domain"));
    assert_eq!(cert.signature_algorithm()?, "rsa-sha2-512");
    assert_eq!(cert.signature()?.len(), 256);
    cert.verify()?;
    Ok(())
}

#[test]
fn tampered_certificate_fails_verification() -> Result<()> {
    let cert = Certificate::from_openssh(util::USER_CERT_LINE)?;
    let mut blob = cert.to_bytes().to_vec();
    // last byte of the key id "testkey"
    let pos = blob
        .windows(7)
        .position(|w| w == b"testkey")
        .expect("key id present");
    blob[pos + 6] = b'x';

    let tampered = Certificate::from_bytes(&blob)?;
    assert!(matches!(
        tampered.verify(),
        Err(SshCertError::VerificationError(_))
    ));
    Ok(())
}

#[test]
fn pem_and_openssh_forms_agree() -> Result<()> {
    let from_pem = util::fixture_user_key();
    let from_line = PublicKey::from_openssh(util::USER_PUBLIC_LINE)?;

    assert_eq!(from_line.comment(), Some("testkey@domain"));
    assert_eq!(from_line.key_data(), from_pem.key_data());
    assert_eq!(
        from_pem.clone().with_comment("testkey@domain").to_openssh()?,
        util::USER_PUBLIC_LINE.trim_end()
    );
    assert_eq!(
        from_pem.fingerprint()?,
        "SHA256:9nSZjlPfhRp4DR9a5QbQVQMa4ifopQZ4Cw8H4+esorM"
    );

    let reimported = PublicKey::from_pem(&from_pem.to_pem()?)?;
    assert_eq!(reimported, from_pem);
    Ok(())
}

#[test]
fn ca_public_key_matches_trusted_user_ca_line() -> Result<()> {
    let ca = util::fixture_ca();
    assert_eq!(ca.public_key().to_openssh()?, util::CA_PUBLIC_LINE.trim_end());
    assert_eq!(
        ca.public_key().fingerprint()?,
        "SHA256:Wn9XtzNjKhjMBRtn/4BRVH1EEeEGZpQi2fjpySzIxKw"
    );

    let pkcs8 = KeyPair::from_pkcs8_pem(util::CA_PKCS8_PEM)?;
    assert_eq!(pkcs8.public_key(), ca.public_key());
    Ok(())
}

#[test]
fn options_and_extensions_are_encoded_as_name_lists() -> Result<()> {
    let ca = util::fixture_ca();
    let mut info = util::fixture_request(ca.public_key());
    info.serial = 42;
    info.principals = vec!["alice".to_string(), "deploy".to_string()];
    info.critical_options = vec![CriticalOption::ForceCommand.to_string()];
    info.extensions = default_extensions();

    let cert = ca.sign(info, None)?;
    assert_eq!(cert.to_openssh().split(' ').count(), 2);

    let decoded = cert.to_cert_info()?;
    assert_eq!(decoded.serial, 42);
    assert_eq!(decoded.principals, vec!["alice", "deploy"]);
    assert_eq!(decoded.critical_options, vec!["force-command"]);
    assert!(
        decoded
            .extensions
            .contains(&Extension::PermitPty.as_str().to_string())
    );
    cert.verify()?;
    Ok(())
}

#[test]
fn external_signer_closure_produces_same_certificate() -> Result<()> {
    let ca_key = KeyPair::from_pkcs1_pem(util::CA_PKCS1_PEM)?;
    let ca_public_key = ca_key.public_key();
    let remote = CertificateAuthority::new(|data: &[u8]| {
        sshcertkit::signer::Signer::sign(&ca_key, data)
    });

    let cert = remote.sign(util::fixture_request(ca_public_key), Some("testkey@domain"))?;
    assert_eq!(cert.to_openssh(), util::USER_CERT_LINE.trim_end());
    Ok(())
}

#[test]
fn short_nonce_is_rejected() {
    let ca = util::fixture_ca();
    let info = CertificateInfo::builder()
        .nonce(vec![0u8; 8])
        .public_key(util::fixture_user_key())
        .ca_public_key(ca.public_key())
        .validity(Validity::for_days(1))
        .build();

    assert!(matches!(
        ca.sign(info, None),
        Err(SshCertError::ValidationError(_))
    ));
}
