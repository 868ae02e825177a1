pub mod extensions;
pub mod params;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use params::{CertificateInfo, USER_CERT_TYPE, Validity};

use crate::error::{Result, SshCertError};
use crate::key::{KeyData, PublicKey, RsaPublicKey};
use crate::signer::{RSA_SHA2_512, verify_rsa_sha512};
use crate::tbs_certificate::SSH_RSA_CERT_V01;
use crate::wire::WireBuffer;

/// A signed OpenSSH user certificate.
///
/// Holds the full certificate blob (unsigned fields followed by the signature block) and the
/// optional comment used when rendering the text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    blob: Vec<u8>,
    signed_len: usize,
    comment: Option<String>,
}

/// Fields of a certificate blob, split at the signature.
struct DecodedCertificate {
    info: CertificateInfo,
    signed_len: usize,
    signature_algorithm: String,
    signature: Vec<u8>,
}

impl Certificate {
    /// Appends the signature block to the unsigned fields.
    ///
    /// The block is one framed field whose payload is the framed algorithm name followed by the
    /// framed raw signature.
    pub(crate) fn from_unsigned(
        mut unsigned: WireBuffer,
        signature: &[u8],
        comment: Option<&str>,
    ) -> Result<Self> {
        let signed_len = unsigned.as_bytes().len();

        let mut signature_block = WireBuffer::new();
        signature_block.write_string(RSA_SHA2_512)?;
        signature_block.write_field(signature)?;
        unsigned.write_field(signature_block.as_bytes())?;

        Ok(Self {
            blob: unsigned.into_bytes(),
            signed_len,
            comment: normalize_comment(comment),
        })
    }

    /// Decodes a certificate blob.
    pub fn from_bytes(blob: &[u8]) -> Result<Self> {
        let decoded = decode(blob)?;
        Ok(Self {
            blob: blob.to_vec(),
            signed_len: decoded.signed_len,
            comment: None,
        })
    }

    /// Parses a certificate line such as the contents of `id_rsa-cert.pub`.
    pub fn from_openssh(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(SshCertError::FormatError(format!(
                "expected at least 2 whitespace separated tokens in certificate line, found {}",
                tokens.len()
            )));
        }
        if tokens[0] != SSH_RSA_CERT_V01 {
            return Err(SshCertError::FormatError(format!(
                "unsupported certificate type: {}",
                tokens[0]
            )));
        }

        let blob = STANDARD.decode(tokens[1])?;
        let mut cert = Self::from_bytes(&blob)?;
        cert.comment = normalize_comment(Some(&tokens[2..].join(" ")));
        Ok(cert)
    }

    /// Formats the certificate as `ssh-rsa-cert-v01@openssh.com <base64> [<comment>]`.
    pub fn to_openssh(&self) -> String {
        let encoded = STANDARD.encode(&self.blob);
        match &self.comment {
            Some(comment) => format!("{SSH_RSA_CERT_V01} {encoded} {comment}"),
            None => format!("{SSH_RSA_CERT_V01} {encoded}"),
        }
    }

    /// The complete certificate blob.
    pub fn to_bytes(&self) -> &[u8] {
        &self.blob
    }

    /// The bytes covered by the signature.
    pub fn signed_bytes(&self) -> &[u8] {
        &self.blob[..self.signed_len]
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Raw signature bytes from the signature block.
    pub fn signature(&self) -> Result<Vec<u8>> {
        Ok(decode(&self.blob)?.signature)
    }

    /// Algorithm name from the signature block.
    pub fn signature_algorithm(&self) -> Result<String> {
        Ok(decode(&self.blob)?.signature_algorithm)
    }

    /// Extracts the certificate fields into a `CertificateInfo`.
    pub fn to_cert_info(&self) -> Result<CertificateInfo> {
        Ok(decode(&self.blob)?.info)
    }

    /// Verifies the signature against the CA key embedded in the certificate.
    ///
    /// This proves integrity only. Whether the CA is trusted is up to the caller.
    pub fn verify(&self) -> Result<()> {
        let decoded = decode(&self.blob)?;
        if decoded.signature_algorithm != RSA_SHA2_512 {
            return Err(SshCertError::VerificationError(format!(
                "unsupported signature algorithm: {}",
                decoded.signature_algorithm
            )));
        }
        let ca_key = match decoded.info.ca_public_key().key_data() {
            KeyData::Rsa(key) => key.to_rsa_key()?,
        };
        verify_rsa_sha512(&ca_key, self.signed_bytes(), &decoded.signature)
    }
}

impl std::fmt::Display for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_openssh())
    }
}

fn normalize_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn decode(blob: &[u8]) -> Result<DecodedCertificate> {
    let mut buf = WireBuffer::from_bytes(blob);

    let cert_type = buf.read_string()?;
    if cert_type != SSH_RSA_CERT_V01 {
        return Err(SshCertError::FormatError(format!(
            "unsupported certificate type: {cert_type}"
        )));
    }
    let nonce = buf.read_field()?;
    let public_key = PublicKey::new(KeyData::Rsa(RsaPublicKey::decode(&mut buf)?), None);
    let serial = buf.read_u64()?;
    let kind = buf.read_u32()?;
    if kind != USER_CERT_TYPE {
        return Err(SshCertError::FormatError(format!(
            "only user certificates are supported, found type {kind}"
        )));
    }
    let key_id = buf.read_string()?;
    let principals = buf.read_string_list()?;
    let valid_after = buf.read_i64()?;
    let valid_before = buf.read_i64()?;
    let critical_options = buf.read_string_list()?;
    let extensions = buf.read_string_list()?;
    let _reserved = buf.read_field()?;
    let ca_public_key = PublicKey::from_wire(&buf.read_field()?)?;
    let signed_len = buf.position();

    let mut signature_block = WireBuffer::from_bytes(buf.read_field()?);
    let signature_algorithm = signature_block.read_string()?;
    let signature = signature_block.read_field()?;

    let info = CertificateInfo::builder()
        .nonce(nonce)
        .public_key(public_key)
        .serial(serial)
        .key_id(key_id)
        .principals(principals)
        .validity(Validity::from_unix_timestamps(valid_after, valid_before)?)
        .critical_options(critical_options)
        .extensions(extensions)
        .ca_public_key(ca_public_key)
        .build();

    Ok(DecodedCertificate {
        info,
        signed_len,
        signature_algorithm,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tbs_certificate::TbsCertificate;

    fn unsigned() -> WireBuffer {
        let subject = PublicKey::from_rsa_parameters(&[1, 0, 1], &[0xaa, 0xbb]);
        let ca = PublicKey::from_rsa_parameters(&[3], &[0xcc]);
        let mut info = CertificateInfo::new(subject, ca, vec![9; 32]).unwrap();
        info.key_id = "k".to_string();
        info.principals = vec!["root".to_string(), "deploy".to_string()];
        info.extensions = vec!["permit-pty".to_string()];
        info.validity = Validity::from_unix_timestamps(100, 200).unwrap();
        TbsCertificate::new(&info).to_wire_buffer().unwrap()
    }

    #[test]
    fn signature_block_is_nested() {
        let unsigned = unsigned();
        let unsigned_len = unsigned.as_bytes().len();
        let cert = Certificate::from_unsigned(unsigned, &[0xde, 0xad], None).unwrap();

        let mut expected = vec![0, 0, 0, 22, 0, 0, 0, 12];
        expected.extend_from_slice(b"rsa-sha2-512");
        expected.extend_from_slice(&[0, 0, 0, 2, 0xde, 0xad]);
        assert_eq!(&cert.to_bytes()[unsigned_len..], expected.as_slice());
        assert_eq!(cert.signed_bytes().len(), unsigned_len);
    }

    #[test]
    fn decoded_fields_match_request() {
        let cert = Certificate::from_unsigned(unsigned(), &[1, 2, 3], Some("x")).unwrap();
        let info = cert.to_cert_info().unwrap();
        assert_eq!(info.nonce(), &[9; 32]);
        assert_eq!(info.key_id, "k");
        assert_eq!(info.principals, vec!["root", "deploy"]);
        assert_eq!(info.extensions, vec!["permit-pty"]);
        assert!(info.critical_options.is_empty());
        assert_eq!(info.validity.valid_after.unix_timestamp(), 100);
        assert_eq!(info.validity.valid_before.unix_timestamp(), 200);
        assert_eq!(info.public_key().to_rsa_parameters().1, vec![0, 0xaa, 0xbb]);
        assert_eq!(cert.signature().unwrap(), vec![1, 2, 3]);
        assert_eq!(cert.signature_algorithm().unwrap(), RSA_SHA2_512);
    }

    #[test]
    fn text_form_round_trips() {
        let cert = Certificate::from_unsigned(unsigned(), &[1], Some("ops key")).unwrap();
        let line = cert.to_openssh();
        assert!(line.starts_with("ssh-rsa-cert-v01@openssh.com "));
        assert!(line.ends_with(" ops key"));
        assert_eq!(Certificate::from_openssh(&line).unwrap(), cert);
    }

    #[test]
    fn blank_comment_is_dropped() {
        let cert = Certificate::from_unsigned(unsigned(), &[1], Some("  ")).unwrap();
        assert_eq!(cert.to_openssh().split(' ').count(), 2);
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let cert = Certificate::from_unsigned(unsigned(), &[1], None).unwrap();
        let blob = cert.to_bytes();
        assert!(matches!(
            Certificate::from_bytes(&blob[..blob.len() - 1]),
            Err(SshCertError::TruncationError { .. })
        ));
    }

    #[test]
    fn wrong_prefix_is_rejected() {
        assert!(matches!(
            Certificate::from_openssh("ssh-rsa AAAA"),
            Err(SshCertError::FormatError(_))
        ));
    }
}
