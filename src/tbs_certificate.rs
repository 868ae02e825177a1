use log::debug;

use crate::cert::params::{CertificateInfo, USER_CERT_TYPE};
use crate::error::Result;
use crate::key::KeyData;
use crate::wire::WireBuffer;

/// Certificate type identifier for RSA certificates.
pub const SSH_RSA_CERT_V01: &str = "ssh-rsa-cert-v01@openssh.com";

/// The "To Be Signed" (TBS) portion of an OpenSSH user certificate.
///
/// Holds a borrowed request and writes its fields in the order the certificate format requires:
///
/// 1. `"ssh-rsa-cert-v01@openssh.com"`
/// 2. nonce
/// 3. exponent and 4. modulus of the certified key
/// 5. serial (`u64`)
/// 6. certificate type (`u32`, always user)
/// 7. key id
/// 8. principals
/// 9. valid after and valid before (`i64` epoch seconds)
/// 10. critical options
/// 11. extensions
/// 12. reserved (empty)
/// 13. CA public key blob
///
/// The caller validates the request first; encoding performs no checks of its own beyond
/// field length limits.
pub struct TbsCertificate<'a> {
    info: &'a CertificateInfo,
}

impl<'a> TbsCertificate<'a> {
    pub fn new(info: &'a CertificateInfo) -> Self {
        Self { info }
    }

    /// Encodes the unsigned fields into a new buffer, ready to be signed from offset 0.
    pub fn to_wire_buffer(&self) -> Result<WireBuffer> {
        let info = self.info;
        let mut buf = WireBuffer::new();

        buf.write_string(SSH_RSA_CERT_V01)?;
        buf.write_field(info.nonce())?;
        match info.public_key().key_data() {
            KeyData::Rsa(key) => {
                buf.write_field(key.e())?;
                buf.write_field(key.n())?;
            }
        }
        buf.write_u64(info.serial);
        buf.write_u32(USER_CERT_TYPE);
        buf.write_string(&info.key_id)?;
        buf.write_string_list(info.principals.as_slice())?;
        buf.write_i64(info.validity.valid_after.unix_timestamp());
        buf.write_i64(info.validity.valid_before.unix_timestamp());
        buf.write_string_list(info.critical_options.as_slice())?;
        buf.write_string_list(info.extensions.as_slice())?;
        // reserved
        buf.write_field(&[])?;
        buf.write_field(&info.ca_public_key().to_wire()?)?;

        debug!(
            "encoded {} unsigned certificate bytes for key id {:?}",
            buf.as_bytes().len(),
            info.key_id
        );
        Ok(buf)
    }

    /// Encodes the unsigned fields and returns the bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_wire_buffer()?.into_bytes())
    }
}
