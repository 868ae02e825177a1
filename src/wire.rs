//! SSH binary wire format.
//!
//! OpenSSH keys and certificates are built from two primitives: byte strings framed by a
//! 4-byte big-endian length, and fixed-width big-endian integers. [`WireBuffer`] writes and
//! reads both over a single owned byte vector. All integers are encoded in network byte order
//! regardless of the host architecture.

use crate::error::{Result, SshCertError};

/// A growable byte buffer with a forward-only read cursor.
///
/// Writes always append to the end. Reads start at offset 0 and advance the cursor.
/// A buffer is owned by the single operation that creates it and is never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireBuffer {
    data: Vec<u8>,
    pos: usize,
}

impl WireBuffer {
    /// Creates an empty buffer for writing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing bytes for reading, with the cursor at offset 0.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    /// Writes a 4-byte big-endian length followed by `bytes`.
    ///
    /// Fails when `bytes` is too long for the 32-bit length prefix.
    pub fn write_field(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| {
            SshCertError::ValidationError(format!(
                "field of {} bytes exceeds the 32-bit length prefix",
                bytes.len()
            ))
        })?;
        self.write_u32(len);
        self.write_raw(bytes);
        Ok(())
    }

    /// UTF-8 encodes `value` and writes it as a length-framed field.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_field(value.as_bytes())
    }

    /// Writes a list of strings using the nested encoding: each entry is framed on its own and
    /// the concatenation is framed again as one field.
    pub fn write_string_list<S: AsRef<str>>(&mut self, values: &[S]) -> Result<()> {
        let mut inner = WireBuffer::new();
        for value in values {
            inner.write_string(value.as_ref())?;
        }
        self.write_field(inner.as_bytes())
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_raw(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_raw(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_raw(&value.to_be_bytes());
    }

    /// Appends `bytes` verbatim, without framing.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Reads a 4-byte big-endian length `n` and then exactly `n` bytes.
    pub fn read_field(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    /// Reads a length-framed field and decodes it as UTF-8.
    pub fn read_string(&mut self) -> Result<String> {
        Ok(String::from_utf8(self.read_field()?)?)
    }

    /// Reads a list written by [`WireBuffer::write_string_list`].
    pub fn read_string_list(&mut self) -> Result<Vec<String>> {
        let mut inner = WireBuffer::from_bytes(self.read_field()?);
        let mut values = Vec::new();
        while !inner.is_empty() {
            values.push(inner.read_string()?);
        }
        Ok(values)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(buf))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_be_bytes(buf))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(i64::from_be_bytes(buf))
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns `true` once every byte has been read.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Offset of the read cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// All bytes written so far, independent of the read cursor.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn take(&mut self, len: usize) -> Result<&[u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(SshCertError::TruncationError {
                needed: len,
                remaining,
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }
}
