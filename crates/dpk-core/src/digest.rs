//! Package checksums as they appear in `C:` index fields.
//!
//! - `Q1…` / `Q2…`: base64 SHA-1 / SHA-256
//! - `X1…` / `X2…`: hex SHA-1 / SHA-256
//! - 32 hex characters: legacy MD5

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestType {
    Md5,
    Sha1,
    Sha256,
}

impl DigestType {
    /// Length of the raw digest in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexDigest {
    digest_type: DigestType,
    data: Vec<u8>,
}

impl IndexDigest {
    /// Wrap raw digest bytes, checking the length against the digest type.
    pub fn new(digest_type: DigestType, data: Vec<u8>) -> Option<Self> {
        (data.len() == digest_type.byte_len()).then_some(Self { digest_type, data })
    }

    /// Decode the textual form used in index files.
    pub fn decode(encoded: &str) -> Option<Self> {
        if encoded.len() == 32 && encoded.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::new(DigestType::Md5, hex::decode(encoded).ok()?);
        }

        let digest_type = match encoded.get(1..2)? {
            "1" => DigestType::Sha1,
            "2" => DigestType::Sha256,
            _ => return None,
        };
        let payload = &encoded[2..];
        let data = match &encoded[..1] {
            "Q" => STANDARD.decode(payload).ok()?,
            "X" => hex::decode(payload).ok()?,
            _ => return None,
        };
        Self::new(digest_type, data)
    }

    pub fn digest_type(&self) -> DigestType {
        self.digest_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for IndexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.digest_type, hex::encode_upper(&self.data))
    }
}

impl Serialize for IndexDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
