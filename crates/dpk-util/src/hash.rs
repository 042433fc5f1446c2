use sha1::{Digest, Sha1};

/// Compute the SHA-1 digest of a byte slice.
pub fn sha1_digest(data: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&Sha1::digest(data));
    out
}
