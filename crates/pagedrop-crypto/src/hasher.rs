use md5::{Digest, Md5};

/// MD5 digest of page content and titles.
///
/// Identifiers must match those already issued for existing pages, so the
/// digest is plain MD5 over the UTF-8 bytes with no domain tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentHasher;

impl ContentHasher {
    /// Hash raw bytes.
    pub fn hash(data: &[u8]) -> [u8; 16] {
        Self::hash_parts(&[data])
    }

    /// Hash the concatenation of several byte slices.
    pub fn hash_parts(parts: &[&[u8]]) -> [u8; 16] {
        let mut hasher = Md5::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }

    /// Hex digest truncated to `len` characters (at most 32).
    pub fn hex_prefix(parts: &[&[u8]], len: usize) -> String {
        let mut hex = hex::encode(Self::hash_parts(parts));
        hex.truncate(len);
        hex
    }
}
