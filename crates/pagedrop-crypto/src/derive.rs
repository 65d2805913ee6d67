use std::borrow::Cow;

use pagedrop_types::Identifier;

use crate::hasher::ContentHasher;

/// Length of every derived identifier, in hex characters.
pub const IDENTIFIER_LEN: usize = 8;

/// Payloads longer than this many UTF-16 code units are hashed by prefix
/// plus timestamp.
pub const CONTENT_PREFIX_LEN: usize = 100;

const DIGEST_PREFIX_BYTES: usize = IDENTIFIER_LEN / 2;

/// Derive an identifier for `payload` using the current wall-clock time.
///
/// Short payloads (up to [`CONTENT_PREFIX_LEN`] UTF-16 units) hash to the
/// same identifier every time. Longer payloads are salted with the time, so
/// the same document deployed twice gets two identifiers; two deployments in
/// the same millisecond with a common prefix still collide.
pub fn derive_from_content(payload: &str) -> Identifier {
    derive_from_content_at(payload, chrono::Utc::now().timestamp_millis())
}

/// [`derive_from_content`] with an explicit Unix time in milliseconds.
pub fn derive_from_content_at(payload: &str, unix_millis: i64) -> Identifier {
    if payload.encode_utf16().nth(CONTENT_PREFIX_LEN).is_none() {
        return identifier_of(ContentHasher::hash(payload.as_bytes()));
    }
    let prefix = utf16_prefix(payload, CONTENT_PREFIX_LEN);
    let millis = unix_millis.to_string();
    identifier_of(ContentHasher::hash_parts(&[
        prefix.as_bytes(),
        millis.as_bytes(),
    ]))
}

/// Derive an identifier from a page title. Deterministic, no salt.
pub fn derive_from_title(title: &str) -> Identifier {
    identifier_of(ContentHasher::hash(title.as_bytes()))
}

fn identifier_of(digest: [u8; 16]) -> Identifier {
    let mut prefix = [0u8; DIGEST_PREFIX_BYTES];
    prefix.copy_from_slice(&digest[..DIGEST_PREFIX_BYTES]);
    Identifier::from_digest(prefix)
}

/// The first `units` UTF-16 code units of `text`, as UTF-8.
///
/// A surrogate pair cut in half leaves a lone surrogate, which encodes as
/// U+FFFD.
fn utf16_prefix(text: &str, units: usize) -> Cow<'_, str> {
    let mut taken = 0;
    for (index, ch) in text.char_indices() {
        let width = ch.len_utf16();
        if taken + width > units {
            if taken < units {
                return Cow::Owned(format!("{}\u{FFFD}", &text[..index]));
            }
            return Cow::Borrowed(&text[..index]);
        }
        taken += width;
    }
    Cow::Borrowed(text)
}
