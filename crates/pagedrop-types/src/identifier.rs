use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Short opaque name for a stored payload.
///
/// Identifiers end up as file names and URL path segments, so only ASCII
/// alphanumerics, `-` and `_` are accepted. Derived identifiers are 8
/// lowercase hex characters, but callers may supply their own.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Maximum identifier length in bytes.
    pub const MAX_LEN: usize = 128;

    /// Validate and wrap an identifier string.
    pub fn new(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TypeError::EmptyIdentifier);
        }
        if value.len() > Self::MAX_LEN {
            return Err(TypeError::IdentifierTooLong {
                len: value.len(),
                max: Self::MAX_LEN,
            });
        }
        if let Some(ch) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(TypeError::InvalidIdentifierChar { value, ch });
        }
        Ok(Self(value))
    }

    /// Lowercase hex encoding of a digest prefix.
    ///
    /// Hex digits always validate, and the digest size is checked at compile
    /// time, so this cannot fail.
    pub fn from_digest<const N: usize>(digest: [u8; N]) -> Self {
        const { assert!(N > 0 && 2 * N <= Identifier::MAX_LEN) };
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
