use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identifier::Identifier;

/// One bounded-size, contiguous slice of a payload.
///
/// Chunk lengths are counted in `char`s. A boundary never splits a UTF-8
/// encoded scalar, but it may fall anywhere else: inside a tag, an entity,
/// or between the code points of a grapheme cluster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk within the payload, starting at 0.
    pub sequence_index: u32,
    pub text: String,
}

impl Chunk {
    pub fn new(sequence_index: u32, text: impl Into<String>) -> Self {
        Self {
            sequence_index,
            text: text.into(),
        }
    }

    /// Length of this chunk in `char`s.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A text payload together with the identifier it is stored under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlob {
    pub identifier: Identifier,
    pub payload: String,
}

impl ContentBlob {
    pub fn new(identifier: Identifier, payload: impl Into<String>) -> Self {
        Self {
            identifier,
            payload: payload.into(),
        }
    }

    /// Payload length in `char`s.
    pub fn char_len(&self) -> usize {
        self.payload.chars().count()
    }

    /// Split the payload into chunks of at most `max_unit` chars.
    pub fn chunks(&self, max_unit: usize) -> Result<Vec<Chunk>, TypeError> {
        split_into_chunks(&self.payload, max_unit)
    }

    /// Reassemble a blob from chunks already in stored order.
    pub fn from_chunks(identifier: Identifier, chunks: &[Chunk]) -> Result<Self, TypeError> {
        Ok(Self {
            identifier,
            payload: join_chunks(chunks)?,
        })
    }
}

/// Number of chunks a payload of `char_len` chars is split into.
///
/// An empty payload has zero chunks.
pub fn chunk_count(char_len: usize, max_unit: usize) -> usize {
    if max_unit == 0 {
        return 0;
    }
    char_len.div_ceil(max_unit)
}

/// Split `payload` left to right into chunks of exactly `max_unit` chars,
/// except possibly the last. Empty input yields no chunks.
pub fn split_into_chunks(payload: &str, max_unit: usize) -> Result<Vec<Chunk>, TypeError> {
    if max_unit == 0 {
        return Err(TypeError::ZeroChunkSize);
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut taken = 0;
    for (offset, _) in payload.char_indices() {
        if taken == max_unit {
            chunks.push(Chunk::new(chunks.len() as u32, &payload[start..offset]));
            start = offset;
            taken = 0;
        }
        taken += 1;
    }
    if taken > 0 {
        chunks.push(Chunk::new(chunks.len() as u32, &payload[start..]));
    }
    Ok(chunks)
}

/// Concatenate chunks in the order given.
///
/// The slice must already be in ascending `sequence_index` order starting at
/// 0; chunks are never re-sorted, a gap or reordering is an error.
pub fn join_chunks(chunks: &[Chunk]) -> Result<String, TypeError> {
    let mut payload = String::with_capacity(chunks.iter().map(|c| c.text.len()).sum());
    for (expected, chunk) in chunks.iter().enumerate() {
        let expected = expected as u32;
        if chunk.sequence_index != expected {
            return Err(TypeError::SequenceGap {
                expected,
                actual: chunk.sequence_index,
            });
        }
        payload.push_str(&chunk.text);
    }
    Ok(payload)
}
