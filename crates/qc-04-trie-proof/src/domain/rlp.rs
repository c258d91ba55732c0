//! RLP encoding and decoding for trie nodes.

use sha3::{Digest, Keccak256};

use super::errors::RlpError;
use super::Hash;

// =============================================================================
// RLP ENCODING
// =============================================================================

/// RLP-encode a byte string.
pub fn encode_string(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < 0x80 {
        vec![data[0]]
    } else {
        let mut result = header(0x80, data.len());
        result.extend_from_slice(data);
        result
    }
}

/// Wrap already-encoded items into a list.
pub fn encode_list(payload: &[u8]) -> Vec<u8> {
    let mut result = header(0xc0, payload.len());
    result.extend_from_slice(payload);
    result
}

fn header(offset: u8, len: usize) -> Vec<u8> {
    if len < 56 {
        vec![offset + len as u8]
    } else {
        let len_bytes = encode_length(len);
        let mut result = Vec::with_capacity(len_bytes.len() + 1 + len);
        result.push(offset + 55 + len_bytes.len() as u8);
        result.extend_from_slice(&len_bytes);
        result
    }
}

/// Encode a length as minimal big-endian bytes.
fn encode_length(len: usize) -> Vec<u8> {
    let bytes = len.to_be_bytes();
    let start = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    bytes[start..].to_vec()
}

/// Compute Keccak256 hash.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

// =============================================================================
// RLP DECODING
// =============================================================================

/// Kind of an RLP item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Single byte below 0x80, encoded as itself.
    Byte,
    /// Byte string.
    String,
    /// List of items.
    List,
}

/// Split the first item off `buf`: `(kind, content, rest)`.
pub fn split(buf: &[u8]) -> Result<(Kind, &[u8], &[u8]), RlpError> {
    let (kind, offset, size) = read_kind(buf)?;
    let end = offset.checked_add(size).ok_or(RlpError::SizeOverflow)?;
    if end > buf.len() {
        return Err(RlpError::UnexpectedEnd);
    }
    Ok((kind, &buf[offset..end], &buf[end..]))
}

/// Split a string item off `buf`.
pub fn split_string(buf: &[u8]) -> Result<(&[u8], &[u8]), RlpError> {
    match split(buf)? {
        (Kind::List, _, _) => Err(RlpError::ExpectedString),
        (_, content, rest) => Ok((content, rest)),
    }
}

/// Split a list item off `buf`.
pub fn split_list(buf: &[u8]) -> Result<(&[u8], &[u8]), RlpError> {
    match split(buf)? {
        (Kind::List, content, rest) => Ok((content, rest)),
        _ => Err(RlpError::ExpectedList),
    }
}

/// Number of items in a list's content.
pub fn count_values(mut content: &[u8]) -> Result<usize, RlpError> {
    let mut count = 0;
    while !content.is_empty() {
        let (_, _, rest) = split(content)?;
        content = rest;
        count += 1;
    }
    Ok(count)
}

fn read_kind(buf: &[u8]) -> Result<(Kind, usize, usize), RlpError> {
    let first = *buf.first().ok_or(RlpError::UnexpectedEnd)?;
    match first {
        0x00..=0x7F => Ok((Kind::Byte, 0, 1)),
        0x80..=0xB7 => {
            let size = usize::from(first - 0x80);
            // a single byte below 0x80 must be encoded as itself
            if size == 1 && buf.get(1).is_some_and(|b| *b < 0x80) {
                return Err(RlpError::NonCanonical);
            }
            Ok((Kind::String, 1, size))
        }
        0xB8..=0xBF => {
            let len_of_len = usize::from(first - 0xB7);
            let size = read_size(&buf[1..], len_of_len)?;
            Ok((Kind::String, 1 + len_of_len, size))
        }
        0xC0..=0xF7 => Ok((Kind::List, 1, usize::from(first - 0xC0))),
        0xF8..=0xFF => {
            let len_of_len = usize::from(first - 0xF7);
            let size = read_size(&buf[1..], len_of_len)?;
            Ok((Kind::List, 1 + len_of_len, size))
        }
    }
}

fn read_size(buf: &[u8], len_of_len: usize) -> Result<usize, RlpError> {
    if buf.len() < len_of_len {
        return Err(RlpError::UnexpectedEnd);
    }
    if buf[0] == 0 {
        return Err(RlpError::NonCanonical);
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::SizeOverflow);
    }
    let size = buf[..len_of_len]
        .iter()
        .fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
    if size < 56 {
        return Err(RlpError::NonCanonical);
    }
    Ok(size)
}
