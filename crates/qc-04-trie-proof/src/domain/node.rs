//! Trie node kinds and their RLP form.

use super::errors::RlpError;
use super::nibbles::{Nibbles, TERMINATOR};
use super::{rlp, Hash};

// =============================================================================
// TRIE NODE: The node kinds of a hex-path Merkle-Patricia trie
// =============================================================================

/// Number of slots in a full node: 16 branches plus the value slot.
pub const FULL_NODE_SLOTS: usize = 17;

/// Trie node.
///
/// Encodings:
/// - Short: `[compact(path), child]`, child inline or a 32-byte hash
/// - Full: `[child_0, ..., child_15, value]`, empty slots as `0x80`
/// - Hash: 32-byte reference to a node stored elsewhere
/// - Value: leaf payload, always a string
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrieNode {
    /// Compressed path segment followed by a single child.
    Short {
        /// Path segment, terminated when the child is a value.
        key: Nibbles,
        /// Child node.
        child: Box<TrieNode>,
    },

    /// 16-way branch plus value slot at index 16.
    Full {
        /// Children by nibble; slot 16 holds the value.
        children: Box<[Option<TrieNode>; FULL_NODE_SLOTS]>,
    },

    /// Reference to a node by hash.
    Hash(Hash),

    /// Leaf payload.
    Value(Vec<u8>),
}

impl TrieNode {
    /// Full node with every slot empty.
    pub fn empty_full() -> Self {
        TrieNode::Full {
            children: Box::new(std::array::from_fn(|_| None)),
        }
    }

    // -------------------------------------------------------------------------
    // Encoding
    // -------------------------------------------------------------------------

    /// RLP-encode this node with children collapsed to references.
    pub fn rlp_encode(&self) -> Vec<u8> {
        match self {
            TrieNode::Short { key, child } => {
                let mut payload = rlp::encode_string(&key.to_compact());
                payload.extend(child.encode_ref());
                rlp::encode_list(&payload)
            }
            TrieNode::Full { children } => {
                let mut payload = Vec::new();
                for child in children.iter() {
                    match child {
                        Some(node) => payload.extend(node.encode_ref()),
                        None => payload.push(0x80),
                    }
                }
                rlp::encode_list(&payload)
            }
            TrieNode::Hash(hash) => rlp::encode_string(hash),
            TrieNode::Value(value) => rlp::encode_string(value),
        }
    }

    /// Encoding of this node as seen from its parent.
    ///
    /// Structural nodes shorter than 32 bytes are embedded, longer ones are
    /// replaced by the hash of their encoding.
    pub fn encode_ref(&self) -> Vec<u8> {
        match self {
            TrieNode::Hash(_) | TrieNode::Value(_) => self.rlp_encode(),
            _ => {
                let encoded = self.rlp_encode();
                if encoded.len() < 32 {
                    encoded
                } else {
                    rlp::encode_string(&rlp::keccak256(&encoded))
                }
            }
        }
    }

    /// Keccak-256 of the RLP encoding.
    pub fn hash(&self) -> Hash {
        rlp::keccak256(&self.rlp_encode())
    }

    /// True if a parent stores this node by hash rather than inline.
    pub fn is_hashed_by_parent(&self) -> bool {
        matches!(self, TrieNode::Short { .. } | TrieNode::Full { .. })
            && self.rlp_encode().len() >= 32
    }

    // -------------------------------------------------------------------------
    // Decoding
    // -------------------------------------------------------------------------

    /// Decode a standalone proof node (short or full).
    pub fn decode(buf: &[u8]) -> Result<Self, RlpError> {
        let (content, rest) = rlp::split_list(buf)?;
        if !rest.is_empty() {
            return Err(RlpError::NonCanonical);
        }
        match rlp::count_values(content)? {
            2 => Self::decode_short(content),
            FULL_NODE_SLOTS => Self::decode_full(content),
            _ => Err(RlpError::ExpectedList),
        }
    }

    fn decode_short(content: &[u8]) -> Result<Self, RlpError> {
        let (compact, rest) = rlp::split_string(content)?;
        let key = Nibbles::from_compact(compact).ok_or(RlpError::NonCanonical)?;
        let child = if key.has_terminator() {
            let (value, _) = rlp::split_string(rest)?;
            TrieNode::Value(value.to_vec())
        } else {
            Self::decode_ref(rest)?.0.ok_or(RlpError::ExpectedString)?
        };
        Ok(TrieNode::Short {
            key,
            child: Box::new(child),
        })
    }

    fn decode_full(mut content: &[u8]) -> Result<Self, RlpError> {
        let mut children: [Option<TrieNode>; FULL_NODE_SLOTS] = std::array::from_fn(|_| None);
        for slot in children.iter_mut().take(usize::from(TERMINATOR)) {
            let (child, rest) = Self::decode_ref(content)?;
            *slot = child;
            content = rest;
        }
        let (value, _) = rlp::split_string(content)?;
        if !value.is_empty() {
            children[usize::from(TERMINATOR)] = Some(TrieNode::Value(value.to_vec()));
        }
        Ok(TrieNode::Full {
            children: Box::new(children),
        })
    }

    /// Decode a child reference: empty, 32-byte hash, or embedded node.
    fn decode_ref(buf: &[u8]) -> Result<(Option<TrieNode>, &[u8]), RlpError> {
        let (kind, content, rest) = rlp::split(buf)?;
        match kind {
            rlp::Kind::List => {
                let size = buf.len() - rest.len();
                if size >= 32 {
                    return Err(RlpError::NonCanonical);
                }
                Ok((Some(Self::decode(&buf[..size])?), rest))
            }
            rlp::Kind::String if content.is_empty() => Ok((None, rest)),
            rlp::Kind::String if content.len() == 32 => {
                let mut hash = [0u8; 32];
                hash.copy_from_slice(content);
                Ok((Some(TrieNode::Hash(hash)), rest))
            }
            _ => Err(RlpError::ExpectedList),
        }
    }
}
