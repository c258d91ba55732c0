//! # In-Memory Proof Trie
//!
//! Builds the hex-path trie whose roots and proofs [`verify_proof`] checks.
//! Used by side-chain tooling to commit cross-chain requests and by tests.
//!
//! [`verify_proof`]: super::verify::verify_proof

use super::nibbles::Nibbles;
use super::node::TrieNode;
use super::{rlp, Hash};

/// Root of the trie holding no keys: Keccak-256 of the empty RLP string.
pub fn empty_root() -> Hash {
    rlp::keccak256(&rlp::encode_string(&[]))
}

/// Insert-only Merkle-Patricia trie held fully in memory.
#[derive(Clone, Debug, Default)]
pub struct ProofTrie {
    root: Option<TrieNode>,
    len: usize,
}

impl ProofTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no key was inserted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert or replace the value at `key`. Empty values are ignored.
    pub fn insert(&mut self, key: &[u8], value: Vec<u8>) {
        if value.is_empty() {
            return;
        }
        let path = Nibbles::from_key(key);
        let (node, added) = insert(self.root.take(), path, TrieNode::Value(value));
        self.root = Some(node);
        if added {
            self.len += 1;
        }
    }

    /// Value stored at `key`.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let mut path = Nibbles::from_key(key);
        let mut current = self.root.as_ref()?;
        loop {
            match current {
                TrieNode::Short { key, child } => {
                    if !path.starts_with(key) {
                        return None;
                    }
                    path = path.slice(key.len());
                    current = child.as_ref();
                }
                TrieNode::Full { children } => {
                    let nibble = usize::from(*path.0.first()?);
                    current = children[nibble].as_ref()?;
                    path = path.slice(1);
                }
                TrieNode::Value(value) => return Some(value),
                TrieNode::Hash(_) => return None,
            }
        }
    }

    /// Root hash. The root is always hashed, however short its encoding.
    pub fn root_hash(&self) -> Hash {
        match &self.root {
            Some(node) => node.hash(),
            None => empty_root(),
        }
    }

    /// Proof for `key`: encoded nodes from the root down to the value, or
    /// down to the node showing the key is absent.
    ///
    /// Nodes embedded in their parent are not listed separately.
    pub fn prove(&self, key: &[u8]) -> Vec<Vec<u8>> {
        let mut path = Nibbles::from_key(key);
        let mut visited: Vec<&TrieNode> = Vec::new();
        let mut current = self.root.as_ref();

        while let Some(node) = current {
            if path.is_empty() {
                break;
            }
            match node {
                TrieNode::Short { key, child } => {
                    visited.push(node);
                    if path.starts_with(key) {
                        path = path.slice(key.len());
                        current = Some(child.as_ref());
                    } else {
                        current = None;
                    }
                }
                TrieNode::Full { children } => {
                    visited.push(node);
                    current = children[usize::from(path.at(0))].as_ref();
                    path = path.slice(1);
                }
                TrieNode::Value(_) | TrieNode::Hash(_) => break,
            }
        }

        visited
            .into_iter()
            .enumerate()
            .filter(|(i, node)| *i == 0 || node.is_hashed_by_parent())
            .map(|(_, node)| node.rlp_encode())
            .collect()
    }
}

/// Insert `value` at `path` below `node`. Returns the new subtree and
/// whether a new key was added.
fn insert(node: Option<TrieNode>, path: Nibbles, value: TrieNode) -> (TrieNode, bool) {
    if path.is_empty() {
        let added = !matches!(node, Some(TrieNode::Value(_)));
        return (value, added);
    }
    match node {
        None => (
            TrieNode::Short {
                key: path,
                child: Box::new(value),
            },
            true,
        ),
        Some(TrieNode::Short { key, child }) => {
            let matched = path.common_prefix_len(&key);
            if matched == key.len() {
                let (child, added) = insert(Some(*child), path.slice(matched), value);
                return (
                    TrieNode::Short {
                        key,
                        child: Box::new(child),
                    },
                    added,
                );
            }

            let mut branch = TrieNode::empty_full();
            if let TrieNode::Full { children } = &mut branch {
                let (old, _) = insert(None, key.slice(matched + 1), *child);
                children[usize::from(key.at(matched))] = Some(old);
                let (new, _) = insert(None, path.slice(matched + 1), value);
                children[usize::from(path.at(matched))] = Some(new);
            }
            if matched == 0 {
                (branch, true)
            } else {
                (
                    TrieNode::Short {
                        key: path.slice_range(0, matched),
                        child: Box::new(branch),
                    },
                    true,
                )
            }
        }
        Some(TrieNode::Full { mut children }) => {
            let nibble = usize::from(path.at(0));
            let (child, added) = insert(children[nibble].take(), path.slice(1), value);
            children[nibble] = Some(child);
            (TrieNode::Full { children }, added)
        }
        // a value or hash never sits on a non-empty remaining path
        Some(other) => (other, false),
    }
}
