//! # Domain Entities
//!
//! Validator sets and the key-height index that selects between them.

use std::collections::BTreeMap;

use qc_02_header_codec::ConsensusPayload;
use shared_types::{CodecError, Decode, Encode, Sink, Source};

// =============================================================================
// CONSENSUS PEERS: A trusted validator set
// =============================================================================

/// Validator set effective from one key height.
///
/// Maps validator identity (hex of the compressed public key) to its index.
/// Stored as `u32 count` then, sorted by identity descending, `u32 index` and
/// the identity string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsensusPeers {
    peers: BTreeMap<String, u32>,
}

impl ConsensusPeers {
    /// Validator set from `(identity, index)` pairs.
    pub fn new(peers: impl IntoIterator<Item = (String, u32)>) -> Self {
        Self {
            peers: peers.into_iter().collect(),
        }
    }

    /// Validator set announced by a consensus payload, if any.
    pub fn from_payload(payload: &ConsensusPayload) -> Option<Self> {
        if !payload.announces_rotation() {
            return None;
        }
        Some(Self::new(
            payload
                .announced_peers()
                .iter()
                .map(|p| (p.id.to_lowercase(), p.index)),
        ))
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// True if the set has no validators.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// True if `id` is a member.
    pub fn contains(&self, id: &str) -> bool {
        self.peers.contains_key(id)
    }

    /// Index of `id` in the set.
    pub fn index_of(&self, id: &str) -> Option<u32> {
        self.peers.get(id).copied()
    }

    /// Members as `(identity, index)`, identity ascending.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.peers.iter().map(|(id, index)| (id.as_str(), *index))
    }
}

impl Encode for ConsensusPeers {
    fn encode(&self, sink: &mut Sink) {
        sink.write_u32(self.peers.len() as u32);
        for (id, index) in self.peers.iter().rev() {
            sink.write_u32(*index);
            sink.write_string(id);
        }
    }
}

impl Decode for ConsensusPeers {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        let count = source.read_u32()?;
        let mut peers = BTreeMap::new();
        for _ in 0..count {
            let index = source.read_u32()?;
            let id = source.read_string()?;
            peers.insert(id, index);
        }
        Ok(Self { peers })
    }
}

// =============================================================================
// KEY HEIGHTS: Heights at which a validator set took effect
// =============================================================================

/// Ascending list of heights at which a new validator set became effective.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyHeights {
    heights: Vec<u32>,
}

impl KeyHeights {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Key heights as stored, ascending.
    pub fn as_slice(&self) -> &[u32] {
        &self.heights
    }

    /// True if no validator set was ever registered.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Record `height`, keeping the list sorted and free of duplicates.
    pub fn insert(&mut self, height: u32) {
        if let Err(pos) = self.heights.binary_search(&height) {
            self.heights.insert(pos, height);
        }
    }

    /// Greatest key height `<= height`.
    pub fn floor(&self, height: u32) -> Option<u32> {
        match self.heights.binary_search(&height) {
            Ok(pos) => Some(self.heights[pos]),
            Err(0) => None,
            Err(pos) => Some(self.heights[pos - 1]),
        }
    }
}

impl FromIterator<u32> for KeyHeights {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut heights = Self::new();
        for h in iter {
            heights.insert(h);
        }
        heights
    }
}

impl Encode for KeyHeights {
    fn encode(&self, sink: &mut Sink) {
        sink.write_var_uint(self.heights.len() as u64);
        for h in &self.heights {
            sink.write_var_uint(u64::from(*h));
        }
    }
}

impl Decode for KeyHeights {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        let count = source.read_var_uint()?;
        let mut heights = Vec::new();
        for _ in 0..count {
            heights.push(source.read_var_u32()?);
        }
        if heights.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CodecError::InvalidValue(
                "key heights must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { heights })
    }
}
