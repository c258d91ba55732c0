//! Nibble paths and the compact path encoding.

// =============================================================================
// NIBBLES: Half-byte path representation
// =============================================================================

/// Terminator nibble marking the end of a full key path.
pub const TERMINATOR: u8 = 16;

/// Nibble path for trie traversal.
///
/// Keys are expanded to one nibble (0-15) per half byte followed by the
/// [`TERMINATOR`], so a path that ends in a value is distinguishable from
/// one that continues into a child.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Nibbles(pub Vec<u8>);

impl Nibbles {
    /// Expand a key to its terminated nibble path.
    pub fn from_key(key: &[u8]) -> Self {
        let mut nibbles = Vec::with_capacity(key.len() * 2 + 1);
        for byte in key {
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0F);
        }
        nibbles.push(TERMINATOR);
        Nibbles(nibbles)
    }

    /// Get the nibbles from `start` onwards.
    pub fn slice(&self, start: usize) -> Self {
        Nibbles(self.0[start..].to_vec())
    }

    /// Get a range slice of nibbles.
    pub fn slice_range(&self, start: usize, end: usize) -> Self {
        Nibbles(self.0[start..end].to_vec())
    }

    /// Find common prefix length with another nibbles path.
    pub fn common_prefix_len(&self, other: &Nibbles) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// True if `prefix` is a prefix of this path.
    pub fn starts_with(&self, prefix: &Nibbles) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Number of nibbles, terminator included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no nibbles remain.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get nibble at index.
    pub fn at(&self, index: usize) -> u8 {
        self.0[index]
    }

    /// True if the path ends with the terminator.
    pub fn has_terminator(&self) -> bool {
        self.0.last() == Some(&TERMINATOR)
    }

    /// Compact (hex-prefix) encoding used inside short nodes.
    ///
    /// High nibble of the first byte: bit 1 marks a terminated (leaf) path,
    /// bit 0 marks an odd nibble count, in which case the first nibble is
    /// packed into the low half of that byte.
    pub fn to_compact(&self) -> Vec<u8> {
        let terminated = self.has_terminator();
        let path = if terminated {
            &self.0[..self.0.len() - 1]
        } else {
            &self.0[..]
        };
        let odd = path.len() % 2 == 1;
        let flag = (u8::from(terminated) << 1) | u8::from(odd);

        let mut result = Vec::with_capacity(path.len() / 2 + 1);
        let rest = if odd {
            result.push((flag << 4) | path[0]);
            &path[1..]
        } else {
            result.push(flag << 4);
            path
        };
        for pair in rest.chunks(2) {
            result.push((pair[0] << 4) | pair.get(1).copied().unwrap_or(0));
        }
        result
    }

    /// Decode a compact path. Returns `None` for an empty input or an
    /// unknown flag.
    pub fn from_compact(compact: &[u8]) -> Option<Self> {
        let first = *compact.first()?;
        let flag = first >> 4;
        if flag > 3 {
            return None;
        }
        let mut nibbles = Vec::with_capacity(compact.len() * 2);
        if flag & 1 == 1 {
            nibbles.push(first & 0x0F);
        } else if first & 0x0F != 0 {
            return None;
        }
        for byte in &compact[1..] {
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0F);
        }
        if flag & 2 == 2 {
            nibbles.push(TERMINATOR);
        }
        Some(Nibbles(nibbles))
    }
}
