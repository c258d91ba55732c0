//! # Domain Entities
//!
//! Per-chain sequence bookkeeping of the relay.

use shared_types::{CodecError, Decode, Encode, Sink, Source};

/// Sequence ids skipped over by the relay and still owed.
///
/// Held as sorted, disjoint, non-adjacent inclusive ranges, so a jump from
/// id 1 to id 1_000_000 costs one range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemainedIds {
    ranges: Vec<(u64, u64)>,
}

impl RemainedIds {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no id is owed.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of owed ids.
    pub fn len(&self) -> u64 {
        self.ranges.iter().map(|(s, e)| e - s + 1).sum()
    }

    /// The underlying inclusive ranges.
    pub fn ranges(&self) -> &[(u64, u64)] {
        &self.ranges
    }

    /// Every owed id, ascending.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.ranges.iter().flat_map(|&(s, e)| s..=e)
    }

    fn position(&self, id: u64) -> Result<usize, usize> {
        self.ranges.binary_search_by(|&(s, e)| {
            if e < id {
                std::cmp::Ordering::Less
            } else if s > id {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
    }

    /// True if `id` is owed.
    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_ok()
    }

    /// Add `start..=end`, merging with overlapping or adjacent ranges.
    /// An empty range (`start > end`) is ignored.
    pub fn insert_range(&mut self, start: u64, end: u64) {
        if start > end {
            return;
        }
        let (mut lo, mut hi) = (start, end);
        // first range that ends at or after start - 1
        let first = self
            .ranges
            .partition_point(|&(_, e)| e.saturating_add(1) < start);
        let mut last = first;
        while last < self.ranges.len() && self.ranges[last].0 <= hi.saturating_add(1) {
            lo = lo.min(self.ranges[last].0);
            hi = hi.max(self.ranges[last].1);
            last += 1;
        }
        self.ranges.splice(first..last, std::iter::once((lo, hi)));
    }

    /// Remove `id`; false if it was not owed.
    pub fn remove(&mut self, id: u64) -> bool {
        let Ok(i) = self.position(id) else {
            return false;
        };
        let (s, e) = self.ranges[i];
        match (s == id, e == id) {
            (true, true) => {
                self.ranges.remove(i);
            }
            (true, false) => self.ranges[i].0 = id + 1,
            (false, true) => self.ranges[i].1 = id - 1,
            (false, false) => {
                self.ranges[i].1 = id - 1;
                self.ranges.insert(i + 1, (id + 1, e));
            }
        }
        true
    }
}

impl Encode for RemainedIds {
    fn encode(&self, sink: &mut Sink) {
        sink.write_var_uint(self.ranges.len() as u64);
        for &(start, end) in &self.ranges {
            sink.write_var_uint(start);
            sink.write_var_uint(end);
        }
    }
}

impl Decode for RemainedIds {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        let count = source.read_var_uint()?;
        let mut ranges: Vec<(u64, u64)> = Vec::new();
        for _ in 0..count {
            let start = source.read_var_uint()?;
            let end = source.read_var_uint()?;
            if start > end {
                return Err(CodecError::InvalidValue(format!(
                    "remained range {}..={} is empty",
                    start, end
                )));
            }
            if let Some(&(_, prev_end)) = ranges.last() {
                if prev_end.saturating_add(1) >= start {
                    return Err(CodecError::InvalidValue(
                        "remained ranges not sorted and disjoint".into(),
                    ));
                }
            }
            ranges.push((start, end));
        }
        Ok(Self { ranges })
    }
}
