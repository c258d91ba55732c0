//! # Exactly-Once Sequence Ledger
//!
//! Relayers may deliver requests of a chain in any order. The ledger keeps
//! the highest id seen (`current`) and the ids below it not yet delivered:
//!
//! ```text
//! seq > current   ──▶ owe (current, seq) exclusive, current = seq
//! seq <= current  ──▶ must be owed; consume it
//! ```

use shared_types::ChainId;

use crate::domain::{RelayError, RemainedIds};

/// Record delivery of `seq` and return the new current id.
///
/// On failure `remained` is left untouched.
pub fn consume_sequence(
    chain_id: ChainId,
    current: u64,
    remained: &mut RemainedIds,
    seq: u64,
) -> Result<u64, RelayError> {
    if seq > current {
        remained.insert_range(current + 1, seq - 1);
        Ok(seq)
    } else if remained.remove(seq) {
        Ok(current)
    } else {
        Err(RelayError::AlreadyProcessed { chain_id, seq })
    }
}
