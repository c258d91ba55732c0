//! # Value Objects
//!
//! Parameter blob of the `syncBlockHeader` entry point and its outcome.

use shared_types::{ChainId, CodecError, Decode, Encode, Sink, Source};

/// `syncBlockHeader` parameters: serialized headers in submission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncBlockHeaderParam {
    /// Serialized headers.
    pub headers: Vec<Vec<u8>>,
}

impl Encode for SyncBlockHeaderParam {
    fn encode(&self, sink: &mut Sink) {
        sink.write_var_uint(self.headers.len() as u64);
        for header in &self.headers {
            sink.write_var_bytes(header);
        }
    }
}

impl Decode for SyncBlockHeaderParam {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        let count = source.read_var_uint()?;
        let mut headers = Vec::new();
        for _ in 0..count {
            headers.push(source.read_var_bytes()?.to_vec());
        }
        Ok(Self { headers })
    }
}

/// Outcome of a committed `sync_headers` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// `(chain, height)` of every committed header, in submission order.
    pub committed: Vec<(ChainId, u32)>,
    /// Headers skipped because their height was already committed.
    pub skipped: usize,
    /// Heights at which a new validator set took effect.
    pub rotations: Vec<(ChainId, u32)>,
}
