//! Token transfer payload passed to a token contract's `transfer` method.

use crate::codec::{Decode, Encode, Sink, Source};
use crate::entities::Address;
use crate::errors::CodecError;

/// Method name of token transfers.
pub const TRANSFER_METHOD: &str = "transfer";

/// One balance movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferState {
    /// Debited account.
    pub from: Address,
    /// Credited account.
    pub to: Address,
    /// Amount moved.
    pub value: u64,
}

/// Batch of movements executed by one `transfer` call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transfers {
    /// Movements in execution order.
    pub states: Vec<TransferState>,
}

impl Transfers {
    /// A single movement.
    pub fn single(from: Address, to: Address, value: u64) -> Self {
        Self {
            states: vec![TransferState { from, to, value }],
        }
    }
}

impl Encode for Transfers {
    fn encode(&self, sink: &mut Sink) {
        sink.write_var_uint(self.states.len() as u64);
        for state in &self.states {
            sink.write_address(&state.from);
            sink.write_address(&state.to);
            sink.write_var_uint(state.value);
        }
    }
}

impl Decode for Transfers {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        let n = source.read_var_uint()?;
        let mut states = Vec::new();
        for _ in 0..n {
            states.push(TransferState {
                from: source.read_address()?,
                to: source.read_address()?,
                value: source.read_var_uint()?,
            });
        }
        Ok(Self { states })
    }
}
