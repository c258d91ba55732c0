//! # Value Objects
//!
//! Parameter blobs of the relay entry points.

use shared_types::{Address, ChainId, CodecError, Decode, Encode, Sink, Source};

/// `createCrossChainTx`. The encoded blob is also the stored request
/// payload proven on the other side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateCrossChainTxParam {
    /// Destination side chain.
    pub to_chain_id: ChainId,
    /// Declared fee, multiplied by the chain's ratio when charged.
    pub fee: u64,
    /// Payer of the fee, must witness the call.
    pub from: Address,
    /// Contract invoked on relay.
    pub dest_contract: Address,
    /// Method invoked on relay.
    pub method: String,
    /// Arguments passed to the method.
    pub args: Vec<u8>,
}

impl Encode for CreateCrossChainTxParam {
    fn encode(&self, sink: &mut Sink) {
        sink.write_var_uint(self.to_chain_id);
        sink.write_var_uint(self.fee);
        sink.write_address(&self.from);
        sink.write_address(&self.dest_contract);
        sink.write_string(&self.method);
        sink.write_var_bytes(&self.args);
    }
}

impl Decode for CreateCrossChainTxParam {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            to_chain_id: source.read_var_uint()?,
            fee: source.read_var_uint()?,
            from: source.read_address()?,
            dest_contract: source.read_address()?,
            method: source.read_string()?,
            args: source.read_var_bytes()?.to_vec(),
        })
    }
}

/// `processCrossChainTx`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessCrossChainTxParam {
    /// Side chain the request was recorded for.
    pub chain_id: ChainId,
    /// Sequence id of the request.
    pub seq: u64,
    /// Height of the trusted header whose cross-states root holds it.
    pub height: u32,
    /// Relayer, paid the fee charge.
    pub relayer: Address,
    /// Root-to-leaf trie proof nodes.
    pub proof: Vec<Vec<u8>>,
}

impl Encode for ProcessCrossChainTxParam {
    fn encode(&self, sink: &mut Sink) {
        sink.write_var_uint(self.chain_id);
        sink.write_var_uint(self.seq);
        sink.write_var_uint(u64::from(self.height));
        sink.write_address(&self.relayer);
        sink.write_var_uint(self.proof.len() as u64);
        for node in &self.proof {
            sink.write_var_bytes(node);
        }
    }
}

impl Decode for ProcessCrossChainTxParam {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        let chain_id = source.read_var_uint()?;
        let seq = source.read_var_uint()?;
        let height = source.read_var_u32()?;
        let relayer = source.read_address()?;
        let n = source.read_var_uint()?;
        let mut proof = Vec::new();
        for _ in 0..n {
            proof.push(source.read_var_bytes()?.to_vec());
        }
        Ok(Self {
            chain_id,
            seq,
            height,
            relayer,
            proof,
        })
    }
}

/// A request relayed by `processCrossChainTx`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayedRequest {
    /// Side-chain id.
    pub chain_id: ChainId,
    /// Sequence id.
    pub seq: u64,
    /// Height of the header the proof was checked against.
    pub height: u32,
    /// Proven request.
    pub request: CreateCrossChainTxParam,
    /// Amount paid from the fee pool to the relayer.
    pub fee_charge: u64,
    /// Return value of the destination call.
    pub output: Vec<u8>,
}
