//! # Block Header
//!
//! Wire layout (little-endian fixed-width fields):
//!
//! ```text
//! u32 version
//! [version == 1] u64 chain_id | u32 parent_height | [32] cross_states_root
//! [32] prev_block_hash | [32] transactions_root | [32] block_root
//! u32 timestamp | u32 height | u64 consensus_data
//! var-bytes consensus_payload | [20] next_bookkeeper
//! ---------------------------------------------- end of unsigned part
//! var-uint n, n x var-bytes bookkeeper (33-byte compressed key)
//! var-uint m, m x var-bytes signature (64-byte r||s)
//! ```

use std::sync::OnceLock;

use shared_crypto::{
    sha256d, verify_multi_signature, Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature,
};
use shared_types::{Address, ChainId, Encode, Hash, Sink, Source, ZERO_HASH};

use super::consensus::ConsensusPayload;
use super::errors::HeaderError;

/// Highest header version this codec decodes.
pub const CURR_HEADER_VERSION: u32 = 1;

/// Version that introduced `chain_id`, `parent_height` and `cross_states_root`.
pub const VERSION_SUPPORT_SIDE_CHAIN: u32 = 1;

/// Header fields covered by the header hash.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnsignedHeader {
    /// Format version.
    pub version: u32,
    /// Side-chain id (version 1 only).
    pub chain_id: ChainId,
    /// Height of the parent chain block (version 1 only).
    pub parent_height: u32,
    /// Root of the cross-chain request trie (version 1 only).
    pub cross_states_root: Hash,
    /// Hash of the previous block.
    pub prev_block_hash: Hash,
    /// Transactions root.
    pub transactions_root: Hash,
    /// Block root.
    pub block_root: Hash,
    /// Unix timestamp in seconds.
    pub timestamp: u32,
    /// Block height.
    pub height: u32,
    /// Consensus engine data.
    pub consensus_data: u64,
    /// Chain-specific consensus payload, JSON when non-empty.
    pub consensus_payload: Vec<u8>,
    /// Address of the next bookkeeper set.
    pub next_bookkeeper: Address,
}

impl UnsignedHeader {
    fn has_side_chain_fields(&self) -> bool {
        self.version == VERSION_SUPPORT_SIDE_CHAIN
    }
}

impl Encode for UnsignedHeader {
    fn encode(&self, sink: &mut Sink) {
        sink.write_u32(self.version);
        if self.has_side_chain_fields() {
            sink.write_u64(self.chain_id);
            sink.write_u32(self.parent_height);
            sink.write_hash(&self.cross_states_root);
        }
        sink.write_hash(&self.prev_block_hash);
        sink.write_hash(&self.transactions_root);
        sink.write_hash(&self.block_root);
        sink.write_u32(self.timestamp);
        sink.write_u32(self.height);
        sink.write_u64(self.consensus_data);
        sink.write_var_bytes(&self.consensus_payload);
        sink.write_bytes(&self.next_bookkeeper);
    }
}

/// A signed block header.
///
/// The unsigned part is fixed at construction. Only bookkeeper signatures
/// can be attached afterwards, so the memoized hash never goes stale.
#[derive(Clone, Debug)]
pub struct Header {
    unsigned: UnsignedHeader,
    bookkeepers: Vec<Secp256k1PublicKey>,
    sig_data: Vec<Secp256k1Signature>,
    hash: OnceLock<Hash>,
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.unsigned == other.unsigned
            && self.bookkeepers == other.bookkeepers
            && self.sig_data == other.sig_data
    }
}

impl Eq for Header {}

impl Header {
    /// Unsigned header with no bookkeepers.
    pub fn new(unsigned: UnsignedHeader) -> Self {
        Self {
            unsigned,
            bookkeepers: Vec::new(),
            sig_data: Vec::new(),
            hash: OnceLock::new(),
        }
    }

    /// Fields covered by the hash.
    pub fn unsigned(&self) -> &UnsignedHeader {
        &self.unsigned
    }

    /// Format version.
    pub fn version(&self) -> u32 {
        self.unsigned.version
    }

    /// Side-chain id, zero for version 0 headers.
    pub fn chain_id(&self) -> ChainId {
        self.unsigned.chain_id
    }

    /// Block height.
    pub fn height(&self) -> u32 {
        self.unsigned.height
    }

    /// Root of the cross-chain request trie, zero for version 0 headers.
    pub fn cross_states_root(&self) -> &Hash {
        &self.unsigned.cross_states_root
    }

    /// Hash of the previous block.
    pub fn prev_block_hash(&self) -> &Hash {
        &self.unsigned.prev_block_hash
    }

    /// Signing bookkeepers, in signature order.
    pub fn bookkeepers(&self) -> &[Secp256k1PublicKey] {
        &self.bookkeepers
    }

    /// Signatures parallel to [`Header::bookkeepers`].
    pub fn sig_data(&self) -> &[Secp256k1Signature] {
        &self.sig_data
    }

    /// Double SHA-256 of the unsigned serialization, computed once.
    pub fn hash(&self) -> Hash {
        *self
            .hash
            .get_or_init(|| sha256d(&self.unsigned.to_bytes()))
    }

    /// Attach a bookkeeper signature over the header hash.
    pub fn sign(&mut self, keypair: &Secp256k1KeyPair) {
        let hash = self.hash();
        self.bookkeepers.push(keypair.public_key());
        self.sig_data.push(keypair.sign(&hash));
    }

    /// Attach an externally produced signature.
    pub fn add_signature(&mut self, bookkeeper: Secp256k1PublicKey, signature: Secp256k1Signature) {
        self.bookkeepers.push(bookkeeper);
        self.sig_data.push(signature);
    }

    /// Check the attached signatures against the header hash.
    ///
    /// Each signature must verify under a distinct attached bookkeeper and at
    /// least `threshold` signatures must be present.
    pub fn verify_signatures(&self, threshold: usize) -> Result<(), HeaderError> {
        verify_multi_signature(&self.hash(), &self.bookkeepers, &self.sig_data, threshold)
            .map_err(HeaderError::SignatureCheck)
    }

    /// Parse the consensus payload.
    pub fn consensus_payload(&self) -> Result<ConsensusPayload, HeaderError> {
        ConsensusPayload::parse(&self.unsigned.consensus_payload)
    }

    /// Full wire encoding.
    pub fn serialize(&self) -> Vec<u8> {
        self.to_bytes()
    }

    /// Decode a complete header, rejecting trailing bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, HeaderError> {
        let mut source = Source::new(bytes);
        let header = Self::decode_from(&mut source)?;
        source.expect_end()?;
        Ok(header)
    }

    /// Decode one header from `source`.
    pub fn decode_from(source: &mut Source<'_>) -> Result<Self, HeaderError> {
        let version = source.read_u32()?;
        if version > CURR_HEADER_VERSION {
            return Err(HeaderError::UnsupportedVersion {
                version,
                max: CURR_HEADER_VERSION,
            });
        }

        let mut unsigned = UnsignedHeader {
            version,
            ..UnsignedHeader::default()
        };
        if unsigned.has_side_chain_fields() {
            unsigned.chain_id = source.read_u64()?;
            unsigned.parent_height = source.read_u32()?;
            unsigned.cross_states_root = source.read_hash()?;
        } else {
            unsigned.cross_states_root = ZERO_HASH;
        }
        unsigned.prev_block_hash = source.read_hash()?;
        unsigned.transactions_root = source.read_hash()?;
        unsigned.block_root = source.read_hash()?;
        unsigned.timestamp = source.read_u32()?;
        unsigned.height = source.read_u32()?;
        unsigned.consensus_data = source.read_u64()?;
        unsigned.consensus_payload = source.read_var_bytes()?.to_vec();
        unsigned.next_bookkeeper = source.read_fixed_address()?;

        let bookkeeper_count = source.read_var_uint()?;
        let mut bookkeepers = Vec::new();
        for _ in 0..bookkeeper_count {
            let raw = source.read_var_bytes()?;
            bookkeepers
                .push(Secp256k1PublicKey::from_slice(raw).map_err(HeaderError::InvalidBookkeeper)?);
        }

        let sig_count = source.read_var_uint()?;
        let mut sig_data = Vec::new();
        for _ in 0..sig_count {
            let raw = source.read_var_bytes()?;
            sig_data.push(
                Secp256k1Signature::from_slice(raw).map_err(HeaderError::InvalidSignatureEncoding)?,
            );
        }

        if bookkeepers.len() != sig_data.len() {
            return Err(HeaderError::SignatureCountMismatch {
                bookkeepers: bookkeepers.len(),
                signatures: sig_data.len(),
            });
        }

        Ok(Self {
            unsigned,
            bookkeepers,
            sig_data,
            hash: OnceLock::new(),
        })
    }
}

impl Encode for Header {
    fn encode(&self, sink: &mut Sink) {
        self.unsigned.encode(sink);
        sink.write_var_uint(self.bookkeepers.len() as u64);
        for key in &self.bookkeepers {
            sink.write_var_bytes(key.as_bytes());
        }
        sink.write_var_uint(self.sig_data.len() as u64);
        for sig in &self.sig_data {
            sink.write_var_bytes(sig.as_bytes());
        }
    }
}

impl TryFrom<&[u8]> for Header {
    type Error = HeaderError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::deserialize(bytes)
    }
}
