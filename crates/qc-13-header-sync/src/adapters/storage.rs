//! # Header Sync Storage
//!
//! Key layout of the header-sync contract (`contract` is the configured
//! contract address, chain ids are u64 LE, heights and generations u32 LE):
//!
//! | Key | Value |
//! |-----|-------|
//! | `contract · "generation" · chain` | trust generation, absent = 0 |
//! | `contract · "blockHeader" · chain · gen · hash` | serialized header |
//! | `contract · "headerIndex" · chain · gen · height` | header hash |
//! | `contract · "currentHeight" · chain · gen` | highest committed height |
//! | `contract · "consensusPeer" · chain · gen · height` | [`ConsensusPeers`] |
//! | `contract · "keyHeights" · chain · gen` | [`KeyHeights`] |
//!
//! Retiring a chain bumps its generation, which leaves every earlier header
//! and validator set unreachable.

use qc_02_header_codec::{Header, HeaderError};
use shared_types::{
    concat_key, Address, ChainId, CodecError, Decode, Encode, Hash, KvStore, StorageError,
};

use crate::domain::{ConsensusPeers, KeyHeights};

const GENERATION: &[u8] = b"generation";
const BLOCK_HEADER: &[u8] = b"blockHeader";
const HEADER_INDEX: &[u8] = b"headerIndex";
const CURRENT_HEIGHT: &[u8] = b"currentHeight";
const CONSENSUS_PEER: &[u8] = b"consensusPeer";
const KEY_HEIGHTS: &[u8] = b"keyHeights";

/// Typed access to header-sync records over any [`KvStore`].
#[derive(Clone, Copy, Debug)]
pub struct HeaderSyncStore {
    contract: Address,
}

impl HeaderSyncStore {
    /// Store namespaced under `contract`.
    pub fn new(contract: Address) -> Self {
        Self { contract }
    }

    fn generation_key(&self, chain_id: ChainId) -> Vec<u8> {
        concat_key(&[&self.contract, GENERATION, &chain_id.to_le_bytes()])
    }

    /// Current trust generation of `chain_id`.
    pub fn generation(&self, storage: &dyn KvStore, chain_id: ChainId) -> Result<u32, StorageError> {
        let key = self.generation_key(chain_id);
        match storage.get(&key)? {
            Some(raw) => read_u32(&key, &raw, "generation must be 4 bytes"),
            None => Ok(0),
        }
    }

    /// Start a new generation for `chain_id`, returning it.
    pub fn retire_chain(&self, storage: &mut dyn KvStore, chain_id: ChainId) -> Result<u32, StorageError> {
        let key = self.generation_key(chain_id);
        let next = self
            .generation(storage, chain_id)?
            .checked_add(1)
            .ok_or_else(|| StorageError::corrupted(&key, CodecError::InvalidValue("generation exhausted".into())))?;
        storage.put(&key, next.to_le_bytes().to_vec())?;
        Ok(next)
    }

    fn key(
        &self,
        storage: &dyn KvStore,
        prefix: &[u8],
        chain_id: ChainId,
        suffix: &[u8],
    ) -> Result<Vec<u8>, StorageError> {
        let generation = self.generation(storage, chain_id)?;
        Ok(concat_key(&[
            &self.contract,
            prefix,
            &chain_id.to_le_bytes(),
            &generation.to_le_bytes(),
            suffix,
        ]))
    }

    // -------------------------------------------------------------------------
    // Headers
    // -------------------------------------------------------------------------

    /// Header stored under `hash`.
    pub fn header_by_hash(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        hash: &Hash,
    ) -> Result<Option<Header>, StorageError> {
        let key = self.key(storage, BLOCK_HEADER, chain_id, hash)?;
        match storage.get(&key)? {
            Some(raw) => Header::deserialize(&raw)
                .map(Some)
                .map_err(|e| corrupted_header(&key, e)),
            None => Ok(None),
        }
    }

    /// Hash of the header committed at `height`.
    pub fn hash_at(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        height: u32,
    ) -> Result<Option<Hash>, StorageError> {
        let key = self.key(storage, HEADER_INDEX, chain_id, &height.to_le_bytes())?;
        match storage.get(&key)? {
            Some(raw) => raw
                .as_slice()
                .try_into()
                .map(Some)
                .map_err(|_| StorageError::corrupted(&key, CodecError::InvalidValue("hash must be 32 bytes".into()))),
            None => Ok(None),
        }
    }

    /// Header committed at `height`.
    pub fn header_by_height(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        height: u32,
    ) -> Result<Option<Header>, StorageError> {
        match self.hash_at(storage, chain_id, height)? {
            Some(hash) => self.header_by_hash(storage, chain_id, &hash),
            None => Ok(None),
        }
    }

    /// Highest committed height.
    pub fn current_height(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
    ) -> Result<Option<u32>, StorageError> {
        let key = self.key(storage, CURRENT_HEIGHT, chain_id, &[])?;
        match storage.get(&key)? {
            Some(raw) => read_u32(&key, &raw, "height must be 4 bytes").map(Some),
            None => Ok(None),
        }
    }

    /// Commit `header`: body by hash, height index, height cursor.
    pub fn put_header(&self, storage: &mut dyn KvStore, header: &Header) -> Result<(), StorageError> {
        let chain_id = header.chain_id();
        let height = header.height();
        let hash = header.hash();
        let body_key = self.key(&*storage, BLOCK_HEADER, chain_id, &hash)?;
        storage.put(&body_key, header.serialize())?;
        let index_key = self.key(&*storage, HEADER_INDEX, chain_id, &height.to_le_bytes())?;
        storage.put(&index_key, hash.to_vec())?;
        let current = self.current_height(&*storage, chain_id)?;
        if current.map_or(true, |c| height > c) {
            let cursor_key = self.key(&*storage, CURRENT_HEIGHT, chain_id, &[])?;
            storage.put(&cursor_key, height.to_le_bytes().to_vec())?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Validator sets
    // -------------------------------------------------------------------------

    /// Key heights of `chain_id`; empty if none were registered.
    pub fn key_heights(&self, storage: &dyn KvStore, chain_id: ChainId) -> Result<KeyHeights, StorageError> {
        let key = self.key(storage, KEY_HEIGHTS, chain_id, &[])?;
        match storage.get(&key)? {
            Some(raw) => KeyHeights::from_bytes(&raw).map_err(|e| StorageError::corrupted(&key, e)),
            None => Ok(KeyHeights::new()),
        }
    }

    /// Validator set registered at exactly `key_height`.
    pub fn consensus_peers(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        key_height: u32,
    ) -> Result<Option<ConsensusPeers>, StorageError> {
        let key = self.key(storage, CONSENSUS_PEER, chain_id, &key_height.to_le_bytes())?;
        match storage.get(&key)? {
            Some(raw) => ConsensusPeers::from_bytes(&raw)
                .map(Some)
                .map_err(|e| StorageError::corrupted(&key, e)),
            None => Ok(None),
        }
    }

    /// Register `peers` as effective from `height` and record the key height.
    pub fn put_consensus_peers(
        &self,
        storage: &mut dyn KvStore,
        chain_id: ChainId,
        height: u32,
        peers: &ConsensusPeers,
    ) -> Result<(), StorageError> {
        let peers_key = self.key(&*storage, CONSENSUS_PEER, chain_id, &height.to_le_bytes())?;
        storage.put(&peers_key, peers.to_bytes())?;
        let mut heights = self.key_heights(&*storage, chain_id)?;
        heights.insert(height);
        let heights_key = self.key(&*storage, KEY_HEIGHTS, chain_id, &[])?;
        storage.put(&heights_key, heights.to_bytes())
    }
}

fn read_u32(key: &[u8], raw: &[u8], what: &str) -> Result<u32, StorageError> {
    raw.try_into()
        .map(u32::from_le_bytes)
        .map_err(|_| StorageError::corrupted(key, CodecError::InvalidValue(what.into())))
}

fn corrupted_header(key: &[u8], err: HeaderError) -> StorageError {
    match err {
        HeaderError::Malformed(codec) => StorageError::corrupted(key, codec),
        other => StorageError::corrupted(key, CodecError::InvalidValue(other.to_string())),
    }
}
