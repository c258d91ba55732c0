//! # Relay Storage
//!
//! | Key | Value |
//! |-----|-------|
//! | `contract · "requestID" · chain` | last allocated sequence id, u64 LE |
//! | `contract · "request" · chain · seq` | request payload |
//! | `contract · "currentID" · chain` | highest relayed id, u64 LE |
//! | `contract · "remainedID" · chain` | [`RemainedIds`] |
//!
//! The request key doubles as the key proven inside a side chain's
//! cross-states trie.

use shared_types::{concat_key, Address, ChainId, CodecError, Decode, Encode, KvStore, StorageError};

use crate::domain::RemainedIds;

const REQUEST_ID: &[u8] = b"requestID";
const REQUEST: &[u8] = b"request";
const CURRENT_ID: &[u8] = b"currentID";
const REMAINED_ID: &[u8] = b"remainedID";

/// Key of request `seq` of `chain_id` recorded by the relay at `contract`.
pub fn request_key(contract: &Address, chain_id: ChainId, seq: u64) -> Vec<u8> {
    concat_key(&[contract, REQUEST, &chain_id.to_le_bytes(), &seq.to_le_bytes()])
}

/// Typed access to relay records over any [`KvStore`].
#[derive(Clone, Copy, Debug)]
pub struct CrossChainStore {
    contract: Address,
}

impl CrossChainStore {
    /// Store namespaced under `contract`.
    pub fn new(contract: Address) -> Self {
        Self { contract }
    }

    fn key(&self, prefix: &[u8], chain_id: ChainId) -> Vec<u8> {
        concat_key(&[&self.contract, prefix, &chain_id.to_le_bytes()])
    }

    fn read_u64(storage: &dyn KvStore, key: &[u8]) -> Result<u64, StorageError> {
        match storage.get(key)? {
            Some(raw) => raw
                .as_slice()
                .try_into()
                .map(u64::from_le_bytes)
                .map_err(|_| {
                    StorageError::corrupted(key, CodecError::InvalidValue("id must be 8 bytes".into()))
                }),
            None => Ok(0),
        }
    }

    /// Last sequence id allocated for `chain_id` (0 if none).
    pub fn request_id(&self, storage: &dyn KvStore, chain_id: ChainId) -> Result<u64, StorageError> {
        Self::read_u64(storage, &self.key(REQUEST_ID, chain_id))
    }

    /// Record `seq` as the last allocated id and store its payload.
    pub fn put_request(
        &self,
        storage: &mut dyn KvStore,
        chain_id: ChainId,
        seq: u64,
        payload: Vec<u8>,
    ) -> Result<(), StorageError> {
        storage.put(&request_key(&self.contract, chain_id, seq), payload)?;
        storage.put(&self.key(REQUEST_ID, chain_id), seq.to_le_bytes().to_vec())
    }

    /// Stored payload of request `seq`.
    pub fn request(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        seq: u64,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        storage.get(&request_key(&self.contract, chain_id, seq))
    }

    /// Highest sequence id relayed for `chain_id` (0 if none).
    pub fn current_id(&self, storage: &dyn KvStore, chain_id: ChainId) -> Result<u64, StorageError> {
        Self::read_u64(storage, &self.key(CURRENT_ID, chain_id))
    }

    /// Set the highest relayed id.
    pub fn put_current_id(
        &self,
        storage: &mut dyn KvStore,
        chain_id: ChainId,
        id: u64,
    ) -> Result<(), StorageError> {
        storage.put(&self.key(CURRENT_ID, chain_id), id.to_le_bytes().to_vec())
    }

    /// Ids still owed for `chain_id`.
    pub fn remained_ids(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
    ) -> Result<RemainedIds, StorageError> {
        let key = self.key(REMAINED_ID, chain_id);
        match storage.get(&key)? {
            Some(raw) => RemainedIds::from_bytes(&raw).map_err(|e| StorageError::corrupted(&key, e)),
            None => Ok(RemainedIds::new()),
        }
    }

    /// Write the owed ids, deleting the record once empty.
    pub fn put_remained_ids(
        &self,
        storage: &mut dyn KvStore,
        chain_id: ChainId,
        ids: &RemainedIds,
    ) -> Result<(), StorageError> {
        let key = self.key(REMAINED_ID, chain_id);
        if ids.is_empty() {
            storage.delete(&key)
        } else {
            storage.put(&key, ids.to_bytes())
        }
    }
}
