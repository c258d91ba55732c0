//! # Registry Storage
//!
//! | Key | Value |
//! |-----|-------|
//! | `contract · "admin"` | administrator address |
//! | `contract · "sideChain" · chain` | [`SideChain`] |
//! | `contract · "inflationInfo" · chain` | [`InflationInfo`] |
//! | `contract · "sideChainNodeInfo" · chain` | [`SideChainNodeInfo`] |
//!
//! Chain ids are u64 LE.

use shared_types::{concat_key, Address, ChainId, CodecError, Decode, Encode, KvStore, StorageError};

use crate::domain::{InflationInfo, SideChain, SideChainNodeInfo};

const ADMIN: &[u8] = b"admin";
const SIDE_CHAIN: &[u8] = b"sideChain";
const INFLATION_INFO: &[u8] = b"inflationInfo";
const NODE_INFO: &[u8] = b"sideChainNodeInfo";

/// Typed access to registry records over any [`KvStore`].
#[derive(Clone, Copy, Debug)]
pub struct RegistryStore {
    contract: Address,
}

impl RegistryStore {
    /// Store namespaced under `contract`.
    pub fn new(contract: Address) -> Self {
        Self { contract }
    }

    fn chain_key(&self, prefix: &[u8], chain_id: ChainId) -> Vec<u8> {
        concat_key(&[&self.contract, prefix, &chain_id.to_le_bytes()])
    }

    fn read<T: Decode>(storage: &dyn KvStore, key: &[u8]) -> Result<Option<T>, StorageError> {
        match storage.get(key)? {
            Some(raw) => T::from_bytes(&raw)
                .map(Some)
                .map_err(|e| StorageError::corrupted(key, e)),
            None => Ok(None),
        }
    }

    /// Registry administrator.
    pub fn admin(&self, storage: &dyn KvStore) -> Result<Option<Address>, StorageError> {
        let key = concat_key(&[&self.contract, ADMIN]);
        match storage.get(&key)? {
            Some(raw) => raw.as_slice().try_into().map(Some).map_err(|_| {
                StorageError::corrupted(&key, CodecError::InvalidAddressLength(raw.len()))
            }),
            None => Ok(None),
        }
    }

    /// Set the registry administrator.
    pub fn put_admin(&self, storage: &mut dyn KvStore, admin: &Address) -> Result<(), StorageError> {
        storage.put(&concat_key(&[&self.contract, ADMIN]), admin.to_vec())
    }

    /// Side chain `chain_id`.
    pub fn side_chain(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
    ) -> Result<Option<SideChain>, StorageError> {
        Self::read(storage, &self.chain_key(SIDE_CHAIN, chain_id))
    }

    /// Write a side-chain record.
    pub fn put_side_chain(
        &self,
        storage: &mut dyn KvStore,
        side_chain: &SideChain,
    ) -> Result<(), StorageError> {
        storage.put(
            &self.chain_key(SIDE_CHAIN, side_chain.chain_id),
            side_chain.to_bytes(),
        )
    }

    /// Remove a side chain with its pending inflation and node table.
    pub fn delete_side_chain(
        &self,
        storage: &mut dyn KvStore,
        chain_id: ChainId,
    ) -> Result<(), StorageError> {
        storage.delete(&self.chain_key(SIDE_CHAIN, chain_id))?;
        storage.delete(&self.chain_key(INFLATION_INFO, chain_id))?;
        storage.delete(&self.chain_key(NODE_INFO, chain_id))
    }

    /// Pending inflation of `chain_id`.
    pub fn inflation(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
    ) -> Result<Option<InflationInfo>, StorageError> {
        Self::read(storage, &self.chain_key(INFLATION_INFO, chain_id))
    }

    /// Record a pending inflation, replacing any previous one.
    pub fn put_inflation(
        &self,
        storage: &mut dyn KvStore,
        info: &InflationInfo,
    ) -> Result<(), StorageError> {
        storage.put(&self.chain_key(INFLATION_INFO, info.chain_id), info.to_bytes())
    }

    /// Drop the pending inflation of `chain_id`.
    pub fn delete_inflation(
        &self,
        storage: &mut dyn KvStore,
        chain_id: ChainId,
    ) -> Result<(), StorageError> {
        storage.delete(&self.chain_key(INFLATION_INFO, chain_id))
    }

    /// Nodes registered to `chain_id` (empty if none).
    pub fn node_info(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
    ) -> Result<SideChainNodeInfo, StorageError> {
        Ok(Self::read(storage, &self.chain_key(NODE_INFO, chain_id))?
            .unwrap_or_else(|| SideChainNodeInfo::new(chain_id)))
    }

    /// Write the node table, deleting it once empty.
    pub fn put_node_info(
        &self,
        storage: &mut dyn KvStore,
        info: &SideChainNodeInfo,
    ) -> Result<(), StorageError> {
        let key = self.chain_key(NODE_INFO, info.chain_id);
        if info.nodes.is_empty() {
            storage.delete(&key)
        } else {
            storage.put(&key, info.to_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SideChainStatus;
    use shared_types::MemoryStore;

    fn chain(chain_id: ChainId) -> SideChain {
        SideChain {
            chain_id,
            admin: [1u8; 20],
            ratio: 1,
            deposit: 10,
            fee_pool: 0,
            fee_pool_cap: 100,
            status: SideChainStatus::Registered,
            genesis_header: Vec::new(),
        }
    }

    #[test]
    fn test_admin() {
        let store = RegistryStore::new([0x0E; 20]);
        let mut kv = MemoryStore::new();
        assert_eq!(store.admin(&kv).unwrap(), None);
        store.put_admin(&mut kv, &[9u8; 20]).unwrap();
        assert_eq!(store.admin(&kv).unwrap(), Some([9u8; 20]));
    }

    #[test]
    fn test_delete_side_chain_clears_related_records() {
        let store = RegistryStore::new([0x0E; 20]);
        let mut kv = MemoryStore::new();
        store.put_side_chain(&mut kv, &chain(7)).unwrap();
        store.put_side_chain(&mut kv, &chain(8)).unwrap();
        store
            .put_inflation(
                &mut kv,
                &InflationInfo {
                    chain_id: 7,
                    proposer: [1u8; 20],
                    deposit_add: 1,
                    pool_cap_add: 1,
                },
            )
            .unwrap();

        store.delete_side_chain(&mut kv, 7).unwrap();
        assert!(store.side_chain(&kv, 7).unwrap().is_none());
        assert!(store.inflation(&kv, 7).unwrap().is_none());
        assert_eq!(store.side_chain(&kv, 8).unwrap(), Some(chain(8)));
    }

    #[test]
    fn test_corrupted_record_reported() {
        let store = RegistryStore::new([0x0E; 20]);
        let mut kv = MemoryStore::new();
        kv.put(&store.chain_key(SIDE_CHAIN, 7), vec![1, 2, 3]).unwrap();
        assert!(matches!(
            store.side_chain(&kv, 7),
            Err(StorageError::Corrupted { .. })
        ));
    }
}
