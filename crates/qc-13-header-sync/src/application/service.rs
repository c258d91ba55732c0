//! # Header Sync Service
//!
//! Application service ingesting side-chain headers.
//!
//! Every call runs inside one [`NativeContext`]: writes are staged and only
//! reach storage when the caller applies the finished invocation. A failing
//! header therefore discards the whole batch.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use qc_02_header_codec::Header;
use serde_json::json;
use shared_types::{Address, ChainId, Decode, Hash, KvStore, NativeContext};

use crate::adapters::HeaderSyncStore;
use crate::algorithms::verify_batch;
use crate::config::HeaderSyncConfig;
use crate::domain::{
    ConsensusPeers, HeaderSyncError, KeyHeights, SyncBlockHeaderParam, SyncSummary,
};
use crate::ports::HeaderSyncApi;

/// Event emitted for each committed header.
pub const SYNC_BLOCK_HEADER_EVENT: &str = "syncBlockHeader";

/// A header that passed the planning pass, waiting for verification.
struct Planned<'h> {
    header: &'h Header,
    key_height: u32,
    rotation: Option<ConsensusPeers>,
}

/// Header Sync Service - verifies and commits side-chain headers.
#[derive(Clone, Debug)]
pub struct HeaderSyncService {
    /// Configuration.
    config: HeaderSyncConfig,
    /// Storage layout.
    store: HeaderSyncStore,
}

impl HeaderSyncService {
    /// Create a new header sync service.
    pub fn new(config: HeaderSyncConfig) -> Self {
        let store = HeaderSyncStore::new(config.contract_address);
        Self { config, store }
    }

    /// Service configuration.
    pub fn config(&self) -> &HeaderSyncConfig {
        &self.config
    }

    /// Storage layout used by this service.
    pub fn store(&self) -> &HeaderSyncStore {
        &self.store
    }

    /// `syncBlockHeader` entry point: decode the parameter blob and sync.
    pub fn sync_block_header(
        &self,
        ctx: &mut NativeContext<'_>,
        input: &[u8],
    ) -> Result<SyncSummary, HeaderSyncError> {
        let param = SyncBlockHeaderParam::from_bytes(input)?;
        self.sync_headers(ctx, &param.headers)
    }

    /// Decide, in submission order, which headers to commit and which key
    /// height verifies each. Rotations announced earlier in the batch are
    /// visible to later headers.
    fn plan<'h>(
        &self,
        storage: &dyn KvStore,
        headers: &'h [Header],
        summary: &mut SyncSummary,
    ) -> Result<Vec<Planned<'h>>, HeaderSyncError> {
        let mut key_heights: HashMap<ChainId, KeyHeights> = HashMap::new();
        let mut seen: HashSet<(ChainId, u32)> = HashSet::new();
        let mut planned = Vec::with_capacity(headers.len());

        for header in headers {
            let chain_id = header.chain_id();
            let height = header.height();

            if seen.contains(&(chain_id, height))
                || self.store.hash_at(storage, chain_id, height)?.is_some()
            {
                tracing::debug!("[qc-13] chain {} height {} already synced, skipping", chain_id, height);
                summary.skipped += 1;
                continue;
            }

            let heights = match key_heights.entry(chain_id) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => e.insert(self.store.key_heights(storage, chain_id)?),
            };
            let key_height = heights
                .floor(height)
                .ok_or(HeaderSyncError::NoTrustedValidatorSet { chain_id, height })?;

            let rotation = ConsensusPeers::from_payload(&header.consensus_payload()?);
            if rotation.is_some() {
                heights.insert(height);
            }

            seen.insert((chain_id, height));
            planned.push(Planned {
                header,
                key_height,
                rotation,
            });
        }
        Ok(planned)
    }

    /// Load every validator set the plan refers to.
    fn trusted_sets(
        &self,
        storage: &dyn KvStore,
        planned: &[Planned<'_>],
    ) -> Result<HashMap<(ChainId, u32), ConsensusPeers>, HeaderSyncError> {
        let mut sets = HashMap::new();
        for p in planned {
            if let Some(rotation) = &p.rotation {
                sets.insert((p.header.chain_id(), p.header.height()), rotation.clone());
            }
        }
        for p in planned {
            let chain_id = p.header.chain_id();
            let key = (chain_id, p.key_height);
            if sets.contains_key(&key) {
                continue;
            }
            let peers = self
                .store
                .consensus_peers(storage, chain_id, p.key_height)?
                .ok_or(HeaderSyncError::NoTrustedValidatorSet {
                    chain_id,
                    height: p.header.height(),
                })?;
            sets.insert(key, peers);
        }
        Ok(sets)
    }
}

impl HeaderSyncApi for HeaderSyncService {
    fn contract_address(&self) -> Address {
        self.config.contract_address
    }

    fn init_genesis_header(
        &self,
        ctx: &mut NativeContext<'_>,
        raw: &[u8],
    ) -> Result<Header, HeaderSyncError> {
        let header = Header::deserialize(raw)?;
        let chain_id = header.chain_id();

        if !self.store.key_heights(&*ctx, chain_id)?.is_empty() {
            return Err(HeaderSyncError::AlreadyInitialized { chain_id });
        }
        let peers = ConsensusPeers::from_payload(&header.consensus_payload()?)
            .ok_or(HeaderSyncError::GenesisWithoutValidators { chain_id })?;

        self.store.put_header(ctx, &header)?;
        self.store
            .put_consensus_peers(ctx, chain_id, header.height(), &peers)?;

        tracing::info!(
            "[qc-13] genesis header of chain {} trusted at height {} with {} validators",
            chain_id,
            header.height(),
            peers.len()
        );
        Ok(header)
    }

    fn remove_chain(&self, ctx: &mut NativeContext<'_>, chain_id: ChainId) -> Result<(), HeaderSyncError> {
        let generation = self.store.retire_chain(ctx, chain_id)?;
        tracing::info!(
            "[qc-13] trusted state of chain {} retired, generation {}",
            chain_id,
            generation
        );
        Ok(())
    }

    fn sync_headers(
        &self,
        ctx: &mut NativeContext<'_>,
        raw: &[Vec<u8>],
    ) -> Result<SyncSummary, HeaderSyncError> {
        if raw.len() > self.config.max_headers_per_batch {
            return Err(HeaderSyncError::BatchTooLarge {
                count: raw.len(),
                max: self.config.max_headers_per_batch,
            });
        }
        let headers = raw
            .iter()
            .map(|bytes| Header::deserialize(bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let mut summary = SyncSummary::default();
        let planned = self.plan(&*ctx, &headers, &mut summary)?;
        let sets = self.trusted_sets(&*ctx, &planned)?;

        let mut jobs = Vec::with_capacity(planned.len());
        for p in &planned {
            let key = (p.header.chain_id(), p.key_height);
            let trusted = sets.get(&key).ok_or(HeaderSyncError::NoTrustedValidatorSet {
                chain_id: key.0,
                height: p.header.height(),
            })?;
            jobs.push((p.header, trusted));
        }
        verify_batch(&jobs, self.config.verify_in_parallel)?;

        for p in planned {
            let chain_id = p.header.chain_id();
            let height = p.header.height();
            self.store.put_header(ctx, p.header)?;

            if let Some(peers) = &p.rotation {
                self.store.put_consensus_peers(ctx, chain_id, height, peers)?;
                tracing::info!(
                    "[qc-13] chain {} rotates to {} validators at height {}",
                    chain_id,
                    peers.len(),
                    height
                );
                summary.rotations.push((chain_id, height));
            }

            ctx.notify(
                self.config.contract_address,
                SYNC_BLOCK_HEADER_EVENT,
                json!({
                    "chainId": chain_id,
                    "height": height,
                    "blockHash": hex::encode(p.header.hash()),
                }),
            );
            summary.committed.push((chain_id, height));
        }

        tracing::info!(
            "[qc-13] committed {} headers, skipped {}",
            summary.committed.len(),
            summary.skipped
        );
        Ok(summary)
    }

    fn get_header_by_height(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        height: u32,
    ) -> Result<Header, HeaderSyncError> {
        self.store
            .header_by_height(storage, chain_id, height)?
            .ok_or(HeaderSyncError::HeaderNotFound { chain_id, height })
    }

    fn get_header_by_hash(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        hash: &Hash,
    ) -> Result<Header, HeaderSyncError> {
        self.store
            .header_by_hash(storage, chain_id, hash)?
            .ok_or_else(|| HeaderSyncError::HashNotFound {
                chain_id,
                hash: hex::encode(hash),
            })
    }

    fn current_height(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
    ) -> Result<Option<u32>, HeaderSyncError> {
        Ok(self.store.current_height(storage, chain_id)?)
    }

    fn get_consensus_peers(
        &self,
        storage: &dyn KvStore,
        chain_id: ChainId,
        height: u32,
    ) -> Result<(u32, ConsensusPeers), HeaderSyncError> {
        let missing = HeaderSyncError::NoTrustedValidatorSet { chain_id, height };
        let key_height = match self.store.key_heights(storage, chain_id)?.floor(height) {
            Some(h) => h,
            None => return Err(missing),
        };
        match self.store.consensus_peers(storage, chain_id, key_height)? {
            Some(peers) => Ok((key_height, peers)),
            None => Err(missing),
        }
    }
}
