//! # In-Memory Contract Adapters
//!
//! `ExternalCall` implementations used by local nodes and tests:
//!
//! - [`InMemoryTokenLedger`]: balances kept in contract storage
//! - [`RecordingContract`]: destination contract that logs every call
//! - [`ContractRouter`]: routes calls by contract address
//!
//! All of them write through the caller's staged storage, so their effects
//! roll back with a failed invocation. The ledger only moves funds out of
//! accounts the [`Caller`] may act for.

use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{Decode, Encode, Sink, Source};
use crate::context::{Caller, ExternalCall, ExternalCallError};
use crate::entities::Address;
use crate::errors::{CodecError, StorageError};
use crate::storage::{concat_key, KvStore};
use crate::token::{Transfers, TRANSFER_METHOD};

const BALANCE: &[u8] = b"balance";
const CALLS: &[u8] = b"calls";

// =============================================================================
// TOKEN LEDGER
// =============================================================================

/// Token contract keeping u64 balances in storage.
#[derive(Debug, Clone)]
pub struct InMemoryTokenLedger {
    address: Address,
}

impl InMemoryTokenLedger {
    /// Ledger deployed at `address`.
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    fn balance_key(&self, owner: &Address) -> Vec<u8> {
        concat_key(&[&self.address, BALANCE, owner])
    }

    /// Balance of `owner`.
    pub fn balance_of(&self, store: &dyn KvStore, owner: &Address) -> Result<u64, StorageError> {
        let key = self.balance_key(owner);
        match store.get(&key)? {
            None => Ok(0),
            Some(raw) => {
                let bytes: [u8; 8] = raw
                    .as_slice()
                    .try_into()
                    .map_err(|_| StorageError::corrupted(&key, CodecError::InvalidValue("balance".into())))?;
                Ok(u64::from_le_bytes(bytes))
            }
        }
    }

    fn set_balance(
        &self,
        store: &mut dyn KvStore,
        owner: &Address,
        value: u64,
    ) -> Result<(), StorageError> {
        let key = self.balance_key(owner);
        if value == 0 {
            store.delete(&key)
        } else {
            store.put(&key, value.to_le_bytes().to_vec())
        }
    }

    /// Credit `owner` with freshly issued tokens.
    pub fn mint(
        &self,
        store: &mut dyn KvStore,
        owner: &Address,
        amount: u64,
    ) -> Result<(), ExternalCallError> {
        let balance = self.balance_of(store, owner)?;
        let updated = balance
            .checked_add(amount)
            .ok_or_else(|| ExternalCallError::new(&self.address, "mint", "balance overflow"))?;
        self.set_balance(store, owner, updated)?;
        Ok(())
    }

    fn transfer(
        &self,
        store: &mut dyn KvStore,
        caller: Caller<'_>,
        transfers: &Transfers,
    ) -> Result<(), ExternalCallError> {
        for state in &transfers.states {
            if !caller.authorizes(&state.from) {
                return Err(ExternalCallError::new(
                    &self.address,
                    TRANSFER_METHOD,
                    format!(
                        "{} may not spend from {}",
                        hex::encode(caller.contract()),
                        hex::encode(state.from)
                    ),
                ));
            }
            let from_balance = self.balance_of(store, &state.from)?;
            let remaining = from_balance.checked_sub(state.value).ok_or_else(|| {
                ExternalCallError::new(
                    &self.address,
                    TRANSFER_METHOD,
                    format!(
                        "insufficient balance: {} has {}, needs {}",
                        hex::encode(state.from),
                        from_balance,
                        state.value
                    ),
                )
            })?;
            self.set_balance(store, &state.from, remaining)?;

            let to_balance = self.balance_of(store, &state.to)?;
            let credited = to_balance.checked_add(state.value).ok_or_else(|| {
                ExternalCallError::new(&self.address, TRANSFER_METHOD, "balance overflow")
            })?;
            self.set_balance(store, &state.to, credited)?;
        }
        Ok(())
    }
}

impl ExternalCall for InMemoryTokenLedger {
    fn invoke(
        &self,
        storage: &mut dyn KvStore,
        caller: Caller<'_>,
        contract: &Address,
        method: &str,
        args: &[u8],
    ) -> Result<Vec<u8>, ExternalCallError> {
        if contract != &self.address {
            return Err(ExternalCallError::new(contract, method, "unknown contract"));
        }
        if method != TRANSFER_METHOD {
            return Err(ExternalCallError::new(contract, method, "unknown method"));
        }
        let transfers = Transfers::from_bytes(args)
            .map_err(|e| ExternalCallError::new(contract, method, e.to_string()))?;
        self.transfer(storage, caller, &transfers)?;
        Ok(crate::entities::BYTE_TRUE.to_vec())
    }
}

// =============================================================================
// RECORDING CONTRACT
// =============================================================================

/// One call observed by a [`RecordingContract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Method name.
    pub method: String,
    /// Raw arguments.
    pub args: Vec<u8>,
}

impl Encode for RecordedCall {
    fn encode(&self, sink: &mut Sink) {
        sink.write_string(&self.method);
        sink.write_var_bytes(&self.args);
    }
}

impl Decode for RecordedCall {
    fn decode(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            method: source.read_string()?,
            args: source.read_var_bytes()?.to_vec(),
        })
    }
}

/// Destination contract that appends each call to its own storage.
#[derive(Debug, Clone)]
pub struct RecordingContract {
    address: Address,
    failing_method: Option<String>,
}

impl RecordingContract {
    /// Contract at `address` accepting every method.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            failing_method: None,
        }
    }

    /// Make calls to `method` fail.
    pub fn failing_on(mut self, method: impl Into<String>) -> Self {
        self.failing_method = Some(method.into());
        self
    }

    /// Calls recorded in `store`, oldest first.
    pub fn calls(&self, store: &dyn KvStore) -> Result<Vec<RecordedCall>, StorageError> {
        let key = concat_key(&[&self.address, CALLS]);
        let Some(raw) = store.get(&key)? else {
            return Ok(Vec::new());
        };
        let mut source = Source::new(&raw);
        let mut calls = Vec::new();
        while !source.is_empty() {
            calls.push(RecordedCall::decode(&mut source).map_err(|e| StorageError::corrupted(&key, e))?);
        }
        Ok(calls)
    }
}

impl ExternalCall for RecordingContract {
    fn invoke(
        &self,
        storage: &mut dyn KvStore,
        _caller: Caller<'_>,
        contract: &Address,
        method: &str,
        args: &[u8],
    ) -> Result<Vec<u8>, ExternalCallError> {
        if self.failing_method.as_deref() == Some(method) {
            return Err(ExternalCallError::new(contract, method, "execution reverted"));
        }
        let key = concat_key(&[&self.address, CALLS]);
        let mut log = storage.get(&key)?.unwrap_or_default();
        log.extend(
            RecordedCall {
                method: method.to_string(),
                args: args.to_vec(),
            }
            .to_bytes(),
        );
        storage.put(&key, log)?;
        Ok(crate::entities::BYTE_TRUE.to_vec())
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Dispatches external calls by contract address.
#[derive(Default, Clone)]
pub struct ContractRouter {
    routes: HashMap<Address, Arc<dyn ExternalCall>>,
}

impl ContractRouter {
    /// Router with no contracts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `contract` at `address`.
    pub fn with_contract(mut self, address: Address, contract: Arc<dyn ExternalCall>) -> Self {
        self.routes.insert(address, contract);
        self
    }

    /// Register `contract` at `address`.
    pub fn register(&mut self, address: Address, contract: Arc<dyn ExternalCall>) {
        self.routes.insert(address, contract);
    }
}

impl ExternalCall for ContractRouter {
    fn invoke(
        &self,
        storage: &mut dyn KvStore,
        caller: Caller<'_>,
        contract: &Address,
        method: &str,
        args: &[u8],
    ) -> Result<Vec<u8>, ExternalCallError> {
        let target = self
            .routes
            .get(contract)
            .ok_or_else(|| ExternalCallError::new(contract, method, "no contract at address"))?;
        target.invoke(storage, caller, contract, method, args)
    }
}
