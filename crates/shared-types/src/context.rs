//! # Native Invocation Context
//!
//! Everything an entry point may touch during one invocation:
//!
//! - storage, staged over a committed snapshot
//! - `CheckWitness` over the transaction's signers
//! - synchronous external calls into other contracts, made under the
//!   authority of a calling contract
//! - the notification buffer (only filled when event logging is on)
//!
//! An invocation either finishes, yielding an [`Invocation`] whose change set
//! the caller applies, or is dropped and leaves no trace.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::entities::{Address, Notification};
use crate::errors::StorageError;
use crate::storage::{ChangeSet, KvStore, StagedStore};

/// Authorization check for the current transaction.
pub trait Witness {
    /// True iff the transaction was authorized by `address`.
    fn check_witness(&self, address: &Address) -> bool;
}

/// Set of addresses that signed the current transaction.
#[derive(Debug, Default, Clone)]
pub struct SignerSet(BTreeSet<Address>);

impl SignerSet {
    /// Signer set from addresses.
    pub fn new(signers: impl IntoIterator<Item = Address>) -> Self {
        Self(signers.into_iter().collect())
    }

    /// Signer set with no signers.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Witness for SignerSet {
    fn check_witness(&self, address: &Address) -> bool {
        self.0.contains(address)
    }
}

/// Failure of an external contract call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("External call {method} on {contract} failed: {reason}")]
pub struct ExternalCallError {
    /// Hex address of the callee
    pub contract: String,
    /// Method invoked
    pub method: String,
    /// Failure description
    pub reason: String,
}

impl ExternalCallError {
    /// Build an error for `contract.method`.
    pub fn new(contract: &Address, method: &str, reason: impl Into<String>) -> Self {
        Self {
            contract: hex::encode(contract),
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<StorageError> for ExternalCallError {
    fn from(err: StorageError) -> Self {
        Self {
            contract: String::new(),
            method: String::new(),
            reason: err.to_string(),
        }
    }
}

/// Authority a callee sees: the calling contract, and the transaction's
/// signers unless the call executes a relayed payload.
#[derive(Clone, Copy)]
pub struct Caller<'a> {
    contract: Address,
    witness: Option<&'a dyn Witness>,
}

impl<'a> Caller<'a> {
    /// Call made by `contract` on behalf of the transaction's signers.
    pub fn new(contract: Address, witness: &'a dyn Witness) -> Self {
        Self {
            contract,
            witness: Some(witness),
        }
    }

    /// Call carrying only the authority of `contract` itself.
    pub fn contract_only(contract: Address) -> Self {
        Self {
            contract,
            witness: None,
        }
    }

    /// Address of the calling contract.
    pub fn contract(&self) -> &Address {
        &self.contract
    }

    /// True iff this call may act for `address`.
    pub fn authorizes(&self, address: &Address) -> bool {
        address == &self.contract || self.witness.is_some_and(|w| w.check_witness(address))
    }
}

/// Synchronous call into another contract.
///
/// The callee writes through `storage`, which is the caller's staged overlay,
/// so its effects commit or vanish together with the caller's.
pub trait ExternalCall: Send + Sync {
    /// Invoke `method` on `contract` with encoded `args` under `caller`'s
    /// authority.
    fn invoke(
        &self,
        storage: &mut dyn KvStore,
        caller: Caller<'_>,
        contract: &Address,
        method: &str,
        args: &[u8],
    ) -> Result<Vec<u8>, ExternalCallError>;
}

/// Result of a successful invocation.
#[derive(Debug, Default)]
pub struct Invocation {
    /// Writes to apply to the committed store.
    pub changes: ChangeSet,
    /// Notifications emitted, in order.
    pub notifications: Vec<Notification>,
}

/// Per-invocation execution context.
pub struct NativeContext<'a> {
    storage: StagedStore<'a>,
    witness: &'a dyn Witness,
    calls: &'a dyn ExternalCall,
    height: u32,
    enable_event_log: bool,
    notifications: Vec<Notification>,
}

impl<'a> NativeContext<'a> {
    /// Context over a committed snapshot.
    pub fn new(
        base: &'a dyn KvStore,
        witness: &'a dyn Witness,
        calls: &'a dyn ExternalCall,
    ) -> Self {
        Self {
            storage: StagedStore::new(base),
            witness,
            calls,
            height: 0,
            enable_event_log: false,
            notifications: Vec::new(),
        }
    }

    /// Set the height of the block executing this invocation.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Enable or disable observer notifications.
    pub fn with_event_log(mut self, enabled: bool) -> Self {
        self.enable_event_log = enabled;
        self
    }

    /// Height of the executing block.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True iff the transaction was authorized by `address`.
    pub fn check_witness(&self, address: &Address) -> bool {
        self.witness.check_witness(address)
    }

    /// Call another contract through the staged storage as `caller`, with
    /// the transaction's signers as witnesses.
    pub fn invoke(
        &mut self,
        caller: &Address,
        contract: &Address,
        method: &str,
        args: &[u8],
    ) -> Result<Vec<u8>, ExternalCallError> {
        let authority = Caller::new(*caller, self.witness);
        self.call(authority, contract, method, args)
    }

    /// Call another contract as `caller` alone. Used to execute payloads the
    /// transaction's signers did not author.
    pub fn invoke_relayed(
        &mut self,
        caller: &Address,
        contract: &Address,
        method: &str,
        args: &[u8],
    ) -> Result<Vec<u8>, ExternalCallError> {
        self.call(Caller::contract_only(*caller), contract, method, args)
    }

    fn call(
        &mut self,
        caller: Caller<'_>,
        contract: &Address,
        method: &str,
        args: &[u8],
    ) -> Result<Vec<u8>, ExternalCallError> {
        let calls = self.calls;
        tracing::debug!(
            caller = %hex::encode(caller.contract()),
            contract = %hex::encode(contract),
            method,
            "external call"
        );
        calls.invoke(&mut self.storage, caller, contract, method, args)
    }

    /// Buffer a notification if event logging is enabled.
    pub fn notify(&mut self, contract: Address, event: &str, fields: serde_json::Value) {
        if !self.enable_event_log {
            return;
        }
        self.notifications
            .push(Notification::new(contract, event, fields));
    }

    /// Notifications buffered so far.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Number of staged writes.
    pub fn staged_len(&self) -> usize {
        self.storage.staged_len()
    }

    /// Close the invocation, yielding its writes and notifications.
    pub fn finish(self) -> Invocation {
        Invocation {
            changes: self.storage.into_change_set(),
            notifications: self.notifications,
        }
    }
}

impl KvStore for NativeContext<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        self.storage.get(key)
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StorageError> {
        self.storage.put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.storage.delete(key)
    }
}
