//! # Native Registry - Dispatch Table
//!
//! Maps every native entry point to its handler. The execution engine calls
//! [`NativeRegistry::invoke`] once per transaction; the handler runs against
//! a staged view of storage and its writes are committed only on success.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      NativeRegistry                          │
//! │                                                              │
//! │  "syncBlockHeader" ─────┐                                    │
//! │  "registerSideChain" ───┼──► NativeMethod ──► Handler        │
//! │  "processCrossChainTx" ─┘                        │           │
//! │                                                  ▼           │
//! │                         NativeContext (staged writes, events)│
//! │                                                  │           │
//! │                           Ok ──► commit    Err ──► discard   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use shared_types::{
    ExternalCall, Invocation, KvStore, NativeContext, Notification, Witness, BYTE_TRUE,
};
use tracing::{debug, info, warn};

use crate::container::SubsystemContainer;
use crate::errors::NativeError;

/// Every native entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeMethod {
    /// QC-13: verify and commit a header batch.
    SyncBlockHeader,
    /// QC-14: set the registry administrator.
    InitConfig,
    /// QC-14: propose a side chain.
    RegisterSideChain,
    /// QC-14: activate a registered side chain.
    ApproveSideChain,
    /// QC-14: refuse a registered side chain.
    RejectSideChain,
    /// QC-14: request to leave.
    QuitSideChain,
    /// QC-14: accept a quit request.
    ApproveQuitSideChain,
    /// QC-14: forcibly remove a side chain.
    BlackSideChain,
    /// QC-14: propose a deposit and pool-cap increase.
    Inflation,
    /// QC-14: apply the pending increase.
    ApproveInflation,
    /// QC-14: drop the pending increase.
    RejectInflation,
    /// QC-14: register a governance peer as side-chain node.
    RegisterNodeToSideChain,
    /// QC-14: remove a side-chain node.
    QuitNodeToSideChain,
    /// QC-15: charge a fee and record a request.
    CreateCrossChainTx,
    /// QC-15: relay a proven request.
    ProcessCrossChainTx,
}

impl NativeMethod {
    /// Method name used by the execution engine.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SyncBlockHeader => "syncBlockHeader",
            Self::InitConfig => "initConfig",
            Self::RegisterSideChain => "registerSideChain",
            Self::ApproveSideChain => "approveSideChain",
            Self::RejectSideChain => "rejectSideChain",
            Self::QuitSideChain => "quitSideChain",
            Self::ApproveQuitSideChain => "approveQuitSideChain",
            Self::BlackSideChain => "blackSideChain",
            Self::Inflation => "inflation",
            Self::ApproveInflation => "approveInflation",
            Self::RejectInflation => "rejectInflation",
            Self::RegisterNodeToSideChain => "registerNodeToSideChain",
            Self::QuitNodeToSideChain => "quitNodeToSideChain",
            Self::CreateCrossChainTx => "createCrossChainTx",
            Self::ProcessCrossChainTx => "processCrossChainTx",
        }
    }

    /// Subsystem owning the method.
    #[must_use]
    pub fn subsystem(&self) -> &'static str {
        match self {
            Self::SyncBlockHeader => "qc-13-header-sync",
            Self::CreateCrossChainTx | Self::ProcessCrossChainTx => "qc-15-cross-chain",
            _ => "qc-14-chain-registry",
        }
    }

    /// All methods.
    #[must_use]
    pub fn all() -> Vec<NativeMethod> {
        vec![
            Self::SyncBlockHeader,
            Self::InitConfig,
            Self::RegisterSideChain,
            Self::ApproveSideChain,
            Self::RejectSideChain,
            Self::QuitSideChain,
            Self::ApproveQuitSideChain,
            Self::BlackSideChain,
            Self::Inflation,
            Self::ApproveInflation,
            Self::RejectInflation,
            Self::RegisterNodeToSideChain,
            Self::QuitNodeToSideChain,
            Self::CreateCrossChainTx,
            Self::ProcessCrossChainTx,
        ]
    }
}

impl FromStr for NativeMethod {
    type Err = NativeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| NativeError::UnknownMethod(s.to_string()))
    }
}

/// Entry-point handler. Success carries the return payload.
pub type Handler =
    fn(&SubsystemContainer, &mut NativeContext<'_>, &[u8]) -> Result<Vec<u8>, NativeError>;

macro_rules! handler {
    ($service:ident . $op:ident) => {{
        fn handle(
            c: &SubsystemContainer,
            ctx: &mut NativeContext<'_>,
            input: &[u8],
        ) -> Result<Vec<u8>, NativeError> {
            c.$service.$op(ctx, input)?;
            Ok(BYTE_TRUE.to_vec())
        }
        handle as Handler
    }};
}

fn handler_for(method: NativeMethod) -> Handler {
    match method {
        NativeMethod::SyncBlockHeader => handler!(header_sync.sync_block_header),
        NativeMethod::InitConfig => handler!(registry.init_config),
        NativeMethod::RegisterSideChain => handler!(registry.register_side_chain),
        NativeMethod::ApproveSideChain => handler!(registry.approve_side_chain),
        NativeMethod::RejectSideChain => handler!(registry.reject_side_chain),
        NativeMethod::QuitSideChain => handler!(registry.quit_side_chain),
        NativeMethod::ApproveQuitSideChain => handler!(registry.approve_quit_side_chain),
        NativeMethod::BlackSideChain => handler!(registry.black_side_chain),
        NativeMethod::Inflation => handler!(registry.inflation),
        NativeMethod::ApproveInflation => handler!(registry.approve_inflation),
        NativeMethod::RejectInflation => handler!(registry.reject_inflation),
        NativeMethod::RegisterNodeToSideChain => handler!(registry.register_node_to_side_chain),
        NativeMethod::QuitNodeToSideChain => handler!(registry.quit_node_to_side_chain),
        NativeMethod::CreateCrossChainTx => handler!(cross_chain.create_cross_chain_tx),
        NativeMethod::ProcessCrossChainTx => handler!(cross_chain.process_cross_chain_tx),
    }
}

/// Transaction environment supplied by the execution engine.
#[derive(Clone, Copy)]
pub struct InvocationEnv<'a> {
    /// Addresses that authorized the transaction.
    pub witness: &'a dyn Witness,
    /// Other contracts reachable from this invocation.
    pub calls: &'a dyn ExternalCall,
    /// Height of the executing block.
    pub height: u32,
}

/// Result of a committed invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeOutcome {
    /// Handler return payload.
    pub output: Vec<u8>,
    /// Notifications emitted, empty when event logging is off.
    pub notifications: Vec<Notification>,
    /// Keys written or deleted by the commit.
    pub writes: usize,
}

/// The native dispatch table.
pub struct NativeRegistry {
    container: Arc<SubsystemContainer>,
    handlers: HashMap<NativeMethod, Handler>,
}

impl NativeRegistry {
    /// Build the dispatch table over `container`.
    pub fn new(container: Arc<SubsystemContainer>) -> Self {
        let handlers: HashMap<NativeMethod, Handler> = NativeMethod::all()
            .into_iter()
            .map(|m| (m, handler_for(m)))
            .collect();
        info!("[runtime] native registry ready with {} methods", handlers.len());
        Self {
            container,
            handlers,
        }
    }

    /// Services behind the table, for read-only queries.
    pub fn container(&self) -> &SubsystemContainer {
        &self.container
    }

    /// Run the method named `method` and commit its writes into `storage`.
    pub fn invoke(
        &self,
        storage: &mut dyn KvStore,
        env: InvocationEnv<'_>,
        method: &str,
        input: &[u8],
    ) -> Result<NativeOutcome, NativeError> {
        let method = match method.parse::<NativeMethod>() {
            Ok(m) => m,
            Err(e) => {
                warn!("[runtime] {}", e);
                return Err(e);
            }
        };
        self.invoke_method(storage, env, method, input)
    }

    /// Run `method` and commit its writes into `storage`. On error nothing
    /// is written and no notification escapes.
    pub fn invoke_method(
        &self,
        storage: &mut dyn KvStore,
        env: InvocationEnv<'_>,
        method: NativeMethod,
        input: &[u8],
    ) -> Result<NativeOutcome, NativeError> {
        let handler = self
            .handlers
            .get(&method)
            .ok_or_else(|| NativeError::UnknownMethod(method.name().to_string()))?;

        let mut ctx = NativeContext::new(&*storage, env.witness, env.calls)
            .with_height(env.height)
            .with_event_log(self.container.config.enable_event_log);
        let output = match handler(self.container.as_ref(), &mut ctx, input) {
            Ok(output) => output,
            Err(e) => {
                warn!(
                    "[runtime] {} rejected ({:?}): {}",
                    method.name(),
                    e.kind(),
                    e
                );
                return Err(e);
            }
        };

        let Invocation {
            changes,
            notifications,
        } = ctx.finish();
        let writes = changes.len();
        changes.apply(storage)?;
        debug!(
            "[runtime] {} ({}) committed {} writes, {} notifications",
            method.name(),
            method.subsystem(),
            writes,
            notifications.len()
        );
        Ok(NativeOutcome {
            output,
            notifications,
            writes,
        })
    }
}
