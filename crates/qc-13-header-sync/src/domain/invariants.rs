//! # Domain Invariants
//!
//! Rules every committed side-chain header satisfies.

use std::collections::HashSet;

use super::entities::ConsensusPeers;
use super::errors::HeaderSyncError;

/// Default maximum headers per `sync_headers` invocation.
pub const DEFAULT_MAX_HEADERS_PER_BATCH: usize = 500;

/// Minimum signers out of `validators`: strictly more than two-thirds.
pub fn required_signers(validators: usize) -> usize {
    validators * 2 / 3 + 1
}

/// Invariant: `3 × signers > 2 × validators`.
pub fn invariant_signer_threshold(
    height: u32,
    signers: usize,
    validators: usize,
) -> Result<(), HeaderSyncError> {
    if signers * 3 <= validators * 2 {
        return Err(HeaderSyncError::InsufficientSigners {
            height,
            signers,
            validators,
            required: required_signers(validators),
        });
    }
    Ok(())
}

/// Invariant: every signer is a distinct member of the trusted set.
pub fn invariant_known_signers<'a>(
    height: u32,
    signers: impl IntoIterator<Item = &'a str>,
    trusted: &ConsensusPeers,
) -> Result<(), HeaderSyncError> {
    let mut seen = HashSet::new();
    for signer in signers {
        if !trusted.contains(signer) {
            return Err(HeaderSyncError::UnknownSigner {
                height,
                signer: signer.to_string(),
            });
        }
        if !seen.insert(signer) {
            return Err(HeaderSyncError::DuplicateSigner {
                height,
                signer: signer.to_string(),
            });
        }
    }
    Ok(())
}
