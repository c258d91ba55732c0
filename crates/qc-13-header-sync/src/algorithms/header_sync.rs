//! # Header Verification
//!
//! Checks a side-chain header against the validator set trusted at its key
//! height:
//!
//! 1. Signer threshold (`3 × signers > 2 × validators`)
//! 2. Every bookkeeper is a distinct member of the trusted set
//! 3. The multi-signature over the header hash
//!
//! Batches can be checked on the rayon pool. The reported failure is always
//! the first failing header in submission order.

use qc_02_header_codec::{Header, HeaderError};
use rayon::prelude::*;

use crate::domain::{
    invariant_known_signers, invariant_signer_threshold, ConsensusPeers, HeaderSyncError,
};

/// Verify `header` against `trusted`.
pub fn verify_header(header: &Header, trusted: &ConsensusPeers) -> Result<(), HeaderSyncError> {
    let height = header.height();
    let signers: Vec<String> = header.bookkeepers().iter().map(|k| k.to_hex()).collect();

    invariant_signer_threshold(height, signers.len(), trusted.len())?;
    invariant_known_signers(height, signers.iter().map(String::as_str), trusted)?;

    header
        .verify_signatures(signers.len())
        .map_err(|e| match e {
            HeaderError::SignatureCheck(source) => HeaderSyncError::InvalidSignature { height, source },
            other => other.into(),
        })
}

/// Verify every `(header, trusted set)` pair.
pub fn verify_batch(
    jobs: &[(&Header, &ConsensusPeers)],
    parallel: bool,
) -> Result<(), HeaderSyncError> {
    if !parallel {
        return jobs
            .iter()
            .try_for_each(|(header, trusted)| verify_header(header, trusted));
    }

    let results: Vec<Result<(), HeaderSyncError>> = jobs
        .par_iter()
        .map(|(header, trusted)| verify_header(header, trusted))
        .collect();
    results.into_iter().collect()
}
