//! m-of-n multi-signature verification.

use crate::ecdsa::{Secp256k1PublicKey, Secp256k1Signature};
use crate::CryptoError;

/// Verify `signatures` over `message` against `pubkeys`.
///
/// Every signature must verify under a distinct, not yet matched key from
/// `pubkeys`, and at least `threshold` signatures must be present.
pub fn verify_multi_signature(
    message: &[u8],
    pubkeys: &[Secp256k1PublicKey],
    signatures: &[Secp256k1Signature],
    threshold: usize,
) -> Result<(), CryptoError> {
    if signatures.len() < threshold {
        return Err(CryptoError::ThresholdNotMet {
            valid: signatures.len(),
            required: threshold,
        });
    }

    let mut used = vec![false; pubkeys.len()];
    for (index, signature) in signatures.iter().enumerate() {
        let matched = pubkeys
            .iter()
            .enumerate()
            .find(|(i, key)| !used[*i] && key.verify(message, signature).is_ok())
            .map(|(i, _)| i);
        match matched {
            Some(i) => used[i] = true,
            None => return Err(CryptoError::UnmatchedSignature { index }),
        }
    }
    Ok(())
}
