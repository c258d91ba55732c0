//! # Domain Invariants
//!
//! Checks shared by the registry operations.

use shared_types::ChainId;

use super::errors::RegistryError;

/// A side chain may not reuse the main chain's id.
pub fn invariant_side_chain_id(chain_id: ChainId, main_chain_id: ChainId) -> Result<(), RegistryError> {
    if chain_id == main_chain_id {
        return Err(RegistryError::InvalidChainId { chain_id });
    }
    Ok(())
}

/// Overflow-checked addition of a monetary delta.
pub fn checked_credit(
    balance: u64,
    delta: u64,
    what: &'static str,
) -> Result<u64, RegistryError> {
    balance
        .checked_add(delta)
        .ok_or(RegistryError::ArithmeticOverflow(what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_chain_id_rejected() {
        assert!(invariant_side_chain_id(7, 0).is_ok());
        assert!(matches!(
            invariant_side_chain_id(0, 0),
            Err(RegistryError::InvalidChainId { chain_id: 0 })
        ));
    }

    #[test]
    fn test_checked_credit() {
        assert_eq!(checked_credit(1, 2, "deposit").unwrap(), 3);
        let err = checked_credit(u64::MAX, 1, "deposit").unwrap_err();
        assert!(err.to_string().contains("deposit"));
    }
}
