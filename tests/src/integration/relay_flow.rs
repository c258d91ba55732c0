//! # Relay Flow
//!
//! Registry (14) → Header Sync (13) → Relay (15) through the native runtime:
//!
//! 1. Chain admin registers side chain 7, the registry admin approves it and
//!    its genesis validators become trusted
//! 2. A user creates a request; `fee * ratio` moves into the pool escrow
//! 3. The side chain commits the request under a header signed by >2/3 of
//!    its validators; a relayer proves it and is paid from the pool
//! 4. The request can never be relayed twice
//! 5. A relayed request cannot move funds out of the escrow

#[cfg(test)]
mod tests {
    use node_runtime::{ErrorKind, NativeError};
    use qc_04_trie_proof::ProofTrie;
    use qc_15_cross_chain::{CrossChainApi, ProcessCrossChainTxParam, RelayError};
    use shared_types::{Encode, Transfers, BYTE_TRUE, TRANSFER_METHOD};

    use crate::integration::fixtures::*;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    /// Side chain 7 registered (deposit 1000, ratio 2, cap 5000) and approved.
    fn active_network() -> TestNetwork {
        let mut net = TestNetwork::new();
        net.register(SIDE_CHAIN, &validators(4), 1000, 2, 5000)
            .unwrap();
        net.approve(SIDE_CHAIN).unwrap();
        net
    }

    fn commit(net: &mut TestNetwork, height: u32, seqs: &[u64]) -> ProofTrie {
        let trie = net.request_trie(SIDE_CHAIN, seqs);
        let header = signed_header(SIDE_CHAIN, height, trie.root_hash(), &validators(4)[..3], None);
        net.sync(vec![header]).unwrap();
        trie
    }

    fn process(
        net: &mut TestNetwork,
        trie: &ProofTrie,
        seq: u64,
        height: u32,
    ) -> Result<(), NativeError> {
        let param = ProcessCrossChainTxParam {
            chain_id: SIDE_CHAIN,
            seq,
            height,
            relayer: RELAYER,
            proof: trie.prove(&net.request_key(SIDE_CHAIN, seq)),
        };
        net.call(&[RELAYER], "processCrossChainTx", param.to_bytes())
            .map(|_| ())
    }

    fn current_id(net: &TestNetwork) -> u64 {
        net.native
            .container()
            .cross_chain
            .current_id(&net.store, SIDE_CHAIN)
            .unwrap()
    }

    // =========================================================================
    // SCENARIO
    // =========================================================================

    #[test]
    fn test_register_create_relay_scenario() {
        let mut net = active_network();
        assert_eq!(net.balance(&CHAIN_ADMIN), STARTING_BALANCE - 1000);

        let outcome = net.create(&request(SIDE_CHAIN, 100, b"payload")).unwrap();
        assert_eq!(outcome.output, BYTE_TRUE.to_vec());
        assert_eq!(net.side_chain(SIDE_CHAIN).unwrap().fee_pool, 200);
        assert_eq!(net.balance(&USER), STARTING_BALANCE - 200);
        assert_eq!(net.balance(&net.escrow()), 1200);

        let trie = commit(&mut net, 10, &[1]);
        process(&mut net, &trie, 1, 10).unwrap();

        assert_eq!(net.side_chain(SIDE_CHAIN).unwrap().fee_pool, 0);
        assert_eq!(net.balance(&RELAYER), 200);
        assert_eq!(net.balance(&net.escrow()), 1000);
        assert_eq!(current_id(&net), 1);

        let calls = net.dest.calls(&net.store).unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "unlock");
        assert_eq!(calls[0].args, b"payload".to_vec());

        let err = process(&mut net, &trie, 1, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyProcessed);
        assert_eq!(net.dest.calls(&net.store).unwrap().len(), 1);
        assert_eq!(net.balance(&RELAYER), 200);
    }

    #[test]
    fn test_out_of_order_delivery_exactly_once() {
        let mut net = active_network();
        for i in 0..5u8 {
            net.create(&request(SIDE_CHAIN, 10, &[i])).unwrap();
        }
        let trie = commit(&mut net, 10, &[1, 2, 3, 4, 5]);

        process(&mut net, &trie, 1, 10).unwrap();
        process(&mut net, &trie, 2, 10).unwrap();
        process(&mut net, &trie, 5, 10).unwrap();
        let remained = net
            .native
            .container()
            .cross_chain
            .remained_ids(&net.store, SIDE_CHAIN)
            .unwrap();
        assert_eq!(remained.iter().collect::<Vec<_>>(), vec![3, 4]);

        process(&mut net, &trie, 3, 10).unwrap();
        process(&mut net, &trie, 4, 10).unwrap();

        for seq in 1..=5 {
            let err = process(&mut net, &trie, seq, 10).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AlreadyProcessed, "seq {seq}");
        }
        let args: Vec<_> = net
            .dest
            .calls(&net.store)
            .unwrap()
            .into_iter()
            .map(|c| c.args)
            .collect();
        assert_eq!(args, vec![vec![0], vec![1], vec![4], vec![2], vec![3]]);
        assert_eq!(net.side_chain(SIDE_CHAIN).unwrap().fee_pool, 0);
    }

    #[test]
    fn test_gaps_remain_owed() {
        let mut net = active_network();
        for i in 0..5u8 {
            net.create(&request(SIDE_CHAIN, 10, &[i])).unwrap();
        }
        let trie = commit(&mut net, 10, &[1, 2, 3, 4, 5]);
        process(&mut net, &trie, 1, 10).unwrap();
        process(&mut net, &trie, 5, 10).unwrap();

        let remained = net
            .native
            .container()
            .cross_chain
            .remained_ids(&net.store, SIDE_CHAIN)
            .unwrap();
        assert_eq!(remained.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(current_id(&net), 5);
    }

    // =========================================================================
    // REJECTIONS
    // =========================================================================

    #[test]
    fn test_header_below_threshold_is_not_trusted() {
        let mut net = active_network();
        net.create(&request(SIDE_CHAIN, 100, b"x")).unwrap();
        let trie = net.request_trie(SIDE_CHAIN, &[1]);

        let header = signed_header(SIDE_CHAIN, 10, trie.root_hash(), &validators(4)[..2], None);
        let err = net.sync(vec![header]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientSigners);

        let err = process(&mut net, &trie, 1, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UntrustedHeader);
        assert_eq!(current_id(&net), 0);
        assert_eq!(net.side_chain(SIDE_CHAIN).unwrap().fee_pool, 200);
    }

    #[test]
    fn test_proof_against_wrong_root_rejected() {
        let mut net = active_network();
        net.create(&request(SIDE_CHAIN, 100, b"x")).unwrap();
        net.create(&request(SIDE_CHAIN, 100, b"y")).unwrap();
        commit(&mut net, 10, &[1]);

        // Proof from a different trie than the one the header commits to.
        let forged = net.request_trie(SIDE_CHAIN, &[1, 2]);
        let err = process(&mut net, &forged, 1, 10).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::HashMismatch | ErrorKind::KeyMismatch
        ));
        assert_eq!(current_id(&net), 0);
    }

    #[test]
    fn test_unregistered_chain_cannot_sync_or_create() {
        let mut net = TestNetwork::new();
        net.register(SIDE_CHAIN, &validators(4), 1000, 2, 5000)
            .unwrap();

        let err = net.create(&request(SIDE_CHAIN, 100, b"x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStateTransition);

        let header = signed_header(SIDE_CHAIN, 10, [0u8; 32], &validators(4)[..3], None);
        let err = net.sync(vec![header]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoTrustedValidatorSet);

        let err = net.create(&request(99, 100, b"x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_failed_destination_leaves_request_owed() {
        let mut net = active_network();
        let mut bad = request(SIDE_CHAIN, 100, b"x");
        bad.dest_contract = [0x99; 20];
        net.create(&bad).unwrap();
        let trie = commit(&mut net, 10, &[1]);

        let err = process(&mut net, &trie, 1, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RelayExecutionFailed);
        assert!(matches!(
            err,
            NativeError::Relay(RelayError::RelayExecutionFailed { seq: 1, .. })
        ));
        assert_eq!(current_id(&net), 0);
        assert_eq!(net.balance(&RELAYER), 0);
    }

    #[test]
    fn test_relayed_transfer_cannot_drain_escrow() {
        let mut net = active_network();
        let attacker = [0xBA; 20];
        let mut drain = request(SIDE_CHAIN, 1, b"");
        drain.dest_contract = net.token.address();
        drain.method = TRANSFER_METHOD.into();
        drain.args = Transfers::single(net.escrow(), attacker, 1000).to_bytes();
        net.create(&drain).unwrap();
        assert_eq!(net.balance(&net.escrow()), 1002);

        let trie = commit(&mut net, 10, &[1]);
        let err = process(&mut net, &trie, 1, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(matches!(
            err,
            NativeError::Relay(RelayError::ProtectedDestination { seq: 1, .. })
        ));
        assert_eq!(net.balance(&net.escrow()), 1002);
        assert_eq!(net.balance(&attacker), 0);
        assert_eq!(net.balance(&RELAYER), 0);
        assert_eq!(current_id(&net), 0);
    }

    #[test]
    fn test_pool_cap_enforced() {
        let mut net = active_network();
        net.create(&request(SIDE_CHAIN, 2000, b"x")).unwrap();
        let err = net.create(&request(SIDE_CHAIN, 600, b"y")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStateTransition);
        assert_eq!(net.side_chain(SIDE_CHAIN).unwrap().fee_pool, 4000);
        assert_eq!(net.balance(&USER), STARTING_BALANCE - 4000);
    }
}
