//! # Registry Flow
//!
//! Side-chain lifecycle and fund custody through the native runtime.

#[cfg(test)]
mod tests {
    use node_runtime::{ErrorKind, RuntimeConfig};
    use qc_13_header_sync::HeaderSyncApi;
    use qc_14_chain_registry::{
        BlackSideChainParam, InflationParam, QuitSideChainParam, SideChainIdParam, SideChainStatus,
    };
    use shared_types::Encode;

    use crate::integration::fixtures::*;

    fn quit(net: &mut TestNetwork) -> Result<(), node_runtime::NativeError> {
        let param = QuitSideChainParam {
            chain_id: SIDE_CHAIN,
            address: CHAIN_ADMIN,
        };
        net.call(&[CHAIN_ADMIN], "quitSideChain", param.to_bytes())
            .map(|_| ())
    }

    fn approve_quit(net: &mut TestNetwork) -> Result<(), node_runtime::NativeError> {
        let param = SideChainIdParam {
            chain_id: SIDE_CHAIN,
        };
        net.call(&[ADMIN], "approveQuitSideChain", param.to_bytes())
            .map(|_| ())
    }

    #[test]
    fn test_lifecycle_refunds_deposit_once() {
        let mut net = TestNetwork::new();
        net.register(SIDE_CHAIN, &validators(4), 1000, 2, 5000)
            .unwrap();
        assert_eq!(net.balance(&CHAIN_ADMIN), STARTING_BALANCE - 1000);

        net.approve(SIDE_CHAIN).unwrap();
        quit(&mut net).unwrap();
        assert_eq!(
            net.side_chain(SIDE_CHAIN).unwrap().status,
            SideChainStatus::Quitting
        );

        approve_quit(&mut net).unwrap();
        assert_eq!(net.balance(&CHAIN_ADMIN), STARTING_BALANCE);
        assert_eq!(net.balance(&net.escrow()), 0);

        let err = approve_quit(&mut net).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(net.balance(&CHAIN_ADMIN), STARTING_BALANCE);
    }

    #[test]
    fn test_quit_before_approval_rejected() {
        let mut net = TestNetwork::new();
        net.register(SIDE_CHAIN, &validators(4), 1000, 2, 5000)
            .unwrap();
        let err = quit(&mut net).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStateTransition);
        assert_eq!(
            net.side_chain(SIDE_CHAIN).unwrap().status,
            SideChainStatus::Registered
        );
    }

    #[test]
    fn test_approval_seeds_trusted_validators() {
        let mut net = TestNetwork::new();
        net.register(SIDE_CHAIN, &validators(4), 1000, 2, 5000)
            .unwrap();
        let header_sync = &net.native.container().header_sync;
        assert!(header_sync
            .current_height(&net.store, SIDE_CHAIN)
            .unwrap()
            .is_none());

        net.approve(SIDE_CHAIN).unwrap();
        let (key_height, peers) = net
            .native
            .container()
            .header_sync
            .get_consensus_peers(&net.store, SIDE_CHAIN, 500)
            .unwrap();
        assert_eq!(key_height, 0);
        assert_eq!(peers.len(), 4);
    }

    #[test]
    fn test_genesis_only_seeded_by_approval() {
        let mut net = TestNetwork::new();
        net.register(SIDE_CHAIN, &validators(4), 1000, 2, 5000)
            .unwrap();

        let attacker_set: Vec<_> = (21..=24)
            .map(|i| shared_crypto::Secp256k1KeyPair::from_seed(i).unwrap())
            .collect();
        let err = net
            .call(&[], "initGenesisHeader", genesis_header(SIDE_CHAIN, &attacker_set))
            .unwrap_err();
        assert!(matches!(err, node_runtime::NativeError::UnknownMethod(_)));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(net
            .native
            .container()
            .header_sync
            .current_height(&net.store, SIDE_CHAIN)
            .unwrap()
            .is_none());

        net.approve(SIDE_CHAIN).unwrap();
        let err = net
            .sync(vec![signed_header(SIDE_CHAIN, 100, [0u8; 32], &attacker_set, None)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSigner);
        net.sync(vec![signed_header(SIDE_CHAIN, 100, [0u8; 32], &validators(3), None)])
            .unwrap();
    }

    #[test]
    fn test_blacklisted_chain_registers_again() {
        let mut net = TestNetwork::new();
        let old_set = validators(4);
        let new_set: Vec<_> = (31..=34)
            .map(|i| shared_crypto::Secp256k1KeyPair::from_seed(i).unwrap())
            .collect();
        net.register(SIDE_CHAIN, &old_set, 1000, 2, 5000).unwrap();
        net.approve(SIDE_CHAIN).unwrap();
        net.sync(vec![signed_header(SIDE_CHAIN, 100, [0u8; 32], &old_set, None)])
            .unwrap();

        let param = BlackSideChainParam {
            chain_id: SIDE_CHAIN,
            beneficiary: [0xBE; 20],
        };
        net.call(&[ADMIN], "blackSideChain", param.to_bytes())
            .unwrap();

        net.register(SIDE_CHAIN, &new_set, 1000, 2, 5000).unwrap();
        net.approve(SIDE_CHAIN).unwrap();
        assert_eq!(
            net.side_chain(SIDE_CHAIN).unwrap().status,
            SideChainStatus::Active
        );
        assert_eq!(
            net.native
                .container()
                .header_sync
                .current_height(&net.store, SIDE_CHAIN)
                .unwrap(),
            Some(0)
        );

        let err = net
            .sync(vec![signed_header(SIDE_CHAIN, 200, [0u8; 32], &old_set, None)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSigner);
        net.sync(vec![signed_header(SIDE_CHAIN, 100, [0u8; 32], &new_set, None)])
            .unwrap();
    }

    #[test]
    fn test_rotation_via_synced_header() {
        let mut net = TestNetwork::new();
        let set_a = validators(4);
        let set_b: Vec<_> = (11..=13)
            .map(|i| shared_crypto::Secp256k1KeyPair::from_seed(i).unwrap())
            .collect();
        net.register(SIDE_CHAIN, &set_a, 1000, 2, 5000).unwrap();
        net.approve(SIDE_CHAIN).unwrap();

        net.sync(vec![signed_header(
            SIDE_CHAIN,
            100,
            [0u8; 32],
            &set_a[..3],
            Some(&set_b[..]),
        )])
        .unwrap();

        let err = net
            .sync(vec![signed_header(SIDE_CHAIN, 150, [0u8; 32], &set_a[..3], None)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSigner);
        net.sync(vec![signed_header(SIDE_CHAIN, 150, [0u8; 32], &set_b, None)])
            .unwrap();
        net.sync(vec![signed_header(SIDE_CHAIN, 50, [0u8; 32], &set_a[1..], None)])
            .unwrap();
    }

    #[test]
    fn test_black_pays_beneficiary() {
        let mut net = TestNetwork::new();
        net.register(SIDE_CHAIN, &validators(4), 1000, 2, 5000)
            .unwrap();
        net.approve(SIDE_CHAIN).unwrap();
        net.create(&request(SIDE_CHAIN, 50, b"x")).unwrap();

        let beneficiary = [0xBE; 20];
        let param = BlackSideChainParam {
            chain_id: SIDE_CHAIN,
            beneficiary,
        };
        net.call(&[ADMIN], "blackSideChain", param.to_bytes())
            .unwrap();

        assert_eq!(net.balance(&beneficiary), 1100);
        assert_eq!(net.balance(&net.escrow()), 0);
        let err = net.create(&request(SIDE_CHAIN, 50, b"y")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_inflation_raises_cap() {
        let mut net = TestNetwork::new();
        net.register(SIDE_CHAIN, &validators(4), 1000, 2, 1000)
            .unwrap();
        net.approve(SIDE_CHAIN).unwrap();
        assert_eq!(
            net.create(&request(SIDE_CHAIN, 600, b"x"))
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidStateTransition
        );

        let param = InflationParam {
            chain_id: SIDE_CHAIN,
            address: CHAIN_ADMIN,
            deposit_add: 300,
            pool_cap_add: 1000,
        };
        net.call(&[CHAIN_ADMIN], "inflation", param.to_bytes())
            .unwrap();
        net.call(
            &[ADMIN],
            "approveInflation",
            SideChainIdParam {
                chain_id: SIDE_CHAIN,
            }
            .to_bytes(),
        )
        .unwrap();

        let chain = net.side_chain(SIDE_CHAIN).unwrap();
        assert_eq!(chain.deposit, 1300);
        assert_eq!(chain.fee_pool_cap, 2000);
        net.create(&request(SIDE_CHAIN, 600, b"x")).unwrap();
    }

    #[test]
    fn test_event_log_toggle() {
        let mut net = TestNetwork::new();
        let outcome = net
            .register(SIDE_CHAIN, &validators(4), 1000, 2, 5000)
            .unwrap();
        assert_eq!(outcome.notifications.len(), 1);
        assert_eq!(outcome.notifications[0].event, "registerSideChain");
        assert_eq!(outcome.notifications[0].contract, net.escrow());

        let mut config = RuntimeConfig::for_testing();
        config.enable_event_log = false;
        let mut quiet = TestNetwork::with_config(config);
        let outcome = quiet
            .register(SIDE_CHAIN, &validators(4), 1000, 2, 5000)
            .unwrap();
        assert!(outcome.notifications.is_empty());
    }
}
