//! # End-to-End Remittance Flows
//!
//! A hub deploys a spoke, Alice locks value for Carol, Carol releases and
//! withdraws. Checks the ledger, the spoke's credit book and the audit bus
//! agree at every step.

#[cfg(test)]
mod tests {
    use super::super::*;
    use remittance::{
        derive_instance_address, DetachedHub, EscrowState, HubApi, HubRegistry, RemittanceApi,
        RemittanceConfig, RemittanceError, RemittanceSpoke, SecureSecret,
    };
    use shared_bus::{EventFilter, EventTopic, RemittanceEvent};
    use shared_types::CallContext;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    const EXPIRES_AFTER: u64 = 24;
    const REMITTANCE_VALUE: u64 = 100;
    const FACTORY_FEE: u64 = 1;

    fn receiver_password() -> SecureSecret {
        SecureSecret::from_passphrase("password1").unwrap()
    }

    fn invalid_password() -> SecureSecret {
        SecureSecret::from_passphrase("password3").unwrap()
    }

    async fn deploy(net: &TestNet) -> Arc<RemittanceSpoke> {
        net.hub
            .create_instance(CallContext::new(ALICE))
            .await
            .unwrap()
    }

    // =========================================================================
    // DEPLOYMENT
    // =========================================================================

    #[tokio::test]
    async fn test_deploy_emits_instance_created() {
        let net = TestNet::new().unwrap();
        let mut sub = net.bus.subscribe(EventFilter::topics(vec![EventTopic::Hub]));

        let spoke = deploy(&net).await;

        assert_eq!(
            sub.recv().await,
            Some(RemittanceEvent::InstanceCreated {
                hub: HUB,
                instance: spoke.address(),
            })
        );
        assert!(net.hub.is_authorized_instance(&spoke.address()));
    }

    #[tokio::test]
    async fn test_standalone_instance_cannot_create() {
        let net = TestNet::new().unwrap();
        let hub: Arc<dyn HubRegistry> = Arc::new(DetachedHub::new([0xDDu8; 20]));
        let rogue = RemittanceSpoke::standalone(
            [0x99u8; 20],
            ALICE,
            hub,
            RemittanceConfig::default(),
            net.env(),
        )
        .unwrap();

        let puzzle = rogue
            .generate_puzzle(&receiver_password(), &CAROL)
            .unwrap();
        let result = rogue
            .create(CallContext::new(ALICE).with_value(3), puzzle, EXPIRES_AFTER)
            .await;

        assert!(matches!(result, Err(RemittanceError::UnauthorizedInstance(_))));
        assert_eq!(rogue.held_value().await, 0);
        assert_eq!(net.ledger.balance(&ALICE), STARTING_FUNDS);
    }

    #[tokio::test]
    async fn test_real_hub_does_not_vouch_for_foreign_spoke() {
        let net = TestNet::new().unwrap();
        let registry: Arc<dyn HubRegistry> = net.hub.clone();
        let foreign = RemittanceSpoke::standalone(
            [0x98u8; 20],
            BOB,
            registry,
            RemittanceConfig::default(),
            net.env(),
        )
        .unwrap();

        assert_eq!(foreign.hub_address(), HUB);
        assert!(!foreign.is_authorized());
        let result = foreign
            .create(CallContext::new(BOB).with_value(10), [4u8; 32], EXPIRES_AFTER)
            .await;
        assert!(matches!(result, Err(RemittanceError::UnauthorizedInstance(_))));
    }

    #[tokio::test]
    async fn test_standalone_cannot_reuse_deployed_address() {
        let net = TestNet::new().unwrap();
        let deployed = deploy(&net).await;
        assert_eq!(deployed.address(), derive_instance_address(&HUB, 0));

        let registry: Arc<dyn HubRegistry> = net.hub.clone();
        let result = RemittanceSpoke::standalone(
            deployed.address(),
            BOB,
            registry,
            RemittanceConfig::default(),
            net.env(),
        );

        assert!(matches!(
            result,
            Err(RemittanceError::UnauthorizedInstance(a)) if a == deployed.address()
        ));
        assert_eq!(deployed.held_value().await, 0);
    }

    #[tokio::test]
    async fn test_instance_address_cannot_fund_its_own_commitment() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;
        spoke
            .create(CallContext::new(ALICE).with_value(200), [1u8; 32], EXPIRES_AFTER)
            .await
            .unwrap();

        let result = spoke
            .create(
                CallContext::new(spoke.address()).with_value(200),
                [2u8; 32],
                EXPIRES_AFTER,
            )
            .await;

        assert!(matches!(result, Err(RemittanceError::SelfDeposit(_))));
        assert_eq!(spoke.held_value().await, 200);
        assert_eq!(spoke.commitment_count().await, 1);
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    #[tokio::test]
    async fn test_create_without_value_fails() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;

        let result = spoke
            .create(CallContext::new(ALICE), [1u8; 32], EXPIRES_AFTER)
            .await;
        assert!(matches!(result, Err(RemittanceError::DepositTooSmall { .. })));
    }

    #[tokio::test]
    async fn test_create_with_zero_puzzle_fails() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;

        let result = spoke
            .create(CallContext::new(ALICE).with_value(100), [0u8; 32], EXPIRES_AFTER)
            .await;
        assert!(matches!(result, Err(RemittanceError::ZeroPuzzle)));
        assert_eq!(spoke.held_value().await, 0);
    }

    #[tokio::test]
    async fn test_puzzle_generation_rejects_zero_address() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;

        assert!(matches!(
            spoke.generate_puzzle(&receiver_password(), &[0u8; 20]),
            Err(RemittanceError::ZeroAddress)
        ));
        assert!(spoke.generate_puzzle(&receiver_password(), &CAROL).is_ok());
    }

    #[tokio::test]
    async fn test_create_moves_value_into_instance() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;
        assert_eq!(spoke.held_value().await, 0);

        let puzzle = spoke
            .generate_puzzle(&receiver_password(), &CAROL)
            .unwrap();
        spoke
            .create(CallContext::new(ALICE).with_value(200), puzzle, EXPIRES_AFTER)
            .await
            .unwrap();

        assert_eq!(spoke.held_value().await, 200);
        assert_eq!(net.ledger.balance(&ALICE), STARTING_FUNDS - 200);

        let again = spoke
            .create(CallContext::new(ALICE).with_value(200), puzzle, EXPIRES_AFTER)
            .await;
        assert!(matches!(again, Err(RemittanceError::PuzzleExists(_))));
        assert_eq!(spoke.held_value().await, 200);
    }

    #[tokio::test]
    async fn test_create_emits_transaction_created() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;
        let mut sub = net.bus.subscribe(EventFilter::topics(vec![EventTopic::Escrow]));

        spoke
            .create(CallContext::new(ALICE).with_value(200), [7u8; 32], EXPIRES_AFTER)
            .await
            .unwrap();

        let event = sub.recv().await.unwrap();
        assert_eq!(event.name(), "TransactionCreated");
        assert_eq!(event.instance(), spoke.address());
    }

    // =========================================================================
    // RELEASE
    // =========================================================================

    #[tokio::test]
    async fn test_release_rejects_wrong_password_and_wrong_account() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;
        let puzzle = spoke
            .generate_puzzle(&receiver_password(), &CAROL)
            .unwrap();
        spoke
            .create(CallContext::new(ALICE).with_value(200), puzzle, EXPIRES_AFTER)
            .await
            .unwrap();

        assert!(spoke
            .release(CallContext::new(CAROL), &invalid_password())
            .await
            .is_err());
        assert!(spoke
            .release(CallContext::new(BOB), &receiver_password())
            .await
            .is_err());
        assert_eq!(
            spoke.commitment(&puzzle).await.unwrap().state,
            EscrowState::Locked
        );
    }

    #[tokio::test]
    async fn test_release_credits_value_minus_fee() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;
        let puzzle = spoke
            .generate_puzzle(&receiver_password(), &CAROL)
            .unwrap();
        spoke
            .create(
                CallContext::new(ALICE).with_value(REMITTANCE_VALUE),
                puzzle,
                EXPIRES_AFTER,
            )
            .await
            .unwrap();
        assert_eq!(spoke.balance_of(&CAROL).await, 0);

        spoke
            .release(CallContext::new(CAROL), &receiver_password())
            .await
            .unwrap();

        assert_eq!(
            spoke.balance_of(&CAROL).await,
            REMITTANCE_VALUE - FACTORY_FEE
        );
        assert_eq!(net.ledger.balance(&OWNER), FACTORY_FEE);
    }

    // =========================================================================
    // WITHDRAW
    // =========================================================================

    #[tokio::test]
    async fn test_withdraw_without_credit_fails() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;

        assert!(spoke
            .withdraw(CallContext::new(BOB).with_value(100))
            .await
            .is_err());
        assert!(matches!(
            spoke.withdraw(CallContext::new(BOB)).await,
            Err(RemittanceError::InsufficientBalance(_))
        ));
    }

    #[tokio::test]
    async fn test_full_remittance_cycle() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;
        let mut stream = net
            .bus
            .event_stream(EventFilter::for_instances(vec![spoke.address()]));

        let puzzle = spoke
            .generate_puzzle(&receiver_password(), &CAROL)
            .unwrap();
        spoke
            .create(
                CallContext::new(ALICE).with_value(REMITTANCE_VALUE),
                puzzle,
                EXPIRES_AFTER,
            )
            .await
            .unwrap();
        spoke
            .release(CallContext::new(CAROL), &receiver_password())
            .await
            .unwrap();

        let credited = spoke.balance_of(&CAROL).await;
        let paid = spoke.withdraw(CallContext::new(CAROL)).await.unwrap();

        assert_eq!(paid, credited);
        assert_eq!(paid, REMITTANCE_VALUE - FACTORY_FEE);
        assert_eq!(net.ledger.balance(&CAROL), REMITTANCE_VALUE - FACTORY_FEE);
        assert_eq!(spoke.balance_of(&CAROL).await, 0);
        assert_eq!(spoke.held_value().await, 0);
        assert_eq!(net.ledger.total_supply(), u128::from(2 * STARTING_FUNDS));

        let mut names = Vec::new();
        for _ in 0..3 {
            let event = timeout(Duration::from_secs(1), stream.next())
                .await
                .unwrap()
                .unwrap();
            names.push(event.name());
        }
        assert_eq!(
            names,
            vec!["TransactionCreated", "TransactionCompleted", "Withdrawn"]
        );
    }

    // =========================================================================
    // EXPIRY
    // =========================================================================

    #[tokio::test]
    async fn test_expired_commitment_goes_back_to_sender() {
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;
        let puzzle = spoke
            .generate_puzzle(&receiver_password(), &CAROL)
            .unwrap();
        spoke
            .create(
                CallContext::new(ALICE).with_value(REMITTANCE_VALUE),
                puzzle,
                EXPIRES_AFTER,
            )
            .await
            .unwrap();

        net.clock.advance(EXPIRES_AFTER + 1);

        assert!(matches!(
            spoke
                .release(CallContext::new(CAROL), &receiver_password())
                .await,
            Err(RemittanceError::Expired { .. })
        ));
        assert_eq!(
            spoke.reclaim(CallContext::new(ALICE), puzzle).await.unwrap(),
            REMITTANCE_VALUE
        );
        assert_eq!(
            spoke.withdraw(CallContext::new(ALICE)).await.unwrap(),
            REMITTANCE_VALUE
        );
        assert_eq!(net.ledger.balance(&ALICE), STARTING_FUNDS);
        assert_eq!(net.ledger.balance(&OWNER), 0);
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    #[tokio::test]
    async fn test_custom_fee_flows_to_owner() {
        let config = RemittanceConfig {
            fee_amount: 25,
            min_deposit: 50,
            max_expiry_offset: 100,
        };
        let net = TestNet::with_config(config).unwrap();
        let spoke = deploy(&net).await;
        let puzzle = spoke
            .generate_puzzle(&receiver_password(), &CAROL)
            .unwrap();

        assert!(spoke
            .create(CallContext::new(ALICE).with_value(49), puzzle, 10)
            .await
            .is_err());
        assert!(spoke
            .create(CallContext::new(ALICE).with_value(50), puzzle, 101)
            .await
            .is_err());

        spoke
            .create(CallContext::new(ALICE).with_value(50), puzzle, 100)
            .await
            .unwrap();
        let net_amount = spoke
            .release(CallContext::new(CAROL), &receiver_password())
            .await
            .unwrap();

        assert_eq!(net_amount, 25);
        assert_eq!(net.ledger.balance(&OWNER), 25);
    }

    // =========================================================================
    // TELEMETRY
    // =========================================================================

    #[tokio::test]
    async fn test_activity_shows_up_in_metrics() {
        remittance_telemetry::register_metrics().unwrap();
        let net = TestNet::new().unwrap();
        let spoke = deploy(&net).await;
        let puzzle = spoke
            .generate_puzzle(&receiver_password(), &CAROL)
            .unwrap();
        spoke
            .create(CallContext::new(ALICE).with_value(10), puzzle, EXPIRES_AFTER)
            .await
            .unwrap();
        spoke
            .release(CallContext::new(CAROL), &receiver_password())
            .await
            .unwrap();
        assert!(spoke.withdraw(CallContext::new(BOB)).await.is_err());

        let text = remittance_telemetry::encode_metrics().unwrap();
        assert!(text.contains("rh_hub_instances_created_total"));
        assert!(text.contains("rh_escrow_releases_total"));
        assert!(text.contains("rh_operation_errors_total"));
    }
}
