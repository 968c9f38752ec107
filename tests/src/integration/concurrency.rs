//! # Concurrency
//!
//! Racing callers against one spoke and one hub. Each spoke serializes its
//! mutations, so every race has exactly one winner and the ledger total
//! never moves.

#[cfg(test)]
mod tests {
    use super::super::*;
    use remittance::{HubApi, RemittanceApi, RemittanceError, SecureSecret};
    use shared_types::CallContext;
    use std::collections::HashSet;

    const RACERS: usize = 16;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_releases_have_one_winner() {
        let net = TestNet::new().unwrap();
        let spoke = net
            .hub
            .create_instance(CallContext::new(ALICE))
            .await
            .unwrap();
        let secret = SecureSecret::from_passphrase("race").unwrap();
        let puzzle = spoke.generate_puzzle(&secret, &CAROL).unwrap();
        spoke
            .create(CallContext::new(ALICE).with_value(500), puzzle, 50)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..RACERS {
            let spoke = spoke.clone();
            handles.push(tokio::spawn(async move {
                let secret = SecureSecret::from_passphrase("race").unwrap();
                spoke.release(CallContext::new(CAROL), &secret).await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(net_amount) => {
                    assert_eq!(net_amount, 499);
                    wins += 1;
                }
                Err(e) => assert!(matches!(e, RemittanceError::AlreadyCompleted(_))),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(spoke.balance_of(&CAROL).await, 499);
        assert_eq!(net.ledger.balance(&OWNER), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_withdrawals_pay_once() {
        let net = TestNet::new().unwrap();
        let spoke = net
            .hub
            .create_instance(CallContext::new(ALICE))
            .await
            .unwrap();
        let secret = SecureSecret::from_passphrase("payout").unwrap();
        let puzzle = spoke.generate_puzzle(&secret, &CAROL).unwrap();
        spoke
            .create(CallContext::new(ALICE).with_value(1_000), puzzle, 50)
            .await
            .unwrap();
        spoke
            .release(CallContext::new(CAROL), &secret)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..RACERS {
            let spoke = spoke.clone();
            handles.push(tokio::spawn(async move {
                spoke.withdraw(CallContext::new(CAROL)).await
            }));
        }

        let mut paid = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(amount) => paid += amount,
                Err(e) => assert!(matches!(e, RemittanceError::InsufficientBalance(_))),
            }
        }

        assert_eq!(paid, 999);
        assert_eq!(net.ledger.balance(&CAROL), 999);
        assert_eq!(spoke.held_value().await, 0);
        assert_eq!(net.ledger.total_supply(), u128::from(2 * STARTING_FUNDS));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deployments_are_distinct() {
        let net = TestNet::new().unwrap();

        let mut handles = Vec::new();
        for _ in 0..RACERS {
            let hub = net.hub.clone();
            handles.push(tokio::spawn(async move {
                hub.create_instance(CallContext::new(BOB)).await
            }));
        }

        let mut addresses = HashSet::new();
        for handle in handles {
            let spoke = handle.await.unwrap().unwrap();
            assert!(net.hub.is_authorized_instance(&spoke.address()));
            addresses.insert(spoke.address());
        }

        assert_eq!(addresses.len(), RACERS);
        assert_eq!(net.hub.instance_count(), RACERS);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deposits_all_land() {
        let net = TestNet::new().unwrap();
        let spoke = net
            .hub
            .create_instance(CallContext::new(ALICE))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..RACERS {
            let spoke = spoke.clone();
            handles.push(tokio::spawn(async move {
                let mut puzzle = [0u8; 32];
                puzzle[0] = 1;
                puzzle[31] = i as u8;
                let sender = if i % 2 == 0 { ALICE } else { BOB };
                spoke
                    .create(CallContext::new(sender).with_value(10), puzzle, 50)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(spoke.held_value().await, 10 * RACERS as u64);
        assert_eq!(spoke.commitment_count().await, RACERS);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_duplicate_puzzle_race_has_one_winner() {
        let net = TestNet::new().unwrap();
        let spoke = net
            .hub
            .create_instance(CallContext::new(ALICE))
            .await
            .unwrap();
        let puzzle = [0x5Au8; 32];

        let mut handles = Vec::new();
        for _ in 0..RACERS {
            let spoke = spoke.clone();
            handles.push(tokio::spawn(async move {
                spoke
                    .create(CallContext::new(ALICE).with_value(10), puzzle, 50)
                    .await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => created += 1,
                Err(e) => assert!(matches!(e, RemittanceError::PuzzleExists(_))),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(spoke.held_value().await, 10);
        assert_eq!(net.ledger.balance(&ALICE), STARTING_FUNDS - 10);
    }
}
