//! Remittance spoke (escrow instance)
//!
//! Holds deposits under puzzles, credits the proven recipient on release,
//! and pays credited balances out on withdraw.
//!
//! Every mutating operation holds the instance write lock from validation
//! through the ledger transfer and event publication, so readers never see
//! a half-applied release or withdrawal.

use super::{observe, RemittanceEnv};
use crate::algorithms::{generate_puzzle, minimum_deposit, split_fee};
use crate::config::RemittanceConfig;
use crate::domain::{
    invariant_expiry_offset, invariant_min_deposit, invariant_non_payable,
    invariant_nonzero_address, invariant_nonzero_puzzle, EscrowRecord, EscrowState,
    RemittanceError, SecureSecret,
};
use crate::ports::inbound::RemittanceApi;
use crate::ports::outbound::HubRegistry;
use async_trait::async_trait;
use remittance_telemetry::{
    COMMITMENTS_CREATED, FEES_COLLECTED, RECLAIMS, RELEASES, VALUE_LOCKED, WITHDRAWALS,
};
use shared_bus::RemittanceEvent;
use shared_types::{short_hex, Address, Amount, BlockHeight, CallContext, Hash};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Default)]
struct SpokeState {
    /// Insert-once.
    commitments: HashMap<Hash, EscrowRecord>,
    /// Withdrawable credit per account.
    balances: HashMap<Address, Amount>,
}

/// A per-sender escrow instance.
pub struct RemittanceSpoke {
    address: Address,
    deployer: Address,
    hub: Arc<dyn HubRegistry>,
    config: RemittanceConfig,
    env: RemittanceEnv,
    state: RwLock<SpokeState>,
}

impl RemittanceSpoke {
    pub(crate) fn new(
        address: Address,
        deployer: Address,
        hub: Arc<dyn HubRegistry>,
        config: RemittanceConfig,
        env: RemittanceEnv,
    ) -> Self {
        Self {
            address,
            deployer,
            hub,
            config,
            env,
            state: RwLock::new(SpokeState::default()),
        }
    }

    /// Build an instance outside any factory.
    ///
    /// The instance rejects every deposit. Fails with `UnauthorizedInstance`
    /// if `hub` already recognizes `address`, since that address belongs to
    /// a factory-deployed instance. See [`crate::adapters::DetachedHub`].
    pub fn standalone(
        address: Address,
        deployer: Address,
        hub: Arc<dyn HubRegistry>,
        config: RemittanceConfig,
        env: RemittanceEnv,
    ) -> Result<Self, RemittanceError> {
        config.validate()?;
        invariant_nonzero_address(&address)?;
        invariant_nonzero_address(&deployer)?;
        if hub.is_authorized_instance(&address) {
            return Err(RemittanceError::UnauthorizedInstance(address));
        }

        debug!(
            instance = %short_hex(&address),
            hub = %short_hex(&hub.hub_address()),
            "Standalone spoke built"
        );
        Ok(Self::new(address, deployer, hub, config, env))
    }

    /// Instance address, bound into every puzzle.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Account that asked for this instance.
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Address of the hub this instance reports to.
    pub fn hub_address(&self) -> Address {
        self.hub.hub_address()
    }

    /// Whether the hub recognizes this instance.
    pub fn is_authorized(&self) -> bool {
        self.hub.is_authorized_instance(&self.address)
    }

    /// Smallest deposit `create` accepts.
    pub fn minimum_deposit(&self) -> Amount {
        minimum_deposit(self.config.min_deposit, self.hub.fee_amount())
    }

    /// Ledger balance held by the instance.
    pub async fn held_value(&self) -> Amount {
        self.env.ledger.balance_of(self.address).await
    }

    /// Number of commitments ever created here.
    pub async fn commitment_count(&self) -> usize {
        self.state.read().await.commitments.len()
    }

    async fn try_create(
        &self,
        ctx: CallContext,
        puzzle: Hash,
        expiry_offset: BlockHeight,
    ) -> Result<(), RemittanceError> {
        invariant_nonzero_address(&ctx.caller)?;
        if ctx.caller == self.address {
            return Err(RemittanceError::SelfDeposit(self.address));
        }
        invariant_nonzero_puzzle(&puzzle)?;
        invariant_expiry_offset(expiry_offset, self.config.max_expiry_offset)?;
        invariant_min_deposit(ctx.value, self.minimum_deposit())?;
        if !self.is_authorized() {
            return Err(RemittanceError::UnauthorizedInstance(self.address));
        }

        let mut state = self.state.write().await;
        if state.commitments.contains_key(&puzzle) {
            return Err(RemittanceError::PuzzleExists(puzzle));
        }

        let now = self.env.clock.current_height();
        let expiry =
            now.checked_add(expiry_offset)
                .ok_or(RemittanceError::InvalidExpiryOffset {
                    offset: expiry_offset,
                    max: self.config.max_expiry_offset,
                })?;

        self.env
            .ledger
            .transfer(ctx.caller, self.address, ctx.value)
            .await?;

        state.commitments.insert(
            puzzle,
            EscrowRecord::new(puzzle, ctx.value, ctx.caller, now, expiry),
        );

        COMMITMENTS_CREATED.inc();
        VALUE_LOCKED.add(ctx.value as f64);
        info!(
            instance = %short_hex(&self.address),
            puzzle = %short_hex(&puzzle),
            sender = %short_hex(&ctx.caller),
            amount = ctx.value,
            expiry,
            "Commitment created"
        );

        self.env
            .events
            .publish(RemittanceEvent::TransactionCreated {
                instance: self.address,
                puzzle,
                sender: ctx.caller,
                amount: ctx.value,
                expiry,
            })
            .await;

        Ok(())
    }

    async fn try_release(
        &self,
        ctx: CallContext,
        secret: &SecureSecret,
    ) -> Result<Amount, RemittanceError> {
        invariant_non_payable(&ctx)?;
        let recipient = ctx.caller;
        let puzzle = generate_puzzle(secret, &recipient, &self.address)?;

        let mut state = self.state.write().await;
        let now = self.env.clock.current_height();
        let SpokeState {
            commitments,
            balances,
        } = &mut *state;

        // A caller other than the bound recipient derives a different
        // puzzle and lands here.
        let record = commitments
            .get_mut(&puzzle)
            .ok_or(RemittanceError::PuzzleNotFound(puzzle))?;
        if record.is_completed() {
            return Err(RemittanceError::AlreadyCompleted(puzzle));
        }
        if record.is_expired_at(now) {
            return Err(RemittanceError::Expired {
                expiry: record.expiry,
                current: now,
            });
        }
        if !self.is_authorized() {
            return Err(RemittanceError::UnauthorizedInstance(self.address));
        }

        let amount = record.amount;
        let (net, fee) = split_fee(amount, self.hub.fee_amount())?;
        let previous_credit = balances.get(&recipient).copied().unwrap_or(0);
        let credit = previous_credit
            .checked_add(net)
            .ok_or(RemittanceError::BalanceOverflow)?;

        record.transition(EscrowState::Released)?;
        balances.insert(recipient, credit);

        if fee > 0 {
            let fee_recipient = self.hub.fee_recipient();
            if let Err(e) = self
                .env
                .ledger
                .transfer(self.address, fee_recipient, fee)
                .await
            {
                record.state = EscrowState::Locked;
                restore_credit(balances, recipient, previous_credit);
                warn!(
                    instance = %short_hex(&self.address),
                    puzzle = %short_hex(&puzzle),
                    error = %e,
                    "Fee payment failed, release rolled back"
                );
                return Err(e.into());
            }
        }

        RELEASES.inc();
        FEES_COLLECTED.inc_by(fee as f64);
        VALUE_LOCKED.sub(amount as f64);
        info!(
            instance = %short_hex(&self.address),
            puzzle = %short_hex(&puzzle),
            recipient = %short_hex(&recipient),
            net,
            fee,
            "Commitment released"
        );

        self.env
            .events
            .publish(RemittanceEvent::TransactionCompleted {
                instance: self.address,
                puzzle,
                recipient,
                net,
                fee,
            })
            .await;

        Ok(net)
    }

    async fn try_withdraw(&self, ctx: CallContext) -> Result<Amount, RemittanceError> {
        invariant_non_payable(&ctx)?;
        let recipient = ctx.caller;

        let mut state = self.state.write().await;
        let amount = state.balances.remove(&recipient).unwrap_or(0);
        if amount == 0 {
            return Err(RemittanceError::InsufficientBalance(recipient));
        }

        if let Err(e) = self
            .env
            .ledger
            .transfer(self.address, recipient, amount)
            .await
        {
            state.balances.insert(recipient, amount);
            warn!(
                instance = %short_hex(&self.address),
                recipient = %short_hex(&recipient),
                amount,
                error = %e,
                "Payout failed, credit restored"
            );
            return Err(e.into());
        }

        WITHDRAWALS.inc();
        info!(
            instance = %short_hex(&self.address),
            recipient = %short_hex(&recipient),
            amount,
            "Balance withdrawn"
        );

        self.env
            .events
            .publish(RemittanceEvent::Withdrawn {
                instance: self.address,
                recipient,
                amount,
            })
            .await;

        Ok(amount)
    }

    async fn try_reclaim(&self, ctx: CallContext, puzzle: Hash) -> Result<Amount, RemittanceError> {
        invariant_non_payable(&ctx)?;

        let mut state = self.state.write().await;
        let now = self.env.clock.current_height();
        let SpokeState {
            commitments,
            balances,
        } = &mut *state;

        let record = commitments
            .get_mut(&puzzle)
            .ok_or(RemittanceError::PuzzleNotFound(puzzle))?;
        if record.sender != ctx.caller {
            return Err(RemittanceError::UnauthorizedCaller);
        }
        if record.is_completed() {
            return Err(RemittanceError::AlreadyCompleted(puzzle));
        }
        if !record.is_expired_at(now) {
            return Err(RemittanceError::NotExpired {
                expiry: record.expiry,
                current: now,
            });
        }

        let sender = record.sender;
        let amount = record.amount;
        let credit = balances
            .get(&sender)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(RemittanceError::BalanceOverflow)?;

        record.transition(EscrowState::Reclaimed)?;
        balances.insert(sender, credit);

        RECLAIMS.inc();
        VALUE_LOCKED.sub(amount as f64);
        info!(
            instance = %short_hex(&self.address),
            puzzle = %short_hex(&puzzle),
            sender = %short_hex(&sender),
            amount,
            "Expired commitment reclaimed"
        );

        self.env
            .events
            .publish(RemittanceEvent::Reclaimed {
                instance: self.address,
                puzzle,
                sender,
                amount,
            })
            .await;

        Ok(amount)
    }
}

fn restore_credit(balances: &mut HashMap<Address, Amount>, account: Address, previous: Amount) {
    if previous == 0 {
        balances.remove(&account);
    } else {
        balances.insert(account, previous);
    }
}

#[async_trait]
impl RemittanceApi for RemittanceSpoke {
    fn generate_puzzle(
        &self,
        secret: &SecureSecret,
        recipient: &Address,
    ) -> Result<Hash, RemittanceError> {
        observe(
            "generate_puzzle",
            generate_puzzle(secret, recipient, &self.address),
        )
    }

    async fn create(
        &self,
        ctx: CallContext,
        puzzle: Hash,
        expiry_offset: BlockHeight,
    ) -> Result<(), RemittanceError> {
        observe("create", self.try_create(ctx, puzzle, expiry_offset).await)
    }

    async fn release(
        &self,
        ctx: CallContext,
        secret: &SecureSecret,
    ) -> Result<Amount, RemittanceError> {
        observe("release", self.try_release(ctx, secret).await)
    }

    async fn withdraw(&self, ctx: CallContext) -> Result<Amount, RemittanceError> {
        observe("withdraw", self.try_withdraw(ctx).await)
    }

    async fn reclaim(&self, ctx: CallContext, puzzle: Hash) -> Result<Amount, RemittanceError> {
        observe("reclaim", self.try_reclaim(ctx, puzzle).await)
    }

    async fn balance_of(&self, account: &Address) -> Amount {
        self.state
            .read()
            .await
            .balances
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    async fn commitment(&self, puzzle: &Hash) -> Option<EscrowRecord> {
        self.state.read().await.commitments.get(puzzle).cloned()
    }
}
