//! # Inbound Ports
//!
//! API traits for the hub (factory) and its spokes (escrow instances).

use crate::domain::{EscrowRecord, RemittanceError, SecureSecret};
use async_trait::async_trait;
use shared_types::{Address, Amount, BlockHeight, CallContext, Hash};
use std::sync::Arc;

/// Hub API - inbound port.
#[async_trait]
pub trait HubApi: Send + Sync {
    /// Spoke type deployed by this hub.
    type Instance: RemittanceApi;

    /// Deploy a new spoke and record it as authorized.
    async fn create_instance(
        &self,
        ctx: CallContext,
    ) -> Result<Arc<Self::Instance>, RemittanceError>;

    /// Whether `instance` was deployed by this hub.
    fn is_authorized_instance(&self, instance: &Address) -> bool;

    /// Fee charged on each release.
    fn fee_amount(&self) -> Amount;

    /// Fee beneficiary.
    fn owner(&self) -> Address;
}

/// Spoke API - inbound port.
#[async_trait]
pub trait RemittanceApi: Send + Sync {
    /// Puzzle binding `secret` to `recipient` on this instance.
    fn generate_puzzle(
        &self,
        secret: &SecureSecret,
        recipient: &Address,
    ) -> Result<Hash, RemittanceError>;

    /// Lock `ctx.value` under `puzzle` until `now + expiry_offset`.
    async fn create(
        &self,
        ctx: CallContext,
        puzzle: Hash,
        expiry_offset: BlockHeight,
    ) -> Result<(), RemittanceError>;

    /// Prove the secret and credit the commitment, net of the hub fee, to
    /// the caller. Returns the credited amount.
    async fn release(
        &self,
        ctx: CallContext,
        secret: &SecureSecret,
    ) -> Result<Amount, RemittanceError>;

    /// Transfer the caller's whole credited balance out.
    async fn withdraw(&self, ctx: CallContext) -> Result<Amount, RemittanceError>;

    /// Credit an expired, unreleased commitment back to its sender.
    async fn reclaim(&self, ctx: CallContext, puzzle: Hash) -> Result<Amount, RemittanceError>;

    /// Withdrawable balance of `account`.
    async fn balance_of(&self, account: &Address) -> Amount;

    /// Commitment stored under `puzzle`.
    async fn commitment(&self, puzzle: &Hash) -> Option<EscrowRecord>;
}
