//! Remittance hub (factory)
//!
//! Deploys spokes, remembers which ones it deployed, and names the fee and
//! its beneficiary. The hub stores addresses only; each spoke holds a
//! reference back to the hub through `HubRegistry`.

use super::spoke::RemittanceSpoke;
use super::{observe, RemittanceEnv};
use crate::algorithms::derive_instance_address;
use crate::config::RemittanceConfig;
use crate::domain::{invariant_non_payable, invariant_nonzero_address, RemittanceError};
use crate::ports::inbound::HubApi;
use crate::ports::outbound::HubRegistry;
use async_trait::async_trait;
use parking_lot::RwLock;
use remittance_telemetry::INSTANCES_CREATED;
use shared_bus::RemittanceEvent;
use shared_types::{short_hex, Address, Amount, CallContext};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// The factory and fee beneficiary for spoke instances.
pub struct RemittanceHub {
    address: Address,
    owner: Address,
    config: RemittanceConfig,
    env: RemittanceEnv,
    /// Append-only.
    instances: RwLock<HashSet<Address>>,
    nonce: AtomicU64,
    self_ref: Weak<RemittanceHub>,
}

impl RemittanceHub {
    /// Deploy a hub at `address` whose fees go to `owner`.
    pub fn new(
        address: Address,
        owner: Address,
        config: RemittanceConfig,
        env: RemittanceEnv,
    ) -> Result<Arc<Self>, RemittanceError> {
        config.validate()?;
        invariant_nonzero_address(&address)?;
        invariant_nonzero_address(&owner)?;

        info!(
            hub = %short_hex(&address),
            owner = %short_hex(&owner),
            fee = config.fee_amount,
            "Remittance hub deployed"
        );

        Ok(Arc::new_cyclic(|self_ref| Self {
            address,
            owner,
            config,
            env,
            instances: RwLock::new(HashSet::new()),
            nonce: AtomicU64::new(0),
            self_ref: self_ref.clone(),
        }))
    }

    /// Hub address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Fee beneficiary.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Fee charged per release.
    pub fn fee_amount(&self) -> Amount {
        self.config.fee_amount
    }

    /// Configuration handed to every spoke.
    pub fn config(&self) -> &RemittanceConfig {
        &self.config
    }

    /// Whether `instance` was deployed by this hub.
    pub fn is_authorized_instance(&self, instance: &Address) -> bool {
        let authorized = self.instances.read().contains(instance);
        debug!(
            instance = %short_hex(instance),
            authorized,
            "Instance authorization lookup"
        );
        authorized
    }

    /// Number of spokes deployed so far.
    pub fn instance_count(&self) -> usize {
        self.instances.read().len()
    }

    async fn try_create_instance(
        &self,
        ctx: CallContext,
    ) -> Result<Arc<RemittanceSpoke>, RemittanceError> {
        invariant_non_payable(&ctx)?;
        invariant_nonzero_address(&ctx.caller)?;

        let registry: Arc<dyn HubRegistry> = self
            .self_ref
            .upgrade()
            .ok_or(RemittanceError::HubUnavailable)?;

        let instance = {
            let mut instances = self.instances.write();
            loop {
                let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
                let candidate = derive_instance_address(&self.address, nonce);
                if instances.insert(candidate) {
                    break candidate;
                }
            }
        };

        let spoke = Arc::new(RemittanceSpoke::new(
            instance,
            ctx.caller,
            registry,
            self.config.clone(),
            self.env.clone(),
        ));

        INSTANCES_CREATED.inc();
        info!(
            hub = %short_hex(&self.address),
            instance = %short_hex(&instance),
            deployer = %short_hex(&ctx.caller),
            "Spoke instance created"
        );

        self.env
            .events
            .publish(RemittanceEvent::InstanceCreated {
                hub: self.address,
                instance,
            })
            .await;

        Ok(spoke)
    }
}

#[async_trait]
impl HubApi for RemittanceHub {
    type Instance = RemittanceSpoke;

    async fn create_instance(
        &self,
        ctx: CallContext,
    ) -> Result<Arc<RemittanceSpoke>, RemittanceError> {
        observe("create_instance", self.try_create_instance(ctx).await)
    }

    fn is_authorized_instance(&self, instance: &Address) -> bool {
        RemittanceHub::is_authorized_instance(self, instance)
    }

    fn fee_amount(&self) -> Amount {
        RemittanceHub::fee_amount(self)
    }

    fn owner(&self) -> Address {
        RemittanceHub::owner(self)
    }
}

impl HubRegistry for RemittanceHub {
    fn hub_address(&self) -> Address {
        self.address
    }

    fn is_authorized_instance(&self, instance: &Address) -> bool {
        RemittanceHub::is_authorized_instance(self, instance)
    }

    fn fee_amount(&self) -> Amount {
        RemittanceHub::fee_amount(self)
    }

    fn fee_recipient(&self) -> Address {
        self.owner
    }
}
