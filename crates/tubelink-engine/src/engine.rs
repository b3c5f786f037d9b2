//! The Tube settlement engine.
//!
//! One `Tube` instance per network. All shared mutable state (the validator
//! set, the settlement ledger, per-route sequence counters) is owned by the
//! engine and mutated only through its methods. Each call runs to completion
//! atomically; a failing guard returns before any mutation.

use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::Utc;
use tracing::{debug, info, warn};
use tubelink_types::{
    constants::SIGNATURE_WIDTH, Address, Amount, DepositReceipt, EngineConfig, Event, NetworkId,
    PauseMode, Result, Settlement, TubeError, WithdrawalKey,
};

use crate::custody::{AssetRegistry, PayloadReceiver, TokenCustody};
use crate::escrow::EscrowVault;
use crate::fees::FeeSchedule;
use crate::ledger::SettlementLedger;
use crate::validator_set::ValidatorSet;
use crate::verifier;

/// The settlement engine.
///
/// Generic over its collaborators: token custody, the asset-pair registry,
/// and the programmable-receiver notifier. The engine holds owned handles;
/// there is no ambient or global authority anywhere.
pub struct Tube<C, R, P> {
    config: EngineConfig,
    mode: PauseMode,
    validators: ValidatorSet,
    ledger: SettlementLedger,
    fees: FeeSchedule,
    escrow: EscrowVault,
    /// Per-route deposit counter: `(destination, token) → next sequence`.
    sequences: HashMap<(NetworkId, Address), u64>,
    /// Audit trail, in emission order. Failed calls append nothing.
    events: Vec<Event>,
    custody: C,
    registry: R,
    receiver: P,
}

impl<C, R, P> Tube<C, R, P>
where
    C: TokenCustody,
    R: AssetRegistry,
    P: PayloadReceiver,
{
    /// Build an engine in operational mode with an empty validator set.
    pub fn new(config: EngineConfig, custody: C, registry: R, receiver: P) -> Self {
        info!(network = %config.network_id, "engine constructed");
        Self {
            config,
            mode: PauseMode::Operational,
            validators: ValidatorSet::new(),
            ledger: SettlementLedger::new(),
            fees: FeeSchedule::new(),
            escrow: EscrowVault::new(),
            sequences: HashMap::new(),
            events: Vec::new(),
            custody,
            registry,
            receiver,
        }
    }

    fn require_mode(&self, expected: PauseMode) -> Result<()> {
        if self.mode != expected {
            return Err(TubeError::InvalidMode {
                expected,
                actual: self.mode,
            });
        }
        Ok(())
    }

    // =====================================================================
    // Mode transitions
    // =====================================================================

    /// Enter administrative mode.
    pub fn pause(&mut self) -> Result<()> {
        self.require_mode(PauseMode::Operational)?;
        self.mode = PauseMode::Administrative;
        info!(network = %self.config.network_id, "engine paused");
        Ok(())
    }

    /// Return to operational mode.
    pub fn unpause(&mut self) -> Result<()> {
        self.require_mode(PauseMode::Administrative)?;
        self.mode = PauseMode::Operational;
        info!(network = %self.config.network_id, "engine unpaused");
        Ok(())
    }

    /// Current pause mode.
    #[must_use]
    pub fn mode(&self) -> PauseMode {
        self.mode
    }

    // =====================================================================
    // Validator administration
    // =====================================================================

    /// Add a validator. Requires administrative mode.
    pub fn add_validator(&mut self, validator: Address) -> Result<()> {
        self.require_mode(PauseMode::Administrative)?;
        self.validators.add(validator)?;
        info!(validator = %validator, total = self.validators.len(), "validator added");
        self.events.push(Event::ValidatorAdded { validator });
        Ok(())
    }

    /// Remove a validator. Requires administrative mode.
    pub fn remove_validator(&mut self, validator: Address) -> Result<()> {
        self.require_mode(PauseMode::Administrative)?;
        self.validators.remove(validator)?;
        info!(validator = %validator, total = self.validators.len(), "validator removed");
        self.events.push(Event::ValidatorRemoved { validator });
        Ok(())
    }

    /// Paged validator enumeration: up to `limit` identities from `offset`,
    /// plus the total member count.
    #[must_use]
    pub fn get_validators(&self, offset: usize, limit: usize) -> (Vec<Address>, usize) {
        self.validators.list(offset, limit)
    }

    // =====================================================================
    // Fees
    // =====================================================================

    /// Set the deposit fee for a destination network.
    pub fn set_fee(&mut self, network: NetworkId, fee: Amount) {
        info!(%network, fee, "fee updated");
        self.fees.set(network, fee);
    }

    /// Deposit fee currently charged for a destination network.
    #[must_use]
    pub fn fee(&self, network: NetworkId) -> Amount {
        self.fees.get(network)
    }

    // =====================================================================
    // Key derivation (read-only, for off-engine signature preparation)
    // =====================================================================

    /// Derive the withdrawal key for the given parameters, bound to this
    /// engine's network.
    #[must_use]
    pub fn gen_key(
        &self,
        home_network: NetworkId,
        token: Address,
        sequence: u64,
        recipient: Address,
        amount: Amount,
        payload: &[u8],
    ) -> WithdrawalKey {
        tubelink_crypto::derive_withdrawal_key(
            self.config.network_id,
            home_network,
            token,
            sequence,
            recipient,
            amount,
            payload,
        )
    }

    /// Aggregate an ordered sequence of keys into one batch key.
    #[must_use]
    pub fn concat_keys(&self, keys: &[WithdrawalKey]) -> WithdrawalKey {
        tubelink_crypto::concat_keys(keys)
    }

    // =====================================================================
    // Deposit
    // =====================================================================

    /// Deposit `amount` of `token` for bridging to `destination`, with the
    /// caller as recipient on the far side.
    pub fn deposit(
        &mut self,
        sender: Address,
        destination: NetworkId,
        token: Address,
        amount: Amount,
        payload: &[u8],
    ) -> Result<DepositReceipt> {
        self.deposit_to(sender, destination, token, sender, amount, payload)
    }

    /// Deposit with an explicit third-party recipient on the far side.
    pub fn deposit_to(
        &mut self,
        sender: Address,
        destination: NetworkId,
        token: Address,
        recipient: Address,
        amount: Amount,
        payload: &[u8],
    ) -> Result<DepositReceipt> {
        self.require_mode(PauseMode::Operational)?;
        if recipient.is_zero() {
            return Err(TubeError::InvalidRecipient);
        }
        if amount == 0 {
            return Err(TubeError::InvalidAmount);
        }

        // A rejected deposit must move nothing, so every balance is checked
        // before either transfer. When the deposit token is the fee token
        // the sender needs the combined amount in that one balance.
        let fee = self.fees.get(destination);
        let needed = if token == self.config.fee_token {
            amount.checked_add(fee).unwrap_or(Amount::MAX)
        } else {
            amount
        };
        let available = self.custody.balance_of(token, sender);
        if available < needed {
            return Err(TubeError::InsufficientBalance { needed, available });
        }
        if fee > 0 && token != self.config.fee_token {
            let fee_available = self.custody.balance_of(self.config.fee_token, sender);
            if fee_available < fee {
                return Err(TubeError::InsufficientBalance {
                    needed: fee,
                    available: fee_available,
                });
            }
        }

        if fee > 0 {
            self.custody
                .transfer_in(self.config.fee_token, sender, fee)?;
            self.custody
                .transfer_out(self.config.fee_token, self.config.fee_sink, fee)?;
        }
        self.custody.transfer_in(token, sender, amount)?;

        let counter = self.sequences.entry((destination, token)).or_insert(0);
        let sequence = *counter;
        *counter += 1;

        let receipt = DepositReceipt {
            destination_network: destination,
            token,
            sequence,
            sender,
            recipient,
            amount,
            payload: payload.to_vec(),
            fee,
            issued_at: Utc::now(),
        };
        info!(
            destination = %destination,
            token = %token.short(),
            sequence,
            amount,
            fee,
            "deposit accepted"
        );
        self.events.push(Event::Receipt(receipt.clone()));
        Ok(receipt)
    }

    // =====================================================================
    // Withdraw
    // =====================================================================

    /// Settle one withdrawal attested by a validator quorum.
    #[allow(clippy::too_many_arguments)]
    pub fn withdraw(
        &mut self,
        home_network: NetworkId,
        token: Address,
        sequence: u64,
        recipient: Address,
        amount: Amount,
        payload: &[u8],
        signatures: &[u8],
    ) -> Result<Settlement> {
        self.require_mode(PauseMode::Operational)?;
        if amount == 0 {
            return Err(TubeError::AmountIsZero);
        }
        if recipient.is_zero() {
            return Err(TubeError::InvalidRecipient);
        }
        if signatures.is_empty() || signatures.len() % SIGNATURE_WIDTH != 0 {
            return Err(TubeError::InvalidSignatureLength);
        }
        let local =
            self.registry
                .resolve_route(home_network, token)
                .ok_or(TubeError::InvalidRouteToken {
                    network: home_network,
                    token,
                })?;

        let key = self.gen_key(home_network, token, sequence, recipient, amount, payload);
        let attesters = verifier::verify(&key, signatures, &self.validators)?;

        if self.ledger.is_settled(&key) {
            return Err(TubeError::AlreadySettled(key));
        }

        let success = self.release(key, local, recipient, amount, payload)?;
        self.ledger.mark_settled(key, attesters.clone())?;

        let settlement = Settlement {
            key,
            validators: attesters,
            success,
            settled_at: Utc::now(),
        };
        info!(key = %key, success, "withdrawal settled");
        self.events.push(Event::Settled(settlement.clone()));
        Ok(settlement)
    }

    /// Settle several withdrawals under one combined signature bundle.
    ///
    /// Validation is all-or-nothing: the first failing item aborts the whole
    /// batch before anything settles. Settlement is per-item: every item
    /// commits independently and emits its own event. Batch items carry no
    /// execution payload.
    pub fn withdraw_in_batch(
        &mut self,
        home_networks: &[NetworkId],
        tokens: &[Address],
        sequences: &[u64],
        recipients: &[Address],
        amounts: &[Amount],
        signatures: &[u8],
    ) -> Result<Vec<Settlement>> {
        self.require_mode(PauseMode::Operational)?;
        let count = home_networks.len();
        if count == 0 || count > self.config.max_batch_items {
            return Err(TubeError::InvalidArrayLength);
        }
        if signatures.is_empty() || signatures.len() % SIGNATURE_WIDTH != 0 {
            return Err(TubeError::InvalidSignatureLength);
        }
        if tokens.len() != count
            || sequences.len() != count
            || recipients.len() != count
            || amounts.len() != count
        {
            return Err(TubeError::InvalidParameters {
                reason: "batch arrays have mismatched lengths".into(),
            });
        }

        let mut locals = Vec::with_capacity(count);
        let mut keys = Vec::with_capacity(count);
        for i in 0..count {
            if amounts[i] == 0 {
                return Err(TubeError::AmountIsZero);
            }
            if recipients[i].is_zero() {
                return Err(TubeError::InvalidRecipient);
            }
            let local = self
                .registry
                .resolve_route(home_networks[i], tokens[i])
                .ok_or(TubeError::InvalidRouteToken {
                    network: home_networks[i],
                    token: tokens[i],
                })?;
            locals.push(local);
            keys.push(self.gen_key(
                home_networks[i],
                tokens[i],
                sequences[i],
                recipients[i],
                amounts[i],
                b"",
            ));
        }

        // One quorum check authorizes the whole batch.
        let aggregate = tubelink_crypto::concat_keys(&keys);
        let attesters = verifier::verify(&aggregate, signatures, &self.validators)?;

        // Replay scan before any item settles, including duplicates within
        // this batch itself.
        let mut fresh = HashSet::with_capacity(count);
        for key in &keys {
            if self.ledger.is_settled(key) || !fresh.insert(*key) {
                return Err(TubeError::AlreadySettled(*key));
            }
        }

        // Pre-flight custody per token: a vault shortfall must abort the
        // whole call before any item pays out.
        let mut required: HashMap<Address, Amount> = HashMap::new();
        for (local, amount) in locals.iter().zip(amounts) {
            let total = required.entry(*local).or_insert(0);
            *total = total.checked_add(*amount).unwrap_or(Amount::MAX);
        }
        for (token, needed) in &required {
            let available = self.custody.custody_balance(*token);
            if available < *needed {
                return Err(TubeError::InsufficientBalance {
                    needed: *needed,
                    available,
                });
            }
        }

        let mut settlements = Vec::with_capacity(count);
        for (i, key) in keys.iter().enumerate() {
            self.custody.transfer_out(locals[i], recipients[i], amounts[i])?;
            self.ledger.mark_settled(*key, attesters.clone())?;
            debug!(key = %key, item = i, "batch item settled");
            let settlement = Settlement {
                key: *key,
                validators: attesters.clone(),
                success: true,
                settled_at: Utc::now(),
            };
            // Emitted at the commit point, so a settled item is always
            // visible in the audit trail.
            self.events.push(Event::Settled(settlement.clone()));
            settlements.push(settlement);
        }
        info!(items = count, "batch settled");
        Ok(settlements)
    }

    /// Release funds for one settled withdrawal.
    ///
    /// Empty payload: straight transfer to the recipient. Non-empty payload:
    /// the recipient is notified inside a failure boundary; only a confirmed
    /// delivery releases the funds, otherwise they stay in engine custody
    /// and the escrow vault records them. Returns the settlement outcome.
    fn release(
        &mut self,
        key: WithdrawalKey,
        token: Address,
        recipient: Address,
        amount: Amount,
        payload: &[u8],
    ) -> Result<bool> {
        if payload.is_empty() {
            self.custody.transfer_out(token, recipient, amount)?;
            return Ok(true);
        }

        let receiver = &mut self.receiver;
        let delivered = catch_unwind(AssertUnwindSafe(|| {
            receiver.notify(recipient, token, amount, payload)
        }));
        match delivered {
            Ok(Ok(())) => {
                self.custody.transfer_out(token, recipient, amount)?;
                Ok(true)
            }
            Ok(Err(reason)) => {
                warn!(key = %key, recipient = %recipient, reason, "payload rejected, funds escrowed");
                self.escrow.record(key, token, recipient, amount);
                Ok(false)
            }
            Err(_) => {
                warn!(key = %key, recipient = %recipient, "payload notification panicked, funds escrowed");
                self.escrow.record(key, token, recipient, amount);
                Ok(false)
            }
        }
    }

    // =====================================================================
    // Read-only accessors
    // =====================================================================

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The settlement ledger.
    #[must_use]
    pub fn ledger(&self) -> &SettlementLedger {
        &self.ledger
    }

    /// The escrow vault.
    #[must_use]
    pub fn escrow(&self) -> &EscrowVault {
        &self.escrow
    }

    /// The token custody collaborator.
    #[must_use]
    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// Mutable custody access, for funding accounts in tests and tooling.
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    /// The payload receiver collaborator.
    #[must_use]
    pub fn receiver(&self) -> &P {
        &self.receiver
    }

    /// The audit trail so far, in emission order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain the audit trail.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
