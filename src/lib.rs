#![no_std]

multiversx_sc::imports!();

pub mod dao_proxy;
pub mod errors;
pub mod presale_proxy;
pub mod registry_proxy;
pub mod staking;
pub mod treasury_proxy;
pub mod types;
pub mod voting_power;

use errors::*;
use types::{
    ImplementationSet, PresaleData, PresalePauseData, Proposal, ProposalKind, ProposalStatus,
    TransferData, UpgradeData, UpgradeableComponent, VoteRecord,
};

// ============================================================
// Constants
// ============================================================

/// Voting window: 3 days in seconds
pub const VOTING_PERIOD: u64 = 3 * 86_400;

/// Voting power needed to open a proposal: 1 token (18 decimals)
pub const MIN_PROPOSAL_STAKE: u64 = 1_000_000_000_000_000_000;

/// Turnout (for + against) must reach 50% of total staked at execution
pub const QUORUM_BPS: u64 = 5_000;

// ============================================================
// Contract
// ============================================================

#[multiversx_sc::contract]
pub trait DaoGovernance: staking::StakingModule {
    // ========================================================
    // Init / Upgrade
    // ========================================================

    #[init]
    fn init(
        &self,
        name: ManagedBuffer,
        governance_token: TokenIdentifier,
        registry_address: ManagedAddress,
        version: ManagedBuffer,
    ) {
        require!(governance_token.is_valid_esdt_identifier(), ERR_INVALID_TOKEN);
        require!(!registry_address.is_zero(), ERR_ZERO_ADDRESS);
        require!(!version.is_empty(), ERR_INVALID_VERSION);

        self.name().set(&name);
        self.governance_token().set(&governance_token);
        self.registry_address().set(&registry_address);
        for component in [
            UpgradeableComponent::Dao,
            UpgradeableComponent::Treasury,
            UpgradeableComponent::Presale,
        ] {
            self.component_version(component).set(&version);
        }
        self.paused().set(false);
        self.proposal_count().set(0u64);
    }

    /// Only the DAO itself may upgrade it, and only as a proposal effect.
    #[upgrade]
    fn upgrade(&self) {
        require!(
            self.blockchain().get_caller() == self.blockchain().get_sc_address(),
            ERR_UNAUTHORIZED_UPGRADE
        );
    }

    /// One-shot wiring done by the factory right after deploying the cluster.
    #[only_owner]
    #[endpoint(bindTreasury)]
    fn bind_treasury(&self, treasury_address: ManagedAddress) {
        require!(
            self.treasury_address().is_empty(),
            ERR_TREASURY_ALREADY_BOUND
        );
        require!(!treasury_address.is_zero(), ERR_ZERO_ADDRESS);
        self.treasury_address().set(&treasury_address);
    }

    // ========================================================
    // ENDPOINTS: propose*
    // Caller needs MIN_PROPOSAL_STAKE of voting power. Nothing but
    // Unpause may be proposed while the DAO is paused.
    // ========================================================

    #[endpoint(proposeTransfer)]
    fn propose_transfer(
        &self,
        asset: EgldOrEsdtTokenIdentifier,
        recipient: ManagedAddress,
        amount: BigUint,
    ) -> u64 {
        self.require_not_paused();
        require!(amount > 0u64, ERR_ZERO_AMOUNT);
        require!(!recipient.is_zero(), ERR_ZERO_RECIPIENT);

        let proposal_id = self.create_proposal(ProposalKind::Transfer);
        let data = TransferData {
            asset,
            recipient,
            amount,
        };
        self.transfer_data(proposal_id).set(&data);
        self.transfer_proposed_event(proposal_id, &data);

        proposal_id
    }

    #[endpoint(proposeUpgrade)]
    fn propose_upgrade(&self, component: UpgradeableComponent, version: ManagedBuffer) -> u64 {
        self.require_not_paused();

        let registry = self.registry_address().get();
        let registered: bool = self
            .tx()
            .to(&registry)
            .typed(registry_proxy::RegistryProxy)
            .is_version_registered(&version)
            .returns(ReturnsResult)
            .sync_call_readonly();
        require!(registered, ERR_INVALID_VERSION);

        let proposal_id = self.create_proposal(ProposalKind::Upgrade);
        let data = UpgradeData { component, version };
        self.upgrade_data(proposal_id).set(&data);
        self.upgrade_proposed_event(proposal_id, &data);

        proposal_id
    }

    /// Treasury funding is checked when the proposal executes, not here.
    #[endpoint(proposePresale)]
    fn propose_presale(&self, token_amount: BigUint, initial_price: BigUint) -> u64 {
        self.require_not_paused();
        require!(token_amount > 0u64, ERR_ZERO_AMOUNT);
        require!(initial_price > 0u64, ERR_ZERO_INITIAL_PRICE);

        let proposal_id = self.create_proposal(ProposalKind::CreatePresale);
        let data = PresaleData {
            token_amount,
            initial_price,
        };
        self.presale_data(proposal_id).set(&data);
        self.presale_proposed_event(proposal_id, &data);

        proposal_id
    }

    #[endpoint(proposePresalePause)]
    fn propose_presale_pause(&self, presale: ManagedAddress, pause: bool) -> u64 {
        self.require_not_paused();
        require!(self.presales().contains(&presale), ERR_UNKNOWN_PRESALE);

        let proposal_id = self.create_proposal(ProposalKind::PresalePause);
        let data = PresalePauseData { presale, pause };
        self.presale_pause_data(proposal_id).set(&data);
        self.presale_pause_proposed_event(proposal_id, &data);

        proposal_id
    }

    #[endpoint(proposePresaleWithdraw)]
    fn propose_presale_withdraw(&self, presale: ManagedAddress) -> u64 {
        self.require_not_paused();
        require!(self.presales().contains(&presale), ERR_UNKNOWN_PRESALE);

        let proposal_id = self.create_proposal(ProposalKind::PresaleWithdraw);
        self.presale_withdraw_data(proposal_id).set(&presale);
        self.presale_withdraw_proposed_event(proposal_id, &presale);

        proposal_id
    }

    #[endpoint(proposePause)]
    fn propose_pause(&self) -> u64 {
        require!(!self.paused().get(), ERR_ALREADY_PAUSED);
        self.create_proposal(ProposalKind::Pause)
    }

    #[endpoint(proposeUnpause)]
    fn propose_unpause(&self) -> u64 {
        require!(self.paused().get(), ERR_NOT_PAUSED);
        self.create_proposal(ProposalKind::Unpause)
    }

    // ========================================================
    // ENDPOINT: vote
    // One vote per account, weighted by voting power at cast time.
    // ========================================================

    #[endpoint(vote)]
    fn vote(&self, proposal_id: u64, support: bool) {
        require!(
            !self.proposals(proposal_id).is_empty(),
            ERR_PROPOSAL_NOT_FOUND
        );
        let mut proposal = self.proposals(proposal_id).get();

        let now = self.blockchain().get_block_timestamp();
        require!(now < proposal.deadline, ERR_VOTING_ENDED);

        let caller = self.blockchain().get_caller();
        require!(
            self.votes(proposal_id, &caller).is_empty(),
            ERR_ALREADY_VOTED
        );

        let weight = self.voting_power_of(&caller);
        require!(weight > 0u64, ERR_NO_VOTING_POWER);

        if support {
            proposal.for_votes += &weight;
        } else {
            proposal.against_votes += &weight;
        }

        self.votes(proposal_id, &caller).set(VoteRecord {
            support,
            weight: weight.clone(),
        });
        self.proposals(proposal_id).set(&proposal);

        self.vote_event(proposal_id, &caller, support, &weight);
    }

    // ========================================================
    // ENDPOINT: execute
    // Anyone may trigger once the deadline is reached. A failed
    // tally or effect reverts everything, so it can be retried.
    // ========================================================

    #[endpoint(execute)]
    fn execute(&self, proposal_id: u64) {
        require!(
            !self.proposals(proposal_id).is_empty(),
            ERR_PROPOSAL_NOT_FOUND
        );
        let mut proposal = self.proposals(proposal_id).get();

        let now = self.blockchain().get_block_timestamp();
        require!(now >= proposal.deadline, ERR_VOTING_ONGOING);
        require!(!proposal.executed, ERR_ALREADY_EXECUTED);

        let turnout = &proposal.for_votes + &proposal.against_votes;
        let quorum = voting_power::quorum_threshold(&self.total_staked().get(), QUORUM_BPS);
        require!(turnout >= quorum, ERR_QUORUM_NOT_REACHED);
        require!(
            proposal.for_votes > proposal.against_votes,
            ERR_PROPOSAL_REJECTED
        );

        proposal.executed = true;
        self.proposals(proposal_id).set(&proposal);
        self.proposal_executed_event(proposal_id, proposal.kind);

        match proposal.kind {
            ProposalKind::Transfer => self.execute_transfer(proposal_id),
            ProposalKind::CreatePresale => self.execute_create_presale(proposal_id),
            ProposalKind::PresalePause => self.execute_presale_pause(proposal_id),
            ProposalKind::PresaleWithdraw => self.execute_presale_withdraw(proposal_id),
            ProposalKind::Pause => self.execute_pause(),
            ProposalKind::Unpause => self.execute_unpause(),
            ProposalKind::Upgrade => self.execute_upgrade(proposal_id),
        }
    }

    // ========================================================
    // INTERNAL: proposal bookkeeping
    // ========================================================

    fn require_not_paused(&self) {
        require!(!self.paused().get(), ERR_DAO_PAUSED);
    }

    fn create_proposal(&self, kind: ProposalKind) -> u64 {
        let caller = self.blockchain().get_caller();
        require!(
            self.voting_power_of(&caller) >= MIN_PROPOSAL_STAKE,
            ERR_INSUFFICIENT_STAKE
        );

        let proposal_id = self.proposal_count().get() + 1u64;
        let timestamp = self.blockchain().get_block_timestamp();
        let deadline = timestamp + VOTING_PERIOD;

        let proposal = Proposal {
            id: proposal_id,
            kind,
            proposer: caller.clone(),
            for_votes: BigUint::zero(),
            against_votes: BigUint::zero(),
            created_at: timestamp,
            deadline,
            executed: false,
        };

        self.proposals(proposal_id).set(&proposal);
        self.proposal_count().set(proposal_id);

        self.proposal_created_event(proposal_id, &caller, kind, deadline);

        proposal_id
    }

    // ========================================================
    // INTERNAL: execution effects
    // ========================================================

    fn execute_transfer(&self, proposal_id: u64) {
        let data = self.transfer_data(proposal_id).get();
        let treasury = self.bound_treasury();
        require!(
            self.balance_of(&treasury, &data.asset) >= data.amount,
            ERR_INSUFFICIENT_BALANCE
        );

        self.tx()
            .to(&treasury)
            .typed(treasury_proxy::TreasuryProxy)
            .release_asset(&data.asset, &data.recipient, &data.amount)
            .sync_call();
    }

    fn execute_create_presale(&self, proposal_id: u64) {
        let data = self.presale_data(proposal_id).get();
        let treasury = self.bound_treasury();
        let token = self.governance_token().get();
        require!(
            self.blockchain().get_esdt_balance(&treasury, &token, 0) >= data.token_amount,
            ERR_INSUFFICIENT_BALANCE
        );

        let version = self.component_version(UpgradeableComponent::Presale).get();
        let template = self.resolve_implementation(UpgradeableComponent::Presale, &version);

        let presale: ManagedAddress = self
            .tx()
            .typed(presale_proxy::PresaleProxy)
            .init(&token, &treasury, &data.token_amount, &data.initial_price)
            .from_source(template)
            .code_metadata(self.code_metadata_for(UpgradeableComponent::Presale))
            .returns(ReturnsNewManagedAddress)
            .sync_call();

        self.tx()
            .to(&treasury)
            .typed(treasury_proxy::TreasuryProxy)
            .release_asset(
                EgldOrEsdtTokenIdentifier::esdt(token),
                &presale,
                &data.token_amount,
            )
            .sync_call();

        self.presales().insert(presale.clone());
        self.presale_contract(proposal_id).set(&presale);

        self.presale_created_event(proposal_id, &presale, &data.token_amount);
    }

    fn execute_presale_pause(&self, proposal_id: u64) {
        let data = self.presale_pause_data(proposal_id).get();
        self.tx()
            .to(&data.presale)
            .typed(presale_proxy::PresaleProxy)
            .set_paused(data.pause)
            .sync_call();
    }

    fn execute_presale_withdraw(&self, proposal_id: u64) {
        let presale = self.presale_withdraw_data(proposal_id).get();
        self.tx()
            .to(&presale)
            .typed(presale_proxy::PresaleProxy)
            .withdraw_to_treasury()
            .sync_call();
    }

    fn execute_pause(&self) {
        require!(!self.paused().get(), ERR_ALREADY_PAUSED);
        self.paused().set(true);
        self.paused_event();
    }

    fn execute_unpause(&self) {
        require!(self.paused().get(), ERR_NOT_PAUSED);
        self.paused().set(false);
        self.unpaused_event();
    }

    /// Presale upgrades only rebind the template used for new presales.
    /// DAO and treasury are upgraded in place by an async call that ends
    /// this one; the version is bound in `upgrade_callback` once the new
    /// code is installed.
    fn execute_upgrade(&self, proposal_id: u64) {
        let data = self.upgrade_data(proposal_id).get();
        let implementation = self.resolve_implementation(data.component, &data.version);

        let target = match data.component {
            UpgradeableComponent::Dao => self.blockchain().get_sc_address(),
            UpgradeableComponent::Treasury => self.bound_treasury(),
            UpgradeableComponent::Presale => {
                self.component_version(data.component).set(&data.version);
                self.upgraded_event(proposal_id, data.component, &data.version);
                return;
            },
        };

        self.upgrade_scheduled_event(proposal_id, data.component, &data.version);

        self.tx()
            .to(target)
            .raw_upgrade()
            .from_source(implementation)
            .code_metadata(self.code_metadata_for(data.component))
            .callback(self.callbacks().upgrade_callback(
                proposal_id,
                data.component,
                data.version,
            ))
            .upgrade_async_call_and_exit();
    }

    /// A failed upgrade reopens the proposal so it can be executed again.
    #[callback]
    fn upgrade_callback(
        &self,
        proposal_id: u64,
        component: UpgradeableComponent,
        version: ManagedBuffer,
        #[call_result] result: ManagedAsyncCallResult<()>,
    ) {
        match result {
            ManagedAsyncCallResult::Ok(()) => {
                self.component_version(component).set(&version);
                self.upgraded_event(proposal_id, component, &version);
            },
            ManagedAsyncCallResult::Err(err) => {
                self.proposals(proposal_id)
                    .update(|proposal| proposal.executed = false);
                self.upgrade_failed_event(proposal_id, component, &version, &err.err_msg);
            },
        }
    }

    fn resolve_implementation(
        &self,
        component: UpgradeableComponent,
        version: &ManagedBuffer,
    ) -> ManagedAddress {
        let registry = self.registry_address().get();
        let implementations: ImplementationSet<Self::Api> = self
            .tx()
            .to(&registry)
            .typed(registry_proxy::RegistryProxy)
            .resolve_version(version)
            .returns(ReturnsResult)
            .sync_call_readonly();

        let implementation = implementations.for_component(component).clone();
        require!(!implementation.is_zero(), ERR_NO_IMPLEMENTATION);
        implementation
    }

    fn code_metadata_for(&self, component: UpgradeableComponent) -> CodeMetadata {
        match component {
            UpgradeableComponent::Dao => CodeMetadata::UPGRADEABLE | CodeMetadata::READABLE,
            // both take plain transfers and ESDT funding
            UpgradeableComponent::Treasury | UpgradeableComponent::Presale => {
                CodeMetadata::UPGRADEABLE | CodeMetadata::READABLE | CodeMetadata::PAYABLE
            },
        }
    }

    fn bound_treasury(&self) -> ManagedAddress {
        require!(!self.treasury_address().is_empty(), ERR_TREASURY_NOT_BOUND);
        self.treasury_address().get()
    }

    fn balance_of(&self, account: &ManagedAddress, asset: &EgldOrEsdtTokenIdentifier) -> BigUint {
        if asset.is_egld() {
            self.blockchain().get_balance(account)
        } else {
            let token = asset.clone().unwrap_esdt();
            self.blockchain().get_esdt_balance(account, &token, 0)
        }
    }

    // ========================================================
    // VIEWS: read-only queries
    // ========================================================

    #[view(getProposal)]
    fn get_proposal(&self, id: u64) -> Proposal<Self::Api> {
        require!(!self.proposals(id).is_empty(), ERR_PROPOSAL_NOT_FOUND);
        self.proposals(id).get()
    }

    /// Up to `count` proposals starting at id `from`; ids start at 1.
    #[view(getProposals)]
    fn get_proposals(&self, from: u64, count: u64) -> MultiValueEncoded<Proposal<Self::Api>> {
        let first = from.max(1);
        let last = first
            .saturating_add(count)
            .saturating_sub(1)
            .min(self.proposal_count().get());

        let mut page = MultiValueEncoded::new();
        for id in first..=last {
            page.push(self.proposals(id).get());
        }
        page
    }

    #[view(getProposalStatus)]
    fn get_proposal_status(&self, id: u64) -> ProposalStatus {
        let proposal = self.get_proposal(id);
        if proposal.executed {
            ProposalStatus::Executed
        } else if self.blockchain().get_block_timestamp() < proposal.deadline {
            ProposalStatus::Voting
        } else {
            ProposalStatus::Decided
        }
    }

    #[view(hasVoted)]
    fn has_voted(&self, proposal_id: u64, voter: ManagedAddress) -> bool {
        !self.votes(proposal_id, &voter).is_empty()
    }

    #[view(getPresales)]
    fn get_presales(&self) -> MultiValueEncoded<ManagedAddress> {
        let mut result = MultiValueEncoded::new();
        for presale in self.presales().iter() {
            result.push(presale);
        }
        result
    }

    /// (voting period, minimum proposal stake, quorum bps)
    #[view(getGovernanceConfig)]
    fn get_governance_config(&self) -> MultiValue3<u64, BigUint, u64> {
        (VOTING_PERIOD, BigUint::from(MIN_PROPOSAL_STAKE), QUORUM_BPS).into()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("proposalCreated")]
    fn proposal_created_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] proposer: &ManagedAddress,
        #[indexed] kind: ProposalKind,
        deadline: u64,
    );

    #[event("transferProposed")]
    fn transfer_proposed_event(
        &self,
        #[indexed] proposal_id: u64,
        data: &TransferData<Self::Api>,
    );

    #[event("upgradeProposed")]
    fn upgrade_proposed_event(&self, #[indexed] proposal_id: u64, data: &UpgradeData<Self::Api>);

    #[event("presaleProposed")]
    fn presale_proposed_event(&self, #[indexed] proposal_id: u64, data: &PresaleData<Self::Api>);

    #[event("presalePauseProposed")]
    fn presale_pause_proposed_event(
        &self,
        #[indexed] proposal_id: u64,
        data: &PresalePauseData<Self::Api>,
    );

    #[event("presaleWithdrawProposed")]
    fn presale_withdraw_proposed_event(
        &self,
        #[indexed] proposal_id: u64,
        presale: &ManagedAddress,
    );

    #[event("vote")]
    fn vote_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] voter: &ManagedAddress,
        #[indexed] support: bool,
        weight: &BigUint,
    );

    #[event("proposalExecuted")]
    fn proposal_executed_event(&self, #[indexed] proposal_id: u64, kind: ProposalKind);

    #[event("presaleCreated")]
    fn presale_created_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] presale: &ManagedAddress,
        token_amount: &BigUint,
    );

    #[event("upgradeScheduled")]
    fn upgrade_scheduled_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] component: UpgradeableComponent,
        version: &ManagedBuffer,
    );

    #[event("upgraded")]
    fn upgraded_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] component: UpgradeableComponent,
        version: &ManagedBuffer,
    );

    #[event("upgradeFailed")]
    fn upgrade_failed_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] component: UpgradeableComponent,
        #[indexed] version: &ManagedBuffer,
        reason: &ManagedBuffer,
    );

    #[event("paused")]
    fn paused_event(&self);

    #[event("unpaused")]
    fn unpaused_event(&self);

    // ========================================================
    // STORAGE
    // ========================================================

    // ── Configuration ──

    #[view(getName)]
    #[storage_mapper("name")]
    fn name(&self) -> SingleValueMapper<ManagedBuffer>;

    #[view(getRegistry)]
    #[storage_mapper("registryAddress")]
    fn registry_address(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getTreasury)]
    #[storage_mapper("treasuryAddress")]
    fn treasury_address(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getComponentVersion)]
    #[storage_mapper("componentVersion")]
    fn component_version(&self, component: UpgradeableComponent) -> SingleValueMapper<ManagedBuffer>;

    #[view(isPaused)]
    #[storage_mapper("paused")]
    fn paused(&self) -> SingleValueMapper<bool>;

    // ── Proposals ──

    #[view(getProposalCount)]
    #[storage_mapper("proposalCount")]
    fn proposal_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, id: u64) -> SingleValueMapper<Proposal<Self::Api>>;

    #[view(getVote)]
    #[storage_mapper("votes")]
    fn votes(&self, proposal_id: u64, voter: &ManagedAddress) -> SingleValueMapper<VoteRecord<Self::Api>>;

    // ── Payloads ──

    #[view(getTransferData)]
    #[storage_mapper("transferData")]
    fn transfer_data(&self, proposal_id: u64) -> SingleValueMapper<TransferData<Self::Api>>;

    #[view(getUpgradeData)]
    #[storage_mapper("upgradeData")]
    fn upgrade_data(&self, proposal_id: u64) -> SingleValueMapper<UpgradeData<Self::Api>>;

    #[view(getPresaleData)]
    #[storage_mapper("presaleData")]
    fn presale_data(&self, proposal_id: u64) -> SingleValueMapper<PresaleData<Self::Api>>;

    #[view(getPresalePauseData)]
    #[storage_mapper("presalePauseData")]
    fn presale_pause_data(&self, proposal_id: u64) -> SingleValueMapper<PresalePauseData<Self::Api>>;

    #[view(getPresaleWithdrawData)]
    #[storage_mapper("presaleWithdrawData")]
    fn presale_withdraw_data(&self, proposal_id: u64) -> SingleValueMapper<ManagedAddress>;

    // ── Presales deployed by this DAO ──

    #[storage_mapper("presales")]
    fn presales(&self) -> UnorderedSetMapper<ManagedAddress>;

    #[view(getPresaleContract)]
    #[storage_mapper("presaleContract")]
    fn presale_contract(&self, proposal_id: u64) -> SingleValueMapper<ManagedAddress>;
}
