multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Proposal Kind: which action a proposal performs on execution
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ProposalKind {
    /// Release an asset from the treasury to a recipient.
    Transfer,
    /// Bind a component to a registry version.
    Upgrade,
    /// Deploy a bonding-curve presale funded from the treasury.
    CreatePresale,
    /// Pause or resume a presale owned by this DAO.
    PresalePause,
    /// Sweep a presale's raised EGLD into the treasury.
    PresaleWithdraw,
    Pause,
    Unpause,
}

// ============================================================
// Proposal Status: derived from the clock and the executed flag
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ProposalStatus {
    /// Before the deadline. Votes are accepted.
    Voting,
    /// Deadline reached, not executed yet. Execution may be attempted (and retried).
    Decided,
    /// Terminal.
    Executed,
}

// ============================================================
// Proposal: tally plus lifecycle flag
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    pub kind: ProposalKind,
    pub proposer: ManagedAddress<M>,
    pub for_votes: BigUint<M>,
    pub against_votes: BigUint<M>,
    pub created_at: u64,
    /// `created_at + VOTING_PERIOD`; votes before it, execution at or after it
    pub deadline: u64,
    pub executed: bool,
}

// ============================================================
// Kind-specific payloads, stored next to the proposal by id
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct TransferData<M: ManagedTypeApi> {
    pub asset: EgldOrEsdtTokenIdentifier<M>,
    pub recipient: ManagedAddress<M>,
    pub amount: BigUint<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum UpgradeableComponent {
    Dao,
    Treasury,
    /// Template for presales created from now on. Live presales keep their code.
    Presale,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct UpgradeData<M: ManagedTypeApi> {
    pub component: UpgradeableComponent,
    pub version: ManagedBuffer<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct PresaleData<M: ManagedTypeApi> {
    pub token_amount: BigUint<M>,
    pub initial_price: BigUint<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct PresalePauseData<M: ManagedTypeApi> {
    pub presale: ManagedAddress<M>,
    pub pause: bool,
}

// ============================================================
// Vote Record: weight captured when the vote was cast
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct VoteRecord<M: ManagedTypeApi> {
    pub support: bool,
    pub weight: BigUint<M>,
}

/// Template addresses the registry holds for one version.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct ImplementationSet<M: ManagedTypeApi> {
    pub dao: ManagedAddress<M>,
    pub treasury: ManagedAddress<M>,
    pub presale: ManagedAddress<M>,
}

impl<M: ManagedTypeApi> ImplementationSet<M> {
    pub fn for_component(&self, component: UpgradeableComponent) -> &ManagedAddress<M> {
        match component {
            UpgradeableComponent::Dao => &self.dao,
            UpgradeableComponent::Treasury => &self.treasury,
            UpgradeableComponent::Presale => &self.presale,
        }
    }
}
