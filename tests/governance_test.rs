use multiversx_sc_scenario::imports::*;

use dao_factory::factory_proxy;
use dao_governance::dao_proxy;
use dao_governance::types::{ProposalStatus, UpgradeableComponent};
use dao_governance::VOTING_PERIOD;
use dao_presale::presale_proxy;
use dao_treasury::treasury_proxy;

const DAO_CODE_PATH: MxscPath = MxscPath::new("output/dao-governance.mxsc.json");
const TREASURY_CODE_PATH: MxscPath = MxscPath::new("treasury/output/dao-treasury.mxsc.json");
const PRESALE_CODE_PATH: MxscPath = MxscPath::new("presale/output/dao-presale.mxsc.json");
const FACTORY_CODE_PATH: MxscPath = MxscPath::new("factory/output/dao-factory.mxsc.json");

const OWNER: TestAddress = TestAddress::new("owner");
const ALICE: TestAddress = TestAddress::new("alice");
const BOB: TestAddress = TestAddress::new("bob");
const CAROL: TestAddress = TestAddress::new("carol");
const RECIPIENT: TestAddress = TestAddress::new("recipient");

const FACTORY_ADDRESS: TestSCAddress = TestSCAddress::new("factory");
const DAO_TEMPLATE: TestSCAddress = TestSCAddress::new("dao-template");
const TREASURY_TEMPLATE: TestSCAddress = TestSCAddress::new("treasury-template");
const PRESALE_TEMPLATE: TestSCAddress = TestSCAddress::new("presale-template");

const TOKEN_ID: &str = "GOV-123456";
const TOKEN: TestTokenIdentifier = TestTokenIdentifier::new(TOKEN_ID);

const ONE: u64 = 1_000_000_000_000_000_000;
const START: u64 = 1_000;
const VOTED: u64 = START + VOTING_PERIOD;

fn units(n: u64) -> BigUint<StaticApi> {
    BigUint::from(n) * BigUint::from(ONE)
}

fn token() -> TokenIdentifier<StaticApi> {
    TokenIdentifier::from(TOKEN_ID)
}

fn gov_asset() -> EgldOrEsdtTokenIdentifier<StaticApi> {
    EgldOrEsdtTokenIdentifier::esdt(token())
}

struct Cluster {
    world: ScenarioWorld,
    dao: ManagedAddress<StaticApi>,
    treasury: ManagedAddress<StaticApi>,
}

fn world() -> ScenarioWorld {
    let mut blockchain = ScenarioWorld::new();
    blockchain.register_contract(DAO_CODE_PATH, dao_governance::ContractBuilder);
    blockchain.register_contract(TREASURY_CODE_PATH, dao_treasury::ContractBuilder);
    blockchain.register_contract(PRESALE_CODE_PATH, dao_presale::ContractBuilder);
    blockchain.register_contract(FACTORY_CODE_PATH, dao_factory::ContractBuilder);
    blockchain
}

/// Registers v1 templates with a fresh factory and creates one DAO from it.
fn setup() -> Cluster {
    let mut world = world();

    world
        .account(OWNER)
        .nonce(1)
        .balance(units(1_000))
        .esdt_balance(TOKEN, units(1_000_000));
    world.account(ALICE).nonce(1).esdt_balance(TOKEN, units(1_000));
    world.account(BOB).nonce(1).esdt_balance(TOKEN, units(1_000));
    world
        .account(CAROL)
        .nonce(1)
        .balance(units(100))
        .esdt_balance(TOKEN, units(1_000));
    world.account(RECIPIENT).nonce(1);
    world.current_block().block_timestamp(START);

    world
        .tx()
        .from(OWNER)
        .typed(factory_proxy::DaoFactoryProxy)
        .init()
        .code(FACTORY_CODE_PATH)
        .new_address(FACTORY_ADDRESS)
        .run();

    world
        .tx()
        .from(OWNER)
        .typed(dao_proxy::DaoProxy)
        .init("template", token(), FACTORY_ADDRESS, "v1")
        .code(DAO_CODE_PATH)
        .new_address(DAO_TEMPLATE)
        .run();

    world
        .tx()
        .from(OWNER)
        .typed(treasury_proxy::TreasuryProxy)
        .init(OWNER)
        .code(TREASURY_CODE_PATH)
        .new_address(TREASURY_TEMPLATE)
        .run();

    world
        .tx()
        .from(OWNER)
        .typed(presale_proxy::PresaleProxy)
        .init(token(), OWNER, units(1_000), BigUint::from(ONE / 1_000))
        .code(PRESALE_CODE_PATH)
        .new_address(PRESALE_TEMPLATE)
        .run();

    register(&mut world, "v1");

    let (dao, treasury) = world
        .tx()
        .from(OWNER)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .create_dao("v1", "Test DAO", token())
        .returns(ReturnsResult)
        .run()
        .into_tuple();

    Cluster {
        world,
        dao,
        treasury,
    }
}

fn register(world: &mut ScenarioWorld, version: &str) {
    register_templates(world, version, DAO_TEMPLATE, TREASURY_TEMPLATE);
}

fn register_templates(
    world: &mut ScenarioWorld,
    version: &str,
    dao: TestSCAddress,
    treasury: TestSCAddress,
) {
    world
        .tx()
        .from(OWNER)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .register_implementation(version, dao, treasury, PRESALE_TEMPLATE)
        .run();
}

impl Cluster {
    fn set_time(&mut self, timestamp: u64) {
        self.world.current_block().block_timestamp(timestamp);
    }

    fn stake(&mut self, staker: TestAddress, amount: BigUint<StaticApi>) {
        self.world
            .tx()
            .from(staker)
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .stake()
            .single_esdt(&token(), 0, &amount)
            .run();
    }

    fn fund_treasury_tokens(&mut self, amount: BigUint<StaticApi>) {
        self.world
            .tx()
            .from(OWNER)
            .to(&self.treasury)
            .typed(treasury_proxy::TreasuryProxy)
            .deposit()
            .single_esdt(&token(), 0, &amount)
            .run();
    }

    fn fund_treasury_egld(&mut self, amount: BigUint<StaticApi>) {
        self.world
            .tx()
            .from(OWNER)
            .to(&self.treasury)
            .typed(treasury_proxy::TreasuryProxy)
            .deposit()
            .egld(amount)
            .run();
    }

    fn propose_transfer(
        &mut self,
        proposer: TestAddress,
        asset: EgldOrEsdtTokenIdentifier<StaticApi>,
        amount: BigUint<StaticApi>,
    ) -> u64 {
        self.world
            .tx()
            .from(proposer)
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .propose_transfer(asset, RECIPIENT, amount)
            .returns(ReturnsResult)
            .run()
    }

    fn propose_pause(&mut self, proposer: TestAddress) -> u64 {
        self.world
            .tx()
            .from(proposer)
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .propose_pause()
            .returns(ReturnsResult)
            .run()
    }

    fn propose_unpause(&mut self, proposer: TestAddress) -> u64 {
        self.world
            .tx()
            .from(proposer)
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .propose_unpause()
            .returns(ReturnsResult)
            .run()
    }

    fn vote(&mut self, voter: TestAddress, proposal_id: u64, support: bool) {
        self.world
            .tx()
            .from(voter)
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .vote(proposal_id, support)
            .run();
    }

    fn execute(&mut self, proposal_id: u64) {
        self.world
            .tx()
            .from(CAROL)
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .execute(proposal_id)
            .run();
    }

    fn execute_fails(&mut self, proposal_id: u64, message: &str) {
        self.world
            .tx()
            .from(CAROL)
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .execute(proposal_id)
            .returns(ExpectError(4, message))
            .run();
    }

    fn status(&mut self, proposal_id: u64) -> ProposalStatus {
        self.world
            .query()
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .get_proposal_status(proposal_id)
            .returns(ReturnsResult)
            .run()
    }

    fn is_paused(&mut self) -> bool {
        self.world
            .query()
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .is_paused()
            .returns(ReturnsResult)
            .run()
    }

    fn presales(&mut self) -> Vec<ManagedAddress<StaticApi>> {
        self.world
            .query()
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .get_presales()
            .returns(ReturnsResult)
            .run()
            .into_iter()
            .collect()
    }

    fn propose_upgrade(&mut self, component: UpgradeableComponent, version: &str) -> u64 {
        self.world
            .tx()
            .from(ALICE)
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .propose_upgrade(component, version)
            .returns(ReturnsResult)
            .run()
    }

    fn component_version(&mut self, component: UpgradeableComponent) -> ManagedBuffer<StaticApi> {
        self.world
            .query()
            .to(&self.dao)
            .typed(dao_proxy::DaoProxy)
            .get_component_version(component)
            .returns(ReturnsResult)
            .run()
    }

    /// ALICE votes for, then the clock moves to the end of the first voting window.
    fn pass(&mut self, proposal_id: u64) {
        self.vote(ALICE, proposal_id, true);
        self.set_time(VOTED);
    }
}

// ============================================================
// Transfers
// ============================================================

#[test]
fn passed_transfer_releases_treasury_tokens() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(2_000));
    cluster.stake(ALICE, units(1));

    let id = cluster.propose_transfer(ALICE, gov_asset(), units(1_000));
    assert_eq!(id, 1);
    assert_eq!(cluster.status(id), ProposalStatus::Voting);

    cluster.pass(id);
    assert_eq!(cluster.status(id), ProposalStatus::Decided);
    cluster.execute(id);

    cluster
        .world
        .check_account(RECIPIENT)
        .esdt_balance(TOKEN, units(1_000));
    cluster
        .world
        .check_account(&cluster.treasury)
        .esdt_balance(TOKEN, units(1_000));

    let proposal = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .get_proposal(id)
        .returns(ReturnsResult)
        .run();
    assert!(proposal.executed);
    assert_eq!(proposal.for_votes, units(1));
    assert_eq!(proposal.deadline, VOTED);
    assert_eq!(cluster.status(id), ProposalStatus::Executed);

    cluster.execute_fails(id, "Already executed");
    cluster
        .world
        .check_account(RECIPIENT)
        .esdt_balance(TOKEN, units(1_000));
}

#[test]
fn short_treasury_leaves_transfer_retryable() {
    let mut cluster = setup();
    cluster.stake(ALICE, units(1));

    let id = cluster.propose_transfer(ALICE, EgldOrEsdtTokenIdentifier::egld(), units(5));
    cluster.pass(id);

    cluster.execute_fails(id, "Insufficient balance");
    assert_eq!(cluster.status(id), ProposalStatus::Decided);

    cluster.fund_treasury_egld(units(5));
    cluster.execute(id);

    cluster.world.check_account(RECIPIENT).balance(units(5));
    assert_eq!(cluster.status(id), ProposalStatus::Executed);
}

#[test]
fn proposals_are_validated() {
    let mut cluster = setup();
    cluster.stake(ALICE, units(1));
    cluster.stake(BOB, BigUint::from(ONE - 1));

    cluster
        .world
        .tx()
        .from(BOB)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_transfer(gov_asset(), RECIPIENT, units(1))
        .returns(ExpectError(4, "Insufficient stake"))
        .run();

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_transfer(gov_asset(), RECIPIENT, BigUint::zero())
        .returns(ExpectError(4, "Zero amount"))
        .run();

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_transfer(gov_asset(), ManagedAddress::zero(), units(1))
        .returns(ExpectError(4, "Zero recipient"))
        .run();

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_presale_pause(RECIPIENT, true)
        .returns(ExpectError(4, "Unknown presale"))
        .run();

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_presale_withdraw(RECIPIENT)
        .returns(ExpectError(4, "Unknown presale"))
        .run();
}

// ============================================================
// Voting window and tally
// ============================================================

#[test]
fn voting_window_gates_vote_and_execute() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(10));
    cluster.stake(ALICE, units(1));
    cluster.stake(BOB, units(1));

    let id = cluster.propose_transfer(ALICE, gov_asset(), units(1));
    cluster.vote(ALICE, id, true);

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .vote(id, true)
        .returns(ExpectError(4, "Already voted"))
        .run();

    cluster
        .world
        .tx()
        .from(CAROL)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .vote(id, false)
        .returns(ExpectError(4, "No voting power"))
        .run();

    cluster.set_time(VOTED - 1);
    cluster.execute_fails(id, "Voting ongoing");

    cluster.set_time(VOTED);
    cluster
        .world
        .tx()
        .from(BOB)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .vote(id, false)
        .returns(ExpectError(4, "Voting ended"))
        .run();

    cluster.execute(id);

    cluster.execute_fails(99, "Proposal not found");
}

#[test]
fn majority_against_rejects_despite_quorum() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(10));
    cluster.stake(BOB, units(400));
    cluster.stake(CAROL, units(600));

    let id = cluster.propose_transfer(BOB, gov_asset(), units(1));
    cluster.vote(BOB, id, true);
    cluster.vote(CAROL, id, false);
    cluster.set_time(VOTED);

    cluster.execute_fails(id, "Proposal rejected");
    assert_eq!(cluster.status(id), ProposalStatus::Decided);
}

#[test]
fn tie_is_a_rejection() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(10));
    cluster.stake(BOB, units(5));
    cluster.stake(CAROL, units(5));

    let id = cluster.propose_transfer(BOB, gov_asset(), units(1));
    cluster.vote(BOB, id, true);
    cluster.vote(CAROL, id, false);
    cluster.set_time(VOTED);

    cluster.execute_fails(id, "Proposal rejected");
}

#[test]
fn quorum_uses_stake_at_execution() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(10));
    cluster.stake(ALICE, units(1));

    let id = cluster.propose_transfer(ALICE, gov_asset(), units(1));
    cluster.vote(ALICE, id, true);

    // a large silent stake dilutes turnout below half
    cluster.stake(BOB, units(10));
    cluster.set_time(VOTED);
    cluster.execute_fails(id, "Quorum not reached");

    cluster
        .world
        .tx()
        .from(BOB)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .unstake(units(10))
        .run();
    cluster.execute(id);

    cluster.world.check_account(RECIPIENT).esdt_balance(TOKEN, units(1));
}

#[test]
fn cast_weight_survives_unstaking() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(10));
    cluster.stake(ALICE, units(3));
    cluster.stake(BOB, units(2));

    let id = cluster.propose_transfer(ALICE, gov_asset(), units(1));
    cluster.vote(ALICE, id, true);
    cluster.vote(BOB, id, false);

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .unstake(units(2))
        .run();

    let proposal = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .get_proposal(id)
        .returns(ReturnsResult)
        .run();
    assert_eq!(proposal.for_votes, units(3));
    assert_eq!(proposal.against_votes, units(2));

    let voted = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .has_voted(id, BOB)
        .returns(ReturnsResult)
        .run();
    assert!(voted);
}

#[test]
fn proposals_page_in_id_order() {
    let mut cluster = setup();
    cluster.stake(ALICE, units(1));
    for _ in 0..3 {
        cluster.propose_transfer(ALICE, gov_asset(), units(1));
    }

    let ids: Vec<u64> = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .get_proposals(2u64, 5u64)
        .returns(ReturnsResult)
        .run()
        .into_iter()
        .map(|proposal| proposal.id)
        .collect();
    assert_eq!(ids, vec![2, 3]);

    let count = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .get_proposal_count()
        .returns(ReturnsResult)
        .run();
    assert_eq!(count, 3);
}

// ============================================================
// Pause
// ============================================================

#[test]
fn pause_blocks_new_proposals_but_not_pending_ones() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(10));
    cluster.stake(ALICE, units(1));

    let pending = cluster.propose_transfer(ALICE, gov_asset(), units(1));
    let pause = cluster.propose_pause(ALICE);
    cluster.vote(ALICE, pending, true);
    cluster.pass(pause);
    cluster.execute(pause);
    assert!(cluster.is_paused());

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_transfer(gov_asset(), RECIPIENT, units(1))
        .returns(ExpectError(4, "DAO: paused"))
        .run();

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_pause()
        .returns(ExpectError(4, "Already paused"))
        .run();

    cluster.execute(pending);
    cluster.world.check_account(RECIPIENT).esdt_balance(TOKEN, units(1));

    let unpause = cluster.propose_unpause(ALICE);
    cluster.vote(ALICE, unpause, true);
    cluster.set_time(VOTED + VOTING_PERIOD);
    cluster.execute(unpause);
    assert!(!cluster.is_paused());

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_unpause()
        .returns(ExpectError(4, "Not paused"))
        .run();
}

#[test]
fn pause_state_is_rechecked_at_execution() {
    let mut cluster = setup();
    cluster.stake(ALICE, units(1));

    let first = cluster.propose_pause(ALICE);
    let second = cluster.propose_pause(ALICE);
    cluster.vote(ALICE, first, true);
    cluster.pass(second);

    cluster.execute(first);
    cluster.execute_fails(second, "Already paused");
    assert_eq!(cluster.status(second), ProposalStatus::Decided);
}

// ============================================================
// Upgrades
// ============================================================

#[test]
fn presale_template_upgrade_rebinds_version() {
    let mut cluster = setup();
    cluster.stake(ALICE, units(1));
    register(&mut cluster.world, "v2");

    cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_upgrade(UpgradeableComponent::Presale, "v9")
        .returns(ExpectError(4, "Invalid version"))
        .run();

    let id: u64 = cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_upgrade(UpgradeableComponent::Presale, "v2")
        .returns(ReturnsResult)
        .run();
    cluster.pass(id);
    cluster.execute(id);

    let presale_version = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .get_component_version(UpgradeableComponent::Presale)
        .returns(ReturnsResult)
        .run();
    assert_eq!(presale_version, ManagedBuffer::from("v2"));

    let dao_version = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .get_component_version(UpgradeableComponent::Dao)
        .returns(ReturnsResult)
        .run();
    assert_eq!(dao_version, ManagedBuffer::from("v1"));
}

#[test]
fn treasury_upgrade_installs_code_and_keeps_funds() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(100));
    cluster.stake(ALICE, units(1));
    register(&mut cluster.world, "v2");

    let id = cluster.propose_upgrade(UpgradeableComponent::Treasury, "v2");
    cluster.pass(id);
    cluster.execute(id);

    assert_eq!(cluster.status(id), ProposalStatus::Executed);
    assert_eq!(
        cluster.component_version(UpgradeableComponent::Treasury),
        ManagedBuffer::from("v2")
    );
    assert_eq!(
        cluster.component_version(UpgradeableComponent::Dao),
        ManagedBuffer::from("v1")
    );
    cluster
        .world
        .check_account(&cluster.treasury)
        .code(TREASURY_CODE_PATH)
        .esdt_balance(TOKEN, units(100));

    let governing = cluster
        .world
        .query()
        .to(&cluster.treasury)
        .typed(treasury_proxy::TreasuryProxy)
        .get_dao()
        .returns(ReturnsResult)
        .run();
    assert_eq!(governing, cluster.dao);

    // the upgraded treasury still pays out on a passed transfer
    let transfer = cluster.propose_transfer(ALICE, gov_asset(), units(10));
    cluster.vote(ALICE, transfer, true);
    cluster.set_time(VOTED + VOTING_PERIOD);
    cluster.execute(transfer);
    cluster
        .world
        .check_account(RECIPIENT)
        .esdt_balance(TOKEN, units(10));
}

#[test]
fn dao_upgrades_itself_and_keeps_state() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(100));
    cluster.stake(ALICE, units(1));
    cluster.stake(BOB, units(2));
    register(&mut cluster.world, "v2");

    let pending = cluster.propose_transfer(ALICE, gov_asset(), units(5));
    let upgrade = cluster.propose_upgrade(UpgradeableComponent::Dao, "v2");
    cluster.vote(BOB, pending, true);
    cluster.vote(BOB, upgrade, true);
    cluster.set_time(VOTED);
    cluster.execute(upgrade);

    assert_eq!(cluster.status(upgrade), ProposalStatus::Executed);
    assert_eq!(
        cluster.component_version(UpgradeableComponent::Dao),
        ManagedBuffer::from("v2")
    );
    cluster.world.check_account(&cluster.dao).code(DAO_CODE_PATH);

    let total_staked = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .get_total_staked()
        .returns(ReturnsResult)
        .run();
    assert_eq!(total_staked, units(3));

    let treasury = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .get_treasury()
        .returns(ReturnsResult)
        .run();
    assert_eq!(treasury, cluster.treasury);

    // a proposal passed before the upgrade still executes after it
    assert_eq!(cluster.status(pending), ProposalStatus::Decided);
    cluster.execute(pending);
    cluster
        .world
        .check_account(RECIPIENT)
        .esdt_balance(TOKEN, units(5));
}

#[test]
fn failed_upgrade_leaves_proposal_retryable() {
    let mut cluster = setup();
    cluster.stake(ALICE, units(1));
    // a DAO template registered in the treasury slot refuses the upgrade
    register_templates(&mut cluster.world, "v2", DAO_TEMPLATE, DAO_TEMPLATE);

    let id = cluster.propose_upgrade(UpgradeableComponent::Treasury, "v2");
    cluster.pass(id);
    cluster.execute(id);

    assert_eq!(cluster.status(id), ProposalStatus::Decided);
    assert_eq!(
        cluster.component_version(UpgradeableComponent::Treasury),
        ManagedBuffer::from("v1")
    );
    cluster
        .world
        .check_account(&cluster.treasury)
        .code(TREASURY_CODE_PATH);

    // executing again reaches the upgrade instead of "Already executed"
    cluster.execute(id);
    assert_eq!(cluster.status(id), ProposalStatus::Decided);
}

#[test]
fn direct_upgrades_are_rejected() {
    let mut cluster = setup();

    for caller in [OWNER, ALICE] {
        cluster
            .world
            .tx()
            .from(caller)
            .to(&cluster.dao)
            .typed(dao_proxy::DaoProxy)
            .upgrade()
            .code(DAO_CODE_PATH)
            .returns(ExpectError(4, "Unauthorized upgrade"))
            .run();

        cluster
            .world
            .tx()
            .from(caller)
            .to(&cluster.treasury)
            .typed(treasury_proxy::TreasuryProxy)
            .upgrade()
            .code(TREASURY_CODE_PATH)
            .returns(ExpectError(4, "Only DAO"))
            .run();
    }

    assert_eq!(
        cluster.component_version(UpgradeableComponent::Dao),
        ManagedBuffer::from("v1")
    );
}

#[test]
fn outsiders_cannot_move_funds_or_rewire() {
    let mut cluster = setup();

    cluster
        .world
        .tx()
        .from(OWNER)
        .to(&cluster.treasury)
        .typed(treasury_proxy::TreasuryProxy)
        .release_asset(gov_asset(), OWNER, units(1))
        .returns(ExpectError(4, "Only DAO"))
        .run();

    cluster
        .world
        .tx()
        .from(OWNER)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .bind_treasury(RECIPIENT)
        .returns(ExpectError(4, "Endpoint can only be called by owner"))
        .run();
}

// ============================================================
// Presales
// ============================================================

#[test]
fn presale_lifecycle_through_proposals() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(2_000));
    cluster.stake(ALICE, units(1));

    let create: u64 = cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_presale(units(1_000), BigUint::from(ONE / 1_000))
        .returns(ReturnsResult)
        .run();
    cluster.pass(create);
    cluster.execute(create);

    let presales = cluster.presales();
    assert_eq!(presales.len(), 1);
    let presale = presales[0].clone();

    let tracked = cluster
        .world
        .query()
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .get_presale_contract(create)
        .returns(ReturnsResult)
        .run();
    assert_eq!(tracked, presale);

    cluster
        .world
        .check_account(&presale)
        .esdt_balance(TOKEN, units(1_000));
    cluster
        .world
        .check_account(&cluster.treasury)
        .esdt_balance(TOKEN, units(1_000));

    let owner = cluster
        .world
        .query()
        .to(&presale)
        .typed(presale_proxy::PresaleProxy)
        .get_dao()
        .returns(ReturnsResult)
        .run();
    assert_eq!(owner, cluster.dao);

    // proceeds for the withdraw below
    cluster
        .world
        .tx()
        .from(CAROL)
        .to(&presale)
        .typed(presale_proxy::PresaleProxy)
        .buy(BigUint::zero(), VOTED + 1)
        .egld(units(1))
        .run();

    let pause: u64 = cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_presale_pause(&presale, true)
        .returns(ReturnsResult)
        .run();
    let withdraw: u64 = cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_presale_withdraw(&presale)
        .returns(ReturnsResult)
        .run();
    cluster.vote(ALICE, pause, true);
    cluster.vote(ALICE, withdraw, true);
    cluster.set_time(VOTED + VOTING_PERIOD);
    cluster.execute(pause);
    cluster.execute(withdraw);

    let paused = cluster
        .world
        .query()
        .to(&presale)
        .typed(presale_proxy::PresaleProxy)
        .is_paused()
        .returns(ReturnsResult)
        .run();
    assert!(paused);

    cluster.world.check_account(&presale).balance(0u64);
    cluster
        .world
        .check_account(&cluster.treasury)
        .balance(units(1));
}

#[test]
fn presale_creation_needs_treasury_tokens() {
    let mut cluster = setup();
    cluster.fund_treasury_tokens(units(10));
    cluster.stake(ALICE, units(1));

    let id: u64 = cluster
        .world
        .tx()
        .from(ALICE)
        .to(&cluster.dao)
        .typed(dao_proxy::DaoProxy)
        .propose_presale(units(1_000), BigUint::from(ONE / 1_000))
        .returns(ReturnsResult)
        .run();
    cluster.pass(id);

    cluster.execute_fails(id, "Insufficient balance");
    assert!(cluster.presales().is_empty());
}
