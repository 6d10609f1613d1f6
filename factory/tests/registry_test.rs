use multiversx_sc_scenario::imports::*;

use dao_factory::factory_proxy;
use dao_governance::dao_proxy;
use dao_treasury::treasury_proxy;

const FACTORY_CODE_PATH: MxscPath = MxscPath::new("output/dao-factory.mxsc.json");
const DAO_CODE_PATH: MxscPath = MxscPath::new("../output/dao-governance.mxsc.json");
const TREASURY_CODE_PATH: MxscPath = MxscPath::new("../treasury/output/dao-treasury.mxsc.json");

const OWNER: TestAddress = TestAddress::new("owner");
const CREATOR: TestAddress = TestAddress::new("creator");
const FACTORY_ADDRESS: TestSCAddress = TestSCAddress::new("factory");
const DAO_TEMPLATE: TestSCAddress = TestSCAddress::new("dao-template");
const TREASURY_TEMPLATE: TestSCAddress = TestSCAddress::new("treasury-template");
const PRESALE_TEMPLATE: TestSCAddress = TestSCAddress::new("presale-template");

const TOKEN_ID: &str = "GOV-123456";
const ISSUED_TOKEN_ID: &str = "TEST-123456";
const ISSUED_TOKEN: TestTokenIdentifier = TestTokenIdentifier::new(ISSUED_TOKEN_ID);

const ONE: u64 = 1_000_000_000_000_000_000;
const ISSUE_COST: u64 = 50_000_000_000_000_000;

fn units(n: u64) -> BigUint<StaticApi> {
    BigUint::from(n) * BigUint::from(ONE)
}

fn world() -> ScenarioWorld {
    let mut blockchain = ScenarioWorld::new();
    blockchain.set_current_dir_from_workspace("factory");
    blockchain.register_contract(FACTORY_CODE_PATH, dao_factory::ContractBuilder);
    blockchain.register_contract(DAO_CODE_PATH, dao_governance::ContractBuilder);
    blockchain.register_contract(TREASURY_CODE_PATH, dao_treasury::ContractBuilder);
    blockchain
}

/// Factory plus one deployed template of each contract, nothing registered.
fn setup() -> ScenarioWorld {
    let mut world = world();

    world.account(OWNER).nonce(1);
    world.account(CREATOR).nonce(1).balance(units(1));

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
        .init("template", TokenIdentifier::from(TOKEN_ID), FACTORY_ADDRESS, "v1")
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
}

fn register(world: &mut ScenarioWorld, version: &str) {
    world
        .tx()
        .from(OWNER)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .register_implementation(version, DAO_TEMPLATE, TREASURY_TEMPLATE, PRESALE_TEMPLATE)
        .run();
}

fn create_dao(
    world: &mut ScenarioWorld,
    version: &str,
) -> (ManagedAddress<StaticApi>, ManagedAddress<StaticApi>) {
    world
        .tx()
        .from(CREATOR)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .create_dao(version, "Test DAO", TokenIdentifier::from(TOKEN_ID))
        .returns(ReturnsResult)
        .run()
        .into_tuple()
}

#[test]
fn latest_version_follows_registration_order() {
    let mut world = setup();

    world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .latest_version()
        .returns(ExpectError(4, "No versions registered"))
        .run();

    register(&mut world, "v1");
    register(&mut world, "v2");

    let latest = world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .latest_version()
        .returns(ReturnsResult)
        .run();
    assert_eq!(latest, ManagedBuffer::from("v2"));

    let versions = world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .get_versions()
        .returns(ReturnsResult)
        .run()
        .to_vec();
    assert_eq!(versions.len(), 2);
    assert_eq!(*versions.get(0), ManagedBuffer::from("v1"));
    assert_eq!(*versions.get(1), ManagedBuffer::from("v2"));
}

#[test]
fn resolve_returns_the_registered_templates() {
    let mut world = setup();
    register(&mut world, "v1");

    let implementations = world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .resolve_version("v1")
        .returns(ReturnsResult)
        .run();
    assert_eq!(implementations.dao, DAO_TEMPLATE.to_managed_address());
    assert_eq!(implementations.treasury, TREASURY_TEMPLATE.to_managed_address());
    assert_eq!(implementations.presale, PRESALE_TEMPLATE.to_managed_address());

    let registered = world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .is_version_registered("v9")
        .returns(ReturnsResult)
        .run();
    assert!(!registered);

    world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .resolve_version("v9")
        .returns(ExpectError(4, "Invalid version"))
        .run();
}

#[test]
fn registration_is_validated() {
    let mut world = setup();
    register(&mut world, "v1");

    world
        .tx()
        .from(OWNER)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .register_implementation("v1", DAO_TEMPLATE, TREASURY_TEMPLATE, PRESALE_TEMPLATE)
        .returns(ExpectError(4, "Version exists"))
        .run();

    world
        .tx()
        .from(OWNER)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .register_implementation("", DAO_TEMPLATE, TREASURY_TEMPLATE, PRESALE_TEMPLATE)
        .returns(ExpectError(4, "Empty version"))
        .run();

    world
        .tx()
        .from(OWNER)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .register_implementation(
            "v2",
            ManagedAddress::zero(),
            TREASURY_TEMPLATE,
            PRESALE_TEMPLATE,
        )
        .returns(ExpectError(4, "Zero DAO implementation"))
        .run();

    world
        .tx()
        .from(CREATOR)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .register_implementation("v2", DAO_TEMPLATE, TREASURY_TEMPLATE, PRESALE_TEMPLATE)
        .returns(ExpectError(4, "Endpoint can only be called by owner"))
        .run();
}

#[test]
fn create_dao_wires_the_cluster() {
    let mut world = setup();
    register(&mut world, "v1");

    let (dao, treasury) = create_dao(&mut world, "v1");

    let bound = world
        .query()
        .to(&dao)
        .typed(dao_proxy::DaoProxy)
        .get_treasury()
        .returns(ReturnsResult)
        .run();
    assert_eq!(bound, treasury);

    let governing = world
        .query()
        .to(&treasury)
        .typed(treasury_proxy::TreasuryProxy)
        .get_dao()
        .returns(ReturnsResult)
        .run();
    assert_eq!(governing, dao);

    let registry = world
        .query()
        .to(&dao)
        .typed(dao_proxy::DaoProxy)
        .get_registry()
        .returns(ReturnsResult)
        .run();
    assert_eq!(registry, FACTORY_ADDRESS.to_managed_address());

    let recorded = world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .get_dao_treasury(&dao)
        .returns(ReturnsResult)
        .run();
    assert_eq!(recorded, treasury);

    let daos = world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .get_daos()
        .returns(ReturnsResult)
        .run()
        .to_vec();
    assert_eq!(daos.len(), 1);
    assert_eq!(*daos.get(0), dao);
}

#[test]
fn created_dao_owns_itself() {
    let mut world = setup();
    register(&mut world, "v1");

    let (dao, treasury) = create_dao(&mut world, "v1");

    // neither the creator nor the factory operator can rewire it
    world
        .tx()
        .from(OWNER)
        .to(&dao)
        .typed(dao_proxy::DaoProxy)
        .bind_treasury(&treasury)
        .returns(ExpectError(4, "Endpoint can only be called by owner"))
        .run();
}

#[test]
fn only_latest_version_creates_daos() {
    let mut world = setup();

    world
        .tx()
        .from(CREATOR)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .create_dao("v1", "Test DAO", TokenIdentifier::from(TOKEN_ID))
        .returns(ExpectError(4, "No versions registered"))
        .run();

    register(&mut world, "v1");
    register(&mut world, "v2");

    world
        .tx()
        .from(CREATOR)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .create_dao("v1", "Test DAO", TokenIdentifier::from(TOKEN_ID))
        .returns(ExpectError(4, "Only latest version is active"))
        .run();

    let (dao, _treasury) = create_dao(&mut world, "v2");
    let version = world
        .query()
        .to(&dao)
        .typed(dao_proxy::DaoProxy)
        .get_component_version(dao_governance::types::UpgradeableComponent::Dao)
        .returns(ReturnsResult)
        .run();
    assert_eq!(version, ManagedBuffer::from("v2"));
}

#[test]
fn factory_reports_its_version() {
    let mut world = setup();

    let version = world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .get_factory_version()
        .returns(ReturnsResult)
        .run();
    assert_eq!(version, ManagedBuffer::from("1.0.0"));
}

#[test]
fn issued_supply_goes_to_creator_and_treasury() {
    let mut world = setup();
    register(&mut world, "v1");
    world.set_state_step(SetStateStep::new().new_token_identifier(ISSUED_TOKEN_ID));

    world
        .tx()
        .from(CREATOR)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .create_dao_with_token("v1", "Test DAO", "Test Token", "TEST", units(1_000_000))
        .egld(BigUint::from(ISSUE_COST))
        .run();

    let daos = world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .get_daos()
        .returns(ReturnsResult)
        .run()
        .to_vec();
    assert_eq!(daos.len(), 1);
    let dao = (*daos.get(0)).clone();

    let treasury = world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .get_dao_treasury(&dao)
        .returns(ReturnsResult)
        .run();

    let governance_token = world
        .query()
        .to(&dao)
        .typed(dao_proxy::DaoProxy)
        .get_governance_token()
        .returns(ReturnsResult)
        .run();
    assert_eq!(governance_token, TokenIdentifier::from(ISSUED_TOKEN_ID));

    world
        .check_account(CREATOR)
        .esdt_balance(ISSUED_TOKEN, units(1));
    world
        .check_account(&treasury)
        .esdt_balance(ISSUED_TOKEN, units(999_999));
}

#[test]
fn token_issue_is_validated() {
    let mut world = setup();
    register(&mut world, "v1");

    world
        .tx()
        .from(CREATOR)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .create_dao_with_token("v1", "Test DAO", "Test Token", "TOOLONG", units(1_000_000))
        .egld(BigUint::from(ISSUE_COST))
        .returns(ExpectError(4, "Symbol must be less than 7 chars"))
        .run();

    world
        .tx()
        .from(CREATOR)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .create_dao_with_token("v1", "Test DAO", "Test Token", "TEST", units(1_000_000_000_000))
        .egld(BigUint::from(ISSUE_COST))
        .returns(ExpectError(4, "Token amount exceeds maximum"))
        .run();

    world
        .tx()
        .from(CREATOR)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .create_dao_with_token("v1", "Test DAO", "Test Token", "TEST", BigUint::from(ONE - 1))
        .egld(BigUint::from(ISSUE_COST))
        .returns(ExpectError(4, "Supply below creator share"))
        .run();

    register(&mut world, "v2");
    world
        .tx()
        .from(CREATOR)
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .create_dao_with_token("v1", "Test DAO", "Test Token", "TEST", units(1_000_000))
        .egld(BigUint::from(ISSUE_COST))
        .returns(ExpectError(4, "Only latest version is active"))
        .run();

    assert!(world
        .query()
        .to(FACTORY_ADDRESS)
        .typed(factory_proxy::DaoFactoryProxy)
        .get_daos()
        .returns(ReturnsResult)
        .run()
        .to_vec()
        .is_empty());
    world.check_account(CREATOR).balance(units(1));
}
