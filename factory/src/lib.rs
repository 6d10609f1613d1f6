#![no_std]

multiversx_sc::imports!();

pub mod dao_proxy;
pub mod errors;
pub mod factory_proxy;
pub mod treasury_proxy;
pub mod types;

use errors::*;
use types::ImplementationSet;

pub const FACTORY_VERSION: &[u8] = b"1.0.0";

/// Issued governance tokens use 18 decimals
pub const TOKEN_DECIMALS: usize = 18;

/// Tickers may have at most this many characters
pub const MAX_TICKER_LEN: usize = 6;

/// Upper bound on an issued supply, in whole tokens
pub const MAX_SUPPLY_TOKENS: u64 = 999_999_999_999;

/// One whole token; the creator's share of an issued supply
pub const CREATOR_SHARE: u64 = 1_000_000_000_000_000_000;

/// Version registry plus DAO cluster deployment.
///
/// Each version maps to a set of template contracts. A DAO and its
/// treasury are deployed from the latest set, wired together and then
/// handed over to the DAO, which from then on owns both and resolves
/// further upgrades through this same registry.
#[multiversx_sc::contract]
pub trait DaoFactory {
    #[init]
    fn init(&self) {}

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // REGISTRY
    // ========================================================

    #[only_owner]
    #[endpoint(registerImplementation)]
    fn register_implementation(
        &self,
        version: ManagedBuffer,
        dao: ManagedAddress,
        treasury: ManagedAddress,
        presale: ManagedAddress,
    ) {
        require!(!version.is_empty(), ERR_EMPTY_VERSION);
        require!(
            self.implementations(&version).is_empty(),
            ERR_VERSION_EXISTS
        );
        require!(!dao.is_zero(), ERR_ZERO_DAO_IMPLEMENTATION);

        let implementations = ImplementationSet {
            dao,
            treasury,
            presale,
        };
        self.implementations(&version).set(&implementations);
        self.versions().push(&version);

        self.implementation_registered_event(&version, &implementations);
    }

    /// The most recently registered version.
    #[view(latestVersion)]
    fn latest_version(&self) -> ManagedBuffer {
        let versions = self.versions();
        require!(!versions.is_empty(), ERR_NO_VERSIONS);
        versions.get(versions.len())
    }

    #[view(resolveVersion)]
    fn resolve_version(&self, version: ManagedBuffer) -> ImplementationSet<Self::Api> {
        require!(
            !self.implementations(&version).is_empty(),
            ERR_INVALID_VERSION
        );
        self.implementations(&version).get()
    }

    #[view(isVersionRegistered)]
    fn is_version_registered(&self, version: ManagedBuffer) -> bool {
        !self.implementations(&version).is_empty()
    }

    #[view(getVersions)]
    fn get_versions(&self) -> MultiValueEncoded<ManagedBuffer> {
        let mut result = MultiValueEncoded::new();
        for version in self.versions().iter() {
            result.push(version);
        }
        result
    }

    // ========================================================
    // ENDPOINT: createDao
    // Deploys DAO and treasury from the latest templates for an
    // existing token. Returns (dao, treasury).
    // ========================================================

    #[endpoint(createDao)]
    fn create_dao(
        &self,
        version: ManagedBuffer,
        name: ManagedBuffer,
        governance_token: TokenIdentifier,
    ) -> MultiValue2<ManagedAddress, ManagedAddress> {
        require!(version == self.latest_version(), ERR_ONLY_LATEST_VERSION);
        require!(governance_token.is_valid_esdt_identifier(), ERR_INVALID_TOKEN);

        let caller = self.blockchain().get_caller();
        self.deploy_cluster(&caller, &version, &name, &governance_token)
            .into()
    }

    // ========================================================
    // ENDPOINT: createDaoWithToken
    // Issues a fresh fungible governance token, paying the issue fee
    // sent along. The cluster is deployed in the issue callback, where
    // the whole supply is minted: one token to the creator, the rest
    // to the new treasury.
    // ========================================================

    #[payable("EGLD")]
    #[endpoint(createDaoWithToken)]
    fn create_dao_with_token(
        &self,
        version: ManagedBuffer,
        name: ManagedBuffer,
        token_name: ManagedBuffer,
        ticker: ManagedBuffer,
        initial_supply: BigUint,
    ) {
        require!(version == self.latest_version(), ERR_ONLY_LATEST_VERSION);
        require!(ticker.len() <= MAX_TICKER_LEN, ERR_TICKER_TOO_LONG);
        require!(
            initial_supply <= self.max_supply(),
            ERR_SUPPLY_ABOVE_MAXIMUM
        );
        require!(
            initial_supply >= CREATOR_SHARE,
            ERR_SUPPLY_BELOW_CREATOR_SHARE
        );

        let issue_cost = self.call_value().egld_value().clone_value();
        let creator = self.blockchain().get_caller();

        self.tx()
            .to(ESDTSystemSCAddress)
            .typed(ESDTSystemSCProxy)
            .issue_and_set_all_roles(
                issue_cost,
                &token_name,
                &ticker,
                EsdtTokenType::Fungible,
                TOKEN_DECIMALS,
            )
            .callback(self.callbacks().token_issued_callback(
                creator,
                version,
                name,
                initial_supply,
            ))
            .async_call_and_exit();
    }

    #[callback]
    fn token_issued_callback(
        &self,
        creator: ManagedAddress,
        version: ManagedBuffer,
        name: ManagedBuffer,
        initial_supply: BigUint,
        #[call_result] result: ManagedAsyncCallResult<TokenIdentifier>,
    ) {
        match result {
            ManagedAsyncCallResult::Ok(token) => {
                let (dao, treasury) = self.deploy_cluster(&creator, &version, &name, &token);

                self.send().esdt_local_mint(&token, 0, &initial_supply);
                let creator_share = BigUint::from(CREATOR_SHARE);
                let treasury_share = &initial_supply - &creator_share;

                self.tx()
                    .to(&creator)
                    .single_esdt(&token, 0, &creator_share)
                    .transfer();
                if treasury_share > 0u64 {
                    self.tx()
                        .to(&treasury)
                        .typed(treasury_proxy::TreasuryProxy)
                        .deposit()
                        .single_esdt(&token, 0, &treasury_share)
                        .sync_call();
                }

                self.governance_token_issued_event(&dao, &token, &initial_supply);
            },
            ManagedAsyncCallResult::Err(err) => {
                // the system contract returns the issue fee with the error
                let refund = self.call_value().egld_value().clone_value();
                if refund > 0u64 {
                    self.tx().to(&creator).egld(&refund).transfer();
                }
                self.token_issue_failed_event(&creator, &name, &err.err_msg);
            },
        }
    }

    /// Deploys, wires and hands over one cluster, then records it.
    fn deploy_cluster(
        &self,
        creator: &ManagedAddress,
        version: &ManagedBuffer,
        name: &ManagedBuffer,
        governance_token: &TokenIdentifier,
    ) -> (ManagedAddress, ManagedAddress) {
        let implementations = self.resolve_version(version.clone());

        let registry = self.blockchain().get_sc_address();
        let dao: ManagedAddress = self
            .tx()
            .typed(dao_proxy::DaoProxy)
            .init(name, governance_token, &registry, version)
            .from_source(implementations.dao)
            .code_metadata(CodeMetadata::UPGRADEABLE | CodeMetadata::READABLE)
            .returns(ReturnsNewManagedAddress)
            .sync_call();

        let treasury: ManagedAddress = self
            .tx()
            .typed(treasury_proxy::TreasuryProxy)
            .init(&dao)
            .from_source(implementations.treasury)
            .code_metadata(
                CodeMetadata::UPGRADEABLE | CodeMetadata::READABLE | CodeMetadata::PAYABLE,
            )
            .returns(ReturnsNewManagedAddress)
            .sync_call();

        self.tx()
            .to(&dao)
            .typed(dao_proxy::DaoProxy)
            .bind_treasury(&treasury)
            .sync_call();

        // the DAO becomes the only party able to upgrade either contract
        self.hand_over(&dao, &dao);
        self.hand_over(&treasury, &dao);

        self.daos().insert(dao.clone());
        self.dao_treasury(&dao).set(&treasury);

        self.dao_created_event(&dao, &treasury, creator, version, name);

        (dao, treasury)
    }

    fn max_supply(&self) -> BigUint {
        BigUint::from(MAX_SUPPLY_TOKENS) * BigUint::from(CREATOR_SHARE)
    }

    fn hand_over(&self, contract: &ManagedAddress, new_owner: &ManagedAddress) {
        self.tx()
            .to(contract)
            .typed(UserBuiltinProxy)
            .change_owner_address(new_owner)
            .sync_call();
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getFactoryVersion)]
    fn get_factory_version(&self) -> ManagedBuffer {
        ManagedBuffer::from(FACTORY_VERSION)
    }

    #[view(getDaos)]
    fn get_daos(&self) -> MultiValueEncoded<ManagedAddress> {
        let mut result = MultiValueEncoded::new();
        for dao in self.daos().iter() {
            result.push(dao);
        }
        result
    }

    #[view(getDaoTreasury)]
    fn get_dao_treasury(&self, dao: ManagedAddress) -> ManagedAddress {
        require!(self.daos().contains(&dao), ERR_UNKNOWN_DAO);
        self.dao_treasury(&dao).get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("implementationRegistered")]
    fn implementation_registered_event(
        &self,
        #[indexed] version: &ManagedBuffer,
        implementations: &ImplementationSet<Self::Api>,
    );

    #[event("daoCreated")]
    fn dao_created_event(
        &self,
        #[indexed] dao: &ManagedAddress,
        #[indexed] treasury: &ManagedAddress,
        #[indexed] creator: &ManagedAddress,
        #[indexed] version: &ManagedBuffer,
        name: &ManagedBuffer,
    );

    #[event("governanceTokenIssued")]
    fn governance_token_issued_event(
        &self,
        #[indexed] dao: &ManagedAddress,
        #[indexed] token: &TokenIdentifier,
        initial_supply: &BigUint,
    );

    #[event("tokenIssueFailed")]
    fn token_issue_failed_event(
        &self,
        #[indexed] creator: &ManagedAddress,
        #[indexed] name: &ManagedBuffer,
        reason: &ManagedBuffer,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("versions")]
    fn versions(&self) -> VecMapper<ManagedBuffer>;

    #[storage_mapper("implementations")]
    fn implementations(
        &self,
        version: &ManagedBuffer,
    ) -> SingleValueMapper<ImplementationSet<Self::Api>>;

    #[storage_mapper("daos")]
    fn daos(&self) -> UnorderedSetMapper<ManagedAddress>;

    #[storage_mapper("daoTreasury")]
    fn dao_treasury(&self, dao: &ManagedAddress) -> SingleValueMapper<ManagedAddress>;
}
