use multiversx_sc::proxy_imports::*;

use crate::types::ImplementationSet;

pub struct DaoFactoryProxy;

impl<Env, From, To, Gas> TxProxyTrait<Env, From, To, Gas> for DaoFactoryProxy
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    type TxProxyMethods = DaoFactoryProxyMethods<Env, From, To, Gas>;

    fn proxy_methods(self, tx: Tx<Env, From, To, (), Gas, (), ()>) -> Self::TxProxyMethods {
        DaoFactoryProxyMethods { wrapped_tx: tx }
    }
}

pub struct DaoFactoryProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    wrapped_tx: Tx<Env, From, To, (), Gas, (), ()>,
}

impl<Env, From, Gas> DaoFactoryProxyMethods<Env, From, (), Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    Gas: TxGas<Env>,
{
    pub fn init(self) -> TxTypedDeploy<Env, From, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_deploy()
            .original_result()
    }
}

impl<Env, From, To, Gas> DaoFactoryProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    pub fn upgrade(self) -> TxTypedUpgrade<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_upgrade()
            .original_result()
    }
}

impl<Env, From, To, Gas> DaoFactoryProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    pub fn register_implementation<
        Arg0: ProxyArg<ManagedBuffer<Env::Api>>,
        Arg1: ProxyArg<ManagedAddress<Env::Api>>,
        Arg2: ProxyArg<ManagedAddress<Env::Api>>,
        Arg3: ProxyArg<ManagedAddress<Env::Api>>,
    >(
        self,
        version: Arg0,
        dao: Arg1,
        treasury: Arg2,
        presale: Arg3,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("registerImplementation")
            .argument(&version)
            .argument(&dao)
            .argument(&treasury)
            .argument(&presale)
            .original_result()
    }

    pub fn latest_version(
        self,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ManagedBuffer<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("latestVersion")
            .original_result()
    }

    pub fn resolve_version<Arg0: ProxyArg<ManagedBuffer<Env::Api>>>(
        self,
        version: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ImplementationSet<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("resolveVersion")
            .argument(&version)
            .original_result()
    }

    pub fn is_version_registered<Arg0: ProxyArg<ManagedBuffer<Env::Api>>>(
        self,
        version: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, bool> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("isVersionRegistered")
            .argument(&version)
            .original_result()
    }

    pub fn get_versions(
        self,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, MultiValueEncoded<Env::Api, ManagedBuffer<Env::Api>>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getVersions")
            .original_result()
    }

    pub fn create_dao<
        Arg0: ProxyArg<ManagedBuffer<Env::Api>>,
        Arg1: ProxyArg<ManagedBuffer<Env::Api>>,
        Arg2: ProxyArg<TokenIdentifier<Env::Api>>,
    >(
        self,
        version: Arg0,
        name: Arg1,
        governance_token: Arg2,
    ) -> TxTypedCall<
        Env,
        From,
        To,
        NotPayable,
        Gas,
        MultiValue2<ManagedAddress<Env::Api>, ManagedAddress<Env::Api>>,
    > {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("createDao")
            .argument(&version)
            .argument(&name)
            .argument(&governance_token)
            .original_result()
    }

    pub fn create_dao_with_token<
        Arg0: ProxyArg<ManagedBuffer<Env::Api>>,
        Arg1: ProxyArg<ManagedBuffer<Env::Api>>,
        Arg2: ProxyArg<ManagedBuffer<Env::Api>>,
        Arg3: ProxyArg<ManagedBuffer<Env::Api>>,
        Arg4: ProxyArg<BigUint<Env::Api>>,
    >(
        self,
        version: Arg0,
        name: Arg1,
        token_name: Arg2,
        ticker: Arg3,
        initial_supply: Arg4,
    ) -> TxTypedCall<Env, From, To, (), Gas, ()> {
        self.wrapped_tx
            .raw_call("createDaoWithToken")
            .argument(&version)
            .argument(&name)
            .argument(&token_name)
            .argument(&ticker)
            .argument(&initial_supply)
            .original_result()
    }

    pub fn get_factory_version(
        self,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ManagedBuffer<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getFactoryVersion")
            .original_result()
    }

    pub fn get_daos(
        self,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, MultiValueEncoded<Env::Api, ManagedAddress<Env::Api>>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getDaos")
            .original_result()
    }

    pub fn get_dao_treasury<Arg0: ProxyArg<ManagedAddress<Env::Api>>>(
        self,
        dao: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ManagedAddress<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getDaoTreasury")
            .argument(&dao)
            .original_result()
    }
}
