use multiversx_sc::proxy_imports::*;

use crate::types::ImplementationSet;

pub struct RegistryProxy;

impl<Env, From, To, Gas> TxProxyTrait<Env, From, To, Gas> for RegistryProxy
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    type TxProxyMethods = RegistryProxyMethods<Env, From, To, Gas>;

    fn proxy_methods(self, tx: Tx<Env, From, To, (), Gas, (), ()>) -> Self::TxProxyMethods {
        RegistryProxyMethods { wrapped_tx: tx }
    }
}

pub struct RegistryProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    wrapped_tx: Tx<Env, From, To, (), Gas, (), ()>,
}

impl<Env, From, To, Gas> RegistryProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
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
}
