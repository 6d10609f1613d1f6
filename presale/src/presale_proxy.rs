use multiversx_sc::proxy_imports::*;

pub struct PresaleProxy;

impl<Env, From, To, Gas> TxProxyTrait<Env, From, To, Gas> for PresaleProxy
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    type TxProxyMethods = PresaleProxyMethods<Env, From, To, Gas>;

    fn proxy_methods(self, tx: Tx<Env, From, To, (), Gas, (), ()>) -> Self::TxProxyMethods {
        PresaleProxyMethods { wrapped_tx: tx }
    }
}

pub struct PresaleProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    wrapped_tx: Tx<Env, From, To, (), Gas, (), ()>,
}

impl<Env, From, Gas> PresaleProxyMethods<Env, From, (), Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    Gas: TxGas<Env>,
{
    pub fn init<
        Arg0: ProxyArg<TokenIdentifier<Env::Api>>,
        Arg1: ProxyArg<ManagedAddress<Env::Api>>,
        Arg2: ProxyArg<BigUint<Env::Api>>,
        Arg3: ProxyArg<BigUint<Env::Api>>,
    >(
        self,
        token: Arg0,
        treasury_address: Arg1,
        total_amount: Arg2,
        initial_price: Arg3,
    ) -> TxTypedDeploy<Env, From, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_deploy()
            .argument(&token)
            .argument(&treasury_address)
            .argument(&total_amount)
            .argument(&initial_price)
            .original_result()
    }
}

impl<Env, From, To, Gas> PresaleProxyMethods<Env, From, To, Gas>
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

impl<Env, From, To, Gas> PresaleProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    pub fn buy<Arg0: ProxyArg<BigUint<Env::Api>>, Arg1: ProxyArg<u64>>(
        self,
        min_tokens: Arg0,
        deadline: Arg1,
    ) -> TxTypedCall<Env, From, To, (), Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .raw_call("buy")
            .argument(&min_tokens)
            .argument(&deadline)
            .original_result()
    }

    pub fn sell<Arg0: ProxyArg<BigUint<Env::Api>>, Arg1: ProxyArg<u64>>(
        self,
        min_eth: Arg0,
        deadline: Arg1,
    ) -> TxTypedCall<Env, From, To, (), Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .raw_call("sell")
            .argument(&min_eth)
            .argument(&deadline)
            .original_result()
    }

    pub fn deposit(self) -> TxTypedCall<Env, From, To, (), Gas, ()> {
        self.wrapped_tx
            .raw_call("deposit")
            .original_result()
    }

    pub fn set_paused<Arg0: ProxyArg<bool>>(
        self,
        paused: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("setPaused")
            .argument(&paused)
            .original_result()
    }

    pub fn withdraw_to_treasury(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("withdrawToTreasury")
            .original_result()
    }

    pub fn calculate_purchase_across_tiers<Arg0: ProxyArg<BigUint<Env::Api>>>(
        self,
        funds: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("calculatePurchaseAcrossTiers")
            .argument(&funds)
            .original_result()
    }

    pub fn calculate_sell_return<Arg0: ProxyArg<BigUint<Env::Api>>>(
        self,
        token_amount: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("calculateSellReturn")
            .argument(&token_amount)
            .original_result()
    }

    pub fn quote_tokens_for_exact_eth<Arg0: ProxyArg<BigUint<Env::Api>>>(
        self,
        funds: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, MultiValue3<BigUint<Env::Api>, ManagedVec<Env::Api, BigUint<Env::Api>>, ManagedVec<Env::Api, BigUint<Env::Api>>>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("quoteTokensForExactETH")
            .argument(&funds)
            .original_result()
    }

    pub fn quote_eth_for_exact_tokens<Arg0: ProxyArg<BigUint<Env::Api>>>(
        self,
        token_amount: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, MultiValue3<BigUint<Env::Api>, ManagedVec<Env::Api, BigUint<Env::Api>>, ManagedVec<Env::Api, BigUint<Env::Api>>>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("quoteETHForExactTokens")
            .argument(&token_amount)
            .original_result()
    }

    pub fn get_presale_state(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, MultiValue5<u32, BigUint<Env::Api>, BigUint<Env::Api>, BigUint<Env::Api>, BigUint<Env::Api>>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getPresaleState")
            .original_result()
    }

    pub fn get_current_tier(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, u32> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getCurrentTier")
            .original_result()
    }

    pub fn get_current_price(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getCurrentPrice")
            .original_result()
    }

    pub fn get_remaining_in_current_tier(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getRemainingInCurrentTier")
            .original_result()
    }

    pub fn get_tokens_sold(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getTokensSold")
            .original_result()
    }

    pub fn get_total_remaining(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getTotalRemaining")
            .original_result()
    }

    pub fn get_tokens_per_tier(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getTokensPerTier")
            .original_result()
    }

    pub fn get_initial_price(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getInitialPrice")
            .original_result()
    }

    pub fn get_tier_count(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, u32> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getTierCount")
            .original_result()
    }

    pub fn get_tier_info<Arg0: ProxyArg<u32>>(
        self,
        tier: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, MultiValue3<BigUint<Env::Api>, BigUint<Env::Api>, BigUint<Env::Api>>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getTierInfo")
            .argument(&tier)
            .original_result()
    }

    pub fn get_dao(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, ManagedAddress<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getDao")
            .original_result()
    }

    pub fn get_token(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, TokenIdentifier<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getToken")
            .original_result()
    }

    pub fn get_treasury(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, ManagedAddress<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getTreasury")
            .original_result()
    }

    pub fn get_total_raised(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, BigUint<Env::Api>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("getTotalRaised")
            .original_result()
    }

    pub fn is_paused(self) -> TxTypedCall<Env, From, To, NotPayable, Gas, bool> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("isPaused")
            .original_result()
    }
}
