multiversx_sc::imports!();
multiversx_sc::derive_imports!();

/// Template contracts a version points at. Each DAO cluster is
/// deployed from, and later upgraded from, these addresses.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct ImplementationSet<M: ManagedTypeApi> {
    pub dao: ManagedAddress<M>,
    pub treasury: ManagedAddress<M>,
    pub presale: ManagedAddress<M>,
}
