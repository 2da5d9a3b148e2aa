use super::*;

/// Height of the host chain, in blocks.
pub type BlockHeight = u64;

/// Burrows are identified by the account address that owns the collateral
/// position. The minter guarantees the mapping is unique.
pub type BurrowAddress = AccountAddress;

/// Result type of every auction house operation.
pub type ContractResult<A> = Result<A, CustomContractError>;
