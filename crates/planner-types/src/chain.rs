//! The read-only boundary between the planner and the chain.
//!
//! The planner never writes; approve/execute transactions belong to the
//! caller's chain connector. Reads within one planning pass are
//! independent, so implementations should support being called
//! concurrently (the engine fans reads out and joins them rather than
//! awaiting sequentially).

use crate::balances::AssetRef;
use crate::common::{Address, Timestamp, U256};
use crate::errors::Result;
use async_trait::async_trait;

/// Read access to balances, approvals, and the current block time.
///
/// Retry policy for transient RPC faults lives behind this trait, not in
/// the planner.
#[async_trait]
pub trait ChainReader: Send + Sync {
	/// The owner's balance of an asset: native balance, ERC-20 balance,
	/// ERC-1155 balance, or ERC-721 ownership reported as one/zero.
	async fn balance_of(&self, owner: Address, asset: &AssetRef) -> Result<U256>;

	/// How much of the asset the operator may move on the owner's
	/// behalf: the ERC-20 allowance, or `U256::MAX`/zero for an
	/// all-or-nothing operator approval (ERC-721/1155).
	async fn approved_amount(
		&self,
		owner: Address,
		operator: Address,
		asset: &AssetRef,
	) -> Result<U256>;

	/// Timestamp of the latest block.
	async fn current_block_timestamp(&self) -> Result<Timestamp>;
}
