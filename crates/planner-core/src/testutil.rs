//! In-memory chain reader for tests.

use async_trait::async_trait;
use planner_types::{Address, AssetRef, ChainReader, Result, Timestamp, U256};
use std::collections::HashMap;

type AssetKey = (Address, Address, U256);
type ApprovalKey = (Address, Address, Address, U256);

/// A `ChainReader` backed by hash maps; unknown entries read as zero.
#[derive(Debug, Default, Clone)]
pub struct MockChainReader {
	timestamp: Timestamp,
	balances: HashMap<AssetKey, U256>,
	approvals: HashMap<ApprovalKey, U256>,
}

impl MockChainReader {
	pub fn new(timestamp: Timestamp) -> Self {
		Self {
			timestamp,
			..Self::default()
		}
	}

	pub fn with_balance(mut self, owner: Address, asset: &AssetRef, balance: U256) -> Self {
		self.balances
			.insert((owner, asset.token, asset.identifier_or_criteria), balance);
		self
	}

	pub fn with_approval(
		mut self,
		owner: Address,
		operator: Address,
		asset: &AssetRef,
		amount: U256,
	) -> Self {
		self.approvals.insert(
			(owner, operator, asset.token, asset.identifier_or_criteria),
			amount,
		);
		self
	}
}

#[async_trait]
impl ChainReader for MockChainReader {
	async fn balance_of(&self, owner: Address, asset: &AssetRef) -> Result<U256> {
		Ok(self
			.balances
			.get(&(owner, asset.token, asset.identifier_or_criteria))
			.copied()
			.unwrap_or(U256::ZERO))
	}

	async fn approved_amount(
		&self,
		owner: Address,
		operator: Address,
		asset: &AssetRef,
	) -> Result<U256> {
		Ok(self
			.approvals
			.get(&(owner, operator, asset.token, asset.identifier_or_criteria))
			.copied()
			.unwrap_or(U256::ZERO))
	}

	async fn current_block_timestamp(&self) -> Result<Timestamp> {
		Ok(self.timestamp)
	}
}
