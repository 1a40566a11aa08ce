//! Balance and approval snapshot types.
//!
//! A snapshot is captured once per planning pass and never mutated
//! afterwards; incoming mid-trade transfers are applied to a working copy
//! before diffing.

use crate::common::{Address, U256};
use crate::items::{ConsiderationItem, ItemType, OfferItem};
use serde::{Deserialize, Serialize};

/// The `(token, identifier)` coordinate a balance or requirement is
/// indexed by, with the concrete (post-resolution) item type retained so
/// consumers know which approval mechanism applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
	pub item_type: ItemType,
	pub token: Address,
	pub identifier_or_criteria: U256,
}

impl AssetRef {
	/// Two assets are the same balance bucket when token and identifier
	/// agree; the item type only selects the read/approval mechanism.
	pub fn same_asset(&self, other: &AssetRef) -> bool {
		self.token == other.token && self.identifier_or_criteria == other.identifier_or_criteria
	}

	pub fn native() -> Self {
		Self {
			item_type: ItemType::Native,
			token: Address::ZERO,
			identifier_or_criteria: U256::ZERO,
		}
	}
}

impl From<&OfferItem> for AssetRef {
	fn from(item: &OfferItem) -> Self {
		Self {
			item_type: item.item_type,
			token: item.token,
			identifier_or_criteria: item.identifier_or_criteria,
		}
	}
}

impl From<&ConsiderationItem> for AssetRef {
	fn from(item: &ConsiderationItem) -> Self {
		Self {
			item_type: item.item_type,
			token: item.token,
			identifier_or_criteria: item.identifier_or_criteria,
		}
	}
}

/// One owner's balance and operator-approved amount for a single asset,
/// as of read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
	pub asset: AssetRef,
	pub balance: U256,
	pub approved_amount: U256,
}

/// A summed requirement against one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredBalance {
	pub asset: AssetRef,
	pub amount: U256,
}

/// How far short an owner falls on one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
	pub asset: AssetRef,
	pub amount_needed: U256,
	pub amount_have: U256,
}

/// The outcome of diffing a snapshot against summed requirements.
///
/// Balance shortfalls are fatal; each approval shortfall implies exactly
/// one approval action once deduplicated by `(token, operator)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficiencyReport {
	pub balance: Vec<Shortfall>,
	pub approvals: Vec<Shortfall>,
}

impl InsufficiencyReport {
	pub fn is_empty(&self) -> bool {
		self.balance.is_empty() && self.approvals.is_empty()
	}
}
