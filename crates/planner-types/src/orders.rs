//! Order-level types: timing windows, order kinds, and the canonical
//! component set the protocol hashes and signs.

use crate::common::{Address, Timestamp, B256, U256};
use crate::items::{ConsiderationItem, OfferItem};
use serde::{Deserialize, Serialize};

/// The validity window of an order.
///
/// Amount interpolation assumes `end_time > start_time`; a zero-duration
/// window is rejected when a non-flat item forces a division by the
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWindow {
	pub start_time: Timestamp,
	pub end_time: Timestamp,
}

/// How an order may be filled and who may fill it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
	FullOpen,
	PartialOpen,
	FullRestricted,
	PartialRestricted,
}

impl OrderType {
	/// Protocol wire encoding, used by the canonical struct hash.
	pub fn as_u8(self) -> u8 {
		match self {
			OrderType::FullOpen => 0,
			OrderType::PartialOpen => 1,
			OrderType::FullRestricted => 2,
			OrderType::PartialRestricted => 3,
		}
	}

	pub fn supports_partial_fills(self) -> bool {
		matches!(self, OrderType::PartialOpen | OrderType::PartialRestricted)
	}
}

/// The full set of fields the protocol's canonical order hash covers.
///
/// `counter` is the offerer's signature counter at signing time; bumping
/// it on-chain invalidates every order signed under the old value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderComponents {
	pub offerer: Address,
	pub zone: Address,
	pub offer: Vec<OfferItem>,
	pub consideration: Vec<ConsiderationItem>,
	pub order_type: OrderType,
	pub start_time: Timestamp,
	pub end_time: Timestamp,
	pub zone_hash: B256,
	pub salt: U256,
	/// Selects the operator (conduit) that moves the offerer's tokens;
	/// zero means the marketplace contract itself.
	pub conduit_key: B256,
	pub counter: U256,
}

impl OrderComponents {
	pub fn window(&self) -> OrderWindow {
		OrderWindow {
			start_time: self.start_time,
			end_time: self.end_time,
		}
	}

	/// Whether any item on either side still needs criteria resolution.
	pub fn has_criteria_items(&self) -> bool {
		self.offer.iter().any(|item| item.item_type.is_criteria())
			|| self
				.consideration
				.iter()
				.any(|item| item.item_type.is_criteria())
	}
}
