//! Item model for marketplace orders.
//!
//! Every order is a pair of item lists: what the offerer gives up (offer
//! items) and what each counterparty or fee recipient must receive
//! (consideration items). Item kinds are an explicit sum type so every
//! consumer matches exhaustively instead of probing fields.

use crate::common::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of asset an item refers to.
///
/// The criteria variants carry a Merkle root (or zero for "any identifier
/// in the collection") in place of a concrete token identifier until a
/// criteria resolution pins them down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
	/// The chain's native currency.
	Native,
	/// An ERC-20 fungible token.
	Erc20,
	/// A concrete ERC-721 token.
	Erc721,
	/// A concrete ERC-1155 token.
	Erc1155,
	/// An ERC-721 restricted to a criteria Merkle root.
	Erc721WithCriteria,
	/// An ERC-1155 restricted to a criteria Merkle root.
	Erc1155WithCriteria,
}

impl ItemType {
	/// Protocol wire encoding, used by the canonical struct hash.
	pub fn as_u8(self) -> u8 {
		match self {
			ItemType::Native => 0,
			ItemType::Erc20 => 1,
			ItemType::Erc721 => 2,
			ItemType::Erc1155 => 3,
			ItemType::Erc721WithCriteria => 4,
			ItemType::Erc1155WithCriteria => 5,
		}
	}

	/// Whether the concrete identifier is still unresolved.
	pub fn is_criteria(self) -> bool {
		matches!(
			self,
			ItemType::Erc721WithCriteria | ItemType::Erc1155WithCriteria
		)
	}

	/// Whether this item type can pay a price or a fee.
	pub fn is_currency(self) -> bool {
		matches!(self, ItemType::Native | ItemType::Erc20)
	}

	pub fn is_native(self) -> bool {
		matches!(self, ItemType::Native)
	}

	/// Native transfers need no operator approval; everything else does.
	pub fn needs_approval(self) -> bool {
		!self.is_native()
	}

	/// The concrete item type a criteria item becomes once resolved.
	pub fn resolved(self) -> ItemType {
		match self {
			ItemType::Erc721WithCriteria => ItemType::Erc721,
			ItemType::Erc1155WithCriteria => ItemType::Erc1155,
			other => other,
		}
	}
}

/// Which item list of an order an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
	Offer,
	Consideration,
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Side::Offer => write!(f, "offer"),
			Side::Consideration => write!(f, "consideration"),
		}
	}
}

/// An item the offerer gives up.
///
/// `start_amount` and `end_amount` differ for items whose transferable
/// amount changes linearly over the order window (dutch auctions); flat
/// items carry the same value in both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferItem {
	pub item_type: ItemType,
	/// Token contract address; zero for native currency.
	pub token: Address,
	/// Concrete token identifier, or the criteria Merkle root (zero for
	/// collection-wide) when `item_type.is_criteria()`.
	pub identifier_or_criteria: U256,
	pub start_amount: U256,
	pub end_amount: U256,
}

/// An item a party or fee recipient must receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsiderationItem {
	pub item_type: ItemType,
	pub token: Address,
	pub identifier_or_criteria: U256,
	pub start_amount: U256,
	pub end_amount: U256,
	/// Who must end up holding the item after settlement.
	pub recipient: Address,
}
