//! Canonical order hashing.
//!
//! Recomputes the protocol's nested struct hash locally so orders can be
//! identified and signatures pre-validated without a contract call. The
//! byte layout must match the contract's own routine exactly: keccak
//! typehashes of the struct type strings (nested struct definitions
//! appended in alphabetical order), every field left-padded to a 32-byte
//! word, per-item hashes aggregated per side, then the top-level hash.

use alloy_primitives::keccak256;
use planner_types::{ConsiderationItem, OfferItem, OrderComponents, B256, U256};

const OFFER_ITEM_TYPE_STRING: &str = "OfferItem(\
	uint8 itemType,\
	address token,\
	uint256 identifierOrCriteria,\
	uint256 startAmount,\
	uint256 endAmount\
)";

const CONSIDERATION_ITEM_TYPE_STRING: &str = "ConsiderationItem(\
	uint8 itemType,\
	address token,\
	uint256 identifierOrCriteria,\
	uint256 startAmount,\
	uint256 endAmount,\
	address recipient\
)";

const ORDER_COMPONENTS_TYPE_STRING: &str = "OrderComponents(\
	address offerer,\
	address zone,\
	OfferItem[] offer,\
	ConsiderationItem[] consideration,\
	uint8 orderType,\
	uint256 startTime,\
	uint256 endTime,\
	bytes32 zoneHash,\
	uint256 salt,\
	bytes32 conduitKey,\
	uint256 counter\
)";

fn offer_item_typehash() -> B256 {
	keccak256(OFFER_ITEM_TYPE_STRING.as_bytes())
}

fn consideration_item_typehash() -> B256 {
	keccak256(CONSIDERATION_ITEM_TYPE_STRING.as_bytes())
}

fn order_components_typehash() -> B256 {
	// Nested struct definitions follow the top-level one alphabetically:
	// ConsiderationItem before OfferItem.
	let mut type_string = String::from(ORDER_COMPONENTS_TYPE_STRING);
	type_string.push_str(CONSIDERATION_ITEM_TYPE_STRING);
	type_string.push_str(OFFER_ITEM_TYPE_STRING);
	keccak256(type_string.as_bytes())
}

fn offer_item_hash(item: &OfferItem) -> B256 {
	let mut buf = Vec::with_capacity(6 * 32);
	buf.extend_from_slice(offer_item_typehash().as_slice());
	buf.extend_from_slice(&U256::from(item.item_type.as_u8()).to_be_bytes::<32>());
	buf.extend_from_slice(item.token.into_word().as_slice());
	buf.extend_from_slice(&item.identifier_or_criteria.to_be_bytes::<32>());
	buf.extend_from_slice(&item.start_amount.to_be_bytes::<32>());
	buf.extend_from_slice(&item.end_amount.to_be_bytes::<32>());
	keccak256(buf)
}

fn consideration_item_hash(item: &ConsiderationItem) -> B256 {
	let mut buf = Vec::with_capacity(7 * 32);
	buf.extend_from_slice(consideration_item_typehash().as_slice());
	buf.extend_from_slice(&U256::from(item.item_type.as_u8()).to_be_bytes::<32>());
	buf.extend_from_slice(item.token.into_word().as_slice());
	buf.extend_from_slice(&item.identifier_or_criteria.to_be_bytes::<32>());
	buf.extend_from_slice(&item.start_amount.to_be_bytes::<32>());
	buf.extend_from_slice(&item.end_amount.to_be_bytes::<32>());
	buf.extend_from_slice(item.recipient.into_word().as_slice());
	keccak256(buf)
}

/// The canonical hash of an order's components.
///
/// Stable across calls and sensitive to every field, including the salt
/// and the offerer's counter.
pub fn order_hash(components: &OrderComponents) -> B256 {
	let mut offer_hashes = Vec::with_capacity(components.offer.len() * 32);
	for item in &components.offer {
		offer_hashes.extend_from_slice(offer_item_hash(item).as_slice());
	}
	let offer_aggregate = keccak256(offer_hashes);

	let mut consideration_hashes = Vec::with_capacity(components.consideration.len() * 32);
	for item in &components.consideration {
		consideration_hashes.extend_from_slice(consideration_item_hash(item).as_slice());
	}
	let consideration_aggregate = keccak256(consideration_hashes);

	let mut buf = Vec::with_capacity(12 * 32);
	buf.extend_from_slice(order_components_typehash().as_slice());
	buf.extend_from_slice(components.offerer.into_word().as_slice());
	buf.extend_from_slice(components.zone.into_word().as_slice());
	buf.extend_from_slice(offer_aggregate.as_slice());
	buf.extend_from_slice(consideration_aggregate.as_slice());
	buf.extend_from_slice(&U256::from(components.order_type.as_u8()).to_be_bytes::<32>());
	buf.extend_from_slice(&U256::from(components.start_time).to_be_bytes::<32>());
	buf.extend_from_slice(&U256::from(components.end_time).to_be_bytes::<32>());
	buf.extend_from_slice(components.zone_hash.as_slice());
	buf.extend_from_slice(&components.salt.to_be_bytes::<32>());
	buf.extend_from_slice(components.conduit_key.as_slice());
	buf.extend_from_slice(&components.counter.to_be_bytes::<32>());
	keccak256(buf)
}
