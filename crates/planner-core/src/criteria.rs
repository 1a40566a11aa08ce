//! Criteria Merkle trees and resolution.
//!
//! The tree must byte-for-byte match the on-chain verifier: leaves are
//! the keccak hash of the identifier's 32-byte big-endian encoding
//! (hashing leaves first resists second-preimage attacks), and sibling
//! nodes are combined in sorted order so verification is
//! order-independent. Odd nodes are promoted to the next layer unchanged.

use alloy_primitives::keccak256;
use planner_types::{
	CriteriaProof, CriteriaResolution, ItemType, OrderComponents, PlannerError, Result, Side,
	B256, U256,
};

fn leaf_hash(identifier: U256) -> B256 {
	keccak256(identifier.to_be_bytes::<32>())
}

fn hash_pair(a: B256, b: B256) -> B256 {
	let (low, high) = if a <= b { (a, b) } else { (b, a) };
	let mut buf = [0u8; 64];
	buf[..32].copy_from_slice(low.as_slice());
	buf[32..].copy_from_slice(high.as_slice());
	keccak256(buf)
}

/// A sorted Merkle tree over a set of allowed token identifiers.
#[derive(Debug, Clone)]
pub struct CriteriaTree {
	/// Sorted, deduplicated identifiers; index i corresponds to leaf i.
	identifiers: Vec<U256>,
	/// layers[0] are the leaf hashes; each layer halves (rounding up)
	/// until the root layer of length one.
	layers: Vec<Vec<B256>>,
}

impl CriteriaTree {
	pub fn new<I>(identifiers: I) -> Self
	where
		I: IntoIterator<Item = U256>,
	{
		let mut identifiers: Vec<U256> = identifiers.into_iter().collect();
		identifiers.sort_unstable();
		identifiers.dedup();

		let leaves: Vec<B256> = identifiers.iter().map(|id| leaf_hash(*id)).collect();
		let mut layers = vec![leaves];
		while layers.last().map(Vec::len).unwrap_or(0) > 1 {
			let previous = layers.last().unwrap();
			let mut next = Vec::with_capacity(previous.len().div_ceil(2));
			for pair in previous.chunks(2) {
				match pair {
					[left, right] => next.push(hash_pair(*left, *right)),
					[odd] => next.push(*odd),
					_ => unreachable!(),
				}
			}
			layers.push(next);
		}

		Self {
			identifiers,
			layers,
		}
	}

	/// The declared criteria root. Empty and single-leaf trees report
	/// the zero sentinel: no criteria restriction, proofs ignored.
	pub fn root(&self) -> B256 {
		if self.identifiers.len() <= 1 {
			return B256::ZERO;
		}
		self.layers.last().expect("at least the leaf layer")[0]
	}

	/// The membership proof for one identifier, or `None` if it is not
	/// in the set. Trees whose root is the zero sentinel yield empty
	/// proofs.
	pub fn proof_for(&self, identifier: U256) -> Option<Vec<B256>> {
		let mut index = self.identifiers.binary_search(&identifier).ok()?;
		if self.identifiers.len() <= 1 {
			return Some(Vec::new());
		}

		let mut proof = Vec::with_capacity(self.layers.len() - 1);
		for layer in &self.layers[..self.layers.len() - 1] {
			let sibling = if index % 2 == 0 { index + 1 } else { index - 1 };
			if sibling < layer.len() {
				proof.push(layer[sibling]);
			}
			index /= 2;
		}
		Some(proof)
	}
}

/// Re-derives the root from an identifier and its proof; the same fold
/// the on-chain verifier performs.
pub fn verify_proof(identifier: U256, proof: &[B256], root: B256) -> bool {
	let mut node = leaf_hash(identifier);
	for sibling in proof {
		node = hash_pair(node, *sibling);
	}
	node == root
}

/// Pins every criteria-bearing item of an order to a concrete identifier.
///
/// Proofs pair positionally with the criteria items of each side, in item
/// order. A zero declared root accepts any identifier with an empty
/// proof; a non-zero root is verified locally and mismatches fail with
/// [`PlannerError::CriteriaMismatch`] (the contract re-verifies and is
/// authoritative). Output ordering is stable: offer side first, then
/// consideration, ascending item index.
pub fn resolve_criteria(
	order_index: usize,
	order: &OrderComponents,
	offer_criteria: &[CriteriaProof],
	consideration_criteria: &[CriteriaProof],
) -> Result<Vec<CriteriaResolution>> {
	let offer_items = order
		.offer
		.iter()
		.map(|item| (item.item_type, item.identifier_or_criteria));
	let consideration_items = order
		.consideration
		.iter()
		.map(|item| (item.item_type, item.identifier_or_criteria));

	let mut resolutions =
		resolve_side(order_index, Side::Offer, offer_items, offer_criteria)?;
	resolutions.extend(resolve_side(
		order_index,
		Side::Consideration,
		consideration_items,
		consideration_criteria,
	)?);
	Ok(resolutions)
}

fn resolve_side<I>(
	order_index: usize,
	side: Side,
	items: I,
	supplied: &[CriteriaProof],
) -> Result<Vec<CriteriaResolution>>
where
	I: IntoIterator<Item = (ItemType, U256)>,
{
	let mut resolutions = Vec::new();
	let mut proofs = supplied.iter();
	let mut expected = 0usize;

	for (item_index, (item_type, root)) in items.into_iter().enumerate() {
		if !item_type.is_criteria() {
			continue;
		}
		expected += 1;
		let Some(criteria) = proofs.next() else {
			continue;
		};

		if root == U256::ZERO {
			// Collection-wide: any identifier, proof ignored.
			resolutions.push(CriteriaResolution {
				order_index,
				side,
				item_index,
				identifier: criteria.identifier,
				proof: Vec::new(),
			});
			continue;
		}

		let declared_root = B256::from(root);
		if !verify_proof(criteria.identifier, &criteria.proof, declared_root) {
			return Err(PlannerError::CriteriaMismatch {
				side,
				item_index,
				identifier: criteria.identifier,
				root: declared_root,
			});
		}
		resolutions.push(CriteriaResolution {
			order_index,
			side,
			item_index,
			identifier: criteria.identifier,
			proof: criteria.proof.clone(),
		});
	}

	if expected != supplied.len() {
		return Err(PlannerError::CriteriaProofCount {
			order_index,
			side,
			expected,
			supplied: supplied.len(),
		});
	}
	Ok(resolutions)
}

#[cfg(test)]
mod tests {
	use super::*;
	use planner_types::{Address, ItemType, OfferItem, OrderType};

	fn ids(values: &[u64]) -> Vec<U256> {
		values.iter().map(|v| U256::from(*v)).collect()
	}

	fn criteria_order(root: U256) -> OrderComponents {
		OrderComponents {
			offerer: Address::ZERO,
			zone: Address::ZERO,
			offer: vec![OfferItem {
				item_type: ItemType::Erc721WithCriteria,
				token: Address::from([1u8; 20]),
				identifier_or_criteria: root,
				start_amount: U256::from(1),
				end_amount: U256::from(1),
			}],
			consideration: vec![],
			order_type: OrderType::FullOpen,
			start_time: 0,
			end_time: 100,
			zone_hash: B256::ZERO,
			salt: U256::ZERO,
			conduit_key: B256::ZERO,
			counter: U256::ZERO,
		}
	}

	#[test]
	fn test_every_member_proof_verifies() {
		let members = ids(&[3, 1, 4, 1, 5, 9, 2, 6]);
		let tree = CriteriaTree::new(members.clone());
		let root = tree.root();
		assert_ne!(root, B256::ZERO);

		for id in members {
			let proof = tree.proof_for(id).unwrap();
			assert!(verify_proof(id, &proof, root));
		}
	}

	#[test]
	fn test_non_member_fails_verification() {
		let tree = CriteriaTree::new(ids(&[1, 2, 3, 4, 5]));
		let root = tree.root();

		assert!(tree.proof_for(U256::from(99)).is_none());
		// A valid member's proof does not verify for a different id.
		let proof = tree.proof_for(U256::from(3)).unwrap();
		assert!(!verify_proof(U256::from(99), &proof, root));
	}

	#[test]
	fn test_odd_leaf_counts() {
		for count in 2u64..=9 {
			let members: Vec<U256> = (0..count).map(U256::from).collect();
			let tree = CriteriaTree::new(members.clone());
			let root = tree.root();
			for id in members {
				assert!(verify_proof(id, &tree.proof_for(id).unwrap(), root));
			}
		}
	}

	#[test]
	fn test_small_trees_report_zero_sentinel() {
		assert_eq!(CriteriaTree::new(ids(&[])).root(), B256::ZERO);
		let single = CriteriaTree::new(ids(&[7]));
		assert_eq!(single.root(), B256::ZERO);
		assert_eq!(single.proof_for(U256::from(7)).unwrap(), Vec::<B256>::new());
	}

	#[test]
	fn test_root_independent_of_insertion_order() {
		let forward = CriteriaTree::new(ids(&[1, 2, 3, 4]));
		let backward = CriteriaTree::new(ids(&[4, 3, 2, 1]));
		assert_eq!(forward.root(), backward.root());
	}

	#[test]
	fn test_resolve_against_declared_root() {
		let tree = CriteriaTree::new(ids(&[10, 20, 30]));
		let order = criteria_order(tree.root().into());

		let good = CriteriaProof {
			identifier: U256::from(20),
			proof: tree.proof_for(U256::from(20)).unwrap(),
		};
		let resolutions = resolve_criteria(0, &order, &[good], &[]).unwrap();
		assert_eq!(resolutions.len(), 1);
		assert_eq!(resolutions[0].side, Side::Offer);
		assert_eq!(resolutions[0].item_index, 0);
		assert_eq!(resolutions[0].identifier, U256::from(20));

		let bad = CriteriaProof {
			identifier: U256::from(99),
			proof: tree.proof_for(U256::from(20)).unwrap(),
		};
		assert!(matches!(
			resolve_criteria(0, &order, &[bad], &[]),
			Err(PlannerError::CriteriaMismatch { .. })
		));
	}

	#[test]
	fn test_collection_wide_accepts_any_identifier() {
		let order = criteria_order(U256::ZERO);
		let supplied = CriteriaProof::unrestricted(U256::from(123_456));
		let resolutions = resolve_criteria(0, &order, &[supplied], &[]).unwrap();
		assert_eq!(resolutions[0].identifier, U256::from(123_456));
		assert!(resolutions[0].proof.is_empty());
	}

	#[test]
	fn test_proof_count_mismatch() {
		let order = criteria_order(U256::ZERO);
		assert!(matches!(
			resolve_criteria(0, &order, &[], &[]),
			Err(PlannerError::CriteriaProofCount {
				side: Side::Offer,
				expected: 1,
				supplied: 0,
				..
			})
		));
	}
}
