//! Criteria resolution types.
//!
//! A criteria item declares a Merkle root over the set of token
//! identifiers it accepts (or zero for the whole collection). Before
//! settlement the caller pins each one to a concrete identifier together
//! with a membership proof; the contract re-verifies the proof on-chain.

use crate::common::{B256, U256};
use crate::items::Side;
use serde::{Deserialize, Serialize};

/// A caller-supplied identifier plus its Merkle membership proof.
///
/// Valid only if re-deriving the root from `identifier` and `proof`
/// matches the order's declared root. For a collection-wide item (root
/// zero) the proof is ignored and left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaProof {
	pub identifier: U256,
	pub proof: Vec<B256>,
}

impl CriteriaProof {
	/// A bare identifier with no proof, as used for collection-wide items.
	pub fn unrestricted(identifier: U256) -> Self {
		Self {
			identifier,
			proof: Vec::new(),
		}
	}
}

/// A resolved criteria item, positioned so the receiving contract call
/// can associate it with the original item.
///
/// Resolutions are emitted in a stable order: ascending order index,
/// offer side before consideration side, ascending item index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaResolution {
	pub order_index: usize,
	pub side: Side,
	pub item_index: usize,
	pub identifier: U256,
	pub proof: Vec<B256>,
}
