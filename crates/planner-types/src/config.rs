//! Planner configuration.
//!
//! Resolved once at construction and injected into the planner; nothing
//! reads ambient defaults.

use crate::common::{Address, B256};
use crate::errors::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grace period applied to ascending (dutch-auction up) amounts so a
/// transaction included a few blocks late still carries enough value.
pub const DEFAULT_ASCENDING_AMOUNT_BUFFER: u64 = 300;

/// Immutable configuration for a planning engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
	/// The marketplace contract; the operator for the zero conduit key.
	pub marketplace: Address,
	/// Conduit key to deployed conduit (operator) address.
	pub conduit_operators: HashMap<B256, Address>,
	/// Seconds added to `now` when interpolating ascending amounts.
	pub ascending_amount_buffer: u64,
}

impl PlannerConfig {
	pub fn new(marketplace: Address) -> Self {
		Self {
			marketplace,
			conduit_operators: HashMap::new(),
			ascending_amount_buffer: DEFAULT_ASCENDING_AMOUNT_BUFFER,
		}
	}

	pub fn with_conduit(mut self, key: B256, operator: Address) -> Self {
		self.conduit_operators.insert(key, operator);
		self
	}

	/// The on-chain address authorized to move approved tokens for
	/// orders carrying this conduit key.
	pub fn operator_for(&self, conduit_key: B256) -> Result<Address> {
		if conduit_key == B256::ZERO {
			return Ok(self.marketplace);
		}
		self.conduit_operators
			.get(&conduit_key)
			.copied()
			.ok_or(PlannerError::UnknownConduitKey { key: conduit_key })
	}
}
