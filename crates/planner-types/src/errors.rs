//! Error types for the planning engine.
//!
//! Every fatal condition is surfaced synchronously from the planning call
//! with enough context for the caller to explain the failure. Nothing is
//! retried here: these reflect real on-chain state or bad caller input,
//! not transient faults. Note that an insufficient *approval* is not an
//! error at all; it becomes an approval action in the returned plan.

use crate::common::{Address, B256, U256};
use crate::items::Side;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Error, Debug)]
pub enum PlannerError {
	/// The owner does not hold enough of an asset the plan would move.
	/// Planning aborts: approving an unowned asset is pointless.
	#[error("insufficient balance of token {token} (identifier {identifier_or_criteria}): need {needed}, have {have}")]
	InsufficientBalance {
		token: Address,
		identifier_or_criteria: U256,
		needed: U256,
		have: U256,
	},

	/// A supplied criteria proof does not verify against the declared
	/// root. The contract re-verifies and is authoritative; this is the
	/// local pre-check.
	#[error("criteria proof for {side} item {item_index} (identifier {identifier}) does not match root {root}")]
	CriteriaMismatch {
		side: Side,
		item_index: usize,
		identifier: U256,
		root: B256,
	},

	/// The caller supplied the wrong number of criteria proofs for one
	/// side of an order; pairing is positional.
	#[error("{side} side of order {order_index} has {expected} criteria items, {supplied} proofs supplied")]
	CriteriaProofCount {
		order_index: usize,
		side: Side,
		expected: usize,
		supplied: usize,
	},

	/// Consideration currencies disagree; fee math needs a single one.
	#[error("consideration currencies do not match: expected token {expected}, found {found}")]
	CurrencyMismatch { expected: Address, found: Address },

	/// The requested partial-fill units do not relate to the GCD-derived
	/// denominator, or the order type forbids partial fills.
	#[error("invalid fill fraction: {units} units of denominator {denominator}")]
	InvalidFillFraction { units: U256, denominator: U256 },

	/// A non-flat item over a zero-or-negative-duration window cannot be
	/// interpolated.
	#[error("invalid order window: start {start_time} >= end {end_time}")]
	InvalidOrderWindow { start_time: u64, end_time: u64 },

	/// No operator is configured for the order's conduit key.
	#[error("no operator configured for conduit key {key}")]
	UnknownConduitKey { key: B256 },

	/// A chain read failed; retries belong to the reader implementation.
	#[error("chain read failed: {0}")]
	Chain(String),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}
