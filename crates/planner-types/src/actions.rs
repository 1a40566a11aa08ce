//! Actions a planning pass hands back to the caller.
//!
//! An action list is created once per pass and consumed by the caller's
//! execution loop in order; approvals always precede the exchange action
//! that depends on them. Lists are never reused across passes, since an
//! executed approval changes the state a later pass would observe.

use crate::common::{Address, B256, U256};
use crate::criteria::CriteriaResolution;
use crate::items::ItemType;
use serde::{Deserialize, Serialize};

/// The execution path a plan targets.
///
/// Basic is a cheaper single-call path limited to one offer item against
/// a single consideration currency; standard covers everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
	Basic,
	Standard,
}

/// A fill size expressed as a fraction of the full order, kept in lowest
/// terms. `numerator == denominator` means a full fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillFraction {
	pub numerator: U256,
	pub denominator: U256,
}

impl FillFraction {
	pub fn is_full(&self) -> bool {
		self.numerator == self.denominator
	}
}

/// An approval the owner must grant before the exchange can move the
/// asset. One action per distinct `(token, operator)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalAction {
	pub token: Address,
	pub identifier_or_criteria: U256,
	pub item_type: ItemType,
	/// The conduit (or the marketplace contract) being authorized.
	pub operator: Address,
}

/// The exchange call itself, carrying everything a transaction builder
/// needs: the chosen path, pinned criteria, the fill fraction and
/// locally computed hash of every order in the pass (parallel vectors,
/// one entry per order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeAction {
	pub strategy: Strategy,
	pub criteria_resolutions: Vec<CriteriaResolution>,
	pub fill_fractions: Vec<FillFraction>,
	pub order_hashes: Vec<B256>,
}

/// One step of a fulfillment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
	Approval(ApprovalAction),
	Exchange(ExchangeAction),
}

/// The ordered output of one planning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentPlan {
	pub strategy: Strategy,
	pub actions: Vec<Action>,
}

impl FulfillmentPlan {
	/// The approval actions, in execution order.
	pub fn approvals(&self) -> impl Iterator<Item = &ApprovalAction> {
		self.actions.iter().filter_map(|action| match action {
			Action::Approval(approval) => Some(approval),
			Action::Exchange(_) => None,
		})
	}

	/// The single exchange action every plan ends with.
	pub fn exchange(&self) -> Option<&ExchangeAction> {
		self.actions.iter().find_map(|action| match action {
			Action::Exchange(exchange) => Some(exchange),
			Action::Approval(_) => None,
		})
	}
}
