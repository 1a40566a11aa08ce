//! Fulfillment strategy selection and plan assembly.
//!
//! One planning pass composes the pure components into an ordered action
//! list: criteria resolution and amount interpolation first, then one
//! concurrent snapshot batch for every involved owner, then
//! reconciliation. Balance shortfalls abort the pass; approval shortfalls
//! become the approval actions that precede the exchange.

use crate::amounts::present_amount;
use crate::criteria::resolve_criteria;
use crate::fill::{fill_fraction, order_fill_denominator, scale_amount};
use crate::hash::order_hash;
use crate::reconcile::{reconcile, snapshot, sum_required};
use anyhow::anyhow;
use futures::future::try_join_all;
use futures::try_join;
use planner_types::{
	Action, Address, ApprovalAction, AssetRef, ChainReader, CriteriaProof, CriteriaResolution,
	ExchangeAction, FillFraction, FulfillmentPlan, OrderComponents, PlannerConfig, PlannerError,
	Result, Side, Strategy, B256, U256,
};
use tracing::{debug, info};

/// One order to fulfill, with the caller's fill size and criteria picks.
#[derive(Debug, Clone)]
pub struct OrderFulfillment {
	pub order: OrderComponents,
	/// Units against the order's GCD-derived denominator; `None`
	/// requests a full fill.
	pub units_to_fill: Option<U256>,
	/// Positional proofs for the criteria-bearing offer items.
	pub offer_criteria: Vec<CriteriaProof>,
	/// Positional proofs for the criteria-bearing consideration items.
	pub consideration_criteria: Vec<CriteriaProof>,
}

impl OrderFulfillment {
	/// A full fill with no criteria items.
	pub fn full(order: OrderComponents) -> Self {
		Self {
			order,
			units_to_fill: None,
			offer_criteria: Vec::new(),
			consideration_criteria: Vec::new(),
		}
	}
}

/// Decides between the basic and standard execution paths and assembles
/// the ordered action list for a set of orders.
pub struct FulfillmentPlanner<'a> {
	config: &'a PlannerConfig,
	reader: &'a dyn ChainReader,
}

/// Everything about one order that can be computed without touching the
/// chain (beyond the block timestamp).
struct PreparedOrder {
	hash: B256,
	offerer: Address,
	/// Operator for the offerer's tokens, from the order's conduit key.
	operator: Address,
	fraction: FillFraction,
	resolutions: Vec<CriteriaResolution>,
	/// Present (interpolated, fill-scaled) offer amounts, rounded down.
	offer_required: Vec<(AssetRef, U256)>,
	/// Present consideration amounts, rounded up.
	consideration_required: Vec<(AssetRef, U256)>,
	basic_eligible: bool,
}

impl<'a> FulfillmentPlanner<'a> {
	pub fn new(config: &'a PlannerConfig, reader: &'a dyn ChainReader) -> Self {
		Self { config, reader }
	}

	/// Plans the fulfillment of one or more orders by `fulfiller`.
	///
	/// Returns the ordered action list: offerer-side approvals first,
	/// then fulfiller-side approvals, then the single exchange action.
	/// Balances and approvals can change between planning and
	/// execution, so the plan is advisory and a reverted execution
	/// should trigger a fresh pass.
	pub async fn plan(
		&self,
		fulfillments: &[OrderFulfillment],
		fulfiller: Address,
		fulfiller_conduit_key: B256,
	) -> Result<FulfillmentPlan> {
		if fulfillments.is_empty() {
			return Err(PlannerError::Other(anyhow!("no orders to plan")));
		}

		let now = self.reader.current_block_timestamp().await?;
		let fulfiller_operator = self.config.operator_for(fulfiller_conduit_key)?;

		let prepared: Vec<PreparedOrder> = fulfillments
			.iter()
			.enumerate()
			.map(|(index, fulfillment)| self.prepare(index, fulfillment, now))
			.collect::<Result<_>>()?;

		// The fulfiller pays every consideration item, funded in part by
		// the offer items flowing to them within the same settlement.
		let fulfiller_required = sum_required(
			prepared
				.iter()
				.flat_map(|order| order.consideration_required.iter().cloned()),
		);
		let incoming = sum_required(
			prepared
				.iter()
				.flat_map(|order| order.offer_required.iter().cloned()),
		);
		let fulfiller_assets: Vec<AssetRef> = fulfiller_required
			.iter()
			.map(|requirement| requirement.asset.clone())
			.collect();

		// One concurrent batch for every read in the pass.
		let offerer_reads = try_join_all(prepared.iter().map(|order| {
			let assets: Vec<AssetRef> = order
				.offer_required
				.iter()
				.map(|(asset, _)| asset.clone())
				.collect();
			async move { snapshot(self.reader, order.offerer, &assets, order.operator).await }
		}));
		let fulfiller_read = snapshot(
			self.reader,
			fulfiller,
			&fulfiller_assets,
			fulfiller_operator,
		);
		let (offerer_snapshots, fulfiller_snapshot) = try_join!(offerer_reads, fulfiller_read)?;

		let mut offerer_approvals = Vec::new();
		for (order, order_snapshot) in prepared.iter().zip(&offerer_snapshots) {
			let required = sum_required(order.offer_required.iter().cloned());
			for action in reconcile(order_snapshot, &required, &[], order.operator)? {
				let duplicate = offerer_approvals.iter().any(|existing: &ApprovalAction| {
					existing.token == action.token && existing.operator == action.operator
				});
				if !duplicate {
					offerer_approvals.push(action);
				}
			}
		}
		let fulfiller_approvals = reconcile(
			&fulfiller_snapshot,
			&fulfiller_required,
			&incoming,
			fulfiller_operator,
		)?;
		debug!(
			offerer_approvals = offerer_approvals.len(),
			fulfiller_approvals = fulfiller_approvals.len(),
			"reconciliation complete"
		);

		// Basic additionally requires the offerer side to be fully
		// approved: the cheap path has no slot for offerer approvals.
		let strategy = if prepared.len() == 1
			&& prepared[0].basic_eligible
			&& offerer_approvals.is_empty()
		{
			Strategy::Basic
		} else {
			Strategy::Standard
		};

		let mut actions = Vec::new();
		if strategy == Strategy::Standard {
			actions.extend(offerer_approvals.into_iter().map(Action::Approval));
		}
		actions.extend(fulfiller_approvals.into_iter().map(Action::Approval));
		actions.push(Action::Exchange(ExchangeAction {
			strategy,
			criteria_resolutions: prepared
				.iter()
				.flat_map(|order| order.resolutions.iter().cloned())
				.collect(),
			fill_fractions: prepared.iter().map(|order| order.fraction).collect(),
			order_hashes: prepared.iter().map(|order| order.hash).collect(),
		}));

		info!(?strategy, actions = actions.len(), "fulfillment planned");
		Ok(FulfillmentPlan { strategy, actions })
	}

	fn prepare(
		&self,
		index: usize,
		fulfillment: &OrderFulfillment,
		now: u64,
	) -> Result<PreparedOrder> {
		let order = &fulfillment.order;
		let resolutions = resolve_criteria(
			index,
			order,
			&fulfillment.offer_criteria,
			&fulfillment.consideration_criteria,
		)?;

		let denominator = order_fill_denominator(order);
		let fraction = match fulfillment.units_to_fill {
			Some(units) => {
				let fraction = fill_fraction(units, denominator)?;
				if !fraction.is_full() && !order.order_type.supports_partial_fills() {
					return Err(PlannerError::InvalidFillFraction { units, denominator });
				}
				fraction
			}
			None => FillFraction {
				numerator: U256::from(1),
				denominator: U256::from(1),
			},
		};

		let window = order.window();
		let buffer = self.config.ascending_amount_buffer;

		let mut offer_required = Vec::with_capacity(order.offer.len());
		for (item_index, item) in order.offer.iter().enumerate() {
			let identifier = resolved_identifier(
				&resolutions,
				Side::Offer,
				item_index,
				item.identifier_or_criteria,
			);
			let amount = present_amount(
				scale_amount(item.start_amount, &fraction),
				scale_amount(item.end_amount, &fraction),
				&window,
				now,
				buffer,
				false,
			)?;
			offer_required.push((
				AssetRef {
					item_type: item.item_type.resolved(),
					token: item.token,
					identifier_or_criteria: identifier,
				},
				amount,
			));
		}

		let mut consideration_required = Vec::with_capacity(order.consideration.len());
		let mut expected_currency: Option<Address> = None;
		for (item_index, item) in order.consideration.iter().enumerate() {
			if item.item_type.is_currency() {
				match expected_currency {
					None => expected_currency = Some(item.token),
					Some(expected) if expected != item.token => {
						return Err(PlannerError::CurrencyMismatch {
							expected,
							found: item.token,
						});
					}
					Some(_) => {}
				}
			}
			let identifier = resolved_identifier(
				&resolutions,
				Side::Consideration,
				item_index,
				item.identifier_or_criteria,
			);
			let amount = present_amount(
				scale_amount(item.start_amount, &fraction),
				scale_amount(item.end_amount, &fraction),
				&window,
				now,
				buffer,
				true,
			)?;
			consideration_required.push((
				AssetRef {
					item_type: item.item_type.resolved(),
					token: item.token,
					identifier_or_criteria: identifier,
				},
				amount,
			));
		}

		let basic_eligible = order.offer.len() == 1
			&& !order.has_criteria_items()
			&& fraction.is_full()
			&& !order.consideration.is_empty()
			&& order.consideration.iter().all(|item| {
				item.item_type.is_currency()
					&& item.item_type == order.consideration[0].item_type
					&& item.token == order.consideration[0].token
			})
			&& order.consideration[0].item_type != order.offer[0].item_type;

		Ok(PreparedOrder {
			hash: order_hash(order),
			offerer: order.offerer,
			operator: self.config.operator_for(order.conduit_key)?,
			fraction,
			resolutions,
			offer_required,
			consideration_required,
			basic_eligible,
		})
	}
}

fn resolved_identifier(
	resolutions: &[CriteriaResolution],
	side: Side,
	item_index: usize,
	declared: U256,
) -> U256 {
	resolutions
		.iter()
		.find(|resolution| resolution.side == side && resolution.item_index == item_index)
		.map(|resolution| resolution.identifier)
		.unwrap_or(declared)
}
