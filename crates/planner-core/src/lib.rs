//! The readiness-and-settlement planning engine for marketplace orders.
//!
//! Given an intended trade this crate determines what must happen
//! on-chain before and during fulfillment: which balances and approvals
//! are missing, the present transferable amount of each time-varying
//! item, which concrete identifiers satisfy criteria-based items (and
//! with what proof), how large a partial fill can legally be, and the
//! canonical hash identifying an order without a network round trip.
//!
//! The engine only reads chain state (through
//! [`planner_types::ChainReader`]) and returns an ordered action list;
//! executing approvals and the exchange belongs to the caller. Because
//! balances can change between planning and execution, the output is
//! advisory and should be re-validated if execution reverts.

pub mod amounts;
pub mod criteria;
pub mod fill;
pub mod hash;
pub mod reconcile;
pub mod strategy;

pub use amounts::present_amount;
pub use criteria::{resolve_criteria, verify_proof, CriteriaTree};
pub use fill::{fill_fraction, maximum_fill_denominator, order_fill_denominator, scale_amount};
pub use hash::order_hash;
pub use reconcile::{diff, reconcile, snapshot, sum_required};
pub use strategy::{FulfillmentPlanner, OrderFulfillment};

#[cfg(test)]
pub(crate) mod testutil;
