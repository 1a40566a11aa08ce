//! Foundation types for the fulfillment planner.
//!
//! This crate defines the data model shared by every planning component:
//! items and orders, criteria proofs, balance snapshots, the actions a
//! planning pass produces, the error taxonomy, and the `ChainReader`
//! boundary behind which all on-chain reads happen.

pub mod actions;
pub mod balances;
pub mod chain;
pub mod common;
pub mod config;
pub mod criteria;
pub mod errors;
pub mod items;
pub mod orders;

pub use actions::*;
pub use balances::*;
pub use chain::*;
pub use common::*;
pub use config::*;
pub use criteria::*;
pub use errors::*;
pub use items::*;
pub use orders::*;
