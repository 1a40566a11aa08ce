//! Common primitive types used throughout the planner.

// Re-export commonly used ethereum types
pub use alloy_primitives::{Address, B256, U256};

/// Timestamp (Unix seconds)
pub type Timestamp = u64;
