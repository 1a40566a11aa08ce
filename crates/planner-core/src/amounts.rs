//! Time-based amount interpolation.
//!
//! Mirrors the contract's fixed-point arithmetic exactly: any divergence
//! here produces a transaction that reverts, or an incorrectly signed
//! commitment. Offer-side amounts truncate and consideration-side amounts
//! round up, so the protocol never under-collects or over-pays by a
//! fractional unit.

use planner_types::{OrderWindow, PlannerError, Result, Timestamp, U256};

/// The transferable amount of an item at `now`.
///
/// Flat items (`start_amount == end_amount`) short-circuit to their
/// amount for any window. Otherwise the amount moves linearly from
/// `start_amount` at `window.start_time` to `end_amount` at
/// `window.end_time`, clamped at both ends.
///
/// Ascending amounts advance `now` by `buffer_seconds` before clamping,
/// modeling a grace period for slower transaction inclusion; descending
/// and flat amounts do not.
///
/// `round_up` selects consideration-side rounding (adds `duration - 1`
/// before dividing); offer-side callers pass `false` and truncate.
///
/// A non-flat item over a window with `end_time <= start_time` is
/// rejected as [`PlannerError::InvalidOrderWindow`] rather than dividing
/// by zero.
pub fn present_amount(
	start_amount: U256,
	end_amount: U256,
	window: &OrderWindow,
	now: Timestamp,
	buffer_seconds: u64,
	round_up: bool,
) -> Result<U256> {
	if start_amount == end_amount {
		return Ok(start_amount);
	}

	let OrderWindow {
		start_time,
		end_time,
	} = *window;
	if end_time <= start_time {
		return Err(PlannerError::InvalidOrderWindow {
			start_time,
			end_time,
		});
	}

	let ascending = end_amount > start_amount;
	let now = if ascending {
		now.saturating_add(buffer_seconds)
	} else {
		now
	};
	if now < start_time {
		return Ok(start_amount);
	}

	let duration = end_time - start_time;
	let elapsed = now.min(end_time) - start_time;
	let remaining = duration - elapsed;

	let duration = U256::from(duration);
	let mut total = start_amount * U256::from(remaining) + end_amount * U256::from(elapsed);
	if round_up {
		total += duration - U256::from(1);
	}
	Ok(total / duration)
}
