//! Partial-fill sizing.
//!
//! The largest usable fill denominator is the GCD across every start and
//! end amount of every item: any unit count up to that denominator scales
//! each amount to a whole number, so the contract's fraction math stays
//! exact.

use planner_types::{FillFraction, OrderComponents, PlannerError, Result, U256};

/// Iterative Euclidean GCD; `gcd(0, x) = x`.
pub fn gcd(mut a: U256, mut b: U256) -> U256 {
	while b != U256::ZERO {
		let remainder = a % b;
		a = b;
		b = remainder;
	}
	a
}

/// The greatest common divisor of every amount in the set,
/// short-circuiting at 1. An empty or all-zero set yields 1: no
/// meaningful partial-fill granularity exists below full/none.
pub fn maximum_fill_denominator<I>(amounts: I) -> U256
where
	I: IntoIterator<Item = U256>,
{
	let mut acc = U256::ZERO;
	for amount in amounts {
		acc = gcd(acc, amount);
		if acc == U256::from(1) {
			return acc;
		}
	}
	if acc == U256::ZERO {
		U256::from(1)
	} else {
		acc
	}
}

/// [`maximum_fill_denominator`] over every offer and consideration
/// amount of an order.
pub fn order_fill_denominator(order: &OrderComponents) -> U256 {
	let offer = order
		.offer
		.iter()
		.flat_map(|item| [item.start_amount, item.end_amount]);
	let consideration = order
		.consideration
		.iter()
		.flat_map(|item| [item.start_amount, item.end_amount]);
	maximum_fill_denominator(offer.chain(consideration))
}

/// A validated fill fraction in lowest terms.
///
/// `units` must lie in `1..=denominator`; anything else is
/// [`PlannerError::InvalidFillFraction`].
pub fn fill_fraction(units: U256, denominator: U256) -> Result<FillFraction> {
	if units == U256::ZERO || units > denominator {
		return Err(PlannerError::InvalidFillFraction { units, denominator });
	}
	let divisor = gcd(units, denominator);
	Ok(FillFraction {
		numerator: units / divisor,
		denominator: denominator / divisor,
	})
}

/// Scales an item amount by a fill fraction. Exact by construction when
/// the fraction came from [`order_fill_denominator`].
pub fn scale_amount(amount: U256, fraction: &FillFraction) -> U256 {
	amount * fraction.numerator / fraction.denominator
}

#[cfg(test)]
mod tests {
	use super::*;
	use planner_types::{Address, ConsiderationItem, ItemType, OfferItem, OrderType, B256};

	#[test]
	fn test_gcd_identities() {
		let x = U256::from(42);
		assert_eq!(gcd(x, x), x);
		assert_eq!(gcd(U256::ZERO, x), x);
		assert_eq!(gcd(x, U256::ZERO), x);
		assert_eq!(gcd(U256::from(12), U256::from(18)), U256::from(6));
	}

	#[test]
	fn test_coprime_set_yields_one() {
		let amounts = [U256::from(9), U256::from(10), U256::from(21)];
		assert_eq!(maximum_fill_denominator(amounts), U256::from(1));
	}

	#[test]
	fn test_denominator_divides_every_amount() {
		let amounts = [
			U256::from(600),
			U256::from(900),
			U256::from(1500),
			U256::ZERO,
		];
		let denominator = maximum_fill_denominator(amounts);
		assert_eq!(denominator, U256::from(300));
		for amount in amounts {
			assert_eq!(amount % denominator, U256::ZERO);
		}
	}

	#[test]
	fn test_degenerate_sets() {
		assert_eq!(maximum_fill_denominator(Vec::<U256>::new()), U256::from(1));
		assert_eq!(
			maximum_fill_denominator([U256::ZERO, U256::ZERO]),
			U256::from(1)
		);
	}

	#[test]
	fn test_order_fill_denominator_spans_both_sides() {
		let order = OrderComponents {
			offerer: Address::ZERO,
			zone: Address::ZERO,
			offer: vec![OfferItem {
				item_type: ItemType::Erc1155,
				token: Address::from([1u8; 20]),
				identifier_or_criteria: U256::from(1),
				start_amount: U256::from(10),
				end_amount: U256::from(10),
			}],
			consideration: vec![ConsiderationItem {
				item_type: ItemType::Erc20,
				token: Address::from([2u8; 20]),
				identifier_or_criteria: U256::ZERO,
				start_amount: U256::from(100),
				end_amount: U256::from(100),
				recipient: Address::from([3u8; 20]),
			}],
			order_type: OrderType::PartialOpen,
			start_time: 0,
			end_time: 100,
			zone_hash: B256::ZERO,
			salt: U256::ZERO,
			conduit_key: B256::ZERO,
			counter: U256::ZERO,
		};
		assert_eq!(order_fill_denominator(&order), U256::from(10));
	}

	#[test]
	fn test_fill_fraction_validation() {
		assert!(matches!(
			fill_fraction(U256::ZERO, U256::from(10)),
			Err(PlannerError::InvalidFillFraction { .. })
		));
		assert!(matches!(
			fill_fraction(U256::from(11), U256::from(10)),
			Err(PlannerError::InvalidFillFraction { .. })
		));

		let half = fill_fraction(U256::from(5), U256::from(10)).unwrap();
		assert_eq!(half.numerator, U256::from(1));
		assert_eq!(half.denominator, U256::from(2));
		assert!(fill_fraction(U256::from(10), U256::from(10))
			.unwrap()
			.is_full());
	}

	#[test]
	fn test_scale_amount() {
		let half = fill_fraction(U256::from(1), U256::from(2)).unwrap();
		assert_eq!(scale_amount(U256::from(10), &half), U256::from(5));
	}
}
