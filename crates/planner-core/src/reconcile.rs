//! Balance and approval reconciliation.
//!
//! A snapshot captures one owner's balances and operator approvals for a
//! set of assets in a single concurrent read batch; latency scales with
//! the slowest read, not the sum. The snapshot is then diffed against the
//! summed per-asset requirements. A balance shortfall is fatal (approving
//! an unowned asset is pointless); approval shortfalls become approval
//! actions, one per distinct `(token, operator)` pair.

use futures::future::try_join_all;
use futures::try_join;
use planner_types::{
	Address, ApprovalAction, AssetRef, ChainReader, InsufficiencyReport, PlannerError,
	RequiredBalance, Result, Shortfall, SnapshotEntry, U256,
};
use tracing::debug;

/// Reads balance and approved amount for every asset concurrently,
/// failing fast on the first reader error.
pub async fn snapshot(
	reader: &dyn ChainReader,
	owner: Address,
	assets: &[AssetRef],
	operator: Address,
) -> Result<Vec<SnapshotEntry>> {
	debug!(%owner, %operator, assets = assets.len(), "snapshotting balances and approvals");
	let reads = assets.iter().map(|asset| async move {
		let (balance, approved_amount) = if asset.item_type.needs_approval() {
			try_join!(
				reader.balance_of(owner, asset),
				reader.approved_amount(owner, operator, asset),
			)?
		} else {
			// Native transfers need no approval.
			(reader.balance_of(owner, asset).await?, U256::MAX)
		};
		Ok::<_, PlannerError>(SnapshotEntry {
			asset: asset.clone(),
			balance,
			approved_amount,
		})
	});
	try_join_all(reads).await
}

/// Sums requirements per `(token, identifier)`, preserving first-seen
/// item order so downstream approval actions come out in item order.
pub fn sum_required<I>(items: I) -> Vec<RequiredBalance>
where
	I: IntoIterator<Item = (AssetRef, U256)>,
{
	let mut required: Vec<RequiredBalance> = Vec::new();
	for (asset, amount) in items {
		match required
			.iter_mut()
			.find(|entry| entry.asset.same_asset(&asset))
		{
			Some(entry) => entry.amount += amount,
			None => required.push(RequiredBalance { asset, amount }),
		}
	}
	required
}

/// The pure shortfall computation: requirements with no snapshot entry
/// count as zero balance and zero approval.
pub fn diff(snapshot: &[SnapshotEntry], required: &[RequiredBalance]) -> InsufficiencyReport {
	let mut report = InsufficiencyReport::default();
	for requirement in required {
		let entry = snapshot
			.iter()
			.find(|entry| entry.asset.same_asset(&requirement.asset));
		let balance = entry.map(|e| e.balance).unwrap_or(U256::ZERO);
		let approved = entry.map(|e| e.approved_amount).unwrap_or(U256::ZERO);

		if balance < requirement.amount {
			report.balance.push(Shortfall {
				asset: requirement.asset.clone(),
				amount_needed: requirement.amount,
				amount_have: balance,
			});
		}
		if requirement.asset.item_type.needs_approval() && approved < requirement.amount {
			report.approvals.push(Shortfall {
				asset: requirement.asset.clone(),
				amount_needed: requirement.amount,
				amount_have: approved,
			});
		}
	}
	report
}

/// Credits amounts the owner will receive earlier in the same settlement,
/// before any of their own payments are pulled. Funds received mid-trade
/// count toward what the receiver is able to pay forward.
pub fn apply_incoming(snapshot: &mut Vec<SnapshotEntry>, incoming: &[RequiredBalance]) {
	for transfer in incoming {
		match snapshot
			.iter_mut()
			.find(|entry| entry.asset.same_asset(&transfer.asset))
		{
			Some(entry) => entry.balance += transfer.amount,
			None => snapshot.push(SnapshotEntry {
				asset: transfer.asset.clone(),
				balance: transfer.amount,
				approved_amount: U256::ZERO,
			}),
		}
	}
}

/// Diffs a snapshot (with incoming transfers credited) against the
/// requirements and turns approval shortfalls into deduplicated actions.
///
/// Any balance shortfall raises [`PlannerError::InsufficientBalance`]
/// before a single approval action is produced.
pub fn reconcile(
	snapshot: &[SnapshotEntry],
	required: &[RequiredBalance],
	incoming: &[RequiredBalance],
	operator: Address,
) -> Result<Vec<ApprovalAction>> {
	let mut working = snapshot.to_vec();
	apply_incoming(&mut working, incoming);

	let report = diff(&working, required);
	if let Some(short) = report.balance.first() {
		return Err(PlannerError::InsufficientBalance {
			token: short.asset.token,
			identifier_or_criteria: short.asset.identifier_or_criteria,
			needed: short.amount_needed,
			have: short.amount_have,
		});
	}

	let mut actions: Vec<ApprovalAction> = Vec::new();
	for short in &report.approvals {
		if actions.iter().any(|action| action.token == short.asset.token) {
			// One approval covers every item moved through the same
			// (token, operator) pair.
			continue;
		}
		actions.push(ApprovalAction {
			token: short.asset.token,
			identifier_or_criteria: short.asset.identifier_or_criteria,
			item_type: short.asset.item_type,
			operator,
		});
	}
	Ok(actions)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testutil::MockChainReader;
	use planner_types::ItemType;

	fn erc20(token: [u8; 20]) -> AssetRef {
		AssetRef {
			item_type: ItemType::Erc20,
			token: Address::from(token),
			identifier_or_criteria: U256::ZERO,
		}
	}

	fn erc721(token: [u8; 20], id: u64) -> AssetRef {
		AssetRef {
			item_type: ItemType::Erc721,
			token: Address::from(token),
			identifier_or_criteria: U256::from(id),
		}
	}

	fn require(asset: AssetRef, amount: u64) -> RequiredBalance {
		RequiredBalance {
			asset,
			amount: U256::from(amount),
		}
	}

	fn entry(asset: AssetRef, balance: u64, approved: u64) -> SnapshotEntry {
		SnapshotEntry {
			asset,
			balance: U256::from(balance),
			approved_amount: U256::from(approved),
		}
	}

	#[tokio::test]
	async fn test_snapshot_reads_both_dimensions() {
		let owner = Address::from([1u8; 20]);
		let operator = Address::from([2u8; 20]);
		let asset = erc20([3u8; 20]);

		let reader = MockChainReader::new(0)
			.with_balance(owner, &asset, U256::from(500))
			.with_approval(owner, operator, &asset, U256::from(100));

		let entries = snapshot(&reader, owner, &[asset.clone()], operator)
			.await
			.unwrap();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].balance, U256::from(500));
		assert_eq!(entries[0].approved_amount, U256::from(100));
	}

	#[tokio::test]
	async fn test_snapshot_native_needs_no_approval_read() {
		let owner = Address::from([1u8; 20]);
		let reader = MockChainReader::new(0).with_balance(
			owner,
			&AssetRef::native(),
			U256::from(7),
		);

		let entries = snapshot(&reader, owner, &[AssetRef::native()], Address::ZERO)
			.await
			.unwrap();
		assert_eq!(entries[0].approved_amount, U256::MAX);
	}

	#[test]
	fn test_sum_required_aggregates_by_asset() {
		let asset = erc20([1u8; 20]);
		let other = erc20([2u8; 20]);
		let required = sum_required([
			(asset.clone(), U256::from(10)),
			(other.clone(), U256::from(5)),
			(asset.clone(), U256::from(15)),
		]);
		assert_eq!(required.len(), 2);
		assert_eq!(required[0].amount, U256::from(25));
		assert_eq!(required[1].amount, U256::from(5));
	}

	#[test]
	fn test_diff_reports_both_kinds_of_shortfall() {
		let asset = erc20([1u8; 20]);
		let report = diff(
			&[entry(asset.clone(), 5, 3)],
			&[require(asset.clone(), 10)],
		);
		assert_eq!(report.balance.len(), 1);
		assert_eq!(report.balance[0].amount_have, U256::from(5));
		assert_eq!(report.approvals.len(), 1);
		assert_eq!(report.approvals[0].amount_have, U256::from(3));
	}

	#[test]
	fn test_diff_empty_when_covered() {
		let asset = erc20([1u8; 20]);
		let report = diff(
			&[entry(asset.clone(), 10, 10)],
			&[require(asset.clone(), 10)],
		);
		assert!(report.is_empty());
	}

	#[test]
	fn test_missing_snapshot_entry_counts_as_zero() {
		let report = diff(&[], &[require(erc20([1u8; 20]), 1)]);
		assert_eq!(report.balance.len(), 1);
		assert_eq!(report.balance[0].amount_have, U256::ZERO);
	}

	#[test]
	fn test_balance_shortfall_is_fatal() {
		let asset = erc721([1u8; 20], 7);
		let err = reconcile(
			&[entry(asset.clone(), 0, 0)],
			&[require(asset.clone(), 1)],
			&[],
			Address::ZERO,
		)
		.unwrap_err();
		assert!(matches!(err, PlannerError::InsufficientBalance { .. }));
	}

	#[test]
	fn test_approval_shortfalls_dedup_per_token() {
		let operator = Address::from([9u8; 20]);
		let a = erc721([1u8; 20], 1);
		let b = erc721([1u8; 20], 2);
		let actions = reconcile(
			&[entry(a.clone(), 1, 0), entry(b.clone(), 1, 0)],
			&[require(a.clone(), 1), require(b.clone(), 1)],
			&[],
			operator,
		)
		.unwrap();
		assert_eq!(actions.len(), 1);
		assert_eq!(actions[0].token, a.token);
		assert_eq!(actions[0].operator, operator);
	}

	#[test]
	fn test_native_never_needs_approval() {
		let native = AssetRef::native();
		let actions = reconcile(
			&[entry(native.clone(), 100, 0)],
			&[require(native.clone(), 50)],
			&[],
			Address::ZERO,
		)
		.unwrap();
		assert!(actions.is_empty());
	}

	#[test]
	fn test_incoming_transfers_fund_payments() {
		// The fulfiller holds nothing, but receives 100 of the token as
		// an offer item before paying 80 of it forward.
		let asset = erc20([1u8; 20]);
		let actions = reconcile(
			&[entry(asset.clone(), 0, 100)],
			&[require(asset.clone(), 80)],
			&[require(asset.clone(), 100)],
			Address::ZERO,
		)
		.unwrap();
		assert!(actions.is_empty());

		// Without the incoming credit the same inputs are fatal.
		let err = reconcile(
			&[entry(asset.clone(), 0, 100)],
			&[require(asset.clone(), 80)],
			&[],
			Address::ZERO,
		)
		.unwrap_err();
		assert!(matches!(err, PlannerError::InsufficientBalance { .. }));
	}
}
