//! Debt netting: reduce per-member imbalances to a minimal set of pairwise
//! debtor → creditor obligations.
//!
//! The pass is a greedy two-pointer match over the debtor and creditor lists.
//! Which specific pairings come out depends on the list order (the net
//! balances do not), so callers hand in lists sorted by user id and the
//! result is reproducible.

use std::collections::{BTreeMap, HashSet};

use crate::{EngineError, MoneyMinor, ResultEngine, ledger::NetPositions};

/// Obligations accumulated per (debtor, creditor) pair.
///
/// The greedy pass itself never revisits a pair, but the accumulator sums on
/// recurrence so future passes are free to.
pub(crate) type Obligations = BTreeMap<(String, String), MoneyMinor>;

/// Runs the greedy netting pass.
///
/// Aborts on bookkeeping faults: a member present on both sides of the
/// ledger, or a debt from a user to themself.
pub(crate) fn net(positions: NetPositions) -> ResultEngine<Obligations> {
    let debtor_ids: HashSet<&str> = positions.debtors.iter().map(|(id, _)| id.as_str()).collect();
    if let Some((both, _)) = positions
        .creditors
        .iter()
        .find(|(id, _)| debtor_ids.contains(id.as_str()))
    {
        return Err(EngineError::Inconsistency(format!(
            "member {both} is both debtor and creditor after normalization"
        )));
    }

    let mut debtors = positions.debtors;
    let mut creditors = positions.creditors;
    let mut obligations = Obligations::new();

    let mut i = 0;
    let mut j = 0;
    while i < debtors.len() && j < creditors.len() {
        let owed = debtors[i].1;
        let due = creditors[j].1;

        if owed > due {
            record(&mut obligations, &debtors[i].0, &creditors[j].0, due)?;
            debtors[i].1 = owed - due;
            j += 1;
        } else if owed < due {
            record(&mut obligations, &debtors[i].0, &creditors[j].0, owed)?;
            creditors[j].1 = due - owed;
            i += 1;
        } else {
            record(&mut obligations, &debtors[i].0, &creditors[j].0, owed)?;
            i += 1;
            j += 1;
        }
    }

    Ok(obligations)
}

fn record(
    obligations: &mut Obligations,
    debtor: &str,
    creditor: &str,
    amount: MoneyMinor,
) -> ResultEngine<()> {
    if debtor == creditor {
        return Err(EngineError::Inconsistency(format!(
            "netted a debt from {debtor} to themself"
        )));
    }
    *obligations
        .entry((debtor.to_string(), creditor.to_string()))
        .or_insert(MoneyMinor::ZERO) += amount;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(debtors: &[(&str, i64)], creditors: &[(&str, i64)]) -> NetPositions {
        NetPositions {
            debtors: debtors
                .iter()
                .map(|(id, v)| (id.to_string(), MoneyMinor::new(*v)))
                .collect(),
            creditors: creditors
                .iter()
                .map(|(id, v)| (id.to_string(), MoneyMinor::new(*v)))
                .collect(),
        }
    }

    fn entry(obligations: &Obligations, debtor: &str, creditor: &str) -> i64 {
        obligations
            .get(&(debtor.to_string(), creditor.to_string()))
            .map(|amount| amount.minor())
            .unwrap_or(0)
    }

    #[test]
    fn equal_amounts_pair_off_exactly() {
        let obligations = net(positions(&[("bob", 1500)], &[("alice", 1500)])).unwrap();
        assert_eq!(obligations.len(), 1);
        assert_eq!(entry(&obligations, "bob", "alice"), 1500);
    }

    #[test]
    fn larger_debt_spills_to_next_creditor() {
        let obligations = net(positions(
            &[("carol", 5000)],
            &[("alice", 2000), ("bob", 3000)],
        ))
        .unwrap();
        assert_eq!(entry(&obligations, "carol", "alice"), 2000);
        assert_eq!(entry(&obligations, "carol", "bob"), 3000);
    }

    #[test]
    fn larger_credit_absorbs_several_debtors() {
        let obligations = net(positions(
            &[("bob", 1000), ("carol", 2500)],
            &[("alice", 3500)],
        ))
        .unwrap();
        assert_eq!(entry(&obligations, "bob", "alice"), 1000);
        assert_eq!(entry(&obligations, "carol", "alice"), 2500);
    }

    #[test]
    fn obligations_conserve_the_total() {
        let obligations = net(positions(
            &[("bob", 1200), ("carol", 800), ("dave", 1000)],
            &[("alice", 1700), ("erin", 1300)],
        ))
        .unwrap();
        let total: i64 = obligations.values().map(|amount| amount.minor()).sum();
        assert_eq!(total, 3000);
        assert!(obligations.values().all(|amount| amount.is_positive()));
    }

    #[test]
    fn member_on_both_sides_is_fatal() {
        let err = net(positions(&[("alice", 100)], &[("alice", 100)])).unwrap_err();
        assert!(matches!(err, EngineError::Inconsistency(_)));
    }

    #[test]
    fn deterministic_for_sorted_input() {
        let first = net(positions(
            &[("bob", 1000), ("carol", 1000)],
            &[("alice", 1000), ("dave", 1000)],
        ))
        .unwrap();
        let second = net(positions(
            &[("bob", 1000), ("carol", 1000)],
            &[("alice", 1000), ("dave", 1000)],
        ))
        .unwrap();
        assert_eq!(first, second);
        assert_eq!(entry(&first, "bob", "alice"), 1000);
        assert_eq!(entry(&first, "carol", "dave"), 1000);
    }
}
