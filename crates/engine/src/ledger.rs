//! Payment ledger: who paid how much versus who used how much.
//!
//! Both figures are kept in the reference currency. The sanitize pass nets
//! them against each other so that every remaining member is *either* a
//! debtor (`used > 0`) *or* a creditor (`paid > 0`), never both. Members that
//! come out even are dropped entirely.

use std::collections::BTreeMap;

use crate::{
    CurrencyCode, EngineError, MoneyMinor, ResultEngine, convert::CurrencyConverter,
    expenditures::Expenditure,
};

/// Gross paid/used figures for one member, before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MemberBalance {
    pub user_id: String,
    pub paid: MoneyMinor,
    pub used: MoneyMinor,
}

/// Normalized ledger: debtors owe their amount, creditors are owed theirs.
/// Both lists are sorted by user id so the netting pass is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NetPositions {
    pub debtors: Vec<(String, MoneyMinor)>,
    pub creditors: Vec<(String, MoneyMinor)>,
}

/// Builds the gross paid/used ledger for every session member.
///
/// Each expenditure's converted total is split evenly across its payers; each
/// distribution share is converted and added to the owner's `used`. Entries
/// referencing users outside the member set are logged and skipped; an
/// expenditure without payers aborts the request before any division.
pub(crate) async fn build(
    session_id: &str,
    members: &BTreeMap<String, CurrencyCode>,
    expenditures: &[Expenditure],
    reference: &CurrencyCode,
    converter: &mut CurrencyConverter,
) -> ResultEngine<Vec<MemberBalance>> {
    let mut balances: BTreeMap<&str, (MoneyMinor, MoneyMinor)> = members
        .keys()
        .map(|user_id| (user_id.as_str(), (MoneyMinor::ZERO, MoneyMinor::ZERO)))
        .collect();

    for expenditure in expenditures {
        if expenditure.payers.is_empty() {
            return Err(EngineError::Inconsistency(format!(
                "expenditure {} in session {session_id} has no payers",
                expenditure.id
            )));
        }

        let std_total = converter
            .convert(expenditure.total, &expenditure.currency, reference)
            .await?;
        let paid_share = std_total.mul_div(1, expenditure.payers.len() as i64);

        for payer in &expenditure.payers {
            match balances.get_mut(payer.as_str()) {
                Some((paid, _)) => *paid += paid_share,
                None => tracing::warn!(
                    "payer {payer} of expenditure {} is not a member of session {session_id}, skipping",
                    expenditure.id
                ),
            }
        }

        for share in &expenditure.shares {
            let fraction = expenditure
                .total
                .mul_div(share.numerator, share.denominator);
            let converted = converter
                .convert(fraction, &expenditure.currency, reference)
                .await?;
            match balances.get_mut(share.user_id.as_str()) {
                Some((_, used)) => *used += converted,
                None => tracing::warn!(
                    "share owner {} of expenditure {} is not a member of session {session_id}, skipping",
                    share.user_id,
                    expenditure.id
                ),
            }
        }
    }

    Ok(balances
        .into_iter()
        .map(|(user_id, (paid, used))| MemberBalance {
            user_id: user_id.to_string(),
            paid,
            used,
        })
        .collect())
}

/// Nets paid against used for every member and splits the survivors into
/// debtors and creditors.
///
/// Input order is preserved (callers pass user-id sorted balances), so the
/// output lists stay sorted by user id.
pub(crate) fn sanitize(balances: Vec<MemberBalance>) -> NetPositions {
    let mut positions = NetPositions::default();

    for balance in balances {
        if balance.used > balance.paid {
            positions
                .debtors
                .push((balance.user_id, balance.used - balance.paid));
        } else if balance.paid > balance.used {
            positions
                .creditors
                .push((balance.user_id, balance.paid - balance.used));
        }
        // paid == used: settled, drop from further consideration
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(user_id: &str, paid: i64, used: i64) -> MemberBalance {
        MemberBalance {
            user_id: user_id.to_string(),
            paid: MoneyMinor::new(paid),
            used: MoneyMinor::new(used),
        }
    }

    #[test]
    fn sanitize_classifies_each_member_once() {
        let positions = sanitize(vec![
            balance("alice", 4500, 3000),
            balance("bob", 4500, 6000),
            balance("carol", 1000, 1000),
        ]);

        assert_eq!(
            positions.creditors,
            vec![("alice".to_string(), MoneyMinor::new(1500))]
        );
        assert_eq!(
            positions.debtors,
            vec![("bob".to_string(), MoneyMinor::new(1500))]
        );
    }

    #[test]
    fn sanitize_drops_settled_members() {
        let positions = sanitize(vec![balance("alice", 0, 0), balance("bob", 500, 500)]);
        assert!(positions.debtors.is_empty());
        assert!(positions.creditors.is_empty());
    }

    #[test]
    fn sanitize_preserves_input_order() {
        let positions = sanitize(vec![
            balance("alice", 0, 100),
            balance("bob", 0, 300),
            balance("carol", 400, 0),
        ]);
        let debtor_ids: Vec<&str> = positions.debtors.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(debtor_ids, vec!["alice", "bob"]);
    }
}
