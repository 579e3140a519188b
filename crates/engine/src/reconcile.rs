//! Reconciliation: subtract recorded repayments from netted obligations.
//!
//! A repayment only counts against the obligation with the exact same
//! (sender, receiver) direction. A repayment in the reverse direction of the
//! current net is ignored: repaying can reduce a debt, it cannot create a
//! prepaid credit. Overshooting deletes the obligation; the residual is not
//! carried anywhere.

use crate::{
    CurrencyCode, MoneyMinor, ResultEngine, convert::CurrencyConverter, netting::Obligations,
    repayments::Repayment,
};

pub(crate) async fn apply(
    obligations: &mut Obligations,
    repayments: &[Repayment],
    reference: &CurrencyCode,
    converter: &mut CurrencyConverter,
) -> ResultEngine<()> {
    for repayment in repayments {
        let converted = converter
            .convert(repayment.amount, &repayment.currency, reference)
            .await?;
        settle(obligations, &repayment.sender, &repayment.receiver, converted);
    }

    Ok(())
}

/// Applies one converted repayment against the matching obligation.
fn settle(obligations: &mut Obligations, sender: &str, receiver: &str, amount: MoneyMinor) {
    let key = (sender.to_string(), receiver.to_string());
    if let Some(remaining) = obligations.get_mut(&key) {
        *remaining -= amount;
        if !remaining.is_positive() {
            obligations.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obligations(entries: &[(&str, &str, i64)]) -> Obligations {
        entries
            .iter()
            .map(|(debtor, creditor, amount)| {
                (
                    (debtor.to_string(), creditor.to_string()),
                    MoneyMinor::new(*amount),
                )
            })
            .collect()
    }

    #[test]
    fn partial_repayment_reduces_the_obligation() {
        let mut map = obligations(&[("bob", "alice", 5000)]);
        settle(&mut map, "bob", "alice", MoneyMinor::new(2000));
        assert_eq!(
            map[&("bob".to_string(), "alice".to_string())],
            MoneyMinor::new(3000)
        );
    }

    #[test]
    fn exact_repayment_removes_the_obligation() {
        let mut map = obligations(&[("bob", "alice", 5000)]);
        settle(&mut map, "bob", "alice", MoneyMinor::new(5000));
        assert!(map.is_empty());
    }

    #[test]
    fn overshoot_removes_without_carrying_credit() {
        let mut map = obligations(&[("bob", "alice", 5000), ("bob", "carol", 1000)]);
        settle(&mut map, "bob", "alice", MoneyMinor::new(9000));
        assert!(!map.contains_key(&("bob".to_string(), "alice".to_string())));
        // the residual never leaks into unrelated obligations
        assert_eq!(
            map[&("bob".to_string(), "carol".to_string())],
            MoneyMinor::new(1000)
        );
    }

    #[test]
    fn reverse_direction_is_ignored() {
        let mut map = obligations(&[("bob", "alice", 5000)]);
        settle(&mut map, "alice", "bob", MoneyMinor::new(5000));
        assert_eq!(
            map[&("bob".to_string(), "alice".to_string())],
            MoneyMinor::new(5000)
        );
    }
}
