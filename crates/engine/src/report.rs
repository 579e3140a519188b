//! Settlement report assembly.
//!
//! Keeps the obligations touching the requester and re-expresses the ones the
//! requester owes in the creditor's default currency (the creditor may not
//! use the reference currency). Amounts the requester is owed stay in the
//! reference currency, which is the requester's own.

use std::collections::BTreeMap;

use crate::{
    CurrencyCode, EngineError, MoneyMinor, ResultEngine, convert::CurrencyConverter,
    netting::Obligations, usage::UsageTotals,
};

/// One line of the settlement list.
///
/// `owed == true` means the requester owes `counterpart`; the amount is in
/// the counterpart's default currency. `owed == false` means `counterpart`
/// owes the requester; the amount is in the reference currency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementEntry {
    pub owed: bool,
    pub counterpart: String,
    pub amount: MoneyMinor,
    pub currency: CurrencyCode,
}

/// The full answer to "my settlement info": usage blocks plus the
/// requester's obligations in both directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub session_usage: UsageTotals,
    pub my_usage: UsageTotals,
    pub entries: Vec<SettlementEntry>,
}

pub(crate) async fn build(
    obligations: &Obligations,
    requester: &str,
    reference: &CurrencyCode,
    members: &BTreeMap<String, CurrencyCode>,
    converter: &mut CurrencyConverter,
) -> ResultEngine<Vec<SettlementEntry>> {
    let mut entries = Vec::new();

    for ((debtor, creditor), amount) in obligations {
        if debtor == requester {
            let currency = members.get(creditor).ok_or_else(|| {
                EngineError::Inconsistency(format!(
                    "obligation creditor {creditor} is not a session member"
                ))
            })?;
            let converted = converter.convert(*amount, reference, currency).await?;
            entries.push(SettlementEntry {
                owed: true,
                counterpart: creditor.clone(),
                amount: converted,
                currency: currency.clone(),
            });
        } else if creditor == requester {
            entries.push(SettlementEntry {
                owed: false,
                counterpart: debtor.clone(),
                amount: *amount,
                currency: reference.clone(),
            });
        }
    }

    Ok(entries)
}
