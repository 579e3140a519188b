//! Usage aggregation: expenditure totals per category plus total budget, at
//! session and requester granularity, in the requester's reference currency.

use crate::{
    Category, CurrencyCode, MoneyMinor, ResultEngine, budgets::Budget, convert::CurrencyConverter,
    expenditures::Expenditure,
};

/// Per-category spending totals plus the budget figure, in minor units of the
/// reference currency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UsageTotals {
    pub meal: MoneyMinor,
    pub lodgment: MoneyMinor,
    pub transport: MoneyMinor,
    pub shopping: MoneyMinor,
    pub activity: MoneyMinor,
    pub etc: MoneyMinor,
    pub unknown: MoneyMinor,
    pub total_budget: MoneyMinor,
}

impl UsageTotals {
    pub fn add(&mut self, category: Category, amount: MoneyMinor) {
        match category {
            Category::Meal => self.meal += amount,
            Category::Lodgment => self.lodgment += amount,
            Category::Transport => self.transport += amount,
            Category::Shopping => self.shopping += amount,
            Category::Activity => self.activity += amount,
            Category::Etc => self.etc += amount,
            Category::Unknown => self.unknown += amount,
        }
    }

    #[cfg(test)]
    pub(crate) fn bucket(&self, category: Category) -> MoneyMinor {
        match category {
            Category::Meal => self.meal,
            Category::Lodgment => self.lodgment,
            Category::Transport => self.transport,
            Category::Shopping => self.shopping,
            Category::Activity => self.activity,
            Category::Etc => self.etc,
            Category::Unknown => self.unknown,
        }
    }
}

/// Session-wide and requester-only usage, produced together in one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Usage {
    pub session: UsageTotals,
    pub mine: UsageTotals,
}

/// Converts and sums budgets and expenditures into category buckets.
///
/// The requester's personal share of an expenditure is the sum of their
/// distribution fractions applied to the total in the original currency,
/// converted afterwards.
pub(crate) async fn aggregate(
    budgets: &[Budget],
    expenditures: &[Expenditure],
    requester: &str,
    reference: &CurrencyCode,
    converter: &mut CurrencyConverter,
) -> ResultEngine<Usage> {
    let mut usage = Usage::default();

    for budget in budgets {
        let amount = converter
            .convert(budget.amount, &budget.currency, reference)
            .await?;
        usage.session.total_budget += amount;
        if budget.user_id.as_deref() == Some(requester) {
            usage.mine.total_budget += amount;
        }
    }

    for expenditure in expenditures {
        let std_total = converter
            .convert(expenditure.total, &expenditure.currency, reference)
            .await?;
        usage.session.add(expenditure.category, std_total);

        let mut my_share = MoneyMinor::ZERO;
        for share in &expenditure.shares {
            if share.user_id != requester {
                continue;
            }
            let fraction = expenditure
                .total
                .mul_div(share.numerator, share.denominator);
            my_share += converter
                .convert(fraction, &expenditure.currency, reference)
                .await?;
        }
        if !my_share.is_zero() {
            usage.mine.add(expenditure.category, my_share);
        }
    }

    Ok(usage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_targets_the_matching_bucket() {
        let mut totals = UsageTotals::default();
        totals.add(Category::Meal, MoneyMinor::new(100));
        totals.add(Category::Meal, MoneyMinor::new(50));
        totals.add(Category::Unknown, MoneyMinor::new(7));

        assert_eq!(totals.bucket(Category::Meal), MoneyMinor::new(150));
        assert_eq!(totals.bucket(Category::Unknown), MoneyMinor::new(7));
        assert_eq!(totals.bucket(Category::Transport), MoneyMinor::ZERO);
    }
}
