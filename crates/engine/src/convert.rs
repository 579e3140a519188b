//! Currency conversion on top of the rate resolver.

use crate::{CurrencyCode, MoneyMinor, ResultEngine, rates::ExchangeRateResolver};

/// Converts minor-unit amounts between currencies.
///
/// Identity conversions return the amount untouched; everything else is a
/// rate lookup followed by a half-to-even rounding back to minor units. The
/// converter never mutates its inputs, only the resolver's memo/cache state.
pub struct CurrencyConverter {
    resolver: ExchangeRateResolver,
}

impl CurrencyConverter {
    pub(crate) fn new(resolver: ExchangeRateResolver) -> Self {
        Self { resolver }
    }

    pub async fn convert(
        &mut self,
        amount: MoneyMinor,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> ResultEngine<MoneyMinor> {
        if from == to {
            return Ok(amount);
        }
        let rate = self.resolver.rate(from, to).await?;
        Ok(amount.mul_rate(rate))
    }
}
