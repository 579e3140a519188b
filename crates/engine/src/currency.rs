use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-4217 style currency code (`"EUR"`, `"USD"`, ...).
///
/// Sessions are multi-currency by nature (a trip crosses borders), so unlike a
/// closed enum the code set is open: any three ASCII letters are accepted and
/// normalized to uppercase. Whether a code is actually convertible is decided
/// by the exchange-rate provider at computation time.
///
/// All amounts handled by the engine are a number of **minor units** of some
/// `CurrencyCode` (see `MoneyMinor`); every supported code uses 2 fraction
/// digits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Canonical uppercase code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used by the external rate provider.
    #[must_use]
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::InvalidCurrency(format!(
                "not a currency code: {value:?}"
            )));
        }
        Ok(CurrencyCode(trimmed.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CurrencyCode::try_from(value.as_str())
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_normalizes_three_letter_codes() {
        assert_eq!(CurrencyCode::try_from("usd").unwrap().as_str(), "USD");
        assert_eq!(CurrencyCode::try_from(" EUR ").unwrap().as_str(), "EUR");
    }

    #[test]
    fn rejects_non_codes() {
        assert!(CurrencyCode::try_from("").is_err());
        assert!(CurrencyCode::try_from("EURO").is_err());
        assert!(CurrencyCode::try_from("E1R").is_err());
    }

    #[test]
    fn lowercase_form_for_provider() {
        let code = CurrencyCode::try_from("CHF").unwrap();
        assert_eq!(code.to_lowercase(), "chf");
    }
}
