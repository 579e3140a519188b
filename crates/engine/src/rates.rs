//! Exchange-rate cache and resolution.
//!
//! Rates are resolved in three layers:
//!
//! 1. a per-request memo, so one settlement never asks twice for a pair;
//! 2. the persisted `exchange_rates` table, served while the entry is less
//!    than 24 hours old;
//! 3. the external [`RateSource`], consulted on miss or staleness; a fresh
//!    value is upserted back (last-writer-wins, concurrent requests may race
//!    on the same pair and that is fine).
//!
//! If the source fails and a stale entry exists, the stale value is served
//! with a warning. A missing remote must never crash a computation that has
//! *any* cached value. Stored rates are directional: `(EUR, USD)` and
//! `(USD, EUR)` are independent entries, never inverted.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, entity::prelude::*, sea_query::OnConflict};

use crate::{CurrencyCode, EngineError, ResultEngine};

const STALE_AFTER_HOURS: i64 = 24;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exchange_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub from_currency: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub to_currency: String,
    pub rate: f64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// External provider of currency conversion rates.
///
/// The engine ships [`HttpRateSource`]; tests plug in a static table.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<f64, EngineError>;
}

/// Rate source backed by a currency-api style endpoint.
///
/// The provider serves one JSON document per base currency at
/// `{base_url}/{from}.json`, keyed by lowercase codes:
///
/// ```json
/// { "date": "2026-08-29", "eur": { "usd": 1.0812, "chf": 0.9341 } }
/// ```
///
/// Requests carry a bounded timeout; a timeout is treated exactly like any
/// other provider failure.
#[derive(Clone, Debug)]
pub struct HttpRateSource {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRateSource {
    pub const DEFAULT_BASE_URL: &'static str =
        "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: &str, timeout: Duration) -> ResultEngine<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                EngineError::ExternalService(format!("failed to build rate client: {err}"))
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<f64, EngineError> {
        let from_code = from.to_lowercase();
        let to_code = to.to_lowercase();
        let url = format!("{}/{}.json", self.base_url, from_code);

        let response = self.http.get(&url).send().await.map_err(|err| {
            EngineError::ExternalService(format!("rate provider request failed: {err}"))
        })?;
        if !response.status().is_success() {
            return Err(EngineError::ExternalService(format!(
                "rate provider returned {} for {from}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|err| {
            EngineError::ExternalService(format!("rate provider sent malformed body: {err}"))
        })?;
        body.get(&from_code)
            .and_then(|rates| rates.get(&to_code))
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| {
                EngineError::ExternalService(format!("rate provider has no {from}->{to} rate"))
            })
    }
}

/// Resolves conversion rates through memo, cache and external source.
///
/// One resolver lives for one settlement request; the memo never outlives it.
pub struct ExchangeRateResolver {
    database: DatabaseConnection,
    source: Arc<dyn RateSource>,
    memo: HashMap<(CurrencyCode, CurrencyCode), f64>,
}

impl ExchangeRateResolver {
    pub(crate) fn new(database: DatabaseConnection, source: Arc<dyn RateSource>) -> Self {
        Self {
            database,
            source,
            memo: HashMap::new(),
        }
    }

    /// Returns the conversion rate from `from` to `to`.
    ///
    /// Identity pairs short-circuit to 1 without touching cache or provider.
    pub async fn rate(&mut self, from: &CurrencyCode, to: &CurrencyCode) -> ResultEngine<f64> {
        if from == to {
            return Ok(1.0);
        }

        let key = (from.clone(), to.clone());
        if let Some(rate) = self.memo.get(&key) {
            return Ok(*rate);
        }

        let cached = Entity::find_by_id((from.as_str().to_string(), to.as_str().to_string()))
            .one(&self.database)
            .await?;

        if let Some(entry) = &cached {
            let age = Utc::now() - entry.updated_at;
            if age <= chrono::Duration::hours(STALE_AFTER_HOURS) {
                self.memo.insert(key, entry.rate);
                return Ok(entry.rate);
            }
        }

        let rate = match self.source.fetch_rate(from, to).await {
            Ok(rate) => {
                self.upsert(from, to, rate).await?;
                rate
            }
            Err(err) => match cached {
                // Soft degradation: a stale rate beats no report at all.
                Some(entry) => {
                    tracing::warn!(
                        "rate provider failed for {from}->{to}, serving stale cache: {err}"
                    );
                    entry.rate
                }
                None => return Err(err),
            },
        };

        self.memo.insert(key, rate);
        Ok(rate)
    }

    async fn upsert(&self, from: &CurrencyCode, to: &CurrencyCode, rate: f64) -> ResultEngine<()> {
        let model = ActiveModel {
            from_currency: ActiveValue::Set(from.as_str().to_string()),
            to_currency: ActiveValue::Set(to.as_str().to_string()),
            rate: ActiveValue::Set(rate),
            updated_at: ActiveValue::Set(Utc::now()),
        };
        Entity::insert(model)
            .on_conflict(
                OnConflict::columns([Column::FromCurrency, Column::ToCurrency])
                    .update_columns([Column::Rate, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
