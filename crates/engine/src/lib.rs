//! Settlement engine for shared trips.
//!
//! A *session* is a trip shared by a group of users. Members log expenditures
//! in whatever currency they spent, and the engine answers, for a requesting
//! member, who owes whom and how much after already-made repayments:
//!
//! 1. aggregate budgets and expenditures into per-category usage totals;
//! 2. build the payment ledger (what each member *paid* versus *used*);
//! 3. net the imbalances into pairwise debtor → creditor obligations;
//! 4. subtract recorded repayments;
//! 5. report the obligations touching the requester, re-expressed in the
//!    creditor's currency where the requester owes.
//!
//! Everything is computed in the requester's default ("reference") currency
//! using integer minor units; exchange rates come from a persisted 24h cache
//! backed by an external provider. The computation is all-or-nothing: any
//! error aborts the request and no partial report is produced. Nothing is
//! cached across requests except exchange rates.

use std::{collections::BTreeMap, fmt, sync::Arc};

use sea_orm::{QueryFilter, QueryOrder, prelude::*};

pub use category::Category;
pub use currency::CurrencyCode;
pub use error::EngineError;
pub use money::MoneyMinor;
pub use rates::{HttpRateSource, RateSource};
pub use report::{Settlement, SettlementEntry};
pub use usage::UsageTotals;

use budgets::Budget;
use convert::CurrencyConverter;
use expenditures::Expenditure;
use rates::ExchangeRateResolver;
use repayments::Repayment;
use shares::Share;

mod budgets;
mod category;
mod convert;
mod currency;
mod error;
mod expenditures;
mod ledger;
mod memberships;
mod money;
mod netting;
mod payers;
mod rates;
mod reconcile;
mod repayments;
mod report;
mod sessions;
mod shares;
mod usage;
mod users;

type ResultEngine<T> = Result<T, EngineError>;

/// The settlement engine: a database handle plus an exchange-rate source.
///
/// Methods take `&self`; a request is one sequential, read-mostly
/// computation, and the only write (the rate-cache upsert) is idempotent, so
/// the engine can be shared behind an `Arc` without locking.
pub struct Engine {
    database: DatabaseConnection,
    rates: Arc<dyn RateSource>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn converter(&self) -> CurrencyConverter {
        CurrencyConverter::new(ExchangeRateResolver::new(
            self.database.clone(),
            Arc::clone(&self.rates),
        ))
    }

    /// Computes the settlement report for `user_id` in `session_id`.
    ///
    /// Fails with [`EngineError::KeyNotFound`] when the session does not
    /// exist and [`EngineError::Forbidden`] when the requester is not a
    /// member.
    pub async fn my_settlement(&self, session_id: &str, user_id: &str) -> ResultEngine<Settlement> {
        self.require_session(session_id).await?;

        let members = self.load_members(session_id).await?;
        let reference = members
            .get(user_id)
            .cloned()
            .ok_or_else(|| EngineError::Forbidden("not a session member".to_string()))?;

        let budgets = self.load_budgets(session_id).await?;
        let expenditures = self.load_expenditures(session_id).await?;
        let repayments = self.load_repayments(session_id).await?;

        let mut converter = self.converter();

        let usage = usage::aggregate(
            &budgets,
            &expenditures,
            user_id,
            &reference,
            &mut converter,
        )
        .await?;
        let balances = ledger::build(
            session_id,
            &members,
            &expenditures,
            &reference,
            &mut converter,
        )
        .await?;
        let mut obligations = netting::net(ledger::sanitize(balances))?;
        reconcile::apply(&mut obligations, &repayments, &reference, &mut converter).await?;
        let entries =
            report::build(&obligations, user_id, &reference, &members, &mut converter).await?;

        Ok(Settlement {
            session_usage: usage.session,
            my_usage: usage.mine,
            entries,
        })
    }

    async fn require_session(&self, session_id: &str) -> ResultEngine<()> {
        sessions::Entity::find_by_id(session_id.to_string())
            .one(&self.database)
            .await?
            .map(|_| ())
            .ok_or_else(|| EngineError::KeyNotFound("session not exists".to_string()))
    }

    /// Loads the member set with each member's default currency, sorted by
    /// user id.
    async fn load_members(&self, session_id: &str) -> ResultEngine<BTreeMap<String, CurrencyCode>> {
        let rows = memberships::Entity::find()
            .filter(memberships::Column::SessionId.eq(session_id))
            .all(&self.database)
            .await?;
        let usernames: Vec<String> = rows.into_iter().map(|row| row.user_id).collect();

        let user_rows = users::Entity::find()
            .filter(users::Column::Username.is_in(usernames.clone()))
            .all(&self.database)
            .await?;

        let mut members = BTreeMap::new();
        for user in user_rows {
            let currency = CurrencyCode::try_from(user.currency.as_str())?;
            members.insert(user.username, currency);
        }

        for username in usernames {
            if !members.contains_key(&username) {
                return Err(EngineError::KeyNotFound("user not exists".to_string()));
            }
        }
        Ok(members)
    }

    async fn load_budgets(&self, session_id: &str) -> ResultEngine<Vec<Budget>> {
        budgets::Entity::find()
            .filter(budgets::Column::SessionId.eq(session_id))
            .order_by_asc(budgets::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    /// Loads expenditures with their payers and distribution shares attached.
    async fn load_expenditures(&self, session_id: &str) -> ResultEngine<Vec<Expenditure>> {
        let rows = expenditures::Entity::find()
            .filter(expenditures::Column::SessionId.eq(session_id))
            .order_by_asc(expenditures::Column::Id)
            .all(&self.database)
            .await?;

        let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
        let mut result: Vec<Expenditure> = rows
            .into_iter()
            .map(Expenditure::try_from)
            .collect::<ResultEngine<_>>()?;

        let payer_rows = payers::Entity::find()
            .filter(payers::Column::ExpenditureId.is_in(ids.clone()))
            .order_by_asc(payers::Column::UserId)
            .all(&self.database)
            .await?;
        let share_rows = shares::Entity::find()
            .filter(shares::Column::ExpenditureId.is_in(ids))
            .order_by_asc(shares::Column::UserId)
            .all(&self.database)
            .await?;

        let by_id: BTreeMap<String, usize> = result
            .iter()
            .enumerate()
            .map(|(index, expenditure)| (expenditure.id.to_string(), index))
            .collect();

        for payer in payer_rows {
            if let Some(index) = by_id.get(&payer.expenditure_id) {
                result[*index].payers.push(payer.user_id);
            }
        }
        for share in share_rows {
            if let Some(index) = by_id.get(&share.expenditure_id) {
                result[*index].shares.push(Share::try_from(share)?);
            }
        }

        Ok(result)
    }

    async fn load_repayments(&self, session_id: &str) -> ResultEngine<Vec<Repayment>> {
        repayments::Entity::find()
            .filter(repayments::Column::SessionId.eq(session_id))
            .order_by_asc(repayments::Column::OccurredAt)
            .order_by_asc(repayments::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Repayment::try_from)
            .collect()
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    rates: Option<Arc<dyn RateSource>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            rates: None,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, database: DatabaseConnection) -> EngineBuilder {
        self.database = database;
        self
    }

    /// Override the exchange-rate source (defaults to [`HttpRateSource`]).
    pub fn rate_source(mut self, source: Arc<dyn RateSource>) -> EngineBuilder {
        self.rates = Some(source);
        self
    }

    pub fn build(self) -> ResultEngine<Engine> {
        let rates = match self.rates {
            Some(source) => source,
            None => Arc::new(HttpRateSource::new(
                HttpRateSource::DEFAULT_BASE_URL,
                HttpRateSource::DEFAULT_TIMEOUT,
            )?),
        };
        Ok(Engine {
            database: self.database,
            rates,
        })
    }
}
