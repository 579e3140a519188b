use serde::{Deserialize, Serialize};

pub mod settlement {
    use super::*;

    /// Per-category spending totals plus the budget figure.
    ///
    /// All amounts are major units (e.g. `12.34`) in the requesting user's
    /// default currency.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct UsageView {
        pub meal: f64,
        pub lodgment: f64,
        pub transport: f64,
        pub shopping: f64,
        pub activity: f64,
        pub etc: f64,
        pub unknown: f64,
        pub total_budget: f64,
    }

    /// One line of the settlement list.
    ///
    /// `owed == true`: the requester owes `target_user_id`; `amount` is in
    /// the target's default currency. `owed == false`: `target_user_id` owes
    /// the requester; `amount` is in the requester's default currency.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SettlementView {
        pub owed: bool,
        pub target_user_id: String,
        pub amount: f64,
        pub currency_code: String,
    }

    /// Response body for `GET /sessions/{id}/settlement`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SettlementResponse {
        pub session_usage: UsageView,
        pub my_usage: UsageView,
        pub settlements: Vec<SettlementView>,
    }
}
