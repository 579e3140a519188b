//! Settlement API endpoint.

use api_types::settlement::{SettlementResponse, SettlementView, UsageView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState, user};

/// Handles `GET /sessions/{id}/settlement` for the authenticated user.
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> Result<Json<SettlementResponse>, ServerError> {
    let settlement = state
        .engine
        .my_settlement(&session_id, &user.username)
        .await?;

    Ok(Json(to_response(settlement)))
}

fn to_response(settlement: engine::Settlement) -> SettlementResponse {
    SettlementResponse {
        session_usage: usage_view(settlement.session_usage),
        my_usage: usage_view(settlement.my_usage),
        settlements: settlement
            .entries
            .into_iter()
            .map(|entry| SettlementView {
                owed: entry.owed,
                target_user_id: entry.counterpart,
                amount: entry.amount.to_major(),
                currency_code: entry.currency.as_str().to_string(),
            })
            .collect(),
    }
}

fn usage_view(totals: engine::UsageTotals) -> UsageView {
    UsageView {
        meal: totals.meal.to_major(),
        lodgment: totals.lodgment.to_major(),
        transport: totals.transport.to_major(),
        shopping: totals.shopping.to_major(),
        activity: totals.activity.to_major(),
        etc: totals.etc.to_major(),
        unknown: totals.unknown.to_major(),
        total_budget: totals.total_budget.to_major(),
    }
}
