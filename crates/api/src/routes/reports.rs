//! Report routes.
//!
//! Every handler owns a cancellation token that fires when the handler
//! future is dropped, so a client disconnect stops outstanding
//! sub-aggregations.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tally_core::ledger::TransactionType;
use tally_core::period::Granularity;
use tally_core::reports::{AdHocDefinition, ReportError};
use tokio_util::sync::CancellationToken;

use crate::AppState;
use crate::error::report_error_response;
use crate::query::ReportQuery;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(get_overview))
        .route("/cash-flow", get(get_cash_flow))
        .route("/expense-pace", get(get_expense_pace))
        .route("/expense-heatmap", get(get_expense_heatmap))
        .route("/category-breakdown", get(get_category_breakdown))
        .route("/dynamics", get(get_dynamics))
        .route("/top-expenses", get(get_top_expenses))
        .route("/net-worth", get(get_net_worth))
        .route("/net-worth/history", get(get_net_worth_history))
        .route("/transaction-summary", get(get_transaction_summary))
        .route("/custom", post(post_custom))
}

fn respond<T: Serialize>(result: Result<T, ReportError>) -> Response {
    match result {
        Ok(report) => Json(report).into_response(),
        Err(err) => report_error_response(err),
    }
}

/// Token cancelled when the returned guard is dropped.
fn request_token() -> (CancellationToken, tokio_util::sync::DropGuard) {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    (cancel, guard)
}

async fn get_overview(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        state.reports.overview(&request, &cancel).await
    }
    .await;
    respond(result)
}

async fn get_cash_flow(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        state.reports.cash_flow(&request, &cancel).await
    }
    .await;
    respond(result)
}

async fn get_expense_pace(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        state.reports.expense_pace(&request, query.months, &cancel).await
    }
    .await;
    respond(result)
}

async fn get_expense_heatmap(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        state.reports.expense_heatmap(&request, &cancel).await
    }
    .await;
    respond(result)
}

async fn get_category_breakdown(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        let transaction_type = query.transaction_type_or(TransactionType::Expense)?;
        state
            .reports
            .category_breakdown(&request, transaction_type, &cancel)
            .await
    }
    .await;
    respond(result)
}

async fn get_dynamics(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        let transaction_type = query.transaction_type_or(TransactionType::Expense)?;
        let granularity = query.granularity_or(Granularity::Month)?;
        state
            .reports
            .category_dynamics(&request, transaction_type, granularity, query.limit, &cancel)
            .await
    }
    .await;
    respond(result)
}

async fn get_top_expenses(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        state.reports.top_expenses(&request, query.limit, &cancel).await
    }
    .await;
    respond(result)
}

async fn get_net_worth(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        state.reports.net_worth(&request, &cancel).await
    }
    .await;
    respond(result)
}

async fn get_net_worth_history(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        let granularity = query.granularity_or(Granularity::Month)?;
        state
            .reports
            .net_worth_history(&request, granularity, &cancel)
            .await
    }
    .await;
    respond(result)
}

async fn get_transaction_summary(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let (cancel, _guard) = request_token();
    let result = async {
        let request = query.request()?;
        let transaction_type = query.transaction_type_or(TransactionType::Expense)?;
        state
            .reports
            .transaction_summary(&request, transaction_type, &cancel)
            .await
    }
    .await;
    respond(result)
}

async fn post_custom(
    State(state): State<AppState>,
    Json(definition): Json<AdHocDefinition>,
) -> Response {
    let (cancel, _guard) = request_token();
    respond(state.reports.custom(&definition, &cancel).await)
}
