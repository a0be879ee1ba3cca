//! Page payload handlers: dashboard, analytics, transactions

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{get_user_email, AppError, AppState};
use tally_core::analytics::{build_analytics, build_dashboard, AnalyticsReport, Dashboard};
use tally_core::ledger::{build_ledger, EntryKind, LedgerFilter, LedgerView, SortKey, SortOrder};
use tally_core::models::ExpenseCategory;

/// GET /api/dashboard - Totals, six-month series, and category breakdown
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Dashboard>, AppError> {
    let user_email = get_user_email(request.headers());

    let expenses = state.db.list_expenses()?;
    let incomes = state.db.list_incomes()?;
    let dashboard = build_dashboard(&expenses, &incomes, Utc::now());

    state
        .db
        .log_audit(&user_email, "view", Some("dashboard"), None, None)?;

    Ok(Json(dashboard))
}

/// GET /api/analytics - Twelve-month series, trends, and key metrics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AnalyticsReport>, AppError> {
    let user_email = get_user_email(request.headers());

    let expenses = state.db.list_expenses()?;
    let incomes = state.db.list_incomes()?;
    let report = build_analytics(&expenses, &incomes, Utc::now());

    state
        .db
        .log_audit(&user_email, "view", Some("analytics"), None, None)?;

    Ok(Json(report))
}

/// Query parameters for the transaction list
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Case-insensitive title search
    pub search: Option<String>,
    /// expense or income
    pub kind: Option<String>,
    pub category: Option<String>,
    /// date, amount, or title
    pub sort: Option<String>,
    /// asc or desc
    pub order: Option<String>,
}

impl TransactionsQuery {
    fn to_filter(&self) -> Result<LedgerFilter, AppError> {
        // Empty values mean "no filter", matching a blank form field
        let present = |v: &Option<String>| -> Option<String> {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let kind = present(&self.kind)
            .map(|k| k.parse::<EntryKind>())
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?;
        let category = present(&self.category)
            .map(|c| c.parse::<ExpenseCategory>())
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?;
        let sort = present(&self.sort)
            .map(|s| s.parse::<SortKey>())
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?
            .unwrap_or_default();
        let order = present(&self.order)
            .map(|o| o.parse::<SortOrder>())
            .transpose()
            .map_err(|e| AppError::bad_request(&e))?
            .unwrap_or_default();

        Ok(LedgerFilter {
            search: present(&self.search),
            kind,
            category,
            sort,
            order,
        })
    }
}

/// GET /api/transactions - Expenses and income together, filtered and sorted
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionsQuery>,
    request: Request,
) -> Result<Json<LedgerView>, AppError> {
    let user_email = get_user_email(request.headers());
    let filter = params.to_filter()?;

    let expenses = state.db.list_expenses()?;
    let incomes = state.db.list_incomes()?;
    let view = build_ledger(&expenses, &incomes, &filter);

    state.db.log_audit(
        &user_email,
        "list",
        Some("transaction"),
        None,
        Some(&format!(
            "search={:?}, kind={:?}, category={:?}, sort={:?}, order={:?}, returned={}",
            filter.search,
            filter.kind,
            filter.category,
            filter.sort,
            filter.order,
            view.entries.len()
        )),
    )?;

    Ok(Json(view))
}
