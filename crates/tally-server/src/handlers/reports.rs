//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{get_user_email, AppError, AppState, MAX_MONTHS};
use tally_core::analytics::{
    compute_category_breakdown, compute_global_stats, compute_monthly_series,
    compute_spending_trends, CategoryStat, CountMode, MonthlyBucket, Stats, TrendSummary,
    ANALYTICS_MONTHS,
};

/// Query parameters for /api/stats
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// expenses (default) or all
    pub count: Option<String>,
}

/// Query parameters for the month-based reports
#[derive(Debug, Deserialize)]
pub struct MonthsQuery {
    pub months: Option<String>,
}

fn parse_months(raw: Option<&str>) -> Result<u32, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(ANALYTICS_MONTHS);
    };
    match raw.parse::<u32>() {
        Ok(m) if (1..=MAX_MONTHS).contains(&m) => Ok(m),
        _ => Err(AppError::bad_request(&format!(
            "months must be a whole number between 1 and {}",
            MAX_MONTHS
        ))),
    }
}

/// GET /api/stats - Totals, balance, and transaction count
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsQuery>,
    request: Request,
) -> Result<Json<Stats>, AppError> {
    let user_email = get_user_email(request.headers());

    let mode = match params.count.as_deref() {
        None | Some("") => CountMode::ExpensesOnly,
        Some(raw) => raw
            .parse::<CountMode>()
            .map_err(|e| AppError::bad_request(&e))?,
    };

    let expenses = state.db.list_expenses()?;
    let incomes = state.db.list_incomes()?;
    let stats = compute_global_stats(&expenses, &incomes, mode);

    state.db.log_audit(
        &user_email,
        "report",
        Some("stats"),
        None,
        Some(&format!("count={}", mode.as_str())),
    )?;

    Ok(Json(stats))
}

/// GET /api/reports/monthly - Calendar-month series ending this month
pub async fn report_monthly(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthsQuery>,
    request: Request,
) -> Result<Json<Vec<MonthlyBucket>>, AppError> {
    let user_email = get_user_email(request.headers());
    let months = parse_months(params.months.as_deref())?;

    let expenses = state.db.list_expenses()?;
    let incomes = state.db.list_incomes()?;
    let series = compute_monthly_series(&expenses, &incomes, months, Utc::now());

    state.db.log_audit(
        &user_email,
        "report",
        Some("monthly"),
        None,
        Some(&format!("months={}", months)),
    )?;

    Ok(Json(series))
}

/// GET /api/reports/categories - Spending by category, largest first
pub async fn report_categories(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<CategoryStat>>, AppError> {
    let user_email = get_user_email(request.headers());

    let expenses = state.db.list_expenses()?;
    let categories = compute_category_breakdown(&expenses);

    state.db.log_audit(
        &user_email,
        "report",
        Some("categories"),
        None,
        Some(&format!("categories={}", categories.len())),
    )?;

    Ok(Json(categories))
}

/// GET /api/reports/trends - Trend indicators over the monthly series
pub async fn report_trends(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthsQuery>,
    request: Request,
) -> Result<Json<TrendSummary>, AppError> {
    let user_email = get_user_email(request.headers());
    let months = parse_months(params.months.as_deref())?;

    let expenses = state.db.list_expenses()?;
    let incomes = state.db.list_incomes()?;
    let series = compute_monthly_series(&expenses, &incomes, months, Utc::now());
    let trends = compute_spending_trends(&series);

    state.db.log_audit(
        &user_email,
        "report",
        Some("trends"),
        None,
        Some(&format!("months={}", months)),
    )?;

    Ok(Json(trends))
}
