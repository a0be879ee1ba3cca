//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use super::{amount_field, finish_validation, read_json_object, text_field, title_field};
use crate::{get_user_email, AppError, AppState, SuccessResponse};
use tally_core::models::{Expense, ExpenseCategory, NewExpense, ValidationErrors};

/// GET /api/expenses - All expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Expense>>, AppError> {
    let user_email = get_user_email(request.headers());

    let expenses = state.db.list_expenses()?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("expense"),
        None,
        Some(&format!("returned={}", expenses.len())),
    )?;

    Ok(Json(expenses))
}

/// POST /api/expenses - Validate and record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let user_email = get_user_email(request.headers());
    let body = read_json_object(request).await?;

    let mut type_errors = ValidationErrors::new();
    let input = NewExpense {
        title: title_field(&body, &mut type_errors),
        amount: amount_field(&body),
        category: text_field(&body, "category"),
    };
    let valid = finish_validation(input.validate(), type_errors)?;

    let id = state.db.insert_expense(&valid)?;
    debug!(id, "Expense created");

    state.db.log_audit(
        &user_email,
        "create",
        Some("expense"),
        Some(id),
        Some(&format!(
            "title={}, amount={}, category={}",
            valid.title, valid.amount, valid.category
        )),
    )?;

    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::internal("Expense not found after creation"))?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/expenses/:id
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let user_email = get_user_email(request.headers());

    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found(&format!("Expense {} not found", id)))?;

    state
        .db
        .log_audit(&user_email, "get", Some("expense"), Some(id), None)?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_expense(id).map_err(AppError::from_core)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("expense"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/categories - Every category an expense may use
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<ExpenseCategory>>, AppError> {
    let user_email = get_user_email(request.headers());

    state
        .db
        .log_audit(&user_email, "list", Some("category"), None, None)?;

    Ok(Json(ExpenseCategory::all().to_vec()))
}
