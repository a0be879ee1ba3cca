//! Income handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};

use super::{amount_field, finish_validation, read_json_object, title_field};
use crate::{get_user_email, AppError, AppState, SuccessResponse};
use tally_core::models::{Income, NewIncome, ValidationErrors};

/// GET /api/incomes - All income entries, newest first
pub async fn list_incomes(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Income>>, AppError> {
    let user_email = get_user_email(request.headers());

    let incomes = state.db.list_incomes()?;

    state.db.log_audit(
        &user_email,
        "list",
        Some("income"),
        None,
        Some(&format!("returned={}", incomes.len())),
    )?;

    Ok(Json(incomes))
}

/// POST /api/incomes (also POST /api/balance) - Validate and record income
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<Income>), AppError> {
    let user_email = get_user_email(request.headers());
    let body = read_json_object(request).await?;

    let mut type_errors = ValidationErrors::new();
    let input = NewIncome {
        title: title_field(&body, &mut type_errors),
        amount: amount_field(&body),
    };
    let valid = finish_validation(input.validate(), type_errors)?;

    let id = state.db.insert_income(&valid)?;

    state.db.log_audit(
        &user_email,
        "create",
        Some("income"),
        Some(id),
        Some(&format!("title={}, amount={}", valid.title, valid.amount)),
    )?;

    let income = state
        .db
        .get_income(id)?
        .ok_or_else(|| AppError::internal("Income not found after creation"))?;

    Ok((StatusCode::CREATED, Json(income)))
}

/// DELETE /api/incomes/:id
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state.db.delete_income(id).map_err(AppError::from_core)?;

    state
        .db
        .log_audit(&user_email, "delete", Some("income"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
