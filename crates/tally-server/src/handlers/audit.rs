//! Access log handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{get_user_email, AppError, AppState};
use tally_core::db::{AuditEntry, AuditQuery, MAX_AUDIT_LIMIT};

/// Query parameters for /api/audit
#[derive(Debug, Default, Deserialize)]
pub struct AuditParams {
    pub limit: Option<String>,
    pub action: Option<String>,
    /// Entity type, e.g. expense or dashboard
    pub entity: Option<String>,
}

impl AuditParams {
    fn to_query(&self) -> Result<AuditQuery, AppError> {
        let present = |v: &Option<String>| -> Option<String> {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let limit = match present(&self.limit) {
            None => None,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if (1..=MAX_AUDIT_LIMIT).contains(&n) => Some(n),
                _ => {
                    return Err(AppError::bad_request(&format!(
                        "limit must be a whole number between 1 and {}",
                        MAX_AUDIT_LIMIT
                    )))
                }
            },
        };

        Ok(AuditQuery {
            limit,
            action: present(&self.action),
            entity_type: present(&self.entity),
        })
    }
}

/// GET /api/audit - Recent access records, newest first
pub async fn list_audit(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditParams>,
    request: Request,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let user_email = get_user_email(request.headers());
    let query = params.to_query()?;

    let entries = state.db.recent_audit(&query)?;

    // Recorded after the read so the listing never contains itself
    state.db.log_audit(
        &user_email,
        "list",
        Some("audit"),
        None,
        Some(&format!(
            "limit={}, returned={}",
            query.effective_limit(),
            entries.len()
        )),
    )?;

    Ok(Json(entries))
}
