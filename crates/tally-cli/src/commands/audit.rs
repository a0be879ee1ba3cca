//! Access log command

use anyhow::Result;
use tally_core::db::{AuditQuery, Database};

use super::truncate;

pub fn cmd_audit(db: &Database, query: &AuditQuery, json: bool) -> Result<()> {
    let entries = db.recent_audit(query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No access recorded.");
        return Ok(());
    }

    println!();
    println!("🔍 Access log (newest first)");
    println!("   ─────────────────────────────────────────────────────────────────────");

    for entry in &entries {
        let target = match (&entry.entity_type, entry.entity_id) {
            (Some(kind), Some(id)) => format!("{} #{}", kind, id),
            (Some(kind), None) => kind.clone(),
            (None, Some(id)) => format!("#{}", id),
            (None, None) => "-".to_string(),
        };
        println!(
            "   {} │ {:10} │ {:8} │ {:16} │ {}",
            entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            truncate(&entry.actor, 10),
            entry.action,
            truncate(&target, 16),
            truncate(entry.details.as_deref().unwrap_or(""), 40)
        );
    }

    Ok(())
}
