use crate::errors::AppResult;
use crate::models::schedule_diff::{AuditContext, ScheduleDiff};
use crate::models::tenant::TenantContext;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;
use serde_json::json;

pub const OP_REGENERATE: &str = "regenerate_operations";

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    // local time, RFC 3339
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Audit row of one schedule replacement; the message is a JSON object.
pub fn log_regeneration(
    conn: &Connection,
    ctx: &TenantContext,
    event_id: i64,
    diff: &ScheduleDiff,
    context: &AuditContext,
) -> AppResult<()> {
    let message = json!({
        "tenant": ctx.tenant_id,
        "actor": ctx.actor(),
        "pendingRemoved": diff.pending_removed,
        "insertedCount": diff.inserted,
        "completedCount": diff.completed_preserved,
        "path": context.path,
        "eventType": context.event_class,
        "source": context.origin,
    });

    ttlog(conn, OP_REGENERATE, &format!("event:{event_id}"), &message.to_string())
}

pub fn load_log(conn: &Connection) -> AppResult<Vec<LogEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, COALESCE(target, ''), message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(LogEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get(3)?,
            message: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
