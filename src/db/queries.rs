use crate::db::models::EventRow;
use crate::errors::{AppError, AppResult};
use crate::models::event::{EventClass, EventOrigin, EventWindow};
use crate::models::operation::{
    Operation, OperationStatus, OperationType, StoredOperation, VehicleClass,
};
use crate::models::tenant::TenantContext;
use crate::utils::time::parse_time;
use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

fn get_date(row: &Row, col: &str) -> Result<NaiveDate> {
    let raw: String = row.get(col)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| conversion_error(0, AppError::InvalidDate(raw)))
}

fn get_time(row: &Row, col: &str) -> Result<NaiveTime> {
    let raw: String = row.get(col)?;
    parse_time(&raw).ok_or_else(|| conversion_error(0, AppError::InvalidTime(raw)))
}

fn get_optional_time(row: &Row, col: &str) -> Result<Option<NaiveTime>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        Some(s) if !s.trim().is_empty() => parse_time(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(0, AppError::InvalidTime(s))),
        _ => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// events
// ---------------------------------------------------------------------------

pub fn map_event_row(row: &Row) -> Result<EventRow> {
    let source_str: String = row.get("source")?;
    let source = EventOrigin::from_db_str(&source_str).ok_or_else(|| {
        conversion_error(0, AppError::Other(format!("Invalid source: {}", source_str)))
    })?;
    let class_str: String = row.get("class")?;

    Ok(EventRow {
        id: row.get("id")?,
        tenant_id: row.get("tenant_id")?,
        start_date: get_date(row, "start_date")?,
        end_date: get_date(row, "end_date")?,
        start_time: get_optional_time(row, "start_time")?,
        end_time: get_optional_time(row, "end_time")?,
        mobilization_at: row.get("mobilization_at")?,
        demobilization_at: row.get("demobilization_at")?,
        source,
        class: EventClass::from_db_str(&class_str),
        recurrence: row.get("recurrence")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_event(
    conn: &Connection,
    ctx: &TenantContext,
    window: &EventWindow,
    class: EventClass,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO events (tenant_id, start_date, end_date, start_time, end_time,
                             mobilization_at, demobilization_at, source, class, recurrence, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            ctx.tenant_id,
            window.start_date.format("%Y-%m-%d").to_string(),
            window.end_date.format("%Y-%m-%d").to_string(),
            window.start_time.map(|t| t.format("%H:%M").to_string()),
            window.end_time.map(|t| t.format("%H:%M").to_string()),
            window.mobilization_at,
            window.demobilization_at,
            window.origin.to_db_str(),
            class.to_db_str(),
            window.recurrence.as_ref().map(|r| r.to_payload().to_string()),
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_event(conn: &Connection, ctx: &TenantContext, event_id: i64) -> AppResult<Option<EventRow>> {
    let row = conn
        .query_row(
            "SELECT * FROM events WHERE tenant_id = ?1 AND id = ?2",
            params![ctx.tenant_id, event_id],
            map_event_row,
        )
        .optional()?;
    Ok(row)
}

// ---------------------------------------------------------------------------
// operations
// ---------------------------------------------------------------------------

pub fn map_operation_row(row: &Row) -> Result<StoredOperation> {
    let kind_str: String = row.get("type")?;
    let kind = OperationType::from_db_str(&kind_str).ok_or_else(|| {
        conversion_error(0, AppError::Other(format!("Invalid operation type: {}", kind_str)))
    })?;

    let vehicle_str: String = row.get("vehicle_class")?;
    let vehicle_class = VehicleClass::from_db_str(&vehicle_str).ok_or_else(|| {
        conversion_error(0, AppError::Other(format!("Invalid vehicle class: {}", vehicle_str)))
    })?;

    let status_str: String = row.get("status")?;
    let status = OperationStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(0, AppError::InvalidStatus(status_str.clone())))?;

    Ok(StoredOperation {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        operation: Operation {
            kind,
            subtype: row.get("subtype")?,
            date: get_date(row, "date")?,
            time: get_time(row, "time")?,
            duration_minutes: row.get("duration_minutes")?,
            vehicle_class,
            status,
            notes: row.get("notes")?,
        },
        created_at: row.get("created_at")?,
    })
}

pub fn list_operations(
    conn: &Connection,
    ctx: &TenantContext,
    event_id: i64,
) -> AppResult<Vec<StoredOperation>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM operations
         WHERE tenant_id = ?1 AND event_id = ?2
         ORDER BY date ASC, time ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![ctx.tenant_id, event_id], map_operation_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_non_completed(conn: &Connection, ctx: &TenantContext, event_id: i64) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM operations
         WHERE tenant_id = ?1 AND event_id = ?2 AND status <> 'COMPLETED'",
        params![ctx.tenant_id, event_id],
    )?;
    Ok(n)
}

/// Insert every operation as SCHEDULED, whatever status it carries.
pub fn insert_operations(
    conn: &Connection,
    ctx: &TenantContext,
    event_id: i64,
    ops: &[Operation],
) -> AppResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO operations (tenant_id, event_id, type, subtype, date, time,
                                 duration_minutes, vehicle_class, status, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;

    let now = Local::now().to_rfc3339();
    let mut inserted = 0;
    for op in ops {
        inserted += stmt.execute(params![
            ctx.tenant_id,
            event_id,
            op.kind.to_db_str(),
            op.subtype,
            op.date_str(),
            op.time_str(),
            op.duration_minutes,
            op.vehicle_class.to_db_str(),
            OperationStatus::Scheduled.to_db_str(),
            op.notes,
            now,
        ])?;
    }
    Ok(inserted)
}

pub fn get_operation(conn: &Connection, ctx: &TenantContext, id: i64) -> AppResult<Option<StoredOperation>> {
    let op = conn
        .query_row(
            "SELECT * FROM operations WHERE tenant_id = ?1 AND id = ?2",
            params![ctx.tenant_id, id],
            map_operation_row,
        )
        .optional()?;
    Ok(op)
}

pub fn update_operation_status(
    conn: &Connection,
    ctx: &TenantContext,
    id: i64,
    status: OperationStatus,
) -> AppResult<()> {
    conn.execute(
        "UPDATE operations SET status = ?1 WHERE tenant_id = ?2 AND id = ?3",
        params![status.to_db_str(), ctx.tenant_id, id],
    )?;
    Ok(())
}
