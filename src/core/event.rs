use crate::db::log::ttlog;
use crate::db::models::EventRow;
use crate::db::queries::{insert_event, load_event};
use crate::errors::{AppError, AppResult};
use crate::models::event::{EventClass, EventWindow};
use crate::models::tenant::TenantContext;
use rusqlite::Connection;

/// Registration and lookup of events.
pub struct EventLogic;

impl EventLogic {
    pub fn add(
        conn: &Connection,
        ctx: &TenantContext,
        window: &EventWindow,
        class: EventClass,
    ) -> AppResult<i64> {
        window.validate()?;

        let id = insert_event(conn, ctx, window, class)?;

        ttlog(
            conn,
            "event_add",
            &format!("event:{id}"),
            &format!(
                "{} → {} ({}, {})",
                window.start_date,
                window.end_date,
                window.origin.to_db_str(),
                class.to_db_str()
            ),
        )?;

        Ok(id)
    }

    pub fn get(conn: &Connection, ctx: &TenantContext, event_id: i64) -> AppResult<EventRow> {
        load_event(conn, ctx, event_id)?.ok_or_else(|| AppError::EventNotFound {
            tenant: ctx.tenant_id.clone(),
            event_id,
        })
    }
}
