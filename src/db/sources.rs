//! SQLite-backed Event Source and Operation Store.

use crate::core::ports::{EventSource, OperationStore};
use crate::db::log::log_regeneration;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::event::EventRecord;
use crate::models::operation::{Operation, StoredOperation};
use crate::models::schedule_diff::{AuditContext, ScheduleDiff};
use crate::models::tenant::TenantContext;
use rusqlite::Connection;

pub struct SqliteEventSource<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteEventSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl EventSource for SqliteEventSource<'_> {
    fn load_event(&mut self, ctx: &TenantContext, event_id: i64) -> AppResult<EventRecord> {
        queries::load_event(self.conn, ctx, event_id)?
            .ok_or_else(|| AppError::EventNotFound {
                tenant: ctx.tenant_id.clone(),
                event_id,
            })?
            .to_record()
    }
}

pub struct SqliteOperationStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteOperationStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl OperationStore for SqliteOperationStore<'_> {
    fn list_operations(
        &mut self,
        ctx: &TenantContext,
        event_id: i64,
    ) -> AppResult<Vec<StoredOperation>> {
        queries::list_operations(self.conn, ctx, event_id)
    }

    fn delete_non_completed(&mut self, ctx: &TenantContext, event_id: i64) -> AppResult<usize> {
        queries::delete_non_completed(self.conn, ctx, event_id)
    }

    fn insert_many(
        &mut self,
        ctx: &TenantContext,
        event_id: i64,
        operations: &[Operation],
    ) -> AppResult<usize> {
        queries::insert_operations(self.conn, ctx, event_id, operations)
    }

    fn append_audit_entry(
        &mut self,
        ctx: &TenantContext,
        event_id: i64,
        diff: &ScheduleDiff,
        context: &AuditContext,
    ) -> AppResult<()> {
        log_regeneration(self.conn, ctx, event_id, diff, context)
    }

    // IMMEDIATE takes the write lock up front, so two processes cannot both
    // read the same pending set.
    fn begin(&mut self) -> AppResult<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        Ok(())
    }

    fn commit(&mut self) -> AppResult<()> {
        self.conn.execute_batch("COMMIT;")?;
        Ok(())
    }

    fn rollback(&mut self) -> AppResult<()> {
        self.conn.execute_batch("ROLLBACK;")?;
        Ok(())
    }
}
