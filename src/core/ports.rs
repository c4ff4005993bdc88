//! Collaborator interfaces consumed by the generator and the replacement
//! protocol. The SQLite implementations live in `db::sources`.

use crate::errors::AppResult;
use crate::models::event::EventRecord;
use crate::models::operation::{Operation, StoredOperation};
use crate::models::schedule_diff::{AuditContext, ScheduleDiff};
use crate::models::tenant::TenantContext;

pub trait EventSource {
    /// Load one event, with its recurrence already validated.
    fn load_event(&mut self, ctx: &TenantContext, event_id: i64) -> AppResult<EventRecord>;
}

/// Storage of operations per event.
///
/// The four data calls plus the transaction bracket form one logical unit in
/// `ScheduleReplacer::replace`. Stores without transactions keep the default
/// no-op bracket.
pub trait OperationStore {
    fn list_operations(
        &mut self,
        ctx: &TenantContext,
        event_id: i64,
    ) -> AppResult<Vec<StoredOperation>>;

    /// Remove every operation of the event whose status is not COMPLETED.
    /// Returns the number of rows removed.
    fn delete_non_completed(&mut self, ctx: &TenantContext, event_id: i64) -> AppResult<usize>;

    /// Insert the operations as SCHEDULED. Returns the number inserted.
    fn insert_many(
        &mut self,
        ctx: &TenantContext,
        event_id: i64,
        operations: &[Operation],
    ) -> AppResult<usize>;

    fn append_audit_entry(
        &mut self,
        ctx: &TenantContext,
        event_id: i64,
        diff: &ScheduleDiff,
        context: &AuditContext,
    ) -> AppResult<()>;

    fn begin(&mut self) -> AppResult<()> {
        Ok(())
    }

    fn commit(&mut self) -> AppResult<()> {
        Ok(())
    }

    fn rollback(&mut self) -> AppResult<()> {
        Ok(())
    }
}
