//! Schedule replacement: swap the pending operations of an event for a
//! freshly generated set, keeping completed ones, and audit the diff.

use crate::core::ports::OperationStore;
use crate::errors::{AppError, AppResult};
use crate::models::operation::Operation;
use crate::models::schedule_diff::{AuditContext, ScheduleDiff};
use crate::models::tenant::TenantContext;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{error, info, instrument};

type EventKey = (String, i64);

/// Serializes replacements per (tenant, event). Replacements of different
/// events never wait on each other. Clones share the same lock registry.
#[derive(Debug, Clone, Default)]
pub struct ScheduleReplacer {
    locks: Arc<Mutex<HashMap<EventKey, Arc<Mutex<()>>>>>,
}

impl ScheduleReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    fn event_lock(&self, key: &EventKey) -> Arc<Mutex<()>> {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(key.clone()).or_default().clone()
    }

    /// Drop the registry entry once no other caller holds or waits on it.
    /// Clones are only handed out under the registry mutex, so the count
    /// cannot grow while it is checked.
    fn release_event_lock(&self, key: &EventKey, lock: Arc<Mutex<()>>) {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // one reference in the map, one here
        if Arc::strong_count(&lock) <= 2 {
            map.remove(key);
        }
    }

    /// Number of events with a live lock entry.
    pub fn tracked_events(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Replace the non-completed operations of `event_id` with `operations`.
    ///
    /// Read, delete, insert and audit run inside the store's transaction
    /// while holding the event lock. Any failure rolls back and surfaces as
    /// [`AppError::OperationsUpdate`]; the cause is only logged.
    #[instrument(skip(self, ctx, operations, context, store), fields(tenant = %ctx.tenant_id))]
    pub fn replace(
        &self,
        ctx: &TenantContext,
        event_id: i64,
        operations: &[Operation],
        context: &AuditContext,
        store: &mut dyn OperationStore,
    ) -> AppResult<ScheduleDiff> {
        let key = (ctx.tenant_id.clone(), event_id);
        let lock = self.event_lock(&key);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            finish(ctx, event_id, operations, context, store)
        };
        self.release_event_lock(&key, lock);
        result
    }
}

fn finish(
    ctx: &TenantContext,
    event_id: i64,
    operations: &[Operation],
    context: &AuditContext,
    store: &mut dyn OperationStore,
) -> AppResult<ScheduleDiff> {
    match run_unit(ctx, event_id, operations, context, store) {
        Ok(diff) => {
            info!(
                completed = diff.completed_preserved,
                removed = diff.pending_removed,
                inserted = diff.inserted,
                path = %context.path,
                "operations replaced"
            );
            Ok(diff)
        }
        Err(e) => {
            error!(error = %e, "operation replacement failed");
            if let Err(rb) = store.rollback() {
                error!(error = %rb, "rollback failed");
            }
            Err(AppError::OperationsUpdate)
        }
    }
}

fn run_unit(
    ctx: &TenantContext,
    event_id: i64,
    operations: &[Operation],
    context: &AuditContext,
    store: &mut dyn OperationStore,
) -> AppResult<ScheduleDiff> {
    store.begin()?;
    let diff = apply(ctx, event_id, operations, context, store)?;
    store.commit()?;
    Ok(diff)
}

fn apply(
    ctx: &TenantContext,
    event_id: i64,
    operations: &[Operation],
    context: &AuditContext,
    store: &mut dyn OperationStore,
) -> AppResult<ScheduleDiff> {
    let existing = store.list_operations(ctx, event_id)?;
    let (completed, pending): (Vec<_>, Vec<_>) =
        existing.into_iter().partition(|op| op.is_completed());

    let removed = store.delete_non_completed(ctx, event_id)?;
    if removed != pending.len() {
        return Err(AppError::Store(format!(
            "expected to remove {} pending operations, removed {}",
            pending.len(),
            removed
        )));
    }

    let inserted = store.insert_many(ctx, event_id, operations)?;
    if inserted != operations.len() {
        return Err(AppError::Store(format!(
            "expected to insert {} operations, inserted {}",
            operations.len(),
            inserted
        )));
    }

    let diff = ScheduleDiff {
        completed_preserved: completed.len(),
        pending_removed: removed,
        inserted,
    };
    store.append_audit_entry(ctx, event_id, &diff, context)?;

    Ok(diff)
}
