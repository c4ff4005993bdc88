mod common;
use common::{d, setup_test_db, t};

use opsched::core::ports::OperationStore;
use opsched::core::replace::ScheduleReplacer;
use opsched::db::log::{OP_REGENERATE, load_log};
use opsched::db::pool::DbPool;
use opsched::db::queries::{insert_event, insert_operations, list_operations, update_operation_status};
use opsched::db::sources::SqliteOperationStore;
use opsched::errors::{AppError, AppResult};
use opsched::models::event::{EventClass, EventOrigin, EventWindow};
use opsched::models::operation::{Operation, OperationStatus, StoredOperation};
use opsched::models::schedule_diff::{AuditContext, GenerationPath, ScheduleDiff};
use opsched::models::tenant::TenantContext;
use serde_json::Value;
use std::thread;

fn audit_ctx() -> AuditContext {
    AuditContext {
        path: GenerationPath::Deterministic,
        event_class: EventClass::SingleOccurrence,
        origin: EventOrigin::Auto,
    }
}

fn cleanings(from_day: u32, n: u32) -> Vec<Operation> {
    (0..n)
        .map(|i| Operation::cleaning(d(&format!("2025-03-{:02}", from_day + i)), t("19:00")))
        .collect()
}

fn seed_event(pool: &DbPool, ctx: &TenantContext) -> i64 {
    let window = EventWindow::new(
        d("2025-03-01"),
        t("08:00"),
        d("2025-03-20"),
        t("18:00"),
        EventOrigin::Auto,
    );
    insert_event(&pool.conn, ctx, &window, EventClass::SingleOccurrence).unwrap()
}

/// Five stored operations, the first two of them completed.
fn seed_operations(pool: &DbPool, ctx: &TenantContext, event_id: i64) {
    insert_operations(&pool.conn, ctx, event_id, &cleanings(1, 5)).unwrap();
    let stored = list_operations(&pool.conn, ctx, event_id).unwrap();
    for op in stored.iter().take(2) {
        update_operation_status(&pool.conn, ctx, op.id, OperationStatus::Completed).unwrap();
    }
}

fn count_status(ops: &[StoredOperation], status: OperationStatus) -> usize {
    ops.iter().filter(|o| o.operation.status == status).count()
}

#[test]
fn test_replace_keeps_completed_and_swaps_pending() {
    let db_path = setup_test_db("replace_keeps_completed");
    let pool = DbPool::open(&db_path).unwrap();
    let ctx = TenantContext::new("acme").with_user("alice");
    let event_id = seed_event(&pool, &ctx);
    seed_operations(&pool, &ctx, event_id);

    let replacer = ScheduleReplacer::new();
    let mut store = SqliteOperationStore::new(&pool.conn);
    let fresh = cleanings(10, 4);
    let diff = replacer
        .replace(&ctx, event_id, &fresh, &audit_ctx(), &mut store)
        .unwrap();

    assert_eq!(
        diff,
        ScheduleDiff {
            completed_preserved: 2,
            pending_removed: 3,
            inserted: 4,
        }
    );

    let stored = list_operations(&pool.conn, &ctx, event_id).unwrap();
    assert_eq!(stored.len(), 6);
    assert_eq!(count_status(&stored, OperationStatus::Completed), 2);
    assert_eq!(count_status(&stored, OperationStatus::Scheduled), 4);

    let audit: Vec<_> = load_log(&pool.conn)
        .unwrap()
        .into_iter()
        .filter(|e| e.operation == OP_REGENERATE)
        .collect();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].target, format!("event:{event_id}"));

    let message: Value = serde_json::from_str(&audit[0].message).unwrap();
    assert_eq!(message["tenant"], "acme");
    assert_eq!(message["actor"], "alice");
    assert_eq!(message["pendingRemoved"], 3);
    assert_eq!(message["insertedCount"], 4);
    assert_eq!(message["completedCount"], 2);
    assert_eq!(message["path"], "deterministic");
    assert_eq!(message["eventType"], "single-occurrence");
    assert_eq!(message["source"], "AUTO");
}

#[test]
fn test_replace_resets_in_progress_and_cancelled() {
    let db_path = setup_test_db("replace_resets_pending_states");
    let pool = DbPool::open(&db_path).unwrap();
    let ctx = TenantContext::new("acme");
    let event_id = seed_event(&pool, &ctx);

    insert_operations(&pool.conn, &ctx, event_id, &cleanings(1, 2)).unwrap();
    let stored = list_operations(&pool.conn, &ctx, event_id).unwrap();
    update_operation_status(&pool.conn, &ctx, stored[0].id, OperationStatus::InProgress).unwrap();
    update_operation_status(&pool.conn, &ctx, stored[1].id, OperationStatus::Cancelled).unwrap();

    let mut store = SqliteOperationStore::new(&pool.conn);
    let diff = ScheduleReplacer::new()
        .replace(&ctx, event_id, &cleanings(5, 1), &audit_ctx(), &mut store)
        .unwrap();

    assert_eq!(diff.pending_removed, 2);
    assert_eq!(diff.completed_preserved, 0);
    let stored = list_operations(&pool.conn, &ctx, event_id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].operation.status, OperationStatus::Scheduled);
}

#[test]
fn test_replace_is_scoped_by_tenant() {
    let db_path = setup_test_db("replace_tenant_scope");
    let pool = DbPool::open(&db_path).unwrap();
    let acme = TenantContext::new("acme");
    let other = TenantContext::new("other");
    let event_id = seed_event(&pool, &acme);
    insert_operations(&pool.conn, &acme, event_id, &cleanings(1, 3)).unwrap();

    let mut store = SqliteOperationStore::new(&pool.conn);
    let diff = ScheduleReplacer::new()
        .replace(&other, event_id, &cleanings(5, 1), &audit_ctx(), &mut store)
        .unwrap();

    assert_eq!(diff.pending_removed, 0);
    assert_eq!(list_operations(&pool.conn, &acme, event_id).unwrap().len(), 3);
}

/// Store that fails on insert and records the transaction bracket calls.
#[derive(Default)]
struct FailingStore {
    pending: usize,
    began: bool,
    committed: bool,
    rolled_back: bool,
    audited: bool,
}

impl OperationStore for FailingStore {
    fn list_operations(&mut self, _: &TenantContext, _: i64) -> AppResult<Vec<StoredOperation>> {
        Ok(Vec::new())
    }

    fn delete_non_completed(&mut self, _: &TenantContext, _: i64) -> AppResult<usize> {
        Ok(self.pending)
    }

    fn insert_many(&mut self, _: &TenantContext, _: i64, _: &[Operation]) -> AppResult<usize> {
        Err(AppError::Store("disk full".into()))
    }

    fn append_audit_entry(
        &mut self,
        _: &TenantContext,
        _: i64,
        _: &ScheduleDiff,
        _: &AuditContext,
    ) -> AppResult<()> {
        self.audited = true;
        Ok(())
    }

    fn begin(&mut self) -> AppResult<()> {
        self.began = true;
        Ok(())
    }

    fn commit(&mut self) -> AppResult<()> {
        self.committed = true;
        Ok(())
    }

    fn rollback(&mut self) -> AppResult<()> {
        self.rolled_back = true;
        Ok(())
    }
}

#[test]
fn test_store_failure_rolls_back_with_generic_error() {
    opsched::logging::init_test();
    let ctx = TenantContext::new("acme");
    let mut store = FailingStore::default();

    let err = ScheduleReplacer::new()
        .replace(&ctx, 1, &cleanings(1, 2), &audit_ctx(), &mut store)
        .unwrap_err();

    assert!(matches!(err, AppError::OperationsUpdate));
    assert_eq!(err.to_string(), "could not update operations");
    assert!(store.began);
    assert!(store.rolled_back);
    assert!(!store.committed);
    assert!(!store.audited);
}

#[test]
fn test_unexpected_delete_count_aborts() {
    let ctx = TenantContext::new("acme");
    // list reports nothing pending, delete claims one row
    let mut store = FailingStore {
        pending: 1,
        ..Default::default()
    };

    let err = ScheduleReplacer::new()
        .replace(&ctx, 1, &[], &audit_ctx(), &mut store)
        .unwrap_err();
    assert!(matches!(err, AppError::OperationsUpdate));
    assert!(store.rolled_back);
}

#[test]
fn test_sqlite_failure_leaves_rows_untouched() {
    let db_path = setup_test_db("replace_sqlite_rollback");
    let pool = DbPool::open(&db_path).unwrap();
    let ctx = TenantContext::new("acme");
    let event_id = seed_event(&pool, &ctx);
    seed_operations(&pool, &ctx, event_id);

    // the audit insert fails once the log table is gone
    pool.conn.execute_batch("DROP TABLE log;").unwrap();

    let mut store = SqliteOperationStore::new(&pool.conn);
    let err = ScheduleReplacer::new()
        .replace(&ctx, event_id, &cleanings(10, 4), &audit_ctx(), &mut store)
        .unwrap_err();
    assert!(matches!(err, AppError::OperationsUpdate));

    let stored = list_operations(&pool.conn, &ctx, event_id).unwrap();
    assert_eq!(stored.len(), 5);
    assert_eq!(count_status(&stored, OperationStatus::Completed), 2);
    assert_eq!(count_status(&stored, OperationStatus::Scheduled), 3);
}

#[test]
fn test_concurrent_replacements_do_not_interleave() {
    let db_path = setup_test_db("replace_concurrent");
    let ctx = TenantContext::new("acme");
    let event_id = {
        let pool = DbPool::open(&db_path).unwrap();
        let id = seed_event(&pool, &ctx);
        seed_operations(&pool, &ctx, id);
        id
    };

    let replacer = ScheduleReplacer::new();
    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let replacer = replacer.clone();
            let ctx = ctx.clone();
            let db_path = db_path.clone();
            thread::spawn(move || {
                let pool = DbPool::new(&db_path).unwrap();
                let mut store = SqliteOperationStore::new(&pool.conn);
                replacer
                    .replace(&ctx, event_id, &cleanings(10 + i, 3), &audit_ctx(), &mut store)
                    .unwrap()
            })
        })
        .collect();

    let diffs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(diffs.iter().all(|d| d.completed_preserved == 2));

    let pool = DbPool::new(&db_path).unwrap();
    let stored = list_operations(&pool.conn, &ctx, event_id).unwrap();
    assert_eq!(count_status(&stored, OperationStatus::Completed), 2);
    assert_eq!(count_status(&stored, OperationStatus::Scheduled), 3);

    let removed: usize = diffs.iter().map(|d| d.pending_removed).sum();
    assert_eq!(removed, 3 + 3 * 3);
    assert_eq!(replacer.tracked_events(), 0);
}

#[test]
fn test_event_locks_are_released_after_replace() {
    let ctx = TenantContext::new("acme");
    let replacer = ScheduleReplacer::new();

    let db_path = setup_test_db("replace_lock_release");
    let pool = DbPool::open(&db_path).unwrap();
    let event_id = seed_event(&pool, &ctx);
    let mut store = SqliteOperationStore::new(&pool.conn);
    replacer
        .replace(&ctx, event_id, &cleanings(1, 2), &audit_ctx(), &mut store)
        .unwrap();
    assert_eq!(replacer.tracked_events(), 0);

    for event_id in 1..=20 {
        let mut store = FailingStore::default();
        let result = replacer.replace(&ctx, event_id, &cleanings(1, 1), &audit_ctx(), &mut store);
        assert!(result.is_err());
    }
    assert_eq!(replacer.tracked_events(), 0);
}
