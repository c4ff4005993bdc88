use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists. It doubles as the migration ledger.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_events",
        description: "Created events table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS events (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id          TEXT NOT NULL,
            start_date         TEXT NOT NULL,
            end_date           TEXT NOT NULL,
            start_time         TEXT,
            end_time           TEXT,
            mobilization_at    TEXT,
            demobilization_at  TEXT,
            source             TEXT NOT NULL DEFAULT 'AUTO' CHECK(source IN ('AUTO','MANUAL')),
            class              TEXT NOT NULL DEFAULT 'other',
            recurrence         TEXT,
            created_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_tenant ON events(tenant_id, id);
        "#,
    },
    Migration {
        version: "20250301_0002_create_operations",
        description: "Created operations table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS operations (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id         TEXT NOT NULL,
            event_id          INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            type              TEXT NOT NULL
                              CHECK(type IN ('MOBILIZATION','CLEANING','SUCTION','DEMOBILIZATION')),
            subtype           TEXT,
            date              TEXT NOT NULL,
            time              TEXT NOT NULL,
            duration_minutes  INTEGER NOT NULL DEFAULT 60,
            vehicle_class     TEXT NOT NULL CHECK(vehicle_class IN ('CARGO','TANK')),
            status            TEXT NOT NULL DEFAULT 'SCHEDULED',
            notes             TEXT NOT NULL DEFAULT '',
            created_at        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_operations_event_date_time
            ON operations(tenant_id, event_id, date, time);
        "#,
    },
    Migration {
        version: "20250318_0003_operations_status_index",
        description: "Indexed operations by status",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_operations_event_status
            ON operations(tenant_id, event_id, status);
        "#,
    },
];

/// Public entry point: run all pending migrations, in order, each one
/// recorded in `log` and skipped once applied.
///
/// Called from `DbPool::open`.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        conn.execute_batch(m.sql)?;
        mark_applied(conn, m.version, m.description)?;
        info!(version = m.version, "migration applied");
    }

    Ok(())
}
