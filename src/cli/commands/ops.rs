use super::tenant_context;
use crate::cli::parser::{Commands, OpsAction};
use crate::config::Config;
use crate::core::ops::OpsLogic;
use crate::db::pool::DbPool;
use crate::db::queries::list_operations;
use crate::errors::AppResult;
use crate::models::operation::{Operation, OperationStatus};
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::describe_operation;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Ops { action } = cmd else {
        return Ok(());
    };

    let pool = DbPool::open(cfg.database_path())?;
    let ctx = tenant_context(cfg);

    match action {
        OpsAction::List { id, json } => {
            let stored = list_operations(&pool.conn, &ctx, *id)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&stored)?);
            } else if stored.is_empty() {
                info(format!("No operations stored for event {}.", id));
            } else {
                let rows: Vec<(Option<i64>, &Operation)> =
                    stored.iter().map(|s| (Some(s.id), &s.operation)).collect();
                print!("{}", render_operations(&rows));
            }
        }

        OpsAction::Status { op_id, status } => {
            let next = OperationStatus::from_code(status)?;
            let op = OpsLogic::set_status(&pool.conn, &ctx, *op_id, next)?;
            success(format!(
                "Operation {} ({} on {}) is now {}.",
                op.id,
                op.operation.kind.to_db_str(),
                op.operation.date_str(),
                next.to_db_str()
            ));
        }
    }

    Ok(())
}

/// Table of operations; `id` is blank for unsaved ones.
pub fn render_operations(rows: &[(Option<i64>, &Operation)]) -> String {
    let mut table = Table::new(vec![
        Column::new("ID", 5),
        Column::new("DATE", 10),
        Column::new("TIME", 5),
        Column::new("TYPE", 14),
        Column::new("VEHICLE", 7),
        Column::new("MIN", 4),
        Column::new("STATUS", 11),
        Column::new("NOTES", 0),
    ]);

    for (id, op) in rows {
        let (label, _) = describe_operation(op.kind);
        table.add_row(vec![
            id.map(|i| i.to_string()).unwrap_or_default(),
            op.date_str(),
            op.time_str(),
            label,
            op.vehicle_class.to_db_str().to_string(),
            op.duration_minutes.to_string(),
            op.status.to_db_str().to_string(),
            op.notes.clone(),
        ]);
    }

    // Color whole lines by type/status, padding stays aligned.
    let rendered = table.render();
    let mut out = String::new();
    for (i, line) in rendered.lines().enumerate() {
        match i.checked_sub(1).and_then(|r| rows.get(r)) {
            Some((_, op)) => {
                let status_color = color_for_status(op.status.to_db_str());
                let color = if status_color == RESET {
                    describe_operation(op.kind).1
                } else {
                    status_color
                };
                out.push_str(&format!("{color}{line}{RESET}\n"));
            }
            None => out.push_str(&format!("{line}\n")),
        }
    }
    out
}
