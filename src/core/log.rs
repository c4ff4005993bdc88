use crate::db::log::load_log;
use crate::errors::AppResult;
use ansi_term::Colour;
use rusqlite::Connection;

const MAX_OP_WIDTH: usize = 40;

/// ANSI colour of an audit operation label.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "regenerate_operations" => Colour::Green,
        "event_add" => Colour::Cyan,
        "operation_status" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Print the audit log, optionally only the rows targeting one event.
    pub fn print_log(conn: &Connection, event_id: Option<i64>) -> AppResult<()> {
        let target_filter = event_id.map(|id| format!("event:{id}"));
        let entries: Vec<_> = load_log(conn)?
            .into_iter()
            .filter(|e| target_filter.as_ref().is_none_or(|t| &e.target == t))
            .collect();

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let rows: Vec<_> = entries
            .into_iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(e.date);

                // op and target share one column; width is computed without ANSI codes
                let mut target = e.target;
                if target.chars().count() > MAX_OP_WIDTH {
                    target = target.chars().take(MAX_OP_WIDTH - 3).collect::<String>() + "...";
                }
                (e.id, date, e.operation, target, e.message)
            })
            .collect();

        let id_w = rows.iter().map(|r| r.0.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(10);
        let op_w = rows
            .iter()
            .map(|r| op_label_len(&r.2, &r.3))
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, target, message) in rows {
            let color = color_for_operation(&operation);
            let visible = op_label_len(&operation, &target);
            let label = if target.is_empty() {
                color.paint(operation.as_str()).to_string()
            } else {
                format!("{} ({})", color.paint(operation.as_str()), target)
            };
            let padding = " ".repeat(op_w.saturating_sub(visible));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                label,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

fn op_label_len(operation: &str, target: &str) -> usize {
    if target.is_empty() {
        operation.chars().count()
    } else {
        operation.chars().count() + target.chars().count() + 3
    }
}
