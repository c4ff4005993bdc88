use super::tenant_context;
use crate::cli::parser::{Commands, EventAction};
use crate::config::Config;
use crate::core::event::EventLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::event::{EventClass, EventOrigin, EventWindow};
use crate::models::recurrence::RecurrencePolicy;
use crate::ui::messages::success;
use crate::utils::colors::colorize_optional;
use crate::utils::date::parse_date_strict;
use crate::utils::time::{format_time, parse_optional_time};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Event { action } = cmd else {
        return Ok(());
    };

    let pool = DbPool::open(cfg.database_path())?;
    let ctx = tenant_context(cfg);

    match action {
        EventAction::Add {
            start,
            start_time,
            end,
            end_time,
            mobilization,
            demobilization,
            source,
            class,
            recurrence,
        } => {
            let origin = EventOrigin::from_db_str(source).ok_or_else(|| {
                AppError::Input(format!("Invalid source '{}'. Use auto or manual.", source))
            })?;

            let recurrence = match recurrence {
                Some(raw) => RecurrencePolicy::from_payload_str(raw)?,
                None => None,
            };

            let window = EventWindow {
                start_date: parse_date_strict(start)?,
                end_date: parse_date_strict(end)?,
                start_time: parse_optional_time(start_time.as_ref())?,
                end_time: parse_optional_time(end_time.as_ref())?,
                mobilization_at: mobilization.clone(),
                demobilization_at: demobilization.clone(),
                origin,
                recurrence,
            };

            let id = EventLogic::add(&pool.conn, &ctx, &window, EventClass::from_db_str(class))?;
            success(format!("Event {} registered ({} → {}).", id, start, end));
        }

        EventAction::Show { id } => {
            let row = EventLogic::get(&pool.conn, &ctx, *id)?;
            let opt = |v: Option<String>| colorize_optional(&v.unwrap_or_else(|| "-".into()));

            println!("🎪 Event {} (tenant {})", row.id, row.tenant_id);
            println!("  Start          : {} {}", row.start_date, opt(row.start_time.map(format_time)));
            println!("  End            : {} {}", row.end_date, opt(row.end_time.map(format_time)));
            println!("  Mobilization   : {}", opt(row.mobilization_at.clone()));
            println!("  Demobilization : {}", opt(row.demobilization_at.clone()));
            println!("  Source         : {}", row.source.to_db_str());
            println!("  Class          : {}", row.class.to_db_str());
            println!("  Recurrence     : {}", opt(row.recurrence.clone()));
        }
    }

    Ok(())
}
