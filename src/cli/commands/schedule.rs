use super::ops::render_operations;
use super::tenant_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::regenerate::RegenerateLogic;
use crate::core::strategy::FallbackGenerator;
use crate::db::pool::DbPool;
use crate::db::sources::SqliteEventSource;
use crate::errors::AppResult;
use crate::models::operation::Operation;
use crate::ui::messages::header;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Schedule { id, json } = cmd else {
        return Ok(());
    };

    let pool = DbPool::open(cfg.database_path())?;
    let ctx = tenant_context(cfg);
    let generator = FallbackGenerator::from_settings(cfg.remote_generator.as_deref(), cfg.buffer_hours);

    let mut source = SqliteEventSource::new(&pool.conn);
    let (ops, path) = RegenerateLogic::preview(&ctx, *id, &mut source, &generator)?;

    if *json {
        println!("{}", serde_json::to_string_pretty(&ops)?);
        return Ok(());
    }

    header(format!("Schedule for event {} ({} path)", id, path));
    let rows: Vec<(Option<i64>, &Operation)> = ops.iter().map(|op| (None, op)).collect();
    print!("{}", render_operations(&rows));
    Ok(())
}
