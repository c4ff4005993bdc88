use super::tenant_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::regenerate::RegenerateLogic;
use crate::core::replace::ScheduleReplacer;
use crate::core::strategy::FallbackGenerator;
use crate::db::pool::DbPool;
use crate::db::sources::{SqliteEventSource, SqliteOperationStore};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Regenerate { id } = cmd else {
        return Ok(());
    };

    let pool = DbPool::open(cfg.database_path())?;
    let ctx = tenant_context(cfg);
    let generator = FallbackGenerator::from_settings(cfg.remote_generator.as_deref(), cfg.buffer_hours);
    let replacer = ScheduleReplacer::new();

    let mut source = SqliteEventSource::new(&pool.conn);
    let mut store = SqliteOperationStore::new(&pool.conn);

    let diff = RegenerateLogic::apply(&ctx, *id, &mut source, &generator, &replacer, &mut store)?;

    success(format!("{} operations created", diff.inserted));
    if diff.completed_preserved > 0 {
        info(format!("{} completed operations kept", diff.completed_preserved));
    }
    Ok(())
}
