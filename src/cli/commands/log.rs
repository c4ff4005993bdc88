use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print, event } = cmd else {
        return Ok(());
    };

    if !*print {
        info("Nothing to do. Use `log --print [--event ID]`.");
        return Ok(());
    }

    let pool = DbPool::open(cfg.database_path())?;
    LogLogic::print_log(&pool.conn, *event)
}
