use super::tenant_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;

/// Handle the `config` subcommand: the effective configuration after
/// `--db` / `--tenant` overrides.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config { print_config } = cmd else {
        return Ok(());
    };

    if !*print_config {
        info("Nothing to do. Use `config --print` to show the configuration.");
        return Ok(());
    }

    let path = Config::config_file();
    let origin = if path.exists() { "file" } else { "defaults" };
    println!("📄 Configuration ({}, {}):\n", path.display(), origin);
    print!("{}", cfg.to_yaml()?);

    let ctx = tenant_context(cfg);
    println!("\n👤 Acting as {} in tenant {}", ctx.actor(), ctx.tenant_id);
    Ok(())
}
