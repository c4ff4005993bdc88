pub mod config;
pub mod event;
pub mod init;
pub mod log;
pub mod ops;
pub mod regenerate;
pub mod schedule;

use crate::config::Config;
use crate::models::tenant::TenantContext;

/// Tenant context of a CLI invocation; `--tenant` is already folded into
/// the configuration by `run`.
pub(crate) fn tenant_context(cfg: &Config) -> TenantContext {
    let ctx = TenantContext::new(&cfg.default_tenant);
    match std::env::var("USER") {
        Ok(user) if !user.is_empty() => ctx.with_user(&user),
        _ => ctx,
    }
}
