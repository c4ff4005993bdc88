use crate::core::ports::{EventSource, OperationStore};
use crate::core::replace::ScheduleReplacer;
use crate::core::strategy::FallbackGenerator;
use crate::errors::AppResult;
use crate::models::operation::Operation;
use crate::models::schedule_diff::{AuditContext, GenerationPath, ScheduleDiff};
use crate::models::tenant::TenantContext;

/// End-to-end regeneration of one event's schedule.
pub struct RegenerateLogic;

impl RegenerateLogic {
    /// Load the event, generate through the fallback chain, no persistence.
    pub fn preview(
        ctx: &TenantContext,
        event_id: i64,
        source: &mut dyn EventSource,
        generator: &FallbackGenerator,
    ) -> AppResult<(Vec<Operation>, GenerationPath)> {
        let event = source.load_event(ctx, event_id)?;
        generator.generate(&event)
    }

    /// Load → generate → replace. Returns the diff of the replacement.
    pub fn apply(
        ctx: &TenantContext,
        event_id: i64,
        source: &mut dyn EventSource,
        generator: &FallbackGenerator,
        replacer: &ScheduleReplacer,
        store: &mut dyn OperationStore,
    ) -> AppResult<ScheduleDiff> {
        let event = source.load_event(ctx, event_id)?;
        let (ops, path) = generator.generate(&event)?;

        let context = AuditContext {
            path,
            event_class: event.class,
            origin: event.window.origin,
        };
        replacer.replace(ctx, event_id, &ops, &context, store)
    }
}
