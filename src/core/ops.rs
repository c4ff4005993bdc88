use crate::db::log::ttlog;
use crate::db::queries::{get_operation, update_operation_status};
use crate::errors::{AppError, AppResult};
use crate::models::operation::{OperationStatus, StoredOperation};
use crate::models::tenant::TenantContext;
use rusqlite::Connection;

pub struct OpsLogic;

impl OpsLogic {
    /// Move a stored operation to `next`. COMPLETED is terminal.
    pub fn set_status(
        conn: &Connection,
        ctx: &TenantContext,
        op_id: i64,
        next: OperationStatus,
    ) -> AppResult<StoredOperation> {
        let mut op = get_operation(conn, ctx, op_id)?.ok_or(AppError::OperationNotFound(op_id))?;
        let current = op.operation.status;

        if !current.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: current.to_db_str().to_string(),
                to: next.to_db_str().to_string(),
            });
        }

        update_operation_status(conn, ctx, op_id, next)?;
        ttlog(
            conn,
            "operation_status",
            &format!("operation:{op_id}"),
            &format!("{} → {}", current.to_db_str(), next.to_db_str()),
        )?;

        op.operation.status = next;
        Ok(op)
    }
}
