/// Explicit request context threaded through every Event Source and
/// Operation Store call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantContext {
    pub tenant_id: String,
    pub user_id: Option<String>,
}

impl TenantContext {
    pub fn new(tenant_id: &str) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    /// Audit actor label: the user when known, else the tenant.
    pub fn actor(&self) -> &str {
        self.user_id.as_deref().unwrap_or(&self.tenant_id)
    }
}
