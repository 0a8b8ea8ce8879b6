//! Tenant and user resolution for inbound requests.
//!
//! Precedence: the tenant header on the request, then `default_tenant`,
//! otherwise the request is rejected.

use serde::Deserialize;

use crate::domain::foundation::TenantId;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct TenancyConfig {
    /// Tenant used when a request carries no tenant header.
    pub default_tenant: Option<String>,

    #[serde(default = "default_tenant_header")]
    pub tenant_header: String,

    #[serde(default = "default_user_header")]
    pub user_header: String,
}

impl TenancyConfig {
    /// The configured fallback tenant, if any.
    pub fn fallback_tenant(&self) -> Option<TenantId> {
        self.default_tenant
            .as_deref()
            .and_then(|t| TenantId::new(t).ok())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(tenant) = &self.default_tenant {
            TenantId::new(tenant.as_str())
                .map_err(|_| ValidationError::InvalidDefaultTenant(tenant.clone()))?;
        }
        for name in [&self.tenant_header, &self.user_header] {
            http::HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ValidationError::InvalidHeaderName(name.clone()))?;
        }
        Ok(())
    }
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            default_tenant: None,
            tenant_header: default_tenant_header(),
            user_header: default_user_header(),
        }
    }
}

fn default_tenant_header() -> String {
    "x-tenant-id".to_string()
}

fn default_user_header() -> String {
    "x-user-id".to_string()
}
