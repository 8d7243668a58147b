//! Tenant eligibility for login and registration

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use warden_common::TenantId;
use warden_config::TenantConfig;

use crate::error::AuthError;
use crate::shared::domain::repositories::TenantDirectory;

pub struct TenantValidator {
    tenants: Arc<dyn TenantDirectory>,
    enabled: bool,
    default_tenant: TenantId,
}

impl TenantValidator {
    pub fn new(tenants: Arc<dyn TenantDirectory>, config: &TenantConfig) -> Self {
        Self {
            tenants,
            enabled: config.enabled,
            default_tenant: TenantId::new(config.default_tenant_id.clone()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn default_tenant(&self) -> &TenantId {
        &self.default_tenant
    }

    /// Returns the tenant the request will act as.
    ///
    /// Checks run in a fixed order and the first failure wins: required,
    /// exists, not disabled, not expired. A directory outage rejects the request.
    pub async fn validate(&self, tenant_id: Option<&str>) -> Result<TenantId, AuthError> {
        if !self.enabled {
            return Ok(self.default_tenant.clone());
        }

        let tenant = match tenant_id.map(str::trim) {
            Some(id) if !id.is_empty() => TenantId::from(id),
            _ => return Err(AuthError::TenantRequired),
        };
        if tenant == self.default_tenant {
            return Ok(tenant);
        }

        let record = self
            .tenants
            .find_by_tenant_id(&tenant)
            .await
            .map_err(|e| AuthError::DependencyUnavailable(e.to_string()))?;

        let Some(record) = record else {
            info!(tenant_id = %tenant, "Login tenant does not exist");
            return Err(AuthError::TenantNotFound(tenant.to_string()));
        };
        if !record.status.is_normal() {
            info!(tenant_id = %tenant, "Login tenant is disabled");
            return Err(AuthError::TenantDisabled(tenant.to_string()));
        }
        if record.is_expired_at(Utc::now()) {
            info!(tenant_id = %tenant, "Login tenant has expired");
            return Err(AuthError::TenantExpired(tenant.to_string()));
        }

        debug!(tenant_id = %tenant, "Tenant validated");
        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::domain::entities::{RecordStatus, TenantRecord};
    use crate::shared::infrastructure::persistence::InMemoryTenantDirectory;
    use chrono::Duration;

    fn validator(enabled: bool) -> (TenantValidator, Arc<InMemoryTenantDirectory>) {
        let tenants = Arc::new(InMemoryTenantDirectory::new());
        let config = TenantConfig {
            enabled,
            default_tenant_id: "000000".into(),
        };
        (TenantValidator::new(tenants.clone(), &config), tenants)
    }

    #[tokio::test]
    async fn test_disabled_multi_tenancy_always_passes() {
        let (validator, tenants) = validator(false);
        tenants.set_unavailable(true);

        let tenant = validator.validate(None).await.unwrap();
        assert_eq!(tenant.as_str(), "000000");
    }

    #[tokio::test]
    async fn test_blank_tenant_is_required() {
        let (validator, _) = validator(true);
        assert!(matches!(validator.validate(None).await, Err(AuthError::TenantRequired)));
        assert!(matches!(validator.validate(Some("  ")).await, Err(AuthError::TenantRequired)));
    }

    #[tokio::test]
    async fn test_default_tenant_skips_lookup() {
        let (validator, tenants) = validator(true);
        tenants.set_unavailable(true);
        assert!(validator.validate(Some("000000")).await.is_ok());
    }

    #[tokio::test]
    async fn test_status_checks_in_order() {
        let (validator, tenants) = validator(true);
        tenants.insert(
            TenantRecord::new("t-both", "Both")
                .with_status(RecordStatus::Disabled)
                .with_expire_time(Utc::now() - Duration::days(1)),
        );
        tenants.insert(
            TenantRecord::new("t-expired", "Expired").with_expire_time(Utc::now() - Duration::days(1)),
        );
        tenants.insert(
            TenantRecord::new("t-ok", "Ok").with_expire_time(Utc::now() + Duration::days(30)),
        );

        assert!(matches!(
            validator.validate(Some("missing")).await,
            Err(AuthError::TenantNotFound(_))
        ));
        assert!(matches!(
            validator.validate(Some("t-both")).await,
            Err(AuthError::TenantDisabled(_))
        ));
        assert!(matches!(
            validator.validate(Some("t-expired")).await,
            Err(AuthError::TenantExpired(_))
        ));
        assert_eq!(
            validator.validate(Some("t-ok")).await.unwrap(),
            TenantId::from("t-ok")
        );
    }

    #[tokio::test]
    async fn test_directory_outage_fails_closed() {
        let (validator, tenants) = validator(true);
        tenants.set_unavailable(true);
        assert!(matches!(
            validator.validate(Some("t1")).await,
            Err(AuthError::DependencyUnavailable(_))
        ));
    }
}
