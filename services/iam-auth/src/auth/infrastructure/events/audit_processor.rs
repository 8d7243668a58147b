use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use warden_common::{RetryConfig, with_conditional_retry};
use warden_errors::{AppError, AppResult};

use crate::auth::domain::events::{AuditRecord, AuditSink, LoginInfoEvent};
use crate::infrastructure::observability::metrics;
use crate::shared::domain::repositories::ClientDirectory;
use crate::shared::infrastructure::geo::{GeoIpResolver, resolve_location};

/// Turns a [`LoginInfoEvent`] into an [`AuditRecord`] and stores it.
pub struct AuditProcessor {
    sink: Arc<dyn AuditSink>,
    clients: Arc<dyn ClientDirectory>,
    geo: Arc<dyn GeoIpResolver>,
    geo_timeout: Duration,
    retry: RetryConfig,
}

impl AuditProcessor {
    pub fn new(
        sink: Arc<dyn AuditSink>,
        clients: Arc<dyn ClientDirectory>,
        geo: Arc<dyn GeoIpResolver>,
        geo_timeout: Duration,
    ) -> Self {
        Self {
            sink,
            clients,
            geo,
            geo_timeout,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn build_record(&self, event: LoginInfoEvent) -> AuditRecord {
        let agent = event.request.user_agent_info();
        let login_location =
            resolve_location(self.geo.as_ref(), &event.request.ip, self.geo_timeout).await;

        let (client_key, device_type) = match event.request.client_id.as_deref() {
            Some(client_id) => match self.clients.find_by_client_id(client_id).await {
                Ok(Some(client)) => (client.client_key, client.device_type),
                Ok(None) => Default::default(),
                Err(e) => {
                    warn!(client_id, error = %e, "Client lookup failed while auditing");
                    Default::default()
                }
            },
            None => Default::default(),
        };

        AuditRecord {
            status: event.kind.status(),
            tenant_id: event.tenant_id,
            username: event.username,
            kind: event.kind,
            message: event.message,
            ipaddr: event.request.ip,
            login_location,
            browser: agent.browser,
            os: agent.os,
            client_key,
            device_type,
            login_time: event.occurred_at,
        }
    }

    /// Only transient sink failures are retried.
    pub async fn process(&self, event: LoginInfoEvent) -> AppResult<()> {
        let record = self.build_record(event).await;
        info!(tenant_id = %record.tenant_id, "{}", record.log_line());

        let kind = record.kind.as_str();
        let result = with_conditional_retry(
            &self.retry,
            "audit_sink_append",
            || self.sink.append(record.clone()),
            AppError::is_transient,
        )
        .await;

        match &result {
            Ok(()) => metrics::record_audit_persisted(kind),
            Err(_) => metrics::record_audit_failed(kind),
        }
        result
    }
}
