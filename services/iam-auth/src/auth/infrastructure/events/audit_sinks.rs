use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;
use warden_errors::AppResult;

use crate::auth::domain::events::{AuditKind, AuditRecord, AuditSink};

/// Writes every record to the log; the default when no store is configured.
#[derive(Debug, Default, Clone)]
pub struct LoggingAuditSink;

#[async_trait]
impl AuditSink for LoggingAuditSink {
    async fn append(&self, record: AuditRecord) -> AppResult<()> {
        info!(
            tenant_id = %record.tenant_id,
            username = %record.username,
            kind = record.kind.as_str(),
            status = record.status.as_str(),
            ipaddr = %record.ipaddr,
            client_key = %record.client_key,
            "Audit record appended"
        );
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAuditSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    pub fn count_of(&self, kind: AuditKind) -> usize {
        self.records.lock().iter().filter(|r| r.kind == kind).count()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, record: AuditRecord) -> AppResult<()> {
        self.records.lock().push(record);
        Ok(())
    }
}

/// Appends to every inner sink in order; the first failure is returned after
/// all sinks were tried.
pub struct BroadcastAuditSink {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl BroadcastAuditSink {
    pub fn new(sinks: Vec<Arc<dyn AuditSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl AuditSink for BroadcastAuditSink {
    async fn append(&self, record: AuditRecord) -> AppResult<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.append(record.clone()).await {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
