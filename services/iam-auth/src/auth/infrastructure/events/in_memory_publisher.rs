use std::sync::Arc;

use parking_lot::Mutex;

use crate::auth::domain::events::{AuditKind, AuditPublisher, LoginInfoEvent};

/// Captures published events in order, for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditPublisher {
    events: Arc<Mutex<Vec<LoginInfoEvent>>>,
}

impl InMemoryAuditPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LoginInfoEvent> {
        self.events.lock().clone()
    }

    pub fn count_of(&self, kind: AuditKind) -> usize {
        self.events.lock().iter().filter(|e| e.kind == kind).count()
    }
}

impl AuditPublisher for InMemoryAuditPublisher {
    fn publish(&self, event: LoginInfoEvent) {
        self.events.lock().push(event);
    }
}
