use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::auth::domain::events::{AuditPublisher, LoginInfoEvent};
use crate::infrastructure::observability::metrics;

/// Bounded in-process audit queue.
///
/// `publish` never waits. When the queue is full the event is moved to a
/// detached task that waits for capacity, so a burst of logins costs memory
/// rather than latency and no event is lost while the workers are alive.
#[derive(Clone)]
pub struct ChannelAuditPublisher {
    sender: mpsc::Sender<LoginInfoEvent>,
}

impl ChannelAuditPublisher {
    /// Publisher and the receiving end to hand to an `AuditWorkerPool`.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<LoginInfoEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    pub fn queue_depth(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }
}

impl AuditPublisher for ChannelAuditPublisher {
    fn publish(&self, event: LoginInfoEvent) {
        let kind = event.kind.as_str();
        match self.sender.try_send(event) {
            Ok(()) => {
                metrics::record_audit_published(kind);
                metrics::set_audit_queue_depth(self.queue_depth());
            }
            Err(TrySendError::Full(event)) => {
                let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                    warn!(kind, "Audit queue full outside a runtime, event dropped");
                    metrics::record_audit_dropped();
                    return;
                };
                metrics::record_audit_spilled();
                let sender = self.sender.clone();
                runtime.spawn(async move {
                    match sender.send(event).await {
                        Ok(()) => metrics::record_audit_published(kind),
                        Err(_) => {
                            warn!(kind, "Audit queue closed while waiting, event dropped");
                            metrics::record_audit_dropped();
                        }
                    }
                });
            }
            Err(TrySendError::Closed(event)) => {
                warn!(
                    kind,
                    username = %event.username,
                    tenant_id = %event.tenant_id,
                    "Audit queue closed, event dropped"
                );
                metrics::record_audit_dropped();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::events::AuditKind;
    use crate::shared::domain::value_objects::RequestMeta;
    use warden_common::TenantId;

    fn event(username: &str) -> LoginInfoEvent {
        LoginInfoEvent::new(
            TenantId::from("t1"),
            username,
            AuditKind::LoginFail,
            "Incorrect account or password",
            RequestMeta::new("127.0.0.1"),
        )
    }

    #[tokio::test]
    async fn test_full_queue_spills_without_blocking() {
        let (publisher, mut receiver) = ChannelAuditPublisher::channel(1);

        publisher.publish(event("first"));
        publisher.publish(event("second"));
        assert_eq!(publisher.queue_depth(), 1);

        assert_eq!(receiver.recv().await.unwrap().username, "first");
        assert_eq!(receiver.recv().await.unwrap().username, "second");
    }

    #[tokio::test]
    async fn test_closed_queue_drops_quietly() {
        let (publisher, receiver) = ChannelAuditPublisher::channel(4);
        drop(receiver);
        publisher.publish(event("late"));
    }
}
