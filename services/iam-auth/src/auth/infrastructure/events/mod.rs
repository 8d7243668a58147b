//! Login audit pipeline
//!
//! [`ChannelAuditPublisher`] enqueues on the request path; an
//! [`AuditWorkerPool`] drains the queue through an [`AuditProcessor`] into an
//! `AuditSink`.

mod audit_processor;
mod audit_sinks;
mod audit_worker;
mod channel_publisher;
mod in_memory_publisher;

pub use audit_processor::*;
pub use audit_sinks::*;
pub use audit_worker::*;
pub use channel_publisher::*;
pub use in_memory_publisher::*;
