//! Shared data layer for the Triage support dashboard.
//!
//! This crate holds the domain core: the ticket/agent/notification types,
//! the single coordinating [`store::InboxStore`], the SLA policy, the pure
//! derived-view queries the dashboard renders from, and the demo seed data.
//! It is consumed by `triage-web`, which puts an HTTP and WebSocket surface
//! on top.

pub mod queries;
pub mod seed;
pub mod sla;
pub mod store;
pub mod types;

pub use seed::Snapshot;
pub use sla::SlaPolicy;
pub use store::InboxStore;
pub use types::{
    Agent, AgentStatus, Note, Notification, NotificationKind, Priority, SlaConfig, Ticket,
    TicketForm, TicketPatch, TicketStatus,
};
