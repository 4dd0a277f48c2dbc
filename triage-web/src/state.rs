use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};

use triage_data::types::{Priority, Ticket, TicketForm, TicketPatch, TicketStatus};
use triage_data::{InboxStore, Snapshot};

/// Shared application state accessible by all handlers.
///
/// The inbox store is the only writer of ticket/agent state; handlers go
/// through the methods here, which serialize mutations behind the write
/// lock and notify WebSocket clients after each one.
pub struct AppState {
    inbox: RwLock<InboxStore>,
    /// Broadcast channel for notifying WebSocket clients of updates
    update_tx: broadcast::Sender<()>,
}

impl AppState {
    /// State seeded with the built-in demo queue.
    pub fn new() -> Arc<Self> {
        Self::from_snapshot(Snapshot::demo(Utc::now()))
    }

    /// State with no tickets or agents, for tests.
    pub fn empty() -> Arc<Self> {
        Self::from_snapshot(Snapshot::empty())
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Arc<Self> {
        let (update_tx, _) = broadcast::channel(16);
        Arc::new(Self {
            inbox: RwLock::new(InboxStore::new(snapshot)),
            update_tx,
        })
    }

    /// Subscribe to update notifications
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.update_tx.subscribe()
    }

    // --- Reads ---

    pub async fn snapshot(&self) -> Snapshot {
        self.inbox.read().await.snapshot()
    }

    pub async fn ticket(&self, id: &str) -> Option<Ticket> {
        self.inbox.read().await.ticket(id).cloned()
    }

    pub async fn ticket_exists(&self, id: &str) -> bool {
        self.inbox.read().await.ticket(id).is_some()
    }

    pub async fn next_ticket_id(&self) -> String {
        self.inbox.read().await.next_ticket_id()
    }

    /// Run a read-only closure against the store.
    pub async fn read<T>(&self, f: impl FnOnce(&InboxStore) -> T) -> T {
        f(&*self.inbox.read().await)
    }

    // --- Mutations (controller surface) ---

    pub async fn assign(&self, ticket_id: &str, agent_id: Option<&str>) {
        tracing::debug!(ticket_id, ?agent_id, "assigning ticket");
        self.mutate(|store| store.assign(ticket_id, agent_id)).await;
    }

    pub async fn update(&self, ticket_id: &str, patch: TicketPatch) {
        self.mutate(|store| store.update(ticket_id, patch)).await;
    }

    pub async fn create(&self, form: &TicketForm) -> Ticket {
        let mut inbox = self.inbox.write().await;
        let ticket = form.build(inbox.next_ticket_id(), Utc::now());
        tracing::debug!(id = %ticket.id, client = %ticket.client, "creating ticket");
        inbox.create(ticket.clone());
        drop(inbox);
        let _ = self.update_tx.send(());
        ticket
    }

    pub async fn close(&self, ticket_id: &str) {
        self.mutate(|store| store.close(ticket_id)).await;
    }

    pub async fn add_note(
        &self,
        ticket_id: &str,
        content: &str,
        new_status: Option<TicketStatus>,
    ) {
        self.mutate(|store| store.add_note(ticket_id, content, new_status))
            .await;
    }

    pub async fn mark_notification_read(&self, id: &str) {
        self.mutate(|store| store.mark_notification_read(id)).await;
    }

    pub async fn clear_notifications(&self) {
        self.mutate(InboxStore::clear_notifications).await;
    }

    pub async fn set_sla_limit(&self, priority: Priority, minutes: i64) {
        self.mutate(|store| store.set_sla_limit(priority, minutes))
            .await;
    }

    /// Apply a mutation under the write lock and notify subscribers.
    async fn mutate(&self, f: impl FnOnce(&mut InboxStore)) {
        {
            let mut inbox = self.inbox.write().await;
            f(&mut inbox);
        }
        let _ = self.update_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_state_has_no_tickets() {
        let state = AppState::empty();
        let snapshot = state.snapshot().await;
        assert!(snapshot.tickets.is_empty());
        assert!(snapshot.agents.is_empty());
    }

    #[tokio::test]
    async fn test_demo_state_is_seeded() {
        let state = AppState::new();
        let snapshot = state.snapshot().await;
        assert!(!snapshot.tickets.is_empty());
        assert!(!snapshot.agents.is_empty());
    }

    #[tokio::test]
    async fn test_get_nonexistent_ticket_returns_none() {
        let state = AppState::empty();
        assert!(state.ticket("TK-404").await.is_none());
    }

    #[tokio::test]
    async fn test_mutation_notifies_subscribers() {
        let state = AppState::new();
        let mut rx = state.subscribe();

        state.close("TK-1001").await;

        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_create_returns_built_ticket() {
        let state = AppState::empty();
        let form = TicketForm {
            client: "Alice".into(),
            email: "alice@example.com".into(),
            subject: "Help".into(),
            priority: Priority::High,
            agent_id: None,
            note: None,
        };
        let ticket = state.create(&form).await;
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(state.ticket_exists(&ticket.id).await);
    }
}
