//! The coordinating controller for the support inbox.
//!
//! `InboxStore` is the single writer of tickets, agents, the SLA policy, and
//! the notification log. Every mutation that touches assignment goes through
//! [`InboxStore::assign`], which keeps the ticket's `assigned_agent_id` and
//! the agents' `assigned_tickets` lists consistent in one place.
//!
//! Mutations are total: unknown ids degrade to no-ops, and no operation
//! leaves the stores inconsistent.

use chrono::Utc;

use crate::seed::Snapshot;
use crate::sla::SlaPolicy;
use crate::types::{
    Agent, Note, Notification, NotificationKind, Priority, Ticket, TicketPatch, TicketStatus,
    SUPERVISOR_AUTHOR,
};

pub struct InboxStore {
    tickets: Vec<Ticket>,
    agents: Vec<Agent>,
    sla: SlaPolicy,
    notifications: Vec<Notification>,
    note_seq: u64,
    notif_seq: u64,
}

impl InboxStore {
    pub fn new(snapshot: Snapshot) -> Self {
        let note_seq = snapshot
            .tickets
            .iter()
            .map(|t| t.internal_notes.len() as u64)
            .sum();
        let notif_seq = snapshot.notifications.len() as u64;
        Self {
            tickets: snapshot.tickets,
            agents: snapshot.agents,
            sla: snapshot.sla,
            notifications: snapshot.notifications,
            note_seq,
            notif_seq,
        }
    }

    /// An empty store with the default SLA policy.
    pub fn empty() -> Self {
        Self::new(Snapshot::empty())
    }

    // --- Read access ---

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn sla(&self) -> &SlaPolicy {
        &self.sla
    }

    pub fn ticket(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Whole-state snapshot, e.g. for saving or pushing to clients.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tickets: self.tickets.clone(),
            agents: self.agents.clone(),
            sla: self.sla.clone(),
            notifications: self.notifications.clone(),
        }
    }

    /// Next unused ticket id in the `TK-<n>` series.
    pub fn next_ticket_id(&self) -> String {
        let max = self
            .tickets
            .iter()
            .filter_map(|t| t.id.strip_prefix("TK-"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(1000);
        format!("TK-{}", max + 1)
    }

    // --- Mutations ---

    /// Assign a ticket to an agent, or unassign it with `None`.
    ///
    /// Applies the full bidirectional bookkeeping in one update: the ticket's
    /// `assigned_agent_id`, removal from the previous holder's list, and
    /// insertion into the new owner's list. Re-assigning to the current
    /// holder leaves the agent lists untouched but still emits the
    /// reassignment notification.
    ///
    /// An unknown agent id is treated as unassignment; an unknown ticket id
    /// is a no-op.
    pub fn assign(&mut self, ticket_id: &str, agent_id: Option<&str>) {
        if self.ticket(ticket_id).is_none() {
            return;
        }
        // Unknown agents degrade to "treat as unassigned".
        let agent_name = agent_id.and_then(|id| self.agent(id).map(|a| a.name.clone()));
        let agent_id = agent_id.filter(|_| agent_name.is_some());

        if let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == ticket_id) {
            ticket.assigned_agent_id = agent_id.map(str::to_string);
        }

        for agent in &mut self.agents {
            let holds = agent.assigned_tickets.iter().any(|id| id == ticket_id);
            let is_new_owner = Some(agent.id.as_str()) == agent_id;
            if holds && !is_new_owner {
                agent.assigned_tickets.retain(|id| id != ticket_id);
            } else if !holds && is_new_owner {
                agent.assigned_tickets.push(ticket_id.to_string());
            }
        }

        if let Some(name) = agent_name {
            self.push_notification(
                NotificationKind::Info,
                "Ticket Reassigned",
                format!("{} has been moved to {}.", ticket_id, name),
            );
        }
    }

    /// Merge a field patch into a ticket. If the patch carries an
    /// assignment, the assignment bookkeeping runs as part of the same call.
    pub fn update(&mut self, ticket_id: &str, patch: TicketPatch) {
        let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == ticket_id) else {
            return;
        };
        if let Some(client) = patch.client {
            ticket.client = client;
        }
        if let Some(email) = patch.email {
            ticket.email = email;
        }
        if let Some(subject) = patch.subject {
            ticket.subject = subject;
        }
        if let Some(priority) = patch.priority {
            ticket.priority = priority;
        }
        if let Some(level) = patch.frustration_level {
            ticket.frustration_level = level;
        }
        if let Some(status) = patch.status {
            ticket.status = status;
        }
        if let Some(assignment) = patch.assigned_agent_id {
            self.assign(ticket_id, assignment.as_deref());
        }
    }

    /// Register a new ticket at the head of the collection (newest first).
    ///
    /// A ticket arriving pre-assigned is run through the assignment
    /// bookkeeping so the agent's list picks it up.
    pub fn create(&mut self, ticket: Ticket) {
        let id = ticket.id.clone();
        let client = ticket.client.clone();
        let assigned = ticket.assigned_agent_id.clone();
        self.tickets.insert(0, ticket);
        if let Some(agent_id) = assigned {
            self.assign(&id, Some(&agent_id));
        }
        self.push_notification(
            NotificationKind::Info,
            "New Ticket Created",
            format!("{} for {} is now active.", id, client),
        );
    }

    /// Close a ticket: status becomes `Closed` and the ticket is unassigned.
    /// This is the only path that transitions a ticket into `Closed` with
    /// the unassignment side effect.
    pub fn close(&mut self, ticket_id: &str) {
        let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == ticket_id) else {
            return;
        };
        ticket.status = TicketStatus::Closed;
        self.assign(ticket_id, None);
        self.push_notification(
            NotificationKind::Success,
            "Case Resolved",
            format!("Ticket {} has been marked as closed.", ticket_id),
        );
    }

    /// Append a timeline note, optionally transitioning status.
    ///
    /// Any non-closing update resets the SLA clock to now plus the policy
    /// limit for the ticket's priority; a closing update leaves the existing
    /// deadline untouched. Closing a ticket that currently has an assigned
    /// agent additionally runs [`InboxStore::close`], so the unassignment
    /// and resolution notification fire.
    pub fn add_note(&mut self, ticket_id: &str, content: &str, new_status: Option<TicketStatus>) {
        let Some(ticket) = self.ticket(ticket_id) else {
            return;
        };
        let final_status = new_status.unwrap_or(ticket.status);
        let priority = ticket.priority;
        let was_assigned = ticket.assigned_agent_id.is_some();

        let now = Utc::now();
        self.note_seq += 1;
        let note = Note {
            id: format!("n{}", self.note_seq),
            author: SUPERVISOR_AUTHOR.to_string(),
            content: content.to_string(),
            timestamp: now,
        };

        let new_deadline = if final_status != TicketStatus::Closed {
            Some(self.sla.deadline_from(now, priority))
        } else {
            None
        };

        if let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == ticket_id) {
            ticket.internal_notes.push(note);
            if let Some(deadline) = new_deadline {
                ticket.sla_deadline = deadline;
            }
            ticket.status = final_status;
        }

        if final_status == TicketStatus::Closed && was_assigned {
            self.close(ticket_id);
        }
    }

    pub fn mark_notification_read(&mut self, id: &str) {
        if let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) {
            notification.is_read = true;
        }
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    pub fn set_sla_limit(&mut self, priority: Priority, minutes: i64) {
        self.sla.set_limit(priority, minutes);
    }

    fn push_notification(&mut self, kind: NotificationKind, title: &str, message: String) {
        self.notif_seq += 1;
        self.notifications.insert(
            0,
            Notification {
                id: format!("notif-{}", self.notif_seq),
                kind,
                title: title.to_string(),
                message,
                timestamp: Utc::now(),
                is_read: false,
            },
        );
    }
}
