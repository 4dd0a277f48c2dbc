//! Derived views: pure functions over current store state.
//!
//! Nothing here mutates; every function is recomputed on demand from the
//! tickets and agents it is given, which keeps the view layer a pure reader
//! of the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Agent, Priority, Ticket, TicketStatus};

// --- Filtering ---

/// Inbox filter state. All predicates compose with AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    /// Case-insensitive substring match against client, id, and subject.
    #[serde(default)]
    pub search: String,
    /// Only tickets with no assigned agent.
    #[serde(default)]
    pub unassigned_only: bool,
    /// Exact status match; `None` means "All".
    #[serde(default)]
    pub status: Option<TicketStatus>,
    /// Case-insensitive substring match against the assigned agent's name.
    /// A non-empty filter never matches an unassigned ticket.
    #[serde(default)]
    pub agent_name: String,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket, agents: &[Agent]) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || ticket.client.to_lowercase().contains(&needle)
            || ticket.id.to_lowercase().contains(&needle)
            || ticket.subject.to_lowercase().contains(&needle);

        let matches_unassigned = !self.unassigned_only || ticket.assigned_agent_id.is_none();
        let matches_status = self.status.map_or(true, |s| ticket.status == s);

        let matches_agent = if self.agent_name.trim().is_empty() {
            true
        } else {
            ticket
                .assigned_agent_id
                .as_deref()
                .and_then(|id| agents.iter().find(|a| a.id == id))
                .map_or(false, |a| {
                    a.name
                        .to_lowercase()
                        .contains(&self.agent_name.to_lowercase())
                })
        };

        matches_search && matches_unassigned && matches_status && matches_agent
    }
}

/// Filter tickets for the inbox table, preserving store order.
pub fn filter_tickets<'a>(
    tickets: &'a [Ticket],
    agents: &[Agent],
    filter: &TicketFilter,
) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| filter.matches(t, agents)).collect()
}

// --- Sorting ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Client,
    Priority,
    SlaDeadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort tickets by a single key. Ties keep their incoming relative order.
pub fn sort_tickets(tickets: &mut Vec<&Ticket>, key: SortKey, order: SortOrder) {
    tickets.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Client => a.client.cmp(&b.client),
            SortKey::Priority => a.priority.weight().cmp(&b.priority.weight()),
            SortKey::SlaDeadline => a.sla_deadline.cmp(&b.sla_deadline),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

// --- SLA countdown ---

/// Time left against a ticket's SLA deadline, as shown in the inbox table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    /// Deadline has passed; terminal display state.
    Expired,
    Remaining { hours: i64, minutes: i64 },
}

impl TimeRemaining {
    pub fn is_expired(self) -> bool {
        matches!(self, TimeRemaining::Expired)
    }
}

impl std::fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRemaining::Expired => write!(f, "Expired"),
            TimeRemaining::Remaining { hours: 0, minutes } => write!(f, "{}m", minutes),
            TimeRemaining::Remaining { hours, minutes } => {
                write!(f, "{}h {}m", hours, minutes)
            }
        }
    }
}

/// Lazily computed countdown; no timer drives SLA expiry.
pub fn time_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let remaining = deadline - now;
    if remaining < chrono::Duration::zero() {
        return TimeRemaining::Expired;
    }
    let minutes = remaining.num_minutes();
    TimeRemaining::Remaining {
        hours: minutes / 60,
        minutes: minutes % 60,
    }
}

// --- Client history ---

/// Other tickets filed under the same email, excluding the ticket itself.
pub fn client_history<'a>(tickets: &'a [Ticket], ticket: &Ticket) -> Vec<&'a Ticket> {
    tickets
        .iter()
        .filter(|t| t.email == ticket.email && t.id != ticket.id)
        .collect()
}

// --- Timeline ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    Note,
    System,
}

/// One entry in a ticket's merged timeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: TimelineKind,
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub content: String,
}

/// The ticket's notes merged with synthetic lifecycle events, most recent
/// first. Creation always appears; a closed event is added while the ticket
/// is in `Closed` status.
pub fn timeline(ticket: &Ticket, now: DateTime<Utc>) -> Vec<TimelineEvent> {
    let mut events: Vec<TimelineEvent> = ticket
        .internal_notes
        .iter()
        .map(|note| TimelineEvent {
            kind: TimelineKind::Note,
            id: note.id.clone(),
            timestamp: note.timestamp,
            author: note.author.clone(),
            content: note.content.clone(),
        })
        .collect();

    events.push(TimelineEvent {
        kind: TimelineKind::System,
        id: "created".into(),
        timestamp: ticket.created_at,
        author: "System".into(),
        content: format!("Case {} initiated via inbound channel.", ticket.id),
    });

    if ticket.status == TicketStatus::Closed {
        events.push(TimelineEvent {
            kind: TimelineKind::System,
            id: "closed".into(),
            timestamp: now,
            author: "System".into(),
            content: "Ticket status transitioned to CLOSED.".into(),
        });
    }

    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events
}

// --- Workload ---

/// Display heuristic: percentage of a ten-ticket reference load, clamped to
/// 100. Not an enforced cap.
pub fn workload_capacity(agent: &Agent) -> f64 {
    let pct = agent.assigned_tickets.len() as f64 / 10.0 * 100.0;
    pct.min(100.0)
}

// --- Shift report ---

/// Aggregate counters for the shift performance view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    pub total: usize,
    pub closed: usize,
    pub open_backlog: usize,
    pub urgent: usize,
    pub high: usize,
    pub low: usize,
    /// Percentage of tickets that are closed or still inside their deadline.
    pub sla_compliance: u8,
}

pub fn shift_report(tickets: &[Ticket], now: DateTime<Utc>) -> ShiftReport {
    let total = tickets.len();
    let closed = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Closed)
        .count();
    let within_sla = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Closed || t.sla_deadline > now)
        .count();
    let sla_compliance = if total == 0 {
        100
    } else {
        (within_sla * 100 / total) as u8
    };

    ShiftReport {
        total,
        closed,
        open_backlog: total - closed,
        urgent: count_priority(tickets, Priority::Urgent),
        high: count_priority(tickets, Priority::High),
        low: count_priority(tickets, Priority::Low),
        sla_compliance,
    }
}

fn count_priority(tickets: &[Ticket], priority: Priority) -> usize {
    tickets.iter().filter(|t| t.priority == priority).count()
}
