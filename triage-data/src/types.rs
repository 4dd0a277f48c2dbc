use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Author recorded on notes written from the dashboard.
pub const SUPERVISOR_AUTHOR: &str = "Alex Supervisor";

/// Default frustration score for tickets created from the intake form.
pub const DEFAULT_FRUSTRATION_LEVEL: u8 = 3;

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    High,
    Urgent,
}

impl Priority {
    /// Ordinal weight used for priority sorting: Urgent > High > Low.
    pub fn weight(self) -> u8 {
        match self {
            Priority::Urgent => 3,
            Priority::High => 2,
            Priority::Low => 1,
        }
    }

    /// SLA window granted at creation time, before any policy-driven reset.
    pub fn initial_sla_window(self) -> Duration {
        match self {
            Priority::Urgent => Duration::minutes(30),
            Priority::High => Duration::hours(2),
            Priority::Low => Duration::hours(24),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::High => write!(f, "High"),
            Priority::Urgent => write!(f, "Urgent"),
        }
    }
}

/// Ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    Pending,
    Closed,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "Open"),
            TicketStatus::Pending => write!(f, "Pending"),
            TicketStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TicketStatus::Open),
            "pending" => Ok(TicketStatus::Pending),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(format!("invalid ticket status: {}", s)),
        }
    }
}

/// Agent availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    Online,
    Busy,
}

/// An internal note on a ticket's timeline. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A customer support case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub client: String,
    /// Correlation key for client history.
    pub email: String,
    pub subject: String,
    pub priority: Priority,
    pub sla_deadline: DateTime<Utc>,
    pub assigned_agent_id: Option<String>,
    pub internal_notes: Vec<Note>,
    /// Informational 1-10 severity score, not used in computed logic.
    pub frustration_level: u8,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// A support-team member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub status: AgentStatus,
    /// Ticket ids, semantically a set; insertion order preserved.
    pub assigned_tickets: Vec<String>,
    /// Opaque avatar URL, display-only.
    pub avatar: String,
    pub team: String,
}

/// Per-priority SLA time limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaConfig {
    pub priority: Priority,
    /// Time limit in minutes.
    pub time_limit: i64,
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Alert,
    Info,
    Success,
}

/// A user-facing event derived from a store mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

/// New-ticket intake form, as submitted from the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketForm {
    pub client: String,
    pub email: String,
    pub subject: String,
    pub priority: Priority,
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Optional opening note, recorded under the supervisor identity.
    #[serde(default)]
    pub note: Option<String>,
}

impl TicketForm {
    /// Build a full ticket from the form. The caller supplies the unique id;
    /// the SLA deadline comes from the priority's creation-time window.
    pub fn build(&self, id: String, now: DateTime<Utc>) -> Ticket {
        let internal_notes = match &self.note {
            Some(content) if !content.trim().is_empty() => vec![Note {
                id: format!("{}-n1", id),
                author: SUPERVISOR_AUTHOR.to_string(),
                content: content.clone(),
                timestamp: now,
            }],
            _ => Vec::new(),
        };

        Ticket {
            id,
            client: self.client.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            priority: self.priority,
            sla_deadline: now + self.priority.initial_sla_window(),
            assigned_agent_id: self.agent_id.clone(),
            internal_notes,
            frustration_level: DEFAULT_FRUSTRATION_LEVEL,
            status: TicketStatus::Open,
            created_at: now,
        }
    }
}

/// Partial ticket update. Absent fields are left untouched.
///
/// `assigned_agent_id` distinguishes "absent" (no change) from an explicit
/// `null` (unassign): the outer `Option` is presence, the inner is the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frustration_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<Option<String>>,
}
