//! Seed data and snapshot load/save.
//!
//! The demo snapshot reproduces the support queue the dashboard ships with:
//! a couple of clients with multi-ticket histories, a dozen agents across
//! teams, and a primed notification tray. Deadlines and creation times are
//! expressed relative to "now" so the queue always renders with a live mix
//! of healthy, close-to-breach, and breached tickets.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::sla::SlaPolicy;
use crate::types::{
    Agent, AgentStatus, Note, Notification, NotificationKind, Priority, Ticket, TicketStatus,
};

/// The serializable whole-state bundle the dashboard boots from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tickets: Vec<Ticket>,
    pub agents: Vec<Agent>,
    #[serde(rename = "slaConfigs")]
    pub sla: SlaPolicy,
    pub notifications: Vec<Notification>,
}

impl Snapshot {
    /// An empty state with the default SLA policy.
    pub fn empty() -> Self {
        Self {
            tickets: Vec::new(),
            agents: Vec::new(),
            sla: SlaPolicy::default(),
            notifications: Vec::new(),
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
    }

    /// Write the snapshot to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))
    }

    /// The built-in demo queue, anchored to `now`.
    pub fn demo(now: DateTime<Utc>) -> Self {
        let rel = |hours: f64| now + Duration::minutes((hours * 60.0) as i64);

        let ticket = |id: &str,
                      client: &str,
                      email: &str,
                      subject: &str,
                      priority: Priority,
                      deadline_h: f64,
                      agent: Option<&str>,
                      status: TicketStatus,
                      frustration: u8,
                      created_h: f64| Ticket {
            id: id.into(),
            client: client.into(),
            email: email.into(),
            subject: subject.into(),
            priority,
            sla_deadline: rel(deadline_h),
            assigned_agent_id: agent.map(str::to_string),
            internal_notes: Vec::new(),
            frustration_level: frustration,
            status,
            created_at: rel(created_h),
        };

        use Priority::{High, Low, Urgent};
        use TicketStatus::{Closed, Open, Pending};

        let mut tickets = vec![
            // Alice Freeman: one breached urgent case plus two closed ones,
            // so the client-history panel has something to show.
            ticket("TK-1001", "Alice Freeman", "alice@freeman.com", "CRITICAL: Database Connection Timeout", Urgent, -2.0, Some("a1"), Open, 10, -26.0),
            ticket("TK-1021", "Alice Freeman", "alice@freeman.com", "Previous: Login attempts failing on mobile", Low, -50.0, None, Closed, 4, -72.0),
            ticket("TK-1022", "Alice Freeman", "alice@freeman.com", "Account Upgrade Request", High, -10.0, Some("a11"), Closed, 2, -15.0),
            // Robert Downy
            ticket("TK-1002", "Robert Downy", "rdj@stark.com", "API Integration Auth Error", High, 46.0, Some("a1"), Open, 7, -2.0),
            ticket("TK-1023", "Robert Downy", "rdj@stark.com", "Sandbox environment access", Low, -20.0, None, Closed, 3, -30.0),
            ticket("TK-1030", "Robert Downy", "rdj@stark.com", "Legacy: Dashboard loading slow", Low, -500.0, Some("a1"), Closed, 5, -600.0),
            // Bruce Wayne
            ticket("TK-1004", "Bruce Wayne", "bruce@wayne.com", "Batmobile part replacement", Low, 70.0, Some("a11"), Open, 2, -2.0),
            ticket("TK-1024", "Bruce Wayne", "bruce@wayne.com", "Armor plate recalibration", High, -5.0, None, Closed, 1, -10.0),
            ticket("TK-1025", "Bruce Wayne", "bruce@wayne.com", "Batarang bulk order issue", Low, -100.0, None, Closed, 5, -120.0),
            ticket("TK-1003", "Sarah Connor", "sarah@res.net", "Skynet login loop issues", Urgent, 22.0, Some("a2"), Open, 8, -1.0),
            ticket("TK-1005", "Peter Parker", "spidey@nyc.gov", "Web-fluid subscription renewal", Low, 71.0, Some("a11"), Open, 4, -1.0),
            ticket("TK-1006", "Diana Prince", "diana@themyscira.io", "Lasso of truth calibration", High, 45.0, Some("a12"), Open, 3, -3.0),
            ticket("TK-1007", "Tony Stark", "tony@stark.com", "Arc reactor humming noise", Urgent, 20.0, Some("a4"), Pending, 5, -4.0),
            ticket("TK-1008", "Steve Rogers", "cap@avengers.org", "Shield paint retouching", Low, 68.0, Some("a4"), Open, 1, -4.0),
            ticket("TK-1009", "Natasha Romanoff", "blackwidow@shield.gov", "Secure comms encrypted", High, 40.0, Some("a5"), Open, 6, -8.0),
            ticket("TK-1010", "Wanda Maximoff", "wanda@westview.com", "Reality distortion support", Urgent, 18.0, Some("a5"), Open, 9, -6.0),
            ticket("TK-1011", "Thor Odinson", "thor@asgard.com", "Mjolnir handle grip loose", High, 42.0, Some("a6"), Open, 5, -6.0),
            ticket("TK-1012", "Clark Kent", "clark@dailyplanet.com", "Glasses prescription update", Low, 65.0, Some("a7"), Open, 2, -7.0),
            ticket("TK-1013", "Barry Allen", "flash@centralcity.pd", "Treadmill friction high", Urgent, 15.0, Some("a7"), Pending, 7, -9.0),
            ticket("TK-1014", "Arthur Curry", "aquaman@atlantis.me", "Waterproof phone casing", Low, 60.0, Some("a8"), Open, 3, -12.0),
            ticket("TK-1015", "Hal Jordan", "green@lantern.corp", "Ring recharge port broken", High, 35.0, Some("a8"), Open, 6, -13.0),
            ticket("TK-1016", "Victor Stone", "cyborg@star.labs", "Firmware 4.2.1 sync error", Urgent, 10.0, Some("a9"), Open, 8, -14.0),
            ticket("TK-1017", "Logan Howlett", "wolverine@xmen.com", "Metal detection at airports", Low, 55.0, Some("a9"), Open, 9, -17.0),
            ticket("TK-1018", "Scott Summers", "cyclops@xmen.com", "Visor glass scratch", High, 30.0, Some("a10"), Open, 4, -18.0),
            ticket("TK-1019", "Jean Grey", "phoenix@xmen.com", "Mind reading blocking kit", Urgent, 5.0, Some("a10"), Open, 10, -19.0),
            ticket("TK-1020", "Charles Xavier", "prof@xavier.edu", "Cerebro maintenance request", Low, 50.0, Some("a10"), Open, 1, -22.0),
        ];

        // The breached ticket carries the system note that flagged it.
        tickets[0].internal_notes.push(Note {
            id: "n1".into(),
            author: "System".into(),
            content: "SLA Breach detected.".into(),
            timestamp: rel(-2.5),
        });

        let agent = |id: &str, name: &str, status: AgentStatus, assigned: &[&str], seed: &str, team: &str| Agent {
            id: id.into(),
            name: name.into(),
            status,
            assigned_tickets: assigned.iter().map(|s| s.to_string()).collect(),
            avatar: format!("https://picsum.photos/seed/{}/100", seed),
            team: team.into(),
        };

        use AgentStatus::{Busy, Online};

        let agents = vec![
            agent("a1", "Sofia Martinez", Online, &["TK-1001", "TK-1002", "TK-1030"], "sofia", "RA"),
            agent("a2", "James Wilson", Online, &["TK-1003"], "james", "PROCON"),
            agent("a11", "Lucas Silva", Online, &["TK-1004", "TK-1005", "TK-1022"], "lucas", "RA"),
            agent("a12", "Ana Oliveira", Busy, &["TK-1006"], "ana", "PROCON"),
            agent("a3", "Elena Rossi", Busy, &[], "elena", "L2"),
            agent("a4", "Marcus Chen", Online, &["TK-1007", "TK-1008"], "marcus", "Chat"),
            agent("a5", "Isabella Garcia", Online, &["TK-1009", "TK-1010"], "isabella", "Email"),
            agent("a6", "Liam O'Connor", Busy, &["TK-1011"], "liam", "Transportistas"),
            agent("a7", "Yuki Tanaka", Online, &["TK-1012", "TK-1013"], "yuki", "Social Media"),
            agent("a8", "David Smith", Online, &["TK-1014", "TK-1015"], "david", "Chat"),
            agent("a9", "Amara Okafor", Online, &["TK-1016", "TK-1017"], "amara", "Marketplace"),
            agent("a10", "Chloe Dubois", Busy, &["TK-1018", "TK-1019", "TK-1020"], "chloe", "Email"),
        ];

        let notifications = vec![
            Notification {
                id: "notif-1".into(),
                kind: NotificationKind::Alert,
                title: "SLA Breach: TK-1001".into(),
                message: "Alice Freeman's ticket has exceeded the Urgent SLA limit.".into(),
                timestamp: rel(-0.5),
                is_read: false,
            },
            Notification {
                id: "notif-2".into(),
                kind: NotificationKind::Info,
                title: "New Case Assigned".into(),
                message: "You have been assigned to TK-1007 (Tony Stark).".into(),
                timestamp: rel(-1.0),
                is_read: false,
            },
            Notification {
                id: "notif-3".into(),
                kind: NotificationKind::Success,
                title: "Case Resolved".into(),
                message: "TK-1024 has been successfully closed.".into(),
                timestamp: rel(-2.0),
                is_read: true,
            },
        ];

        Self {
            tickets,
            agents,
            sla: SlaPolicy::default(),
            notifications,
        }
    }
}
