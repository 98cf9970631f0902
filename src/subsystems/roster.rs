//! Travel agents & staff roster.
//!
//! Agent profiles come from the HR department. New hires are submitted as
//! requests and sit in `Pending` until HR approves them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::search::matches_query;

use super::{non_blank, ymd};

const PENDING_HR_SOURCE: &str = "HR Department — Pending Request";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    Active,
    Pending,
    #[serde(rename = "On Leave")]
    OnLeave,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AgentStatus::Active => "Active",
            AgentStatus::Pending => "Pending",
            AgentStatus::OnLeave => "On Leave",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub rating: f32,
    pub experience: String,
    pub tours_completed: u32,
    pub status: AgentStatus,
    pub specialization: String,
    pub hire_date: NaiveDate,
    pub hr_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_reason: Option<String>,
}

/// Request for a new agent or staff member, routed to HR.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Default)]
pub struct Roster {
    agents: Vec<Agent>,
}

impl Roster {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn seeded() -> Self {
        let agent = |id, name: &str, role: &str, rating, experience: &str, tours, status, spec: &str, hired, source: &str| Agent {
            id,
            name: name.into(),
            role: role.into(),
            rating,
            experience: experience.into(),
            tours_completed: tours,
            status,
            specialization: spec.into(),
            hire_date: hired,
            hr_source: source.into(),
            request_reason: None,
        };
        Self::new(vec![
            agent(1, "Russel Santillan", "Travel Agent", 4.8, "3 years", 40, AgentStatus::Active, "Beach Destinations", ymd(2023, 6, 15), "HR Department — Direct Hire"),
            agent(2, "Maria Santos", "Travel Agent", 4.5, "5 years", 78, AgentStatus::Active, "International Tours", ymd(2021, 3, 10), "HR Department — Referral"),
            agent(3, "Juan Dela Cruz", "Tour Guide", 4.9, "7 years", 120, AgentStatus::Active, "Historical Tours", ymd(2019, 1, 20), "HR Department — Direct Hire"),
            agent(4, "Ana Reyes", "Travel Agent", 4.2, "1 year", 12, AgentStatus::Pending, "Budget Travel", ymd(2025, 11, 5), "HR Department — Job Fair Recruit"),
            agent(5, "Carlos Garcia", "Staff", 4.6, "4 years", 55, AgentStatus::OnLeave, "Adventure Tours", ymd(2022, 8, 1), "HR Department — Internal Transfer"),
        ])
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents whose name or role contains `query`.
    pub fn list(&self, query: &str) -> Vec<Agent> {
        self.agents
            .iter()
            .filter(|a| matches_query(query, &[&a.name, &a.role]))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u32) -> Result<&Agent, RecordError> {
        self.agents
            .iter()
            .find(|a| a.id == id)
            .ok_or(RecordError::NotFound { kind: "agent", id })
    }

    /// Append a pending agent built from an HR request.
    pub fn request(&mut self, req: AgentRequest, today: NaiveDate) -> Result<Agent, RecordError> {
        let (Some(name), Some(role)) = (non_blank(&req.name), non_blank(&req.role)) else {
            return Err(RecordError::validation("Please fill in at least the name and role."));
        };

        let agent = Agent {
            id: self.agents.len() as u32 + 1,
            name,
            role,
            rating: 0.0,
            experience: "New".into(),
            tours_completed: 0,
            status: AgentStatus::Pending,
            specialization: req
                .specialization
                .as_deref()
                .and_then(non_blank)
                .unwrap_or_else(|| "General".into()),
            hire_date: today,
            hr_source: PENDING_HR_SOURCE.into(),
            request_reason: req.reason.as_deref().and_then(non_blank),
        };
        self.agents.push(agent.clone());
        Ok(agent)
    }

    pub fn set_status(&mut self, id: u32, status: AgentStatus) -> Result<Agent, RecordError> {
        let agent = self
            .agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RecordError::NotFound { kind: "agent", id })?;
        agent.status = status;
        Ok(agent.clone())
    }

    pub fn count_with_status(&self, status: AgentStatus) -> usize {
        self.agents.iter().filter(|a| a.status == status).count()
    }

    /// Highest rated first; ties go to the agent with more tours.
    pub fn top_rated(&self, n: usize) -> Vec<Agent> {
        let mut ranked = self.agents.clone();
        ranked.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then(b.tours_completed.cmp(&a.tours_completed))
        });
        ranked.truncate(n);
        ranked
    }

    /// One numbered line per agent for the recommendation prompt.
    pub fn prompt_lines(&self) -> String {
        self.agents
            .iter()
            .enumerate()
            .map(|(i, a)| {
                format!(
                    "{}. {} - {}, {} rating, {} experience, {} tours, specializes in {}, {}",
                    i + 1,
                    a.name,
                    a.role,
                    a.rating,
                    a.experience,
                    a.tours_completed,
                    a.specialization,
                    a.status
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
