//! Dashboard overview, computed on demand from the live stores.

use chrono::NaiveDate;
use serde::Serialize;

use super::Stores;
use super::fleet::FleetSummary;
use super::marketing::{Campaign, DestinationAlert};
use super::roster::{Agent, AgentStatus};
use super::tours::TourSummary;
use super::visa::VisaStatus;

const TOP_AGENTS: usize = 3;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_suppliers: usize,
    pub total_agents: usize,
    pub pending_agent_requests: usize,
    pub active_partners: usize,
    pub partner_investment: u64,
    pub visas_under_review: usize,
    pub passport_warnings: usize,
    pub available_vehicles: usize,
    pub fleet: FleetSummary,
    pub tours: TourSummary,
    pub active_alerts: Vec<DestinationAlert>,
    pub top_agents: Vec<Agent>,
    pub campaigns: Vec<Campaign>,
}

impl DashboardSummary {
    pub fn collect(stores: &Stores, today: NaiveDate) -> Self {
        let partners = stores.vendors.active_partner_investment();
        let fleet = stores.fleet.summary();
        Self {
            total_suppliers: stores.vendors.supplier_count(),
            total_agents: stores.roster.len(),
            pending_agent_requests: stores.roster.count_with_status(AgentStatus::Pending),
            active_partners: partners.active_partners,
            partner_investment: partners.total_investment,
            visas_under_review: stores.visa.count_with_status(VisaStatus::UnderReview),
            passport_warnings: stores.visa.passport_warnings(today),
            available_vehicles: fleet.available,
            fleet,
            tours: stores.tours.summary(),
            active_alerts: stores.marketing.advisories(),
            top_agents: stores.roster.top_rated(TOP_AGENTS),
            campaigns: stores.marketing.live_campaigns(),
        }
    }
}
