//! Marketing & promotions: seasonal pricing, destination alerts and
//! campaigns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

use super::{non_blank, ymd};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pricing {
    High,
    Moderate,
    Discounted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalStrategy {
    pub id: u32,
    pub season: String,
    pub location: String,
    pub pricing: Pricing,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    /// Tours assumed affected when the poster does not give a count.
    fn default_affected_tours(&self) -> u32 {
        match self {
            Severity::High => 3,
            Severity::Medium => 1,
            Severity::Low => 0,
        }
    }

    /// High and medium alerts are advisories; low means "all clear".
    pub fn is_advisory(&self) -> bool {
        !matches!(self, Severity::Low)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationAlert {
    pub id: u32,
    pub location: String,
    pub alert: String,
    pub severity: Severity,
    pub affected_tours: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub alert: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub affected_tours: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    Active,
    Scheduled,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub discount: Option<String>,
}

#[derive(Debug, Default)]
pub struct MarketingBoard {
    strategies: Vec<SeasonalStrategy>,
    campaigns: Vec<Campaign>,
    alerts: Vec<DestinationAlert>,
}

impl MarketingBoard {
    pub fn new(
        strategies: Vec<SeasonalStrategy>,
        campaigns: Vec<Campaign>,
        alerts: Vec<DestinationAlert>,
    ) -> Self {
        Self { strategies, campaigns, alerts }
    }

    pub fn seeded() -> Self {
        let strategy = |id, season: &str, location: &str, pricing, reason: &str| SeasonalStrategy {
            id,
            season: season.into(),
            location: location.into(),
            pricing,
            reason: reason.into(),
        };
        let campaign = |id, name: &str, kind: &str, status, start, end, discount: &str| Campaign {
            id,
            name: name.into(),
            kind: kind.into(),
            status,
            start_date: start,
            end_date: end,
            discount: Some(discount.into()),
        };
        let alert = |id, location: &str, text: &str, severity, affected_tours, date| DestinationAlert {
            id,
            location: location.into(),
            alert: text.into(),
            severity,
            affected_tours,
            date,
        };
        Self::new(
            vec![
                strategy(1, "Summer", "Boracay", Pricing::High, "Peak season — high demand, premium pricing"),
                strategy(2, "Rainy", "Boracay", Pricing::Discounted, "Off-season discount to maintain bookings and keep the destination active"),
                strategy(3, "Summer", "Palawan", Pricing::High, "Top beach destination in peak season"),
                strategy(4, "Rainy", "Palawan", Pricing::Moderate, "Still popular but reduced demand"),
                strategy(5, "Summer", "Cebu", Pricing::Moderate, "Good demand, competitive pricing"),
            ],
            vec![
                campaign(1, "Summer Splash 2026", "Seasonal Promo", CampaignStatus::Scheduled, ymd(2026, 3, 1), ymd(2026, 5, 31), "20% off"),
                campaign(2, "Rainy Day Deals", "Off-Season Hook", CampaignStatus::Active, ymd(2026, 1, 15), ymd(2026, 3, 15), "35% off"),
                campaign(3, "Valentine's Getaway", "Event Promo", CampaignStatus::Ended, ymd(2026, 2, 1), ymd(2026, 2, 14), "15% off"),
            ],
            vec![
                alert(1, "Boracay", "Typhoon Signal #3 — All tours cancelled", Severity::High, 12, ymd(2026, 2, 10)),
                alert(2, "Cebu", "Heavy rainfall advisory", Severity::Medium, 4, ymd(2026, 2, 11)),
                alert(3, "Palawan", "All clear — operations normal", Severity::Low, 0, ymd(2026, 2, 12)),
            ],
        )
    }

    pub fn strategies(&self) -> Vec<SeasonalStrategy> {
        self.strategies.clone()
    }

    pub fn campaigns(&self) -> Vec<Campaign> {
        self.campaigns.clone()
    }

    pub fn alerts(&self) -> Vec<DestinationAlert> {
        self.alerts.clone()
    }

    /// Campaigns that are running or about to run.
    pub fn live_campaigns(&self) -> Vec<Campaign> {
        self.campaigns
            .iter()
            .filter(|c| c.status != CampaignStatus::Ended)
            .cloned()
            .collect()
    }

    pub fn advisories(&self) -> Vec<DestinationAlert> {
        self.alerts
            .iter()
            .filter(|a| a.severity.is_advisory())
            .cloned()
            .collect()
    }

    /// Append a `Scheduled` campaign.
    pub fn create_campaign(&mut self, new: NewCampaign) -> Result<Campaign, RecordError> {
        let (Some(name), Some(start_date), Some(end_date)) =
            (non_blank(&new.name), new.start_date, new.end_date)
        else {
            return Err(RecordError::validation("Campaign name and dates are required."));
        };
        if end_date < start_date {
            return Err(RecordError::validation("Campaign end date must not be before its start date."));
        }

        let campaign = Campaign {
            id: self.campaigns.len() as u32 + 1,
            name,
            kind: new
                .kind
                .as_deref()
                .and_then(non_blank)
                .unwrap_or_else(|| "Custom Promo".into()),
            status: CampaignStatus::Scheduled,
            start_date,
            end_date,
            discount: new.discount.as_deref().and_then(non_blank),
        };
        self.campaigns.push(campaign.clone());
        Ok(campaign)
    }

    /// Post a destination alert dated `today`.
    pub fn add_alert(&mut self, new: NewAlert, today: NaiveDate) -> Result<DestinationAlert, RecordError> {
        let (Some(location), Some(text)) = (non_blank(&new.location), non_blank(&new.alert)) else {
            return Err(RecordError::validation("Location and alert message are required."));
        };
        let severity = new.severity.unwrap_or_default();

        let alert = DestinationAlert {
            id: self.alerts.len() as u32 + 1,
            location,
            alert: text,
            severity,
            affected_tours: new.affected_tours.unwrap_or_else(|| severity.default_affected_tours()),
            date: today,
        };
        self.alerts.push(alert.clone());
        Ok(alert)
    }
}
