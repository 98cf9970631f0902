//! Vendor portal — suppliers (hotels, vehicle providers) and business
//! partners (investors).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::capacity::{Occupancy, OccupancyView};
use crate::error::RecordError;
use crate::search::matches_query;

use super::{non_blank, ymd};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierKind {
    Hotel,
    Vehicle,
}

impl SupplierKind {
    fn unit(&self) -> &'static str {
        match self {
            SupplierKind::Hotel => "rooms",
            SupplierKind::Vehicle => "vehicles",
        }
    }
}

impl fmt::Display for SupplierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SupplierKind::Hotel => "Hotel",
            SupplierKind::Vehicle => "Vehicle",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierStatus {
    Active,
    Inactive,
}

impl fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SupplierStatus::Active => "Active",
            SupplierStatus::Inactive => "Inactive",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SupplierKind,
    pub location: String,
    pub availability: String,
    /// Open units (rooms or vehicles) right now.
    pub slots: u32,
    pub max_slots: u32,
    pub contact: String,
    pub status: SupplierStatus,
}

impl Supplier {
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::from_available(self.slots, self.max_slots)
    }

    /// Unit named in the availability text ("8 vans available" → "vans"),
    /// else the kind's generic unit.
    fn unit(&self) -> &str {
        let mut words = self.availability.split_whitespace();
        match (words.next(), words.next()) {
            (Some(count), Some(unit)) if count.parse::<u32>().is_ok() && unit != "available" => unit,
            _ => self.kind.unit(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierView {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub occupancy: OccupancyView,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SupplierKind,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub availability: Option<String>,
    pub slots: u32,
    pub max_slots: u32,
    #[serde(default)]
    pub contact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartnerStatus {
    Active,
    Pending,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: u32,
    pub name: String,
    /// Invested amount in whole pesos.
    pub investment: u64,
    pub contract_start: NaiveDate,
    pub contract_end: NaiveDate,
    pub status: PartnerStatus,
    pub share_percent: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPartner {
    #[serde(default)]
    pub name: String,
    pub investment: u64,
    pub contract_start: NaiveDate,
    pub contract_end: NaiveDate,
    pub share_percent: u8,
}

/// Count and total investment of partners currently `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerInvestment {
    pub active_partners: usize,
    pub total_investment: u64,
}

#[derive(Debug, Default)]
pub struct VendorPortal {
    suppliers: Vec<Supplier>,
    partners: Vec<Partner>,
}

impl VendorPortal {
    pub fn new(suppliers: Vec<Supplier>, partners: Vec<Partner>) -> Self {
        Self { suppliers, partners }
    }

    pub fn seeded() -> Self {
        let supplier = |id, name: &str, kind, location: &str, availability: &str, slots, max_slots, contact: &str, status| Supplier {
            id,
            name: name.into(),
            kind,
            location: location.into(),
            availability: availability.into(),
            slots,
            max_slots,
            contact: contact.into(),
            status,
        };
        let partner = |id, name: &str, investment, start, end, status, share_percent| Partner {
            id,
            name: name.into(),
            investment,
            contract_start: start,
            contract_end: end,
            status,
            share_percent,
        };
        Self::new(
            vec![
                supplier(1, "Paradise Hotel Boracay", SupplierKind::Hotel, "Boracay", "25 rooms available", 25, 50, "+63 912 345 6789", SupplierStatus::Active),
                supplier(2, "Island Van Rentals", SupplierKind::Vehicle, "Cebu", "8 vans available", 8, 15, "+63 917 654 3210", SupplierStatus::Active),
                supplier(3, "Palawan Beach Resort", SupplierKind::Hotel, "Palawan", "12 rooms available", 12, 30, "+63 918 111 2222", SupplierStatus::Active),
                supplier(4, "Metro Bus Services", SupplierKind::Vehicle, "Manila", "3 buses available", 3, 10, "+63 915 333 4444", SupplierStatus::Inactive),
            ],
            vec![
                partner(1, "JK Investments Corp", 500_000, ymd(2025, 1, 1), ymd(2026, 12, 31), PartnerStatus::Active, 15),
                partner(2, "Traveler's Fund LLC", 1_200_000, ymd(2025, 6, 1), ymd(2027, 5, 31), PartnerStatus::Active, 25),
                partner(3, "Pacific Ventures", 300_000, ymd(2024, 1, 1), ymd(2025, 12, 31), PartnerStatus::Pending, 10),
            ],
        )
    }

    pub fn supplier_count(&self) -> usize {
        self.suppliers.len()
    }

    /// Suppliers whose name contains `query`, with their occupancy.
    pub fn list_suppliers(&self, query: &str) -> Vec<SupplierView> {
        self.suppliers
            .iter()
            .filter(|s| matches_query(query, &[&s.name]))
            .map(|s| SupplierView { supplier: s.clone(), occupancy: s.occupancy().view() })
            .collect()
    }

    pub fn add_supplier(&mut self, new: NewSupplier) -> Result<SupplierView, RecordError> {
        let (Some(name), Some(location)) = (non_blank(&new.name), non_blank(&new.location)) else {
            return Err(RecordError::validation("Supplier name and location are required."));
        };
        if new.max_slots == 0 {
            return Err(RecordError::validation("Maximum slots must be greater than zero."));
        }
        if new.slots > new.max_slots {
            return Err(RecordError::validation(format!(
                "Available slots ({}) cannot exceed maximum slots ({}).",
                new.slots, new.max_slots
            )));
        }

        let availability = new
            .availability
            .as_deref()
            .and_then(non_blank)
            .unwrap_or_else(|| format!("{} {} available", new.slots, new.kind.unit()));

        let supplier = Supplier {
            id: self.suppliers.len() as u32 + 1,
            name,
            kind: new.kind,
            location,
            availability,
            slots: new.slots,
            max_slots: new.max_slots,
            contact: new.contact.trim().to_string(),
            status: SupplierStatus::Active,
        };
        self.suppliers.push(supplier.clone());
        let occupancy = supplier.occupancy().view();
        Ok(SupplierView { supplier, occupancy })
    }

    pub fn list_partners(&self) -> Vec<Partner> {
        self.partners.clone()
    }

    pub fn add_partner(&mut self, new: NewPartner) -> Result<Partner, RecordError> {
        let Some(name) = non_blank(&new.name) else {
            return Err(RecordError::validation("Partner name is required."));
        };
        if new.contract_end < new.contract_start {
            return Err(RecordError::validation("Contract end must not be before contract start."));
        }
        if new.share_percent > 100 {
            return Err(RecordError::validation("Share must be between 0 and 100 percent."));
        }

        let partner = Partner {
            id: self.partners.len() as u32 + 1,
            name,
            investment: new.investment,
            contract_start: new.contract_start,
            contract_end: new.contract_end,
            status: PartnerStatus::Pending,
            share_percent: new.share_percent,
        };
        self.partners.push(partner.clone());
        Ok(partner)
    }

    pub fn active_partner_investment(&self) -> PartnerInvestment {
        let active = self.partners.iter().filter(|p| p.status == PartnerStatus::Active);
        PartnerInvestment {
            active_partners: active.clone().count(),
            total_investment: active.map(|p| p.investment).sum(),
        }
    }

    /// One numbered line per supplier for the recommendation prompt.
    pub fn prompt_lines(&self) -> String {
        self.suppliers
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let unit = s.unit();
                let kind = match s.kind {
                    SupplierKind::Vehicle if unit != s.kind.unit() => format!("{} ({})", s.kind, capitalize(unit)),
                    _ => s.kind.to_string(),
                };
                format!(
                    "{}. {} - {}, {}, {}/{} {} available, {}",
                    i + 1,
                    s.name,
                    kind,
                    s.location,
                    s.slots,
                    s.max_slots,
                    unit,
                    s.status
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
