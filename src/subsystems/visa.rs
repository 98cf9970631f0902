//! Visa assistance — per-customer document checklists and passport validity.

use std::fmt;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

use super::{non_blank, ymd};

/// Passports must stay valid this many calendar months past today.
pub const PASSPORT_VALIDITY_MONTHS: u32 = 6;

const DEFAULT_CHECKLIST: [&str; 3] = ["Passport Copy", "Bank Statement", "Flight Itinerary"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Verified,
    Pending,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisaStatus {
    Approved,
    #[serde(rename = "Under Review")]
    UnderReview,
    Incomplete,
    Rejected,
}

impl fmt::Display for VisaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VisaStatus::Approved => "Approved",
            VisaStatus::UnderReview => "Under Review",
            VisaStatus::Incomplete => "Incomplete",
            VisaStatus::Rejected => "Rejected",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaDocument {
    pub name: String,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaApplication {
    pub id: u32,
    pub customer_name: String,
    pub destination: String,
    pub visa_type: String,
    pub passport_expiry: NaiveDate,
    pub documents: Vec<VisaDocument>,
    pub overall_status: VisaStatus,
    pub submitted_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistProgress {
    pub verified: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaView {
    #[serde(flatten)]
    pub application: VisaApplication,
    pub passport_warning: bool,
    pub checklist: ChecklistProgress,
}

impl VisaView {
    fn new(app: &VisaApplication, today: NaiveDate) -> Self {
        let verified = app
            .documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Verified)
            .count();
        Self {
            application: app.clone(),
            passport_warning: passport_warning(app.passport_expiry, today),
            checklist: ChecklistProgress { verified, total: app.documents.len() },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisaApplication {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub visa_type: Option<String>,
    pub passport_expiry: NaiveDate,
    #[serde(default)]
    pub documents: Vec<String>,
}

/// True when the passport expires less than six calendar months after
/// `today`.
pub fn passport_warning(expiry: NaiveDate, today: NaiveDate) -> bool {
    today
        .checked_add_months(Months::new(PASSPORT_VALIDITY_MONTHS))
        .is_some_and(|limit| expiry < limit)
}

#[derive(Debug, Default)]
pub struct VisaDesk {
    applications: Vec<VisaApplication>,
}

impl VisaDesk {
    pub fn new(applications: Vec<VisaApplication>) -> Self {
        Self { applications }
    }

    pub fn seeded() -> Self {
        let docs = |list: &[(&str, DocumentStatus)]| {
            list.iter()
                .map(|(name, status)| VisaDocument { name: (*name).into(), status: *status })
                .collect::<Vec<_>>()
        };
        use DocumentStatus::{Missing, Pending, Verified};
        Self::new(vec![
            VisaApplication {
                id: 1,
                customer_name: "Mark Rivera".into(),
                destination: "Japan".into(),
                visa_type: "Tourist".into(),
                passport_expiry: ymd(2028, 5, 15),
                documents: docs(&[
                    ("Passport Copy", Verified),
                    ("Bank Statement", Verified),
                    ("Hotel Booking", Verified),
                    ("Flight Itinerary", Verified),
                ]),
                overall_status: VisaStatus::Approved,
                submitted_date: ymd(2026, 1, 20),
            },
            VisaApplication {
                id: 2,
                customer_name: "Lisa Cruz".into(),
                destination: "South Korea".into(),
                visa_type: "Tourist".into(),
                passport_expiry: ymd(2027, 11, 30),
                documents: docs(&[
                    ("Passport Copy", Verified),
                    ("Bank Statement", Pending),
                    ("Employment Certificate", Missing),
                    ("Flight Itinerary", Verified),
                ]),
                overall_status: VisaStatus::Incomplete,
                submitted_date: ymd(2026, 2, 1),
            },
            VisaApplication {
                id: 3,
                customer_name: "David Tan".into(),
                destination: "USA".into(),
                visa_type: "Business".into(),
                passport_expiry: ymd(2026, 3, 10),
                documents: docs(&[
                    ("Passport Copy", Verified),
                    ("Invitation Letter", Pending),
                    ("Bank Statement", Verified),
                    ("Travel Insurance", Missing),
                ]),
                overall_status: VisaStatus::UnderReview,
                submitted_date: ymd(2026, 2, 5),
            },
        ])
    }

    pub fn list(&self, today: NaiveDate) -> Vec<VisaView> {
        self.applications.iter().map(|a| VisaView::new(a, today)).collect()
    }

    pub fn count_with_status(&self, status: VisaStatus) -> usize {
        self.applications.iter().filter(|a| a.overall_status == status).count()
    }

    pub fn passport_warnings(&self, today: NaiveDate) -> usize {
        self.applications
            .iter()
            .filter(|a| passport_warning(a.passport_expiry, today))
            .count()
    }

    /// Open a new application with every checklist item `Pending`.
    pub fn submit(&mut self, new: NewVisaApplication, today: NaiveDate) -> Result<VisaView, RecordError> {
        let (Some(customer_name), Some(destination)) =
            (non_blank(&new.customer_name), non_blank(&new.destination))
        else {
            return Err(RecordError::validation("Customer name and destination are required."));
        };

        let mut names: Vec<String> = new.documents.iter().filter_map(|d| non_blank(d)).collect();
        if names.is_empty() {
            names = DEFAULT_CHECKLIST.iter().map(|d| d.to_string()).collect();
        }

        let app = VisaApplication {
            id: self.applications.len() as u32 + 1,
            customer_name,
            destination,
            visa_type: new
                .visa_type
                .as_deref()
                .and_then(non_blank)
                .unwrap_or_else(|| "Tourist".into()),
            passport_expiry: new.passport_expiry,
            documents: names
                .into_iter()
                .map(|name| VisaDocument { name, status: DocumentStatus::Pending })
                .collect(),
            overall_status: VisaStatus::UnderReview,
            submitted_date: today,
        };
        self.applications.push(app.clone());
        Ok(VisaView::new(&app, today))
    }

    /// Set the status of checklist item `name`, adding it when absent.
    pub fn record_document(
        &mut self,
        id: u32,
        name: &str,
        status: DocumentStatus,
        today: NaiveDate,
    ) -> Result<VisaView, RecordError> {
        let Some(name) = non_blank(name) else {
            return Err(RecordError::validation("Document name is required."));
        };
        let app = self.find_mut(id)?;
        match app.documents.iter_mut().find(|d| d.name.eq_ignore_ascii_case(&name)) {
            Some(doc) => doc.status = status,
            None => app.documents.push(VisaDocument { name, status }),
        }
        Ok(VisaView::new(app, today))
    }

    pub fn set_status(&mut self, id: u32, status: VisaStatus, today: NaiveDate) -> Result<VisaView, RecordError> {
        let app = self.find_mut(id)?;
        app.overall_status = status;
        Ok(VisaView::new(app, today))
    }

    fn find_mut(&mut self, id: u32) -> Result<&mut VisaApplication, RecordError> {
        self.applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RecordError::NotFound { kind: "visa application", id })
    }
}
