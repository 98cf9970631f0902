//! Back-office subsystems: one record store per page, plus the comms
//! channel that serves them and the recommendation collaborator.

pub mod comms;
pub mod dashboard;
pub mod fleet;
pub mod manual;
pub mod marketing;
pub mod recommend;
pub mod roster;
pub mod runtime;
pub mod tours;
pub mod vendors;
pub mod visa;

use chrono::NaiveDate;

/// Every in-memory record store, guarded together so cross-page reads
/// (dashboard, recommendation prompts) see one consistent snapshot.
#[derive(Debug, Default)]
pub struct Stores {
    pub roster: roster::Roster,
    pub vendors: vendors::VendorPortal,
    pub fleet: fleet::Fleet,
    pub tours: tours::TourBoard,
    pub visa: visa::VisaDesk,
    pub marketing: marketing::MarketingBoard,
}

impl Stores {
    /// Demo data the front-end ships with.
    pub fn seeded() -> Self {
        Self {
            roster: roster::Roster::seeded(),
            vendors: vendors::VendorPortal::seeded(),
            fleet: fleet::Fleet::seeded(),
            tours: tours::TourBoard::seeded(),
            visa: visa::VisaDesk::seeded(),
            marketing: marketing::MarketingBoard::seeded(),
        }
    }
}

/// Calendar date for seed data. Invalid dates collapse to the epoch default.
pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Trimmed copy of `s`, or `None` when nothing is left.
pub(crate) fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank("  Cebu "), Some("Cebu".to_string()));
        assert_eq!(non_blank(" \t"), None);
    }

    #[test]
    fn ymd_rejects_impossible_dates() {
        assert_eq!(ymd(2026, 2, 30), NaiveDate::default());
        assert_eq!(ymd(2026, 2, 14).to_string(), "2026-02-14");
    }
}
