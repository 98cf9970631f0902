//! Tour resources — slot counts, assigned vehicle and guide per tour date.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capacity::{Occupancy, OccupancyView};
use crate::error::RecordError;

use super::ymd;

/// Booked share at which a tour is flagged "Almost Full".
const ALMOST_FULL_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourStatus {
    Open,
    #[serde(rename = "Almost Full")]
    AlmostFull,
    Full,
    Cancelled,
}

impl TourStatus {
    fn for_occupancy(occupancy: &Occupancy) -> Self {
        if occupancy.is_full() {
            TourStatus::Full
        } else if occupancy.percent() >= ALMOST_FULL_PERCENT {
            TourStatus::AlmostFull
        } else {
            TourStatus::Open
        }
    }
}

impl fmt::Display for TourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TourStatus::Open => "Open",
            TourStatus::AlmostFull => "Almost Full",
            TourStatus::Full => "Full",
            TourStatus::Cancelled => "Cancelled",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourResource {
    pub id: u32,
    pub tour_name: String,
    pub destination: String,
    pub date: NaiveDate,
    pub max_slots: u32,
    pub booked: u32,
    pub vehicle: String,
    pub vehicle_capacity: u32,
    pub guide: String,
    pub status: TourStatus,
}

impl TourResource {
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::new(self.booked, self.max_slots)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TourView {
    #[serde(flatten)]
    pub tour: TourResource,
    pub occupancy: OccupancyView,
}

impl From<&TourResource> for TourView {
    fn from(t: &TourResource) -> Self {
        Self { tour: t.clone(), occupancy: t.occupancy().view() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourSummary {
    pub total: usize,
    pub open: usize,
    pub almost_full: usize,
    pub full_or_cancelled: usize,
}

#[derive(Debug, Default)]
pub struct TourBoard {
    tours: Vec<TourResource>,
}

impl TourBoard {
    pub fn new(tours: Vec<TourResource>) -> Self {
        Self { tours }
    }

    pub fn seeded() -> Self {
        let tour = |id, name: &str, destination: &str, date, max_slots, booked, vehicle: &str, vehicle_capacity, guide: &str, status| TourResource {
            id,
            tour_name: name.into(),
            destination: destination.into(),
            date,
            max_slots,
            booked,
            vehicle: vehicle.into(),
            vehicle_capacity,
            guide: guide.into(),
            status,
        };
        Self::new(vec![
            tour(1, "Boracay Beach Getaway", "Boracay", ymd(2026, 3, 15), 40, 32, "Tourist Bus A", 40, "Juan Dela Cruz", TourStatus::AlmostFull),
            tour(2, "Palawan Island Hopping", "Palawan", ymd(2026, 3, 20), 25, 25, "Coaster #1", 25, "Maria Santos", TourStatus::Full),
            tour(3, "Cebu Heritage Walk", "Cebu", ymd(2026, 3, 22), 12, 5, "Van #1", 12, "Carlos Garcia", TourStatus::Open),
            tour(4, "Manila Food Tour", "Manila", ymd(2026, 3, 25), 15, 0, "Van #3", 15, "TBA", TourStatus::Cancelled),
        ])
    }

    pub fn list(&self) -> Vec<TourView> {
        self.tours.iter().map(TourView::from).collect()
    }

    pub fn summary(&self) -> TourSummary {
        self.tours.iter().fold(
            TourSummary { total: self.tours.len(), ..TourSummary::default() },
            |mut s, t| {
                match t.status {
                    TourStatus::Open => s.open += 1,
                    TourStatus::AlmostFull => s.almost_full += 1,
                    TourStatus::Full | TourStatus::Cancelled => s.full_or_cancelled += 1,
                }
                s
            },
        )
    }

    /// Book `seats` on tour `id`; the status follows the new occupancy.
    pub fn book(&mut self, id: u32, seats: u32) -> Result<TourView, RecordError> {
        if seats == 0 {
            return Err(RecordError::validation("At least one slot must be booked."));
        }
        let tour = self
            .tours
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(RecordError::NotFound { kind: "tour", id })?;
        if tour.status == TourStatus::Cancelled {
            return Err(RecordError::Unavailable { kind: "tour", id, status: tour.status.to_string() });
        }
        let occupancy = tour.occupancy();
        if !occupancy.can_take(seats) {
            return Err(RecordError::CapacityExceeded { requested: seats, remaining: occupancy.remaining() });
        }

        tour.booked += seats;
        tour.status = TourStatus::for_occupancy(&tour.occupancy());
        debug!(tour_id = id, seats, booked = tour.booked, status = %tour.status, "tour slots booked");
        Ok(TourView::from(&*tour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_matches_seed() {
        assert_eq!(
            TourBoard::seeded().summary(),
            TourSummary { total: 4, open: 1, almost_full: 1, full_or_cancelled: 2 }
        );
    }

    #[test]
    fn list_shows_remaining_slots() {
        let tours = TourBoard::seeded().list();
        assert_eq!(tours[0].occupancy.remaining, 8);
        assert_eq!(tours[1].occupancy.remaining, 0);
        assert_eq!(tours[2].occupancy.remaining, 7);
    }

    #[test]
    fn booking_moves_through_statuses() {
        let mut b = TourBoard::seeded();
        // 5/12 -> 10/12 is 83 %
        assert_eq!(b.book(3, 5).unwrap().tour.status, TourStatus::AlmostFull);
        assert_eq!(b.book(3, 2).unwrap().tour.status, TourStatus::Full);
        assert_eq!(
            b.book(3, 1).unwrap_err(),
            RecordError::CapacityExceeded { requested: 1, remaining: 0 }
        );
    }

    #[test]
    fn small_booking_stays_open() {
        let mut b = TourBoard::seeded();
        assert_eq!(b.book(3, 1).unwrap().tour.status, TourStatus::Open);
    }

    #[test]
    fn cancelled_tour_refuses_bookings() {
        let mut b = TourBoard::seeded();
        assert!(matches!(b.book(4, 1), Err(RecordError::Unavailable { kind: "tour", id: 4, .. })));
    }

    #[test]
    fn status_serializes_display_form() {
        assert_eq!(serde_json::to_string(&TourStatus::AlmostFull).unwrap(), "\"Almost Full\"");
    }
}
