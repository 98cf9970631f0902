//! Occupancy arithmetic shared by vehicles, tours and suppliers.
//!
//! Every capacity display in the back-office is derived from a single
//! `(booked, max)` pair. `remaining` saturates at zero so an overbooked
//! record never reports a negative count.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub booked: u32,
    pub max: u32,
}

impl Occupancy {
    pub fn new(booked: u32, max: u32) -> Self {
        Self { booked, max }
    }

    /// Build from an open-unit count, as suppliers report it
    /// ("25 rooms available" out of 50).
    pub fn from_available(available: u32, max: u32) -> Self {
        Self { booked: max - available.min(max), max }
    }

    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.booked)
    }

    /// Booked share in percent, clamped to `0.0..=100.0`.
    pub fn percent(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        (f64::from(self.booked) / f64::from(self.max) * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_full(&self) -> bool {
        self.booked >= self.max
    }

    /// Check whether `seats` more can be taken without exceeding `max`.
    pub fn can_take(&self, seats: u32) -> bool {
        seats <= self.remaining()
    }

    pub fn view(&self) -> OccupancyView {
        OccupancyView {
            booked: self.booked,
            max: self.max,
            remaining: self.remaining(),
            percent: self.percent(),
        }
    }
}

/// Serialisable capacity display attached to list items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyView {
    pub booked: u32,
    pub max: u32,
    pub remaining: u32,
    pub percent: f64,
}
