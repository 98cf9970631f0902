//! Vehicle availability tracking.
//!
//! Seats are booked against a hard capacity limit; a vehicle flips to
//! `Full` when the last seat is taken and refuses further bookings.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capacity::{Occupancy, OccupancyView};
use crate::error::RecordError;
use crate::search::matches_query;

use super::non_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    Available,
    Full,
    Maintenance,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::Full => "Full",
            VehicleStatus::Maintenance => "Maintenance",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: u32,
    pub booked: u32,
    pub location: String,
    pub status: VehicleStatus,
    /// Free-text supplier label; not linked to a supplier record.
    pub supplier: String,
}

impl Vehicle {
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::new(self.booked, self.capacity)
    }

    fn status_from_occupancy(&self) -> VehicleStatus {
        if self.occupancy().is_full() {
            VehicleStatus::Full
        } else {
            VehicleStatus::Available
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleView {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub occupancy: OccupancyView,
}

impl From<&Vehicle> for VehicleView {
    fn from(v: &Vehicle) -> Self {
        Self { vehicle: v.clone(), occupancy: v.occupancy().view() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FleetSummary {
    pub available: usize,
    pub full: usize,
    pub maintenance: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVehicle {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub capacity: u32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub supplier: String,
}

#[derive(Debug, Default)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
}

impl Fleet {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }

    pub fn seeded() -> Self {
        let vehicle = |id, name: &str, kind: &str, capacity, booked, location: &str, status, supplier: &str| Vehicle {
            id,
            name: name.into(),
            kind: kind.into(),
            capacity,
            booked,
            location: location.into(),
            status,
            supplier: supplier.into(),
        };
        Self::new(vec![
            vehicle(1, "Tourist Bus A", "Bus", 40, 32, "Boracay Route", VehicleStatus::Available, "Metro Bus Services"),
            vehicle(2, "Tourist Bus B", "Bus", 40, 40, "Palawan Route", VehicleStatus::Full, "Metro Bus Services"),
            vehicle(3, "Van #1", "Van", 12, 8, "Cebu City Tour", VehicleStatus::Available, "Island Van Rentals"),
            vehicle(4, "Van #2", "Van", 12, 12, "Cebu Island Hop", VehicleStatus::Full, "Island Van Rentals"),
            vehicle(5, "Van #3", "Van", 12, 0, "Unassigned", VehicleStatus::Maintenance, "Island Van Rentals"),
            vehicle(6, "Coaster #1", "Coaster", 25, 18, "Manila Day Tour", VehicleStatus::Available, "Pacific Transport"),
        ])
    }

    /// Vehicles whose name or location contains `query`.
    pub fn list(&self, query: &str) -> Vec<VehicleView> {
        self.vehicles
            .iter()
            .filter(|v| matches_query(query, &[&v.name, &v.location]))
            .map(VehicleView::from)
            .collect()
    }

    pub fn summary(&self) -> FleetSummary {
        self.vehicles.iter().fold(FleetSummary::default(), |mut s, v| {
            match v.status {
                VehicleStatus::Available => s.available += 1,
                VehicleStatus::Full => s.full += 1,
                VehicleStatus::Maintenance => s.maintenance += 1,
            }
            s
        })
    }

    pub fn add(&mut self, new: NewVehicle) -> Result<VehicleView, RecordError> {
        let (Some(name), Some(kind)) = (non_blank(&new.name), non_blank(&new.kind)) else {
            return Err(RecordError::validation("Vehicle name and type are required."));
        };
        if new.capacity == 0 {
            return Err(RecordError::validation("Capacity must be greater than zero."));
        }

        let vehicle = Vehicle {
            id: self.vehicles.len() as u32 + 1,
            name,
            kind,
            capacity: new.capacity,
            booked: 0,
            location: new
                .location
                .as_deref()
                .and_then(non_blank)
                .unwrap_or_else(|| "Unassigned".into()),
            status: VehicleStatus::Available,
            supplier: new.supplier.trim().to_string(),
        };
        self.vehicles.push(vehicle.clone());
        Ok(VehicleView::from(&vehicle))
    }

    /// Book `seats` on vehicle `id`, refusing anything past capacity.
    pub fn book(&mut self, id: u32, seats: u32) -> Result<VehicleView, RecordError> {
        if seats == 0 {
            return Err(RecordError::validation("At least one seat must be booked."));
        }
        let vehicle = self.find_mut(id)?;
        if vehicle.status == VehicleStatus::Maintenance {
            return Err(RecordError::Unavailable {
                kind: "vehicle",
                id,
                status: vehicle.status.to_string(),
            });
        }
        let occupancy = vehicle.occupancy();
        if !occupancy.can_take(seats) {
            return Err(RecordError::CapacityExceeded { requested: seats, remaining: occupancy.remaining() });
        }

        vehicle.booked += seats;
        vehicle.status = vehicle.status_from_occupancy();
        debug!(vehicle_id = id, seats, booked = vehicle.booked, status = %vehicle.status, "seats booked");
        Ok(VehicleView::from(&*vehicle))
    }

    /// Put a vehicle into or take it out of maintenance.
    pub fn set_maintenance(&mut self, id: u32, on: bool) -> Result<VehicleView, RecordError> {
        let vehicle = self.find_mut(id)?;
        vehicle.status = if on {
            VehicleStatus::Maintenance
        } else {
            vehicle.status_from_occupancy()
        };
        Ok(VehicleView::from(&*vehicle))
    }

    fn find_mut(&mut self, id: u32) -> Result<&mut Vehicle, RecordError> {
        self.vehicles
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(RecordError::NotFound { kind: "vehicle", id })
    }
}
