//! Shared state for the comms subsystem — the capability boundary for
//! channels.
//!
//! Channels receive an `Arc<BackofficeState>` and reach the record stores,
//! the manual and the recommender only through it.

use chrono::{Local, NaiveDate};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::subsystems::Stores;
use crate::subsystems::manual::Manual;
use crate::subsystems::recommend::Recommender;

pub struct BackofficeState {
    stores: RwLock<Stores>,
    manual: Manual,
    recommender: Recommender,
    /// Pinned "today" for deterministic tests; `None` reads the local clock.
    fixed_today: Option<NaiveDate>,
}

impl BackofficeState {
    pub fn new(stores: Stores, manual: Manual, recommender: Recommender) -> Self {
        Self { stores: RwLock::new(stores), manual, recommender, fixed_today: None }
    }

    /// Pin the date used for passport checks and new-record dates.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Stores> {
        self.stores.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Stores> {
        self.stores.write().await
    }

    pub fn manual(&self) -> &Manual {
        &self.manual
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }
}
