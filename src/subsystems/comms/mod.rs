//! Comms subsystem — manages the service's external I/O channels.
//!
//! Each channel implements [`Component`] and is spawned by [`start`] via
//! [`spawn_components`]. Channels capture the shared [`BackofficeState`] at
//! construction; the generic `Component::run` signature only carries the
//! shutdown token.
//!
//! [`start`] is synchronous: it returns a [`SubsystemHandle`] as soon as the
//! tasks are spawned and the caller decides when to await it.

pub mod axum_channel;
mod state;

pub use state::BackofficeState;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::subsystems::runtime::{Component, SubsystemHandle, spawn_components};

/// Spawn all configured channels and return a handle that resolves when they
/// have all exited.
pub fn start(config: &Config, state: Arc<BackofficeState>, shutdown: CancellationToken) -> SubsystemHandle {
    let mut components: Vec<Box<dyn Component>> = Vec::new();

    if config.comms_axum_should_load() {
        info!(bind = %config.comms.axum.bind, "loading axum channel");
        components.push(Box::new(axum_channel::AxumChannel::new(
            "axum0",
            config.comms.axum.bind.clone(),
            state,
        )));
    }

    if components.is_empty() {
        info!("no comms channels configured — waiting for shutdown");
    }

    spawn_components(components, shutdown)
}
