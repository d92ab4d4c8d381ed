//! # Profile Publisher
//!
//! Periodically snapshots `CarInfo` + actuator state and hands the
//! `CarProfile` to a `ProfileSink`. A failed publish is logged and retried on
//! the next tick.

use crate::domain::errors::ProfileSinkError;
use crate::ports::outbound::{Actuator, ProfileSink};
use shared_types::{CarInfo, CarProfile};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Default publication interval.
pub const DEFAULT_PROFILE_INTERVAL: Duration = Duration::from_secs(30);

/// Lower bound for the interval; `tokio::time::interval` rejects zero.
const MIN_PROFILE_INTERVAL: Duration = Duration::from_secs(1);

pub struct ProfilePublisher {
    info: CarInfo,
    actuator: Arc<dyn Actuator>,
    sink: Arc<dyn ProfileSink>,
    interval: Duration,
}

impl ProfilePublisher {
    pub fn new(
        info: CarInfo,
        actuator: Arc<dyn Actuator>,
        sink: Arc<dyn ProfileSink>,
        interval: Duration,
    ) -> Self {
        Self {
            info,
            actuator,
            sink,
            interval: interval.max(MIN_PROFILE_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn snapshot(&self) -> CarProfile {
        CarProfile::snapshot(&self.info, &self.actuator.state())
    }

    pub async fn publish_once(&self) -> Result<(), ProfileSinkError> {
        let profile = self.snapshot();
        debug!(car = %self.info.id, locked = profile.locked, "Publishing car profile");
        self.sink.publish(profile).await
    }

    /// Publish on every tick until `shutdown` flips or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_secs = self.interval.as_secs(), "Profile publisher started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.publish_once().await {
                        warn!(error = %e, "Profile publish failed");
                    }
                }
                _ = shutdown.changed() => {
                    info!("Profile publisher stopping");
                    break;
                }
            }
        }
    }
}
