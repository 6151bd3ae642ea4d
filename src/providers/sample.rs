//! Simulated source replaying the bundled sample packets

use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, trace};

use crate::Result;
use crate::protocol::samples;
use crate::provider::PacketSource;

/// Alternates the groundspeed DREF packet and the six-record DATA packet.
pub struct SampleSource {
    interval: Interval,
    limit: Option<u64>,
    emitted: u64,
}

impl SampleSource {
    /// Emit one packet per `period`, forever.
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, limit: None, emitted: 0 }
    }

    /// Stop after `count` packets.
    pub fn with_limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    /// Packets emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

#[async_trait::async_trait]
impl PacketSource for SampleSource {
    async fn next_packet(&mut self) -> Result<Option<Vec<u8>>> {
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            debug!(emitted = self.emitted, "Sample source exhausted");
            return Ok(None);
        }

        self.interval.tick().await;
        let raw = if self.emitted % 2 == 0 {
            samples::GROUNDSPEED_DREF
        } else {
            samples::DATA_GROUPS.as_slice()
        };
        self.emitted += 1;
        trace!(emitted = self.emitted, len = raw.len(), "Sample packet");
        Ok(Some(raw.to_vec()))
    }

    fn name(&self) -> &str {
        "samples"
    }
}
