//! Handle to a running monitor

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::driver::{Command, DriverChannels};
use crate::store::StoreSnapshot;
use crate::stream::CoalesceExt;
use crate::types::{FIELDS_PER_GROUP, Packet, UpdateRate};
use crate::{MonitorError, Result};

/// Connection to a running monitor pipeline.
///
/// Readers never touch the store; they observe published snapshots and
/// decoded packets. Dropping the connection stops every task.
pub struct MonitorConnection {
    /// Snapshot watch receiver
    snapshots: watch::Receiver<Arc<StoreSnapshot>>,

    /// Packet fan-out, subscribed per stream
    packets: broadcast::Sender<Arc<Packet>>,

    /// Commands into the processing task
    commands: mpsc::Sender<Command>,

    /// Expected datagram rate
    source_hz: f64,

    /// Cancellation token for stopping tasks
    cancel: CancellationToken,
}

impl MonitorConnection {
    pub fn new(channels: DriverChannels, source_hz: f64) -> Self {
        info!(source_hz, "Monitor connection opened");
        Self {
            snapshots: channels.snapshots,
            packets: channels.packets,
            commands: channels.commands,
            source_hz,
            cancel: channels.cancel,
        }
    }

    /// Store snapshots, the current one first.
    ///
    /// With [`UpdateRate::Max`] intermediate snapshots are skipped.
    pub fn snapshots(&self, rate: UpdateRate) -> impl Stream<Item = Arc<StoreSnapshot>> + 'static {
        let snapshots = WatchStream::new(self.snapshots.clone());
        match rate.interval(self.source_hz) {
            None => snapshots.boxed(),
            Some(period) => snapshots.coalesce(period).boxed(),
        }
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Every decoded packet from now on.
    ///
    /// Partially decoded DATA packets appear with their complete records.
    /// A subscriber that falls behind skips the packets it missed.
    pub fn packets(&self) -> impl Stream<Item = Arc<Packet>> + 'static {
        BroadcastStream::new(self.packets.subscribe()).filter_map(|item| async move {
            match item {
                Ok(packet) => Some(packet),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Packet subscriber lagged");
                    None
                }
            }
        })
    }

    /// The eight values of one DATA group each time it is received.
    ///
    /// Meant for feeding a [`StripChartBuffer`](crate::chart::StripChartBuffer)
    /// from a render loop that owns it.
    pub fn group_samples(
        &self,
        group_id: i32,
        rate: UpdateRate,
    ) -> BoxStream<'static, [f32; FIELDS_PER_GROUP]> {
        let samples = self.packets().filter_map(move |packet| async move {
            packet.blocks().iter().rev().find(|block| block.group_id == group_id).map(|b| b.values)
        });

        match rate.interval(self.source_hz) {
            None => samples.boxed(),
            Some(period) => samples.coalesce(period).boxed(),
        }
    }

    /// Forget every channel. Takes effect ahead of datagrams still queued.
    pub async fn reset(&self) -> Result<()> {
        self.commands
            .send(Command::Reset)
            .await
            .map_err(|_| MonitorError::source_failed("monitor has stopped"))
    }

    /// Wait until at least `sequence` datagrams have been processed.
    pub async fn wait_for_sequence(
        &self,
        sequence: u64,
        timeout: Duration,
    ) -> Result<Arc<StoreSnapshot>> {
        let mut rx = self.snapshots.clone();
        let waited = tokio::time::timeout(timeout, async move {
            rx.wait_for(|snapshot| snapshot.sequence >= sequence).await.map(|s| Arc::clone(&s))
        })
        .await;

        match waited {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(_)) => {
                warn!(sequence, "Monitor stopped before reaching sequence");
                Err(MonitorError::source_failed("monitor stopped"))
            }
            Err(_) => Err(MonitorError::Timeout { duration: timeout }),
        }
    }

    /// Resolves once the pipeline has stopped: every source ended or the
    /// connection was shut down.
    pub async fn closed(&self) {
        let mut rx = self.snapshots.clone();
        while rx.changed().await.is_ok() {}
    }

    /// Stop all tasks without dropping the handle.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }
}

impl Drop for MonitorConnection {
    fn drop(&mut self) {
        debug!("Dropping monitor connection");
        self.cancel.cancel();
    }
}
