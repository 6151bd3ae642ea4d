//! Driver spawns and manages the receive and processing tasks

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::provider::PacketSource;
use crate::store::{ChannelStore, StoreSnapshot};
use crate::types::{ChannelTable, Packet};

/// Consecutive failures after which a source is abandoned.
pub const MAX_ERRORS: u32 = 10;

/// Raw datagrams buffered between the sources and the store.
pub const INGEST_QUEUE_CAPACITY: usize = 256;

/// Decoded packets kept for slow subscribers before they lag.
pub const PACKET_BROADCAST_CAPACITY: usize = 256;

/// Requests handled by the processing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forget every channel, keeping the sequence counter.
    Reset,
}

/// Result of spawning driver tasks
pub struct DriverChannels {
    /// Latest store contents, replaced after every datagram
    pub snapshots: watch::Receiver<Arc<StoreSnapshot>>,
    /// Decoded packets; call `subscribe()` for a receiver
    pub packets: broadcast::Sender<Arc<Packet>>,
    /// Command queue into the processing task
    pub commands: mpsc::Sender<Command>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Driver spawns and manages the monitor's tasks
///
/// One receive task per source forwards raw datagrams into a shared queue.
/// A single processing task owns the [`ChannelStore`], so every mutation
/// happens in one place and readers only ever see published snapshots.
pub struct Driver;

impl Driver {
    /// Spawn driver tasks for the given sources.
    ///
    /// Must be called from within a Tokio runtime. The processing task ends
    /// when every source has ended or the token is cancelled; the snapshot
    /// channel closes with it.
    pub fn spawn(sources: Vec<Box<dyn PacketSource>>, table: Arc<ChannelTable>) -> DriverChannels {
        let store = ChannelStore::new(table);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(store.snapshot()));
        let (packet_tx, _) = broadcast::channel(PACKET_BROADCAST_CAPACITY);
        let (command_tx, command_rx) = mpsc::channel(8);
        let (raw_tx, raw_rx) = mpsc::channel(INGEST_QUEUE_CAPACITY);
        let cancel = CancellationToken::new();

        if sources.is_empty() {
            warn!("Driver started without sources");
        }
        for source in sources {
            let raw_tx = raw_tx.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                Self::receive_task(source, raw_tx, cancel).await;
            });
        }
        drop(raw_tx);

        let cancel_processing = cancel.clone();
        let packet_tx_processing = packet_tx.clone();
        tokio::spawn(async move {
            Self::processing_task(
                store,
                raw_rx,
                command_rx,
                snapshot_tx,
                packet_tx_processing,
                cancel_processing,
            )
            .await;
        });

        DriverChannels { snapshots: snapshot_rx, packets: packet_tx, commands: command_tx, cancel }
    }

    /// Receive task - pulls datagrams from one source into the queue
    async fn receive_task(
        mut source: Box<dyn PacketSource>,
        raw_tx: mpsc::Sender<Vec<u8>>,
        cancel: CancellationToken,
    ) {
        let name = source.name().to_string();
        info!(source = %name, "Receive task started");
        let mut received = 0u64;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(source = %name, "Receive task cancelled");
                    break;
                }
                result = source.next_packet() => result,
            };

            match result {
                Ok(Some(raw)) => {
                    received += 1;
                    error_count = 0;
                    trace!(source = %name, received, len = raw.len(), "Queued datagram");
                    if raw_tx.send(raw).await.is_err() {
                        debug!(source = %name, "Processing task gone, stopping");
                        break;
                    }
                }
                Ok(None) => {
                    info!(source = %name, received, "Source ended");
                    break;
                }
                Err(e) => {
                    // Transient socket errors are retried
                    error_count += 1;
                    error!(source = %name, "Source error ({}/{}): {}", error_count, MAX_ERRORS, e);

                    if error_count >= MAX_ERRORS {
                        error!(source = %name, "Too many source errors, giving up");
                        break;
                    }

                    // Exponential backoff: 100ms, 200ms, 400ms, ...
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        info!(source = %name, received, "Receive task ended");
    }

    /// Processing task - sole owner and writer of the store
    async fn processing_task(
        mut store: ChannelStore,
        mut raw_rx: mpsc::Receiver<Vec<u8>>,
        mut command_rx: mpsc::Receiver<Command>,
        snapshot_tx: watch::Sender<Arc<StoreSnapshot>>,
        packet_tx: broadcast::Sender<Arc<Packet>>,
        cancel: CancellationToken,
    ) {
        info!("Processing task started");
        let mut rejected = 0u64;
        let mut commands_open = true;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("Processing task cancelled");
                    break;
                }
                command = command_rx.recv(), if commands_open => match command {
                    Some(Command::Reset) => {
                        store.reset();
                        snapshot_tx.send_replace(Arc::new(store.snapshot()));
                    }
                    None => commands_open = false,
                },
                raw = raw_rx.recv() => {
                    let Some(raw) = raw else {
                        info!("All sources ended");
                        break;
                    };
                    if !Self::process(&mut store, &raw, &packet_tx) {
                        rejected += 1;
                    }
                    snapshot_tx.send_replace(Arc::new(store.snapshot()));
                }
            }
        }

        info!(sequence = store.sequence(), rejected, "Processing task ended");
    }

    /// Ingest one datagram and fan out what decoded. Returns false when the
    /// datagram was rejected.
    fn process(
        store: &mut ChannelStore,
        raw: &[u8],
        packet_tx: &broadcast::Sender<Arc<Packet>>,
    ) -> bool {
        match store.ingest(raw) {
            Ok(packet) => {
                // No subscribers is fine
                let _ = packet_tx.send(Arc::new(packet));
                true
            }
            Err(e) => {
                warn!(sequence = store.sequence(), len = raw.len(), "Dropping datagram: {}", e);
                let recovered = e.recovered_blocks();
                if !recovered.is_empty() {
                    let _ = packet_tx.send(Arc::new(Packet::Data(recovered.to_vec())));
                }
                false
            }
        }
    }
}
