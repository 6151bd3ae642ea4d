//! Live monitor for X-Plane UDP telemetry.
//!
//! The simulator broadcasts `DATA*` records (data output groups of eight
//! floats) and `DREF+` dataref values over UDP. This crate decodes both,
//! keeps the latest value of every channel, and drives a scrolling
//! multi-series strip chart.
//!
//! # Features
//!
//! - **Decoding**: bounds-checked, pure decoding of both packet families,
//!   with partial DATA packets salvaged record by record
//! - **Channel store**: latest-value table with a deterministic text dump
//! - **Strip chart**: constant work per frame regardless of width or history
//! - **Pipeline**: UDP receive tasks feeding a single writer task, with
//!   snapshots and decoded packets published as streams
//!
//! ## Example (simulated source)
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use std::time::Duration;
//! use xplane_monitor::{UpdateRate, XPlaneMonitor};
//!
//! #[tokio::main]
//! async fn main() -> xplane_monitor::Result<()> {
//!     let connection = XPlaneMonitor::simulate(Duration::from_millis(100));
//!     let mut speeds = connection.group_samples(3, UpdateRate::Max(5));
//!
//!     while let Some(values) = speeds.next().await {
//!         println!("Vind {} kias", values[0]);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
pub mod types;

pub mod chart;
pub mod config;
pub mod protocol;
pub mod store;

// Stream-based pipeline
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;
pub mod stream;

pub use error::*;
pub use types::*;

pub use chart::{ChartGeometry, DrawCommand, DrawSurface, Frame, Raster, StripChartBuffer};
pub use config::MonitorConfig;
pub use connection::MonitorConnection;
pub use provider::PacketSource;
pub use store::{ChannelStore, StoreSnapshot};

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use driver::Driver;
use providers::{SampleSource, UdpSource};

/// Entry point for monitor connections.
///
/// # Examples
///
/// ## Listening to the simulator
/// ```rust,no_run
/// use xplane_monitor::{MonitorConfig, XPlaneMonitor};
///
/// #[tokio::main]
/// async fn main() -> xplane_monitor::Result<()> {
///     let config = MonitorConfig::default().with_env_overrides()?;
///     let connection = XPlaneMonitor::listen(&config).await?;
///     println!("{}", connection.current());
///     Ok(())
/// }
/// ```
pub struct XPlaneMonitor;

impl XPlaneMonitor {
    /// Bind the DATA and DREF ports and start monitoring.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration fails validation
    /// - The channel table cannot be loaded
    /// - Either port cannot be bound
    pub async fn listen(config: &MonitorConfig) -> Result<MonitorConnection> {
        config.validate()?;
        let table = Arc::new(config.channel_table()?);

        let data = UdpSource::bind(config.data_addr(), config.max_datagram_bytes).await?;
        let dref = UdpSource::bind(config.dref_addr(), config.max_datagram_bytes).await?;
        info!(data = %config.data_addr(), dref = %config.dref_addr(), "Listening for X-Plane");

        let sources: Vec<Box<dyn PacketSource>> = vec![Box::new(data), Box::new(dref)];
        Ok(Self::with_sources(sources, table, config.source_hz))
    }

    /// Replay the bundled sample packets, one every `period`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn simulate(period: Duration) -> MonitorConnection {
        let period = period.max(Duration::from_millis(1));
        info!(?period, "Simulating X-Plane");
        let sources: Vec<Box<dyn PacketSource>> = vec![Box::new(SampleSource::new(period))];
        Self::with_sources(sources, Arc::new(ChannelTable::builtin()), 1.0 / period.as_secs_f64())
    }

    /// Run the pipeline over arbitrary sources.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_sources(
        sources: Vec<Box<dyn PacketSource>>,
        table: Arc<ChannelTable>,
        source_hz: f64,
    ) -> MonitorConnection {
        MonitorConnection::new(Driver::spawn(sources, table), source_hz)
    }
}
