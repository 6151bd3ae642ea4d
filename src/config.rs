//! Monitor configuration
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional YAML file, then `XPLANE_MONITOR_*` environment variables.
//!
//! ```yaml
//! bind_address: 0.0.0.0
//! data_port: 49001
//! dref_port: 49002
//! chart:
//!   width: 240
//!   max_amplitude: 90.0
//! channel_table: channels.yaml
//! ```

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::chart::{ChartGeometry, MAX_DIMENSION};
use crate::types::ChannelTable;
use crate::{MonitorError, Result};

/// Port the simulator's data output sends DATA packets to.
pub const DEFAULT_DATA_PORT: u16 = 49001;

/// Port for DREF packets.
pub const DEFAULT_DREF_PORT: u16 = 49002;

pub const DEFAULT_MAX_DATAGRAM_BYTES: usize = 2048;

/// Typical data output rate configured in the simulator.
pub const DEFAULT_SOURCE_HZ: f64 = 20.0;

/// Prefix of override variables. Nested keys use `__`, so
/// `XPLANE_MONITOR_CHART__WIDTH` sets `chart.width`.
pub const ENV_PREFIX: &str = "XPLANE_MONITOR_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub bind_address: IpAddr,
    pub data_port: u16,
    pub dref_port: u16,
    pub max_datagram_bytes: usize,
    /// Expected datagram rate, used to decide when rate caps apply
    pub source_hz: f64,
    pub chart: ChartConfig,
    /// YAML channel table replacing the built-in one
    pub channel_table: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            data_port: DEFAULT_DATA_PORT,
            dref_port: DEFAULT_DREF_PORT,
            max_datagram_bytes: DEFAULT_MAX_DATAGRAM_BYTES,
            source_hz: DEFAULT_SOURCE_HZ,
            chart: ChartConfig::default(),
            channel_table: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub max_amplitude: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let geometry = ChartGeometry::default();
        Self { width: geometry.width, height: geometry.height, max_amplitude: 1.0 }
    }
}

impl ChartConfig {
    pub fn geometry(&self) -> ChartGeometry {
        ChartGeometry::new(self.width, self.height)
    }
}

impl MonitorConfig {
    /// Built-in defaults with `yaml` merged on top.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(Self::defaults().merge(Yaml::string(yaml)).extract()?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::config(path.display().to_string(), format!("cannot read: {e}"))
        })?;
        debug!(path = %path.display(), "Loaded monitor config");
        Self::from_yaml_str(&text)
    }

    /// Apply `XPLANE_MONITOR_*` variables from the process environment.
    ///
    /// A variable that does not parse as its field's type is an error.
    pub fn with_env_overrides(self) -> Result<Self> {
        let config: Self = Figment::from(Serialized::defaults(self)).merge(Self::env()).extract()?;
        debug!(data = %config.data_addr(), dref = %config.dref_addr(), "Applied environment");
        Ok(config)
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    /// `XPLANE_MONITOR_CONFIG` names the file itself and is not a setting.
    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__")
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_port == 0 || self.dref_port == 0 {
            return Err(MonitorError::config("ports", "ports must be non-zero"));
        }
        if self.data_port == self.dref_port {
            return Err(MonitorError::config(
                "ports",
                format!("DATA and DREF ports must differ (both {})", self.data_port),
            ));
        }
        if self.max_datagram_bytes == 0 {
            return Err(MonitorError::config("max_datagram_bytes", "must be non-zero"));
        }
        if !(self.source_hz.is_finite() && self.source_hz > 0.0) {
            return Err(MonitorError::config(
                "source_hz",
                format!("{} is not positive", self.source_hz),
            ));
        }
        if !self.chart.geometry().is_valid() {
            return Err(MonitorError::config(
                "chart",
                format!(
                    "dimensions must be within 1..={MAX_DIMENSION}, got {}x{}",
                    self.chart.width, self.chart.height
                ),
            ));
        }
        if !(self.chart.max_amplitude.is_finite() && self.chart.max_amplitude > 0.0) {
            return Err(MonitorError::config(
                "chart",
                format!("max_amplitude must be positive, got {}", self.chart.max_amplitude),
            ));
        }
        Ok(())
    }

    pub fn data_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.data_port)
    }

    pub fn dref_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.dref_port)
    }

    /// The configured channel table, or the built-in one.
    pub fn channel_table(&self) -> Result<ChannelTable> {
        match &self.channel_table {
            Some(path) => ChannelTable::load(path),
            None => Ok(ChannelTable::builtin()),
        }
    }
}
