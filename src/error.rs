//! Error types for telemetry processing.
//!
//! Every failure the monitor can report is a variant of [`MonitorError`].
//! None of them is fatal to the process: packet errors drop a single
//! datagram, source errors are retried by the driver, and chart errors are
//! returned to the caller that misconfigured the chart.
//!
//! ## Error Categories
//!
//! - **Packet Errors**: malformed or unrecognised datagrams
//! - **Chart Errors**: sample vectors that do not match the configured series
//! - **Source Errors**: socket or queue failures in a packet source
//! - **Configuration Errors**: invalid settings or channel tables
//!
//! ## Partial packets
//!
//! A DATA packet with a trailing incomplete record still carries every
//! complete record. The decoder returns them inside the error so callers can
//! apply them before logging the diagnostic:
//!
//! ```rust
//! use xplane_monitor::{MonitorError, protocol};
//!
//! let mut raw = protocol::build_data_packet(&[(3, [1.0; 8])]);
//! raw.extend_from_slice(&[0xAA; 7]);
//!
//! let error = protocol::decode(&raw).unwrap_err();
//! assert!(error.is_packet_error());
//! assert_eq!(error.recovered_blocks().len(), 1);
//! ```

use std::time::Duration;
use thiserror::Error;

use crate::types::DataBlock;

/// Result type alias for monitor operations.
pub type Result<T, E = MonitorError> = std::result::Result<T, E>;

/// Main error type for monitor operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MonitorError {
    #[error("Malformed {context} packet: {details}")]
    MalformedPacket {
        context: &'static str,
        details: String,
        /// Complete records decoded before the fault was detected.
        recovered: Vec<DataBlock>,
    },

    #[error("Unknown packet type {tag:?}")]
    UnknownPacketType { tag: String },

    #[error("Chart expects {expected} series but sample has {found}")]
    ChannelCountMismatch { expected: usize, found: usize },

    #[error("Chart scale must be positive and finite, got {value}")]
    InvalidScale { value: f64 },

    #[error("Packet source failed: {reason}")]
    Source {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration error in {context}: {details}")]
    Config { context: String, details: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },
}

impl MonitorError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            MonitorError::Source { .. } => true,
            MonitorError::Timeout { .. } => true,
            MonitorError::MalformedPacket { .. } => false,
            MonitorError::UnknownPacketType { .. } => false,
            MonitorError::ChannelCountMismatch { .. } => false,
            MonitorError::InvalidScale { .. } => false,
            MonitorError::Config { .. } => false,
        }
    }

    /// Returns whether this error concerns a single datagram that should be
    /// logged and dropped while processing continues.
    pub fn is_packet_error(&self) -> bool {
        matches!(self, MonitorError::MalformedPacket { .. } | MonitorError::UnknownPacketType { .. })
    }

    /// Complete DATA records salvaged from a malformed packet.
    pub fn recovered_blocks(&self) -> &[DataBlock] {
        match self {
            MonitorError::MalformedPacket { recovered, .. } => recovered,
            _ => &[],
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            MonitorError::MalformedPacket { .. } => vec![
                "Check the simulator's data output format settings",
                "Verify nothing else is sending to the monitor ports",
            ],
            MonitorError::UnknownPacketType { .. } => vec![
                "Enable only DATA and DREF output in the simulator",
                "Check that the DATA and DREF ports are not swapped with another service",
            ],
            MonitorError::ChannelCountMismatch { .. } => vec![
                "Call configure() with the number of series before pushing samples",
                "Push one value per configured series",
            ],
            MonitorError::InvalidScale { .. } => {
                vec!["Use a positive, finite maximum amplitude for the chart"]
            }
            MonitorError::Source { .. } => vec![
                "Check that the UDP ports are not already in use",
                "Verify the bind address exists on this machine",
                "Restart the monitor",
            ],
            MonitorError::Config { .. } => vec![
                "Check the configuration file syntax",
                "Compare the file against the documented defaults",
            ],
            MonitorError::Timeout { .. } => vec![
                "Verify the simulator is running and sending data",
                "Increase the timeout duration",
            ],
        }
    }

    /// Helper constructor for malformed packets without salvaged records.
    pub fn malformed(context: &'static str, details: impl Into<String>) -> Self {
        MonitorError::MalformedPacket { context, details: details.into(), recovered: Vec::new() }
    }

    /// Helper constructor for unknown packet tags.
    ///
    /// At most the first five bytes are kept, escaped for display.
    pub fn unknown_packet(raw: &[u8]) -> Self {
        let head = &raw[..raw.len().min(5)];
        MonitorError::UnknownPacketType { tag: head.escape_ascii().to_string() }
    }

    /// Helper constructor for source errors.
    pub fn source_failed(reason: impl Into<String>) -> Self {
        MonitorError::Source { reason: reason.into(), source: None }
    }

    /// Helper constructor for source errors with an underlying cause.
    pub fn source_failed_with(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        MonitorError::Source { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for configuration errors.
    pub fn config(context: impl Into<String>, details: impl Into<String>) -> Self {
        MonitorError::Config { context: context.into(), details: details.into() }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError::Source { reason: err.to_string(), source: Some(Box::new(err)) }
    }
}

impl From<serde_yaml_ng::Error> for MonitorError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        MonitorError::Config { context: "YAML".to_string(), details: err.to_string() }
    }
}

impl From<figment::Error> for MonitorError {
    fn from(err: figment::Error) -> Self {
        MonitorError::Config { context: "settings".to_string(), details: err.to_string() }
    }
}
