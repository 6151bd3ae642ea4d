//! Redraw rate control for sample streams

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often a subscriber wants to see new values.
///
/// The simulator's output rate is configured on the simulator side and is
/// usually higher than a chart needs; `Max` coalesces to the latest value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// Every value as it arrives
    Native,

    /// At most this many values per second, latest wins
    Max(u32),
}

impl UpdateRate {
    /// Resolve against the source rate hint.
    ///
    /// A cap at or above the source rate is pointless and collapses to
    /// `Native`; a cap of zero is treated the same way.
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Native => UpdateRate::Native,
            UpdateRate::Max(0) => UpdateRate::Native,
            UpdateRate::Max(hz) if hz as f64 >= source_hz => UpdateRate::Native,
            UpdateRate::Max(hz) => UpdateRate::Max(hz),
        }
    }

    /// Redraw period when coalescing applies.
    pub fn interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_above_source_collapse_to_native() {
        assert_eq!(UpdateRate::Max(30).normalize(20.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(20).normalize(20.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(0).normalize(20.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(5).normalize(20.0), UpdateRate::Max(5));
    }

    #[test]
    fn interval_matches_cap() {
        assert_eq!(UpdateRate::Native.interval(20.0), None);
        assert_eq!(UpdateRate::Max(4).interval(20.0), Some(Duration::from_millis(250)));
    }
}
