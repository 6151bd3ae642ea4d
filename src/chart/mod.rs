//! Scrolling multi-series strip chart
//!
//! The chart is split in two: [`StripChartBuffer`] owns the cursor, the two
//! sample slots, and the scale, and emits draw instructions; a
//! [`DrawSurface`] turns those into pixels. [`Raster`] is a surface backed by
//! an in-memory cell grid that renders as text.
//!
//! ```rust
//! use xplane_monitor::chart::{ChartGeometry, Raster, StripChartBuffer};
//!
//! let geometry = ChartGeometry::new(40, 9);
//! let mut chart = StripChartBuffer::new(geometry);
//! let mut raster = Raster::new(geometry);
//! chart.configure(2);
//!
//! for step in 0..30 {
//!     let t = step as f32 / 5.0;
//!     chart.push_sample(&[t.sin(), t.cos()]).unwrap();
//!     chart.advance_into(&mut raster);
//! }
//! assert_eq!(chart.step(), 30);
//! println!("{}", raster.to_ascii());
//! ```

mod buffer;
mod raster;
mod surface;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use buffer::StripChartBuffer;
pub use raster::{Cell, Raster};
pub use surface::{DrawCommand, DrawSurface, Frame, Point, Suppression};

/// Series colors, by series index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SeriesColor {
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
}

impl SeriesColor {
    /// Glyph used by the text renderer.
    pub const fn glyph(self) -> char {
        match self {
            SeriesColor::Red => 'r',
            SeriesColor::Green => 'g',
            SeriesColor::Blue => 'b',
            SeriesColor::Cyan => 'c',
            SeriesColor::Magenta => 'm',
            SeriesColor::Yellow => 'y',
        }
    }

    pub fn for_series(series: usize) -> Option<Self> {
        PALETTE.get(series).copied()
    }
}

impl fmt::Display for SeriesColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub const PALETTE: [SeriesColor; 6] = [
    SeriesColor::Red,
    SeriesColor::Green,
    SeriesColor::Blue,
    SeriesColor::Cyan,
    SeriesColor::Magenta,
    SeriesColor::Yellow,
];

/// Most series a chart can show at once.
pub const MAX_SERIES: usize = PALETTE.len();

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 8192;

/// Plot area size. Columns run `0..=width`, rows `0..height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ChartGeometry {
    pub width: u32,
    pub height: u32,
}

impl ChartGeometry {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions clamped to `1..=MAX_DIMENSION`.
    pub fn sanitized(self) -> Self {
        Self {
            width: self.width.clamp(1, MAX_DIMENSION),
            height: self.height.clamp(1, MAX_DIMENSION),
        }
    }

    /// Whether both dimensions are already within range.
    pub fn is_valid(&self) -> bool {
        self.sanitized() == *self
    }

    /// Number of columns the cursor cycles through.
    pub fn columns(&self) -> u32 {
        self.width + 1
    }
}

/// Sized to fit a standard terminal.
impl Default for ChartGeometry {
    fn default() -> Self {
        Self::new(78, 21)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_order_and_glyphs() {
        let glyphs: String = PALETTE.iter().map(|c| c.glyph()).collect();
        assert_eq!(glyphs, "rgbcmy");
        assert_eq!(SeriesColor::for_series(0), Some(SeriesColor::Red));
        assert_eq!(SeriesColor::for_series(5), Some(SeriesColor::Yellow));
        assert_eq!(SeriesColor::for_series(MAX_SERIES), None);
    }

    #[test]
    fn geometry_sanitizes_zero() {
        assert_eq!(ChartGeometry::new(0, 5).sanitized(), ChartGeometry::new(1, 5));
        assert_eq!(ChartGeometry::new(3, 0).sanitized().columns(), 4);
    }

    #[test]
    fn geometry_caps_oversize() {
        let capped = ChartGeometry::new(u32::MAX, u32::MAX).sanitized();
        assert_eq!(capped, ChartGeometry::new(MAX_DIMENSION, MAX_DIMENSION));
        assert_eq!(capped.columns(), MAX_DIMENSION + 1);
        assert!(!ChartGeometry::new(MAX_DIMENSION + 1, 10).is_valid());
        assert!(ChartGeometry::default().is_valid());
    }
}
