//! Draw instructions emitted by the strip chart

use serde::{Deserialize, Serialize};

use super::ChartGeometry;

/// Pixel coordinate on the chart surface. `y` may fall outside the surface
/// when a sample exceeds the chart's amplitude; surfaces clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One drawing step, in the order the surface must apply them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Fill with background and draw the one pixel border.
    Clear { geometry: ChartGeometry },
    /// Clear the column the cursor is about to plot into.
    EraseColumn { x: u32 },
    /// Paint the leading-edge marker one column ahead of the cursor.
    LeaderColumn { x: u32 },
    /// Line for one series, colored by its palette index.
    Segment { series: usize, from: Point, to: Point },
}

/// Something the chart can draw on.
pub trait DrawSurface {
    fn clear(&mut self, geometry: ChartGeometry);
    fn erase_column(&mut self, x: u32);
    fn leader_column(&mut self, x: u32);
    fn segment(&mut self, series: usize, from: Point, to: Point);

    /// Apply a recorded command.
    fn apply(&mut self, command: &DrawCommand) {
        match *command {
            DrawCommand::Clear { geometry } => self.clear(geometry),
            DrawCommand::EraseColumn { x } => self.erase_column(x),
            DrawCommand::LeaderColumn { x } => self.leader_column(x),
            DrawCommand::Segment { series, from, to } => self.segment(series, from, to),
        }
    }
}

/// Recording surface.
impl DrawSurface for Vec<DrawCommand> {
    fn clear(&mut self, geometry: ChartGeometry) {
        self.push(DrawCommand::Clear { geometry });
    }

    fn erase_column(&mut self, x: u32) {
        self.push(DrawCommand::EraseColumn { x });
    }

    fn leader_column(&mut self, x: u32) {
        self.push(DrawCommand::LeaderColumn { x });
    }

    fn segment(&mut self, series: usize, from: Point, to: Point) {
        self.push(DrawCommand::Segment { series, from, to });
    }
}

/// Why a frame carried no line segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suppression {
    /// No series configured yet
    Unconfigured,
    /// Nothing was pushed since the previous frame
    NoSample,
    /// The cursor just wrapped from the right edge back to column 0
    Wrap,
    /// The previous column holds no sample to connect from
    NoHistory,
}

/// Everything one call to [`StripChartBuffer::advance`](super::StripChartBuffer::advance) produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Column plotted by this frame
    pub column: u32,
    pub commands: Vec<DrawCommand>,
    pub suppressed: Option<Suppression>,
}

impl Frame {
    /// Line segments in series order.
    pub fn segments(&self) -> impl Iterator<Item = (usize, Point, Point)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::Segment { series, from, to } => Some((series, from, to)),
            _ => None,
        })
    }

    /// Replay the frame onto a surface.
    pub fn replay<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            surface.apply(command);
        }
    }
}
