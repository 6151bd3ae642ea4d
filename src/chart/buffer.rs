//! Circular strip-chart buffer
//!
//! The chart is a fixed canvas of `width + 1` columns that is reused forever.
//! Every frame erases the column under the cursor, paints a leader one column
//! ahead, and draws one segment per series from the previous column to the
//! cursor. Only two columns and `series_count` segments change per frame,
//! independent of width or history length.
//!
//! Samples live in two fixed slots that swap roles every frame: the slot
//! that was just plotted becomes `previous`, and the next push overwrites the
//! stale one.

use tracing::{debug, error, trace};

use super::surface::{DrawSurface, Frame, Point, Suppression};
use super::{ChartGeometry, MAX_SERIES};
use crate::{MonitorError, Result};

/// Scrolling strip chart state with no drawing of its own.
#[derive(Debug, Clone)]
pub struct StripChartBuffer {
    geometry: ChartGeometry,
    series_count: usize,
    slots: [[f64; MAX_SERIES]; 2],
    /// Index of the `current` slot; the other one is `previous`.
    front: usize,
    /// A sample was pushed since the last frame.
    current_fresh: bool,
    /// `previous` holds the sample plotted at `step_prev`.
    previous_valid: bool,
    step: u32,
    step_next: u32,
    step_prev: u32,
    max_amplitude: f64,
    dirty: bool,
    needs_clear: bool,
}

impl StripChartBuffer {
    /// New unconfigured chart with a scale of 1.0.
    pub fn new(geometry: ChartGeometry) -> Self {
        let geometry = geometry.sanitized();
        let mut chart = Self {
            geometry,
            series_count: 0,
            slots: [[0.0; MAX_SERIES]; 2],
            front: 0,
            current_fresh: false,
            previous_valid: false,
            step: 0,
            step_next: 0,
            step_prev: 0,
            max_amplitude: 1.0,
            dirty: false,
            needs_clear: true,
        };
        chart.rewind();
        chart
    }

    /// Set the number of series, capped at the palette size.
    ///
    /// Samples are discarded only when the effective count changes; the
    /// cursor is left where it is. Returns the effective count.
    pub fn configure(&mut self, series_count: usize) -> usize {
        let capped = series_count.min(MAX_SERIES);
        if capped < series_count {
            debug!(requested = series_count, capped, "Series count capped to palette size");
        }
        if capped != self.series_count {
            self.series_count = capped;
            self.discard_samples();
        }
        capped
    }

    /// Store the next sample vector.
    ///
    /// Values beyond the palette size are dropped first; what remains must
    /// match the configured series count exactly.
    ///
    /// # Errors
    ///
    /// [`MonitorError::ChannelCountMismatch`] when the lengths differ. The
    /// chart is left untouched.
    pub fn push_sample(&mut self, values: &[f32]) -> Result<()> {
        let usable = values.len().min(MAX_SERIES);
        if usable != self.series_count {
            error!(
                expected = self.series_count,
                found = values.len(),
                "Sample length does not match configured series count"
            );
            return Err(MonitorError::ChannelCountMismatch {
                expected: self.series_count,
                found: values.len(),
            });
        }

        let current = &mut self.slots[self.front];
        for (slot, value) in current.iter_mut().zip(&values[..usable]) {
            *slot = f64::from(*value);
        }
        self.current_fresh = true;
        self.dirty = true;
        Ok(())
    }

    /// Push to a single-series chart.
    pub fn push_single(&mut self, value: f64) -> Result<()> {
        if self.series_count != 1 {
            error!(expected = self.series_count, "Single value pushed to multi-series chart");
            return Err(MonitorError::ChannelCountMismatch {
                expected: self.series_count,
                found: 1,
            });
        }
        self.slots[self.front][0] = value;
        self.current_fresh = true;
        self.dirty = true;
        Ok(())
    }

    /// Change the amplitude that maps to the chart's top and bottom edges.
    ///
    /// History was plotted against the old scale, so the chart restarts:
    /// samples discarded, cursor back to column 0, full clear requested.
    pub fn set_scale(&mut self, max_amplitude: f64) -> Result<()> {
        if !(max_amplitude.is_finite() && max_amplitude > 0.0) {
            return Err(MonitorError::InvalidScale { value: max_amplitude });
        }
        debug!(max_amplitude, "Chart scale changed");
        self.max_amplitude = max_amplitude;
        self.restart();
        Ok(())
    }

    /// Change the canvas size. A real change restarts the chart.
    pub fn resize(&mut self, width: u32, height: u32) {
        let geometry = ChartGeometry::new(width, height).sanitized();
        if geometry != self.geometry {
            debug!(width = geometry.width, height = geometry.height, "Chart resized");
            self.geometry = geometry;
            self.restart();
        }
    }

    /// Restart with scale 1.0, keeping the series count.
    pub fn reset(&mut self) {
        self.max_amplitude = 1.0;
        self.restart();
    }

    /// Produce the next frame as a list of commands.
    pub fn advance(&mut self) -> Frame {
        let column = self.step;
        let mut commands = Vec::with_capacity(3 + self.series_count);
        let suppressed = self.advance_into(&mut commands);
        Frame { column, commands, suppressed }
    }

    /// Draw the next frame straight onto `surface`.
    ///
    /// Order: full clear (only after a restart), erase the cursor column,
    /// paint the leader, then one segment per series unless suppressed.
    /// Afterwards the cursors move one column right, wrapping after `width`,
    /// and the sample slots swap.
    pub fn advance_into<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> Option<Suppression> {
        if self.needs_clear {
            surface.clear(self.geometry);
            self.needs_clear = false;
        }
        surface.erase_column(self.step);
        surface.leader_column(self.step_next);

        let suppressed = self.suppression();
        match suppressed {
            None => {
                let current = &self.slots[self.front];
                let previous = &self.slots[1 - self.front];
                for series in 0..self.series_count {
                    let from = Point::new(self.step_prev as i32, self.plot_y(previous[series]));
                    let to = Point::new(self.step as i32, self.plot_y(current[series]));
                    surface.segment(series, from, to);
                }
            }
            Some(reason) => trace!(step = self.step, ?reason, "Segments suppressed"),
        }

        let modulus = self.geometry.width + 1;
        self.step = (self.step + 1) % modulus;
        self.step_next = (self.step_next + 1) % modulus;
        self.step_prev = (self.step_prev + 1) % modulus;

        self.previous_valid = self.current_fresh;
        self.current_fresh = false;
        self.front = 1 - self.front;
        self.dirty = false;

        suppressed
    }

    fn suppression(&self) -> Option<Suppression> {
        if self.series_count == 0 {
            Some(Suppression::Unconfigured)
        } else if !self.current_fresh {
            Some(Suppression::NoSample)
        } else if !self.previous_valid {
            Some(Suppression::NoHistory)
        } else if self.step <= self.step_prev {
            Some(Suppression::Wrap)
        } else {
            None
        }
    }

    fn plot_y(&self, value: f64) -> i32 {
        let half = f64::from(self.geometry.height) / 2.0;
        (half + value / self.max_amplitude * half) as i32
    }

    fn rewind(&mut self) {
        let width = self.geometry.width;
        self.step = 0;
        self.step_next = 1 % (width + 1);
        self.step_prev = width;
    }

    fn discard_samples(&mut self) {
        self.slots = [[0.0; MAX_SERIES]; 2];
        self.current_fresh = false;
        self.previous_valid = false;
    }

    fn restart(&mut self) {
        self.discard_samples();
        self.rewind();
        self.needs_clear = true;
        self.dirty = true;
    }

    pub fn geometry(&self) -> ChartGeometry {
        self.geometry
    }

    pub fn series_count(&self) -> usize {
        self.series_count
    }

    pub fn is_configured(&self) -> bool {
        self.series_count > 0
    }

    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Column the next frame plots into.
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn step_next(&self) -> u32 {
        self.step_next
    }

    pub fn step_prev(&self) -> u32 {
        self.step_prev
    }

    /// Whether a redraw is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn current(&self) -> &[f64] {
        &self.slots[self.front][..self.series_count]
    }

    pub fn previous(&self) -> &[f64] {
        &self.slots[1 - self.front][..self.series_count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DrawCommand, MAX_DIMENSION};
    use proptest::prelude::*;

    fn chart(width: u32, height: u32, series: usize) -> StripChartBuffer {
        let mut chart = StripChartBuffer::new(ChartGeometry::new(width, height));
        chart.configure(series);
        chart
    }

    /// Push one sample and plot it.
    fn prime(chart: &mut StripChartBuffer, values: &[f32]) {
        chart.push_sample(values).unwrap();
        chart.advance();
    }

    #[test]
    fn mismatched_push_fails_without_mutation() {
        let mut chart = chart(10, 10, 3);
        chart.push_sample(&[0.1, 0.2, 0.3]).unwrap();
        chart.advance();
        chart.push_sample(&[0.4, 0.5, 0.6]).unwrap();
        let current = chart.current().to_vec();
        let previous = chart.previous().to_vec();

        let err = chart.push_sample(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, MonitorError::ChannelCountMismatch { expected: 3, found: 2 }));
        assert_eq!(chart.current(), current.as_slice());
        assert_eq!(chart.previous(), previous.as_slice());
    }

    #[test]
    fn push_drops_values_beyond_palette() {
        let mut chart = chart(10, 10, 8);
        assert_eq!(chart.series_count(), MAX_SERIES);

        chart.push_sample(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        assert_eq!(chart.current(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn unconfigured_chart_rejects_samples() {
        let mut chart = StripChartBuffer::new(ChartGeometry::new(10, 10));
        assert!(!chart.is_configured());
        assert!(matches!(
            chart.push_sample(&[1.0]),
            Err(MonitorError::ChannelCountMismatch { expected: 0, found: 1 })
        ));
        assert_eq!(chart.advance().suppressed, Some(Suppression::Unconfigured));
    }

    #[test]
    fn reconfigure_same_count_keeps_samples() {
        let mut chart = chart(10, 10, 2);
        chart.push_sample(&[0.5, -0.5]).unwrap();
        chart.configure(2);
        assert_eq!(chart.current(), &[0.5, -0.5]);

        chart.configure(3);
        assert_eq!(chart.current(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn configure_keeps_cursor() {
        let mut chart = chart(10, 10, 1);
        for _ in 0..4 {
            chart.advance();
        }
        chart.configure(2);
        assert_eq!(chart.step(), 4);
    }

    #[test]
    fn frame_erases_cursor_and_leads_one_ahead() {
        let mut chart = chart(10, 20, 1);
        let first = chart.advance();
        assert_eq!(
            &first.commands[..3],
            &[
                DrawCommand::Clear { geometry: ChartGeometry::new(10, 20) },
                DrawCommand::EraseColumn { x: 0 },
                DrawCommand::LeaderColumn { x: 1 },
            ]
        );

        let second = chart.advance();
        assert_eq!(
            second.commands,
            vec![DrawCommand::EraseColumn { x: 1 }, DrawCommand::LeaderColumn { x: 2 }]
        );
    }

    #[test]
    fn segment_maps_values_onto_height() {
        let mut chart = chart(10, 100, 2);
        chart.set_scale(10.0).unwrap();
        chart.advance();
        prime(&mut chart, &[0.0, 10.0]);
        chart.push_sample(&[5.0, -10.0]).unwrap();

        let frame = chart.advance();
        assert_eq!(frame.column, 2);
        assert_eq!(frame.suppressed, None);
        let segments: Vec<_> = frame.segments().collect();
        assert_eq!(
            segments,
            vec![
                (0, Point::new(1, 50), Point::new(2, 75)),
                (1, Point::new(1, 100), Point::new(2, 0)),
            ]
        );
    }

    #[test]
    fn first_sample_has_no_history() {
        let mut chart = chart(10, 10, 1);
        chart.advance();
        chart.push_sample(&[0.5]).unwrap();
        assert_eq!(chart.advance().suppressed, Some(Suppression::NoHistory));
        chart.push_sample(&[0.5]).unwrap();
        assert_eq!(chart.advance().suppressed, None);
    }

    #[test]
    fn restart_frame_is_not_a_wrap() {
        let mut chart = chart(3, 10, 1);
        chart.push_sample(&[0.5]).unwrap();
        assert_eq!(chart.advance().suppressed, Some(Suppression::NoHistory));

        for _ in 0..3 {
            prime(&mut chart, &[0.5]);
        }
        chart.push_sample(&[0.5]).unwrap();
        assert_eq!(chart.step(), 0);
        assert_eq!(chart.advance().suppressed, Some(Suppression::Wrap));

        chart.set_scale(2.0).unwrap();
        chart.push_sample(&[0.5]).unwrap();
        assert_eq!(chart.advance().suppressed, Some(Suppression::NoHistory));
    }

    #[test]
    fn frame_without_push_is_suppressed_and_breaks_history() {
        let mut chart = chart(10, 10, 1);
        chart.advance();
        prime(&mut chart, &[0.1]);
        assert_eq!(chart.advance().suppressed, Some(Suppression::NoSample));

        chart.push_sample(&[0.2]).unwrap();
        assert_eq!(chart.advance().suppressed, Some(Suppression::NoHistory));
    }

    #[test]
    fn slots_swap_after_each_frame() {
        let mut chart = chart(10, 10, 2);
        chart.push_sample(&[1.0, 2.0]).unwrap();
        chart.advance();
        assert_eq!(chart.previous(), &[1.0, 2.0]);

        chart.push_sample(&[3.0, 4.0]).unwrap();
        assert_eq!(chart.current(), &[3.0, 4.0]);
        assert_eq!(chart.previous(), &[1.0, 2.0]);
    }

    #[test]
    fn set_scale_restarts() {
        let mut chart = chart(10, 10, 1);
        for _ in 0..5 {
            prime(&mut chart, &[0.3]);
        }
        chart.set_scale(2.0).unwrap();

        assert_eq!(chart.step(), 0);
        assert_eq!(chart.step_prev(), 10);
        assert_eq!(chart.step_next(), 1);
        assert_eq!(chart.current(), &[0.0]);
        assert_eq!(chart.max_amplitude(), 2.0);
        assert!(matches!(chart.advance().commands[0], DrawCommand::Clear { .. }));
    }

    #[test]
    fn invalid_scale_is_rejected() {
        let mut chart = chart(10, 10, 1);
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(chart.set_scale(value), Err(MonitorError::InvalidScale { .. })));
        }
        assert_eq!(chart.max_amplitude(), 1.0);
    }

    #[test]
    fn resize_restarts_only_on_change() {
        let mut chart = chart(10, 10, 1);
        chart.advance();
        chart.advance();
        chart.resize(10, 10);
        assert_eq!(chart.step(), 2);

        chart.resize(20, 10);
        assert_eq!(chart.step(), 0);
        assert_eq!(chart.step_prev(), 20);
    }

    #[test]
    fn push_single_requires_one_series() {
        let mut chart = chart(10, 10, 2);
        assert!(chart.push_single(1.0).is_err());
        chart.configure(1);
        chart.push_single(0.25).unwrap();
        assert_eq!(chart.current(), &[0.25]);
        assert!(chart.is_dirty());
        chart.advance();
        assert!(!chart.is_dirty());
    }

    #[test]
    fn reset_restores_unit_scale() {
        let mut chart = chart(10, 10, 1);
        chart.set_scale(50.0).unwrap();
        chart.advance();
        chart.reset();
        assert_eq!(chart.max_amplitude(), 1.0);
        assert_eq!(chart.step(), 0);
        assert_eq!(chart.series_count(), 1);
    }

    #[test]
    fn oversize_width_is_capped() {
        let mut chart = StripChartBuffer::new(ChartGeometry::new(u32::MAX, 10));
        assert_eq!(chart.geometry().width, MAX_DIMENSION);
        assert_eq!(chart.step_prev(), MAX_DIMENSION);

        chart.configure(1);
        prime(&mut chart, &[0.0]);
        chart.push_sample(&[1.0]).unwrap();
        let frame = chart.advance();
        assert!(frame.segments().all(|(_, from, to)| from.x >= 0 && to.x > from.x));

        chart.resize(u32::MAX, u32::MAX);
        assert_eq!(chart.geometry(), ChartGeometry::new(MAX_DIMENSION, MAX_DIMENSION));
    }

    #[test]
    fn zero_width_is_widened() {
        let chart = StripChartBuffer::new(ChartGeometry::new(0, 0));
        assert_eq!(chart.geometry(), ChartGeometry::new(1, 1));
        assert_eq!(chart.step_prev(), 1);
        assert_eq!(chart.step_next(), 1);
    }

    proptest! {
        #[test]
        fn prop_full_cycle_returns_cursor_and_suppresses_one_wrap(
            width in 1u32..200,
            start in 0u32..400,
            series in 1usize..=MAX_SERIES
        ) {
            let mut chart = chart(width, 64, series);
            let sample = vec![0.5f32; series];
            for _ in 0..start {
                chart.advance();
            }
            prime(&mut chart, &sample);
            let origin = (chart.step(), chart.step_next(), chart.step_prev());

            let mut wraps = 0;
            for _ in 0..=width {
                chart.push_sample(&sample).unwrap();
                match chart.advance().suppressed {
                    None => {}
                    Some(Suppression::Wrap) => wraps += 1,
                    Some(other) => prop_assert!(false, "unexpected suppression {:?}", other),
                }
            }

            prop_assert_eq!((chart.step(), chart.step_next(), chart.step_prev()), origin);
            prop_assert_eq!(wraps, 1);
        }

        #[test]
        fn prop_cursors_stay_consistent(width in 1u32..100, frames in 0usize..500) {
            let mut chart = chart(width, 10, 1);
            for _ in 0..frames {
                chart.advance();
                let modulus = width + 1;
                prop_assert!(chart.step() <= width);
                prop_assert_eq!(chart.step_next(), (chart.step() + 1) % modulus);
                prop_assert_eq!(chart.step_prev(), (chart.step() + width) % modulus);
            }
        }

        #[test]
        fn prop_segments_only_move_right(width in 1u32..50, values in prop::collection::vec(-2.0f32..2.0, 1..200)) {
            let mut chart = chart(width, 32, 1);
            for value in values {
                chart.push_sample(&[value]).unwrap();
                for (_, from, to) in chart.advance().segments() {
                    prop_assert_eq!(to.x, from.x + 1);
                }
            }
        }
    }
}
