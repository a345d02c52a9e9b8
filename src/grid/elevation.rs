//! Elevation grid: scan ingest and conservative interpolation.

use log::trace;
use nalgebra::Point3;

use super::cell::ElevationCell;
use super::sliding::SlidingGrid;

/// World-anchored grid of elevation cells.
pub type ElevationGrid = SlidingGrid<ElevationCell>;

impl ElevationGrid {
    /// Add a batch of world-frame points to the grid.
    ///
    /// Each point inside the footprint contributes its z as a height
    /// sample to the cell under it; points outside are dropped.
    pub fn add_scan(&mut self, points_world: &[Point3<f32>]) {
        let mut outside = 0usize;
        for p in points_world {
            match self.entry_world_mut(p) {
                Some(cell) => cell.add_measurement(p.z),
                None => outside += 1,
            }
        }
        if outside > 0 {
            trace!(
                "[ElevationGrid] {} of {} scan points outside footprint",
                outside,
                points_world.len()
            );
        }
    }

    /// Write a conservatively interpolated copy of this grid into
    /// `target`.
    ///
    /// Measured cells pass through unchanged. An unmeasured cell is
    /// filled only when it is bracketed by measurements on two
    /// opposite sides of its 8-neighborhood:
    ///
    /// ```text
    /// XXX    XOX
    /// OOO or XOX
    /// XXX    XOX
    /// ```
    ///
    /// i.e. at least one measured cell in row y-1 AND one in row y+1,
    /// or the same for columns x-1 and x+1. A filled cell receives
    /// every measured neighbor's median as a pseudo-measurement and is
    /// stamped interpolated with the median of those. Bracketing keeps
    /// open boundaries unfilled.
    pub fn smooth_into(&self, target: &mut ElevationGrid) {
        assert_eq!(self.width(), target.width());
        assert_eq!(self.height(), target.height());

        target.set_origin(self.origin());

        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let source = self.entry(x, y).cloned().unwrap_or_default();
                let measured = source.measurement_count() > 0;
                if let Some(cell) = target.entry_mut(x, y) {
                    *cell = source;
                }
                if measured {
                    continue;
                }

                let rows = self.segment_measured(x - 1, x + 1, y - 1, y - 1)
                    && self.segment_measured(x - 1, x + 1, y + 1, y + 1);
                let cols = self.segment_measured(x - 1, x - 1, y - 1, y + 1)
                    && self.segment_measured(x + 1, x + 1, y - 1, y + 1);
                if !rows && !cols {
                    continue;
                }

                if let Some(cell) = target.entry_mut(x, y) {
                    for dy in -1..=1 {
                        for dx in -1..=1 {
                            if let Some(neighbour) = self.entry(x + dx, y + dy) {
                                if neighbour.measurement_count() > 0 {
                                    cell.add_measurement(neighbour.median());
                                }
                            }
                        }
                    }
                    let median = cell.median();
                    cell.set_interpolated(median);
                }
            }
        }
    }

    /// Does any cell of the inclusive index range hold a measurement?
    fn segment_measured(&self, x0: i32, x1: i32, y0: i32, y1: i32) -> bool {
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(cell) = self.entry(x, y) {
                    if cell.measurement_count() > 0 {
                        return true;
                    }
                }
            }
        }
        false
    }
}
