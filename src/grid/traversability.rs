//! Traversability classification from elevation data.

use serde::{Deserialize, Serialize};

use super::elevation::ElevationGrid;
use super::sliding::SlidingGrid;

/// Per-cell terrain classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Traversability {
    /// No elevation information at all
    #[default]
    Unclassified = 0,

    /// Step heights to all known neighbors are within the limit
    Traversable = 1,

    /// A neighbor step height exceeds the limit
    Obstacle = 2,

    /// Only an upper height bound is known, no real measurement
    UnknownObstacle = 3,
}

impl Traversability {
    /// Is this cell blocked for driving?
    #[inline]
    pub fn is_obstacle(self) -> bool {
        matches!(self, Traversability::Obstacle | Traversability::UnknownObstacle)
    }

    /// Convert from u8 (for deserialization)
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Traversability::Traversable,
            2 => Traversability::Obstacle,
            3 => Traversability::UnknownObstacle,
            _ => Traversability::Unclassified,
        }
    }

    /// Single character representation for debugging
    pub fn as_char(self) -> char {
        match self {
            Traversability::Unclassified => '?',
            Traversability::Traversable => '.',
            Traversability::Obstacle => '#',
            Traversability::UnknownObstacle => '!',
        }
    }
}

/// World-anchored grid of traversability classes.
pub type TraversabilityGrid = SlidingGrid<Traversability>;

impl TraversabilityGrid {
    /// Reclassify every cell from an elevation grid.
    ///
    /// Classification per cell:
    /// - no samples and no height bound: `Unclassified`
    /// - no samples but a height bound: reference = maximum, tentative
    ///   `UnknownObstacle`
    /// - samples: reference = median, tentative `Traversable`
    ///
    /// Any in-grid 8-neighbor whose height differs from the reference
    /// by more than `max_step_size` turns the cell into `Obstacle`.
    /// A measured neighbor contributes its median; an unmeasured one
    /// its minimum (the worst plausible drop), or nothing at all when
    /// it carries no bound.
    pub fn classify_from(&mut self, elev: &ElevationGrid, max_step_size: f32) {
        assert_eq!(self.width(), elev.width());
        assert_eq!(self.height(), elev.height());

        self.set_origin(elev.origin());

        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let class = Self::classify_cell(elev, x, y, max_step_size);
                if let Some(cell) = self.entry_mut(x, y) {
                    *cell = class;
                }
            }
        }
    }

    fn classify_cell(elev: &ElevationGrid, x: i32, y: i32, max_step_size: f32) -> Traversability {
        let entry = match elev.entry(x, y) {
            Some(e) => e,
            None => return Traversability::Unclassified,
        };

        if entry.measurement_count() == 0 && entry.maximum() == f32::NEG_INFINITY {
            return Traversability::Unclassified;
        }

        let (cur_height, mut class) = if entry.measurement_count() == 0 {
            (entry.maximum(), Traversability::UnknownObstacle)
        } else {
            (entry.median(), Traversability::Traversable)
        };

        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbour = match elev.entry(x + dx, y + dy) {
                    Some(n) => n,
                    None => continue,
                };

                let neighbour_height = if neighbour.measurement_count() > 0 {
                    neighbour.median()
                } else if neighbour.maximum() == f32::NEG_INFINITY {
                    // No data at all, the sentinel stays out of the step test
                    continue;
                } else {
                    neighbour.minimum()
                };

                if (neighbour_height - cur_height).abs() > max_step_size {
                    class = Traversability::Obstacle;
                }
            }
        }

        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_elevation(width: usize, height: usize, h: f32) -> ElevationGrid {
        let mut grid = ElevationGrid::new(width, height, 1.0);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                grid.entry_mut(x, y).unwrap().add_measurement(h);
            }
        }
        grid
    }

    #[test]
    fn test_flat_ground_is_traversable() {
        let elev = flat_elevation(10, 10, 0.0);
        let mut trav = TraversabilityGrid::new(10, 10, 1.0);
        trav.classify_from(&elev, 0.2);
        assert!(trav
            .iter()
            .all(|(_, _, c)| *c == Traversability::Traversable));
    }

    #[test]
    fn test_step_marks_obstacle_ring() {
        let mut elev = flat_elevation(10, 10, 0.0);
        elev.entry_mut(4, 4).unwrap().add_measurement(1.0);
        elev.entry_mut(4, 4).unwrap().add_measurement(1.0);
        elev.entry_mut(4, 4).unwrap().add_measurement(1.0);

        let mut trav = TraversabilityGrid::new(10, 10, 1.0);
        trav.classify_from(&elev, 0.2);

        // The stepped cell and its 8 neighbors are all obstacles
        for y in 3..=5 {
            for x in 3..=5 {
                assert_eq!(*trav.entry(x, y).unwrap(), Traversability::Obstacle);
            }
        }
        // Distant cells stay traversable
        assert_eq!(*trav.entry(8, 8).unwrap(), Traversability::Traversable);
    }

    #[test]
    fn test_empty_cells_unclassified() {
        let elev = ElevationGrid::new(10, 10, 1.0);
        let mut trav = TraversabilityGrid::new(10, 10, 1.0);
        trav.classify_from(&elev, 0.2);
        assert!(trav
            .iter()
            .all(|(_, _, c)| *c == Traversability::Unclassified));
    }

    #[test]
    fn test_bounded_cell_is_unknown_obstacle() {
        let mut elev = ElevationGrid::new(10, 10, 1.0);
        elev.entry_mut(5, 5).unwrap().extend_maximum(0.1);

        let mut trav = TraversabilityGrid::new(10, 10, 1.0);
        trav.classify_from(&elev, 0.2);
        assert_eq!(*trav.entry(5, 5).unwrap(), Traversability::UnknownObstacle);
    }

    #[test]
    fn test_classify_adopts_elevation_origin() {
        let mut elev = ElevationGrid::new(10, 10, 1.0);
        elev.move_grid(&nalgebra::Point3::new(4.0, 0.0, 0.0));

        let mut trav = TraversabilityGrid::new(10, 10, 1.0);
        trav.classify_from(&elev, 0.2);
        assert_eq!(trav.origin(), elev.origin());
    }
}
