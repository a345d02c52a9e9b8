//! World-anchored sliding grid.

use nalgebra::Point3;

/// A fixed-size 2D grid anchored to world coordinates whose origin can
/// translate under the robot.
///
/// The grid uses a coordinate system where:
/// - `origin` is the world coordinate of the grid *center*
/// - Cell indices grow with world X (columns) and world Y (rows)
/// - A world point `p` maps to cell `floor((p - origin) / resolution)
///   + (width/2, height/2)` and is inside the grid iff that index is
///   in `[0, width) x [0, height)`
///
/// `move_grid` recenters the grid on a new world position while
/// preserving the contents of every cell whose world position stays in
/// bounds; the origin moves by whole cells only, so surviving cells
/// keep their world position exactly.
#[derive(Debug, Clone)]
pub struct SlidingGrid<T> {
    cells: Vec<T>,
    width: usize,
    height: usize,
    resolution: f32,
    origin: Point3<f32>,
}

impl<T: Clone + Default> SlidingGrid<T> {
    /// Create a grid centered on the world origin.
    pub fn new(width: usize, height: usize, resolution: f32) -> Self {
        Self::with_origin(width, height, resolution, Point3::origin())
    }

    /// Create a grid centered on `origin`.
    pub fn with_origin(width: usize, height: usize, resolution: f32, origin: Point3<f32>) -> Self {
        Self {
            cells: vec![T::default(); width * height],
            width,
            height,
            resolution,
            origin,
        }
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resolution in meters per cell.
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// World coordinate of the grid center.
    #[inline]
    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    /// Move the anchor without touching cell contents.
    ///
    /// Only meaningful when the caller immediately rewrites every cell
    /// (derived grids that mirror another grid's frame).
    #[inline]
    pub fn set_origin(&mut self, origin: Point3<f32>) {
        self.origin = origin;
    }

    /// Check if a cell index is within bounds.
    #[inline]
    pub fn in_grid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Cell index of a world point, or `None` when outside the
    /// footprint.
    #[inline]
    pub fn grid_point(&self, p: &Point3<f32>) -> Option<(usize, usize)> {
        let x = ((p.x - self.origin.x) / self.resolution + self.width as f32 / 2.0).floor() as i32;
        let y = ((p.y - self.origin.y) / self.resolution + self.height as f32 / 2.0).floor() as i32;
        if self.in_grid(x, y) {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    /// World coordinate of a cell center.
    #[inline]
    pub fn grid_to_world(&self, x: usize, y: usize) -> Point3<f32> {
        Point3::new(
            self.origin.x + (x as f32 - self.width as f32 / 2.0 + 0.5) * self.resolution,
            self.origin.y + (y as f32 - self.height as f32 / 2.0 + 0.5) * self.resolution,
            self.origin.z,
        )
    }

    /// Bounds-checked cell access.
    #[inline]
    pub fn entry(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_grid(x, y) {
            Some(&self.cells[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    /// Bounds-checked mutable cell access.
    #[inline]
    pub fn entry_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        if self.in_grid(x, y) {
            Some(&mut self.cells[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    /// Cell under a world point.
    #[inline]
    pub fn entry_world(&self, p: &Point3<f32>) -> Option<&T> {
        let (x, y) = self.grid_point(p)?;
        Some(&self.cells[y * self.width + x])
    }

    /// Mutable cell under a world point.
    #[inline]
    pub fn entry_world_mut(&mut self, p: &Point3<f32>) -> Option<&mut T> {
        let (x, y) = self.grid_point(p)?;
        Some(&mut self.cells[y * self.width + x])
    }

    /// Raw row-major cell slice.
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterate over all cells with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i % self.width, i / self.width, c))
    }

    /// Reset every cell to its empty value, keeping the anchor.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = T::default();
        }
    }

    /// Recenter the grid near a new world position.
    ///
    /// The origin shift is rounded to a whole number of cells. Cells
    /// whose world position remains inside the footprint are moved
    /// over unchanged; cells that slide in from the outside start
    /// empty.
    pub fn move_grid(&mut self, new_center: &Point3<f32>) {
        let dx = ((new_center.x - self.origin.x) / self.resolution).round() as i32;
        let dy = ((new_center.y - self.origin.y) / self.resolution).round() as i32;

        if dx != 0 || dy != 0 {
            let mut fresh: Vec<T> = vec![T::default(); self.width * self.height];
            for y in 0..self.height as i32 {
                for x in 0..self.width as i32 {
                    let old_x = x + dx;
                    let old_y = y + dy;
                    if self.in_grid(old_x, old_y) {
                        fresh[y as usize * self.width + x as usize] = std::mem::take(
                            &mut self.cells[old_y as usize * self.width + old_x as usize],
                        );
                    }
                }
            }
            self.cells = fresh;
            self.origin.x += dx as f32 * self.resolution;
            self.origin.y += dy as f32 * self.resolution;
        }
        self.origin.z = new_center.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_point_round_trip() {
        let grid: SlidingGrid<u8> = SlidingGrid::new(10, 10, 1.0);
        let (x, y) = grid.grid_point(&Point3::new(3.0, 3.0, 0.0)).unwrap();
        assert_eq!((x, y), (8, 8));
        let center = grid.grid_to_world(x, y);
        assert_eq!(grid.grid_point(&center).unwrap(), (8, 8));
    }

    #[test]
    fn test_out_of_footprint() {
        let grid: SlidingGrid<u8> = SlidingGrid::new(10, 10, 1.0);
        assert!(grid.grid_point(&Point3::new(5.5, 0.0, 0.0)).is_none());
        assert!(grid.grid_point(&Point3::new(-5.5, 0.0, 0.0)).is_none());
        assert!(grid.grid_point(&Point3::new(0.0, 0.0, 0.0)).is_some());
    }

    #[test]
    fn test_move_preserves_overlap() {
        let mut grid: SlidingGrid<u8> = SlidingGrid::new(10, 10, 1.0);
        let p = Point3::new(3.0, 3.0, 0.0);
        *grid.entry_world_mut(&p).unwrap() = 42;

        grid.move_grid(&Point3::new(2.0, 0.0, 0.0));
        assert_eq!(grid.origin().x, 2.0);
        assert_eq!(*grid.entry_world(&p).unwrap(), 42);
    }

    #[test]
    fn test_move_clears_slid_in_cells() {
        let mut grid: SlidingGrid<u8> = SlidingGrid::new(10, 10, 1.0);
        let p = Point3::new(-4.5, 0.0, 0.0);
        *grid.entry_world_mut(&p).unwrap() = 9;

        // Slide far enough that the marked cell leaves the footprint,
        // then slide back: the cell must come back empty.
        grid.move_grid(&Point3::new(6.0, 0.0, 0.0));
        assert!(grid.grid_point(&p).is_none());
        grid.move_grid(&Point3::new(0.0, 0.0, 0.0));
        assert_eq!(*grid.entry_world(&p).unwrap(), 0);
    }

    #[test]
    fn test_move_grid_snaps_to_cells() {
        let mut grid: SlidingGrid<u8> = SlidingGrid::new(10, 10, 0.5);
        grid.move_grid(&Point3::new(1.3, -0.2, 0.0));
        // 1.3 / 0.5 rounds to 3 cells, -0.2 / 0.5 rounds to 0
        assert_eq!(grid.origin().x, 1.5);
        assert_eq!(grid.origin().y, 0.0);
    }
}
