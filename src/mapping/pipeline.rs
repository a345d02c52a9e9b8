//! Scan-to-map pipeline: ingest, recentering, interpolation and
//! classification.

use log::{debug, trace};
use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};
use std::f32::consts::PI;

use crate::core::{LaserScan, Pose, ScanSource};
use crate::error::{Error, Result};
use crate::grid::{ElevationGrid, Traversability, TraversabilityGrid};

use super::config::MapConfig;
use super::dump::GridDump;

/// Translation below which a scan does not trigger a map update (meters)
const MIN_UPDATE_DISTANCE: f32 = 0.05;
/// Laser-axis rotation below which a scan does not trigger a map update
const MIN_UPDATE_ANGLE: f32 = PI / 36.0;
/// Sampling step when rasterizing stamped rectangles (meters)
const RECT_SAMPLE_STEP: f32 = 0.03;

/// Builds and maintains the world-fixed traversability map from
/// streaming laser scans under a moving vehicle.
///
/// Scans land in the raw elevation grid on every call; the derived
/// grids (interpolated elevation, traversability) are recomputed only
/// after enough motion has accumulated, via [`MapPipeline::compute_new_map`].
pub struct MapPipeline {
    config: MapConfig,
    laser_grid: ElevationGrid,
    interpolated_grid: ElevationGrid,
    traversability_grid: TraversabilityGrid,
    last_body_to_odo: Isometry3<f32>,
    last_laser_to_odo: Isometry3<f32>,
}

impl MapPipeline {
    /// Create a pipeline with all grids empty and centered on the
    /// world origin.
    pub fn new(config: MapConfig) -> Self {
        let g = &config.grid;
        Self {
            laser_grid: ElevationGrid::new(g.width, g.height, g.resolution),
            interpolated_grid: ElevationGrid::new(g.width, g.height, g.resolution),
            traversability_grid: TraversabilityGrid::new(g.width, g.height, g.resolution),
            last_body_to_odo: Isometry3::identity(),
            last_laser_to_odo: Isometry3::identity(),
            config,
        }
    }

    /// Feed one laser scan.
    ///
    /// The scan is masked, transformed into the odometry frame and
    /// absorbed into the elevation grid. Returns `true` when the robot
    /// moved enough since the last accepted scan (0.05 m translation
    /// or 5° laser rotation) that the caller should run
    /// [`MapPipeline::compute_new_map`].
    pub fn ingest(
        &mut self,
        scan: &LaserScan,
        body_to_odo: &Isometry3<f32>,
        laser_to_body: &Isometry3<f32>,
    ) -> bool {
        let laser_to_odo = body_to_odo * laser_to_body;

        let body_to_last_body = self.last_body_to_odo.inverse() * body_to_odo;
        let distance = body_to_last_body.translation.vector.norm();

        // Angular change of the laser Y axis expressed in odometry
        let y_now = laser_to_odo.rotation * Vector3::y();
        let y_last = self.last_laser_to_odo.rotation * Vector3::y();
        let laser_change = y_now.dot(&y_last).clamp(-1.0, 1.0).acos();

        self.recenter_if_near_boundary(&body_to_odo.translation.vector.into());

        let points = self.filter_scan(scan, laser_to_body, &laser_to_odo);
        self.laser_grid.add_scan(&points);

        if distance < MIN_UPDATE_DISTANCE && laser_change < MIN_UPDATE_ANGLE {
            return false;
        }

        debug!(
            "[MapPipeline] accepted scan: moved {:.3}m, rotated {:.1}°",
            distance,
            laser_change.to_degrees()
        );
        self.last_body_to_odo = *body_to_odo;
        self.last_laser_to_odo = laser_to_odo;
        true
    }

    /// Convert valid beams to odometry-frame points, dropping returns
    /// that hit the robot itself.
    fn filter_scan(
        &self,
        scan: &LaserScan,
        laser_to_body: &Isometry3<f32>,
        laser_to_odo: &Isometry3<f32>,
    ) -> Vec<Point3<f32>> {
        let mut points = Vec::with_capacity(scan.len());
        for i in 0..scan.len() {
            let p_laser = match scan.point_from_beam(i) {
                Some(p) => p,
                None => continue,
            };
            let p_body = laser_to_body * p_laser;
            if self.config.masked_areas.iter().any(|b| b.contains(&p_body)) {
                continue;
            }
            points.push(laser_to_odo * p_laser);
        }
        points
    }

    /// Recenter the elevation grid when the robot closes in on an
    /// edge.
    ///
    /// The new center leads the robot by 2/3 of its current offset
    /// from the grid center, assuming it keeps moving the same way. A
    /// robot entirely outside the grid (first scan) recenters the grid
    /// onto itself.
    fn recenter_if_near_boundary(&mut self, robot_world: &Point3<f32>) -> bool {
        let grid = &self.laser_grid;
        let offset = *robot_world - grid.origin();
        let half_width = grid.width() as f32 * grid.resolution() / 2.0;
        let half_height = grid.height() as f32 * grid.resolution() / 2.0;
        let boundary = self.config.boundary_size;

        if offset.x.abs() <= half_width - boundary && offset.y.abs() <= half_height - boundary {
            return false;
        }

        let offset = if offset.x.abs() > half_width || offset.y.abs() > half_height {
            Vector3::zeros()
        } else {
            offset
        };

        let target = *robot_world + offset * (2.0 / 3.0);
        debug!(
            "[MapPipeline] recentering grid from ({:.2}, {:.2}) to ({:.2}, {:.2})",
            grid.origin().x,
            grid.origin().y,
            target.x,
            target.y
        );
        self.laser_grid.move_grid(&target);
        true
    }

    /// Recompute the derived grids from the accumulated elevation
    /// data.
    pub fn compute_new_map(&mut self) {
        self.laser_grid.smooth_into(&mut self.interpolated_grid);
        self.traversability_grid
            .classify_from(&self.interpolated_grid, self.config.max_step_size);
        trace!("[MapPipeline] map recomputed");
    }

    /// Drain a scan source, recomputing the map after every accepted
    /// scan. Returns the number of map recomputations.
    pub fn run<S: ScanSource>(&mut self, source: &mut S) -> usize {
        let mut updates = 0;
        while let Some(frame) = source.next_scan() {
            if self.ingest(&frame.scan, &frame.body_to_odo, &frame.laser_to_body) {
                self.compute_new_map();
                updates += 1;
            }
        }
        updates
    }

    /// Overwrite unknown cells within `radius` of the pose with
    /// `class`.
    ///
    /// Only `Unclassified` and `UnknownObstacle` cells change; real
    /// classifications stay. Upgrading a cell to `Traversable` also
    /// seeds the elevation cell with its own current median so later
    /// smoothing treats it as known. Fails with
    /// [`Error::OutOfGrid`] when the pose itself is outside the grid;
    /// region cells off the edge are skipped.
    pub fn mark_radius_as(
        &mut self,
        pose: &Pose,
        radius: f32,
        class: Traversability,
    ) -> Result<()> {
        let (px, py) = self.pose_cell(pose)?;

        let resolution = self.traversability_grid.resolution();
        let radius_cells = (radius / resolution) as i32;
        for dy in -radius_cells..=radius_cells {
            for dx in -radius_cells..=radius_cells {
                let xd = dx as f32 * resolution;
                let yd = dy as f32 * resolution;
                if (xd * xd + yd * yd).sqrt() > radius {
                    continue;
                }
                self.stamp_cell(px as i32 + dx, py as i32 + dy, class, false);
            }
        }
        Ok(())
    }

    /// Overwrite unknown cells under a heading-aligned rectangle with
    /// `class`.
    ///
    /// The rectangle spans `height` along the pose heading (extended
    /// by `forward_offset` meters ahead) and `width` across it, and is
    /// rotated by the heading about Z.
    /// Upgrading an unmeasured cell to `Traversable` seeds height 0.
    /// Same pose/edge policy as [`MapPipeline::mark_radius_as`].
    pub fn mark_rect_as(
        &mut self,
        pose: &Pose,
        width: f32,
        height: f32,
        forward_offset: f32,
        class: Traversability,
    ) -> Result<()> {
        self.pose_cell(pose)?;

        let rot = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), pose.heading());
        let lateral_steps = (width / RECT_SAMPLE_STEP) as i32;
        let forward_steps = ((height + forward_offset) / RECT_SAMPLE_STEP) as i32;
        for i in 0..=lateral_steps {
            let lateral = -width / 2.0 + i as f32 * RECT_SAMPLE_STEP;
            for j in 0..=forward_steps {
                let forward = -height / 2.0 + j as f32 * RECT_SAMPLE_STEP;
                let p_world = pose.position + rot * Vector3::new(forward, lateral, 0.0);
                match self.traversability_grid.grid_point(&p_world) {
                    Some((gx, gy)) => {
                        self.stamp_cell(gx as i32, gy as i32, class, true);
                    }
                    None => trace!(
                        "[MapPipeline] stamped point ({:.2}, {:.2}) outside grid",
                        p_world.x,
                        p_world.y
                    ),
                }
            }
        }
        Ok(())
    }

    /// Mark a circle around the pose as traversable (e.g. the footprint
    /// the robot demonstrably stands on).
    pub fn mark_radius_as_traversable(&mut self, pose: &Pose, radius: f32) -> Result<()> {
        self.mark_radius_as(pose, radius, Traversability::Traversable)
    }

    /// Mark a circle around the pose as an obstacle.
    pub fn mark_radius_as_obstacle(&mut self, pose: &Pose, radius: f32) -> Result<()> {
        self.mark_radius_as(pose, radius, Traversability::Obstacle)
    }

    /// Mark a heading-aligned rectangle as traversable.
    pub fn mark_rect_as_traversable(
        &mut self,
        pose: &Pose,
        width: f32,
        height: f32,
        forward_offset: f32,
    ) -> Result<()> {
        self.mark_rect_as(pose, width, height, forward_offset, Traversability::Traversable)
    }

    /// Mark a heading-aligned rectangle as an obstacle.
    pub fn mark_rect_as_obstacle(
        &mut self,
        pose: &Pose,
        width: f32,
        height: f32,
        forward_offset: f32,
    ) -> Result<()> {
        self.mark_rect_as(pose, width, height, forward_offset, Traversability::Obstacle)
    }

    /// Grid cell of a pose, or `OutOfGrid`.
    fn pose_cell(&self, pose: &Pose) -> Result<(usize, usize)> {
        self.traversability_grid
            .grid_point(&pose.position)
            .ok_or_else(|| {
                let origin = self.traversability_grid.origin();
                Error::OutOfGrid {
                    x: pose.position.x,
                    y: pose.position.y,
                    cx: origin.x,
                    cy: origin.y,
                }
            })
    }

    /// Apply the overwrite policy to one traversability cell.
    ///
    /// `seed_zero` selects the rectangle seeding rule (height 0 on
    /// unmeasured cells) over the radius rule (the cell's own median).
    fn stamp_cell(&mut self, x: i32, y: i32, class: Traversability, seed_zero: bool) {
        if !self.traversability_grid.in_grid(x, y) {
            return;
        }
        let world = self.traversability_grid.grid_to_world(x as usize, y as usize);
        let entry = match self.traversability_grid.entry_mut(x, y) {
            Some(e) => e,
            None => return,
        };
        if *entry != Traversability::Unclassified && *entry != Traversability::UnknownObstacle {
            return;
        }
        *entry = class;

        if class != Traversability::Traversable {
            return;
        }
        // The cell is now claimed drivable: make the elevation layer
        // agree so smoothing stops treating it as unknown.
        if let Some(cell) = self.laser_grid.entry_world_mut(&world) {
            if seed_zero {
                if cell.measurement_count() == 0 {
                    cell.add_measurement(0.0);
                }
            } else {
                let median = cell.median();
                cell.add_measurement(median);
            }
        }
    }

    /// Snapshot the computed map for external consumers.
    pub fn grid_dump(&self) -> GridDump {
        let width = self.interpolated_grid.width();
        let height = self.interpolated_grid.height();
        debug_assert_eq!(width, self.traversability_grid.width());
        debug_assert_eq!(height, self.traversability_grid.height());

        let mut dump = GridDump {
            width,
            height,
            height_values: Vec::with_capacity(width * height),
            max_values: Vec::with_capacity(width * height),
            interpolated: Vec::with_capacity(width * height),
            traversability: Vec::with_capacity(width * height),
            origin: self.traversability_grid.origin(),
        };

        for (_, _, cell) in self.interpolated_grid.iter() {
            dump.height_values.push(if cell.measurement_count() > 0 {
                cell.median()
            } else {
                f32::INFINITY
            });
            dump.max_values.push(cell.maximum());
            dump.interpolated.push(cell.is_interpolated());
        }
        for (_, _, class) in self.traversability_grid.iter() {
            dump.traversability.push(*class as u8);
        }
        dump
    }

    /// Raw elevation grid (scan samples).
    #[inline]
    pub fn laser_grid(&self) -> &ElevationGrid {
        &self.laser_grid
    }

    /// Interpolated elevation grid (after the last
    /// [`MapPipeline::compute_new_map`]).
    #[inline]
    pub fn interpolated_grid(&self) -> &ElevationGrid {
        &self.interpolated_grid
    }

    /// Traversability grid (after the last
    /// [`MapPipeline::compute_new_map`]).
    #[inline]
    pub fn traversability_grid(&self) -> &TraversabilityGrid {
        &self.traversability_grid
    }

    /// Pipeline configuration.
    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}
