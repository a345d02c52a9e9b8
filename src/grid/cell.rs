//! Elevation cell: robust per-cell height summary.

/// Aggregate of the height samples that fell into one grid cell.
///
/// Keeps the full sample history sorted so the median is exact. The
/// median contract is a 50th-percentile estimate of the inserted
/// heights; `minimum`/`maximum` may be widened beyond the samples by
/// external knowledge (a beam that passed over the cell, an unknown
/// obstacle bound).
///
/// "No data" sentinel: `measurement_count() == 0` and `maximum()`
/// still at `-inf`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationCell {
    heights: Vec<f32>,
    minimum: f32,
    maximum: f32,
    median: f32,
    interpolated: bool,
}

impl Default for ElevationCell {
    fn default() -> Self {
        Self {
            heights: Vec::new(),
            minimum: f32::INFINITY,
            maximum: f32::NEG_INFINITY,
            median: 0.0,
            interpolated: false,
        }
    }
}

impl ElevationCell {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a height sample.
    pub fn add_measurement(&mut self, height: f32) {
        let at = self.heights.partition_point(|&h| h < height);
        self.heights.insert(at, height);
        if height < self.minimum {
            self.minimum = height;
        }
        if height > self.maximum {
            self.maximum = height;
        }
        self.median = self.heights[self.heights.len() / 2];
        self.interpolated = false;
    }

    /// Set the median from interpolation without adding a sample.
    pub fn set_interpolated(&mut self, height: f32) {
        self.median = height;
        self.interpolated = true;
    }

    /// Widen the maximum without adding a sample.
    ///
    /// Gives an unmeasured cell an upper height bound; such a cell
    /// classifies as an unknown obstacle rather than unclassified.
    pub fn extend_maximum(&mut self, height: f32) {
        if height > self.maximum {
            self.maximum = height;
        }
    }

    /// Widen the minimum without adding a sample.
    pub fn extend_minimum(&mut self, height: f32) {
        if height < self.minimum {
            self.minimum = height;
        }
    }

    /// Number of real height samples.
    #[inline]
    pub fn measurement_count(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    #[inline]
    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    /// 50th-percentile estimate of the inserted heights.
    #[inline]
    pub fn median(&self) -> f32 {
        self.median
    }

    /// True when the median came from interpolation, not a sample.
    #[inline]
    pub fn is_interpolated(&self) -> bool {
        self.interpolated
    }

    /// True when the cell carries no information at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty() && self.maximum == f32::NEG_INFINITY
    }

    /// (count, min, max, median, interpolated) snapshot.
    pub fn summary(&self) -> (usize, f32, f32, f32, bool) {
        (
            self.heights.len(),
            self.minimum,
            self.maximum,
            self.median,
            self.interpolated,
        )
    }
}
