//! CPU nearest-site assignment, optionally row-parallel with Rayon.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geometry::{normalize, Metric, Pixel, Point};
use crate::voronoi::{AssignmentGrid, ComputeBackend};
use crate::{Result, SiteSet, VoronoiError};

/// CPU backend: brute-force O(R²·N) scan over every site for every pixel
pub struct CpuBackend {
    /// Split rows across the Rayon pool (ignored without the `parallel` feature)
    pub parallel: bool,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self { parallel: cfg!(feature = "parallel") }
    }

    /// Single-threaded backend, mostly for benchmarking and parity checks
    pub fn new_sequential() -> Self {
        Self { parallel: false }
    }

    /// Index of the site nearest `point`; the earliest site wins ties.
    #[inline]
    fn nearest_site(point: &Point, sites: &[Point], metric: Metric) -> u32 {
        let mut nearest = 0u32;
        let mut min_dist = f64::INFINITY;
        for (i, site) in sites.iter().enumerate() {
            let dist = metric.distance(point, site);
            if dist < min_dist {
                min_dist = dist;
                nearest = i as u32;
            }
        }
        nearest
    }

    /// Fill one raster row
    fn assign_row(
        row: u32,
        cells: &mut [u32],
        sites: &[Point],
        metric: Metric,
        resolution: u32,
    ) {
        for (col, cell) in cells.iter_mut().enumerate() {
            let point = normalize(Pixel::new(col as u32, row), resolution);
            *cell = Self::nearest_site(&point, sites, metric);
        }
    }

    fn compute_sequential(cells: &mut [u32], sites: &[Point], metric: Metric, resolution: u32) {
        for (row, chunk) in cells.chunks_mut(resolution as usize).enumerate() {
            Self::assign_row(row as u32, chunk, sites, metric, resolution);
        }
    }

    #[cfg(feature = "parallel")]
    fn compute_parallel(cells: &mut [u32], sites: &[Point], metric: Metric, resolution: u32) {
        // Each task owns a disjoint row
        cells
            .par_chunks_mut(resolution as usize)
            .enumerate()
            .for_each(|(row, chunk)| {
                Self::assign_row(row as u32, chunk, sites, metric, resolution);
            });
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_parallel(cells: &mut [u32], sites: &[Point], metric: Metric, resolution: u32) {
        Self::compute_sequential(cells, sites, metric, resolution);
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn compute(
        &mut self,
        sites: &SiteSet,
        metric: Metric,
        resolution: u32,
    ) -> Result<AssignmentGrid> {
        if sites.is_empty() {
            return Err(VoronoiError::invalid("site set is empty"));
        }
        if resolution == 0 {
            return Err(VoronoiError::invalid("resolution must be positive"));
        }
        if sites.len() > u32::MAX as usize {
            return Err(VoronoiError::invalid("too many sites"));
        }

        let positions = sites.positions();
        let mut cells = vec![0u32; resolution as usize * resolution as usize];
        if self.parallel {
            Self::compute_parallel(&mut cells, positions, metric, resolution);
        } else {
            Self::compute_sequential(&mut cells, positions, metric, resolution);
        }

        Ok(AssignmentGrid::from_cells(cells, resolution, sites.len()))
    }
}
