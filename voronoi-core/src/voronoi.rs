//! Voronoi computation traits and result types.

use rand::Rng;

use crate::{
    color::Mapping, render, CpuBackend, Metric, Pixel, Result, Rgb, SiteSet, VoronoiError,
};

/// Nearest-site index for every pixel of a square raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentGrid {
    /// Site index for each pixel (row-major order)
    cells: Vec<u32>,
    resolution: u32,
    num_sites: usize,
}

impl AssignmentGrid {
    /// Brute-force build with the default CPU backend
    pub fn build(sites: &SiteSet, metric: Metric, resolution: u32) -> Result<Self> {
        CpuBackend::new().compute(sites, metric, resolution)
    }

    pub(crate) fn from_cells(cells: Vec<u32>, resolution: u32, num_sites: usize) -> Self {
        debug_assert_eq!(cells.len(), resolution as usize * resolution as usize);
        Self { cells, resolution, num_sites }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Number of sites the grid was built from
    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    /// Row-major cell slice, `resolution * resolution` long
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Site index owning `pixel`, or `None` if the pixel is off the grid
    pub fn site_at(&self, pixel: Pixel) -> Option<usize> {
        if pixel.col >= self.resolution || pixel.row >= self.resolution {
            return None;
        }
        let i = pixel.row as usize * self.resolution as usize + pixel.col as usize;
        Some(self.cells[i] as usize)
    }
}

/// Trait for nearest-site assignment backends
pub trait ComputeBackend {
    /// Assign every pixel of a `resolution x resolution` raster to its
    /// nearest site under `metric`.
    fn compute(
        &mut self,
        sites: &SiteSet,
        metric: Metric,
        resolution: u32,
    ) -> Result<AssignmentGrid>;
}

/// High-level Voronoi computer: one assignment grid, many color mappings
pub struct VoronoiComputer<B: ComputeBackend> {
    backend: B,
}

impl<B: ComputeBackend> VoronoiComputer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn compute(
        &mut self,
        sites: &SiteSet,
        metric: Metric,
        resolution: u32,
    ) -> Result<AssignmentGrid> {
        self.backend.compute(sites, metric, resolution)
    }

    /// Color `grid` with `mapping` and stamp markers of `marker_radius`.
    ///
    /// The mapping runs once per site, in site order; `rng` only advances
    /// for [`Mapping::Random`].
    pub fn render<R: Rng + ?Sized>(
        &self,
        grid: &AssignmentGrid,
        sites: &SiteSet,
        mapping: Mapping,
        marker_radius: u32,
        rng: &mut R,
    ) -> Result<image::RgbImage> {
        if grid.num_sites() != sites.len() {
            return Err(VoronoiError::invalid(format!(
                "grid built for {} sites, got {}",
                grid.num_sites(),
                sites.len()
            )));
        }
        let table: Vec<Rgb> = mapping.color_table(sites, rng);
        render::composite(grid, sites, &table, marker_radius)
    }

    /// Build the grid once, then render one image per mapping in order.
    pub fn render_all<R: Rng + ?Sized>(
        &mut self,
        sites: &SiteSet,
        metric: Metric,
        resolution: u32,
        mappings: &[Mapping],
        marker_radius: u32,
        rng: &mut R,
    ) -> Result<Vec<(Mapping, image::RgbImage)>> {
        let grid = self.compute(sites, metric, resolution)?;
        mappings
            .iter()
            .map(|&mapping| {
                let image = self.render(&grid, sites, mapping, marker_radius, rng)?;
                Ok((mapping, image))
            })
            .collect()
    }
}
