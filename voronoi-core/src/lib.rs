//! Core Voronoi diagram rasterization library.
//!
//! Assigns every pixel of a square raster to its nearest site under a
//! chosen [`Metric`], then colors each region through a [`Mapping`] and
//! optionally stamps black markers on the sites. The assignment grid is
//! computed once and reused for every mapping.

mod color;
mod cpu;
mod geometry;
mod render;
mod site;
mod voronoi;

pub use color::{hsv_to_rgb, scale, Mapping};
pub use cpu::CpuBackend;
pub use geometry::{denormalize, distance, normalize, Metric, Pixel, Point};
pub use render::{composite, MARKER_COLOR};
pub use site::SiteSet;
pub use voronoi::{AssignmentGrid, ComputeBackend, VoronoiComputer};

/// RGB color tuple
pub type Rgb = [u8; 3];

/// Error type for Voronoi operations
#[derive(Debug, thiserror::Error)]
pub enum VoronoiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VoronoiError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
