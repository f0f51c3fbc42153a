//! Compositing an assignment grid and a site color table into an image.

use crate::geometry::denormalize_unclamped;
use crate::{AssignmentGrid, Result, Rgb, SiteSet, VoronoiError};

/// Fill color for site markers
pub const MARKER_COLOR: Rgb = [0, 0, 0];

/// Render a row-major RGB image from `grid`, coloring each pixel with its
/// site's entry in `colors`.
///
/// With `marker_radius > 0`, a filled disk is then drawn at every site in
/// site order, overwriting region colors. Disk pixels falling outside the
/// raster are clipped.
pub fn composite(
    grid: &AssignmentGrid,
    sites: &SiteSet,
    colors: &[Rgb],
    marker_radius: u32,
) -> Result<image::RgbImage> {
    if colors.len() != grid.num_sites() || sites.len() != grid.num_sites() {
        return Err(VoronoiError::invalid(format!(
            "grid has {} sites, but got {} sites and {} colors",
            grid.num_sites(),
            sites.len(),
            colors.len()
        )));
    }

    let resolution = grid.resolution();
    let mut pixels = Vec::with_capacity(grid.cells().len() * 3);
    for &cell in grid.cells() {
        pixels.extend_from_slice(&colors[cell as usize]);
    }
    let mut image = image::RgbImage::from_raw(resolution, resolution, pixels)
        .ok_or_else(|| VoronoiError::invalid("buffer size mismatch"))?;

    if marker_radius > 0 {
        for site in sites {
            let center = denormalize_unclamped(*site, resolution);
            draw_marker(&mut image, center, marker_radius);
        }
    }

    Ok(image)
}

/// Fill offsets with `dx² + dy² <= r·(r + 1)`; radius 1 gives a 3x3 block.
///
/// `center` may sit outside the raster (a site on the far edge maps to
/// `resolution`); only the in-bounds part of the disk is painted.
fn draw_marker(image: &mut image::RgbImage, center: (i64, i64), radius: u32) {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let r = radius as i64;
    let limit = r * (r + 1);
    let (cx, cy) = center;

    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > limit {
                continue;
            }
            let px = cx + dx;
            let py = cy + dy;
            if px >= 0 && px < w && py >= 0 && py < h {
                image.put_pixel(px as u32, py as u32, image::Rgb(MARKER_COLOR));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CpuBackend, ComputeBackend, Metric, Point};

    const WHITE: Rgb = [255, 255, 255];

    fn single_site(x: f64, y: f64, resolution: u32) -> (SiteSet, AssignmentGrid) {
        let sites = SiteSet::new(vec![Point::new(x, y)]).unwrap();
        let grid = CpuBackend::new().compute(&sites, Metric::Euclidean, resolution).unwrap();
        (sites, grid)
    }

    #[test]
    fn test_region_colors() {
        let sites = SiteSet::new(vec![Point::new(0.1, 0.1), Point::new(0.9, 0.9)]).unwrap();
        let grid = CpuBackend::new().compute(&sites, Metric::Euclidean, 4).unwrap();
        let colors: [Rgb; 2] = [[10, 20, 30], [200, 100, 0]];
        let image = composite(&grid, &sites, &colors, 0).unwrap();

        assert_eq!(image.dimensions(), (4, 4));
        assert_eq!(image.get_pixel(0, 0).0, colors[0]);
        assert_eq!(image.get_pixel(3, 3).0, colors[1]);
        // Row-major: raw bytes of pixel (col 3, row 0) start at 3 * 3
        let i = 3 * 3;
        assert_eq!(&image.as_raw()[i..i + 3], &colors[0][..]);
    }

    #[test]
    fn test_marker_radius_one() {
        // (0.25, 0.25) denormalizes to (2, 2) in an 8x8 image
        let (sites, grid) = single_site(0.25, 0.25, 8);
        let image = composite(&grid, &sites, &[WHITE], 1).unwrap();

        for y in 0..8u32 {
            for x in 0..8u32 {
                let in_block = (1..=3).contains(&x) && (1..=3).contains(&y);
                let expected = if in_block { MARKER_COLOR } else { WHITE };
                assert_eq!(image.get_pixel(x, y).0, expected, "pixel ({},{})", x, y);
            }
        }
    }

    #[test]
    fn test_marker_radius_two_is_rounded() {
        let (sites, grid) = single_site(0.5, 0.5, 16);
        let image = composite(&grid, &sites, &[WHITE], 2).unwrap();
        assert_eq!(image.get_pixel(8, 8).0, MARKER_COLOR);
        assert_eq!(image.get_pixel(10, 8).0, MARKER_COLOR);
        assert_eq!(image.get_pixel(10, 9).0, MARKER_COLOR);
        assert_eq!(image.get_pixel(10, 10).0, WHITE);
        assert_eq!(image.get_pixel(11, 8).0, WHITE);
    }

    #[test]
    fn test_marker_clipped_at_edges() {
        let (sites, grid) = single_site(0.0, 1.0, 8);
        let image = composite(&grid, &sites, &[WHITE], 3).unwrap();
        assert_eq!(image.get_pixel(0, 7).0, MARKER_COLOR);
        assert_eq!(image.get_pixel(7, 0).0, WHITE);
    }

    #[test]
    fn test_marker_on_far_edge_is_clipped_not_shifted() {
        // x = 1.0 centers the disk on column 8, one past the raster
        let (sites, grid) = single_site(1.0, 0.5, 8);
        let image = composite(&grid, &sites, &[WHITE], 2).unwrap();
        let black: Vec<u32> = (0..8)
            .filter(|&x| image.get_pixel(x, 4).0 == MARKER_COLOR)
            .collect();
        assert_eq!(black, vec![6, 7]);
        assert_eq!(image.get_pixel(7, 2).0, MARKER_COLOR);
        assert_eq!(image.get_pixel(6, 2).0, WHITE);
    }

    #[test]
    fn test_zero_radius_draws_nothing() {
        let (sites, grid) = single_site(0.5, 0.5, 8);
        let image = composite(&grid, &sites, &[WHITE], 0).unwrap();
        assert!(image.pixels().all(|p| p.0 == WHITE));
    }

    #[test]
    fn test_composite_is_idempotent() {
        let sites = SiteSet::random(12, 4).unwrap();
        let grid = CpuBackend::new().compute(&sites, Metric::Manhattan, 64).unwrap();
        let colors: Vec<Rgb> = (0..sites.len()).map(|i| [i as u8 * 20, 50, 200]).collect();
        let a = composite(&grid, &sites, &colors, 2).unwrap();
        let b = composite(&grid, &sites, &colors, 2).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_color_table_length_checked() {
        let (sites, grid) = single_site(0.5, 0.5, 8);
        let err = composite(&grid, &sites, &[WHITE, WHITE], 0).unwrap_err();
        assert!(matches!(err, VoronoiError::InvalidInput(_)));
    }
}
