//! End-to-end tests verifying deterministic Voronoi output.
//!
//! These tests ensure that given the same seed, a full render (sites,
//! grid, color table, markers) produces identical rasters across runs.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use voronoi_core::{
    composite, ComputeBackend, CpuBackend, Mapping, Metric, Pixel, Rgb, SiteSet,
    VoronoiComputer, MARKER_COLOR,
};

fn render_all(
    backend: CpuBackend,
    sites: usize,
    seed: u64,
    metric: Metric,
    resolution: u32,
) -> Vec<image::RgbImage> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let site_set = SiteSet::generate(sites, &mut rng).expect("Site generation failed");
    let mut computer = VoronoiComputer::new(backend);
    computer
        .render_all(&site_set, metric, resolution, &Mapping::ALL, 2, &mut rng)
        .expect("Render failed")
        .into_iter()
        .map(|(_, image)| image)
        .collect()
}

fn assert_images_equal(expected: &image::RgbImage, actual: &image::RgbImage, name: &str) {
    assert_eq!(
        expected.dimensions(),
        actual.dimensions(),
        "{}: dimensions mismatch",
        name
    );
    assert_eq!(
        expected.as_raw(),
        actual.as_raw(),
        "{}: pixel data mismatch",
        name
    );
}

#[test]
fn test_reproducibility() {
    for metric in [Metric::Euclidean, Metric::Manhattan] {
        let run1 = render_all(CpuBackend::new(), 32, 12345, metric, 96);
        let run2 = render_all(CpuBackend::new(), 32, 12345, metric, 96);
        assert_eq!(run1.len(), Mapping::ALL.len());
        for (i, (a, b)) in run1.iter().zip(&run2).enumerate() {
            assert_images_equal(a, b, &format!("{:?} mapping {}", metric, i));
        }
    }
}

#[test]
fn test_sequential_matches_parallel() {
    let parallel = render_all(CpuBackend::new(), 40, 7, Metric::Euclidean, 80);
    let sequential = render_all(CpuBackend::new_sequential(), 40, 7, Metric::Euclidean, 80);
    for (i, (a, b)) in parallel.iter().zip(&sequential).enumerate() {
        assert_images_equal(a, b, &format!("mapping {}", i));
    }
}

#[test]
fn test_different_seeds_produce_different_output() {
    let a = render_all(CpuBackend::new(), 32, 0, Metric::Euclidean, 64);
    let b = render_all(CpuBackend::new(), 32, 1, Metric::Euclidean, 64);
    assert_ne!(
        a[1].as_raw(),
        b[1].as_raw(),
        "Different seeds should produce different output"
    );
}

#[test]
fn test_metric_changes_regions() {
    let sites = SiteSet::random(24, 5).unwrap();
    let euclid = CpuBackend::new().compute(&sites, Metric::Euclidean, 64).unwrap();
    let manhattan = CpuBackend::new().compute(&sites, Metric::Manhattan, 64).unwrap();
    assert_ne!(euclid.cells(), manhattan.cells());
}

#[test]
fn test_grid_reused_across_mappings() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let sites = SiteSet::generate(16, &mut rng).unwrap();
    let mut computer = VoronoiComputer::new(CpuBackend::new());
    let grid = computer.compute(&sites, Metric::Euclidean, 48).unwrap();

    for mapping in Mapping::ALL {
        let image = computer.render(&grid, &sites, mapping, 0, &mut rng).unwrap();
        let table = mapping.color_table(&sites, &mut ChaCha8Rng::seed_from_u64(0));
        // Every pixel in a region shares its site's color
        for row in 0..48 {
            for col in 0..48 {
                let site = grid.site_at(Pixel::new(col, row)).unwrap();
                let owner = grid.site_at(Pixel::new(0, 0)).unwrap();
                if mapping != Mapping::Random {
                    assert_eq!(image.get_pixel(col, row).0, table[site]);
                } else if site == owner {
                    assert_eq!(image.get_pixel(col, row).0, image.get_pixel(0, 0).0);
                }
            }
        }
    }
}

#[test]
fn test_markers_overwrite_regions() {
    let sites = SiteSet::random(10, 9).unwrap();
    let grid = CpuBackend::new().compute(&sites, Metric::Euclidean, 100).unwrap();
    let colors: Vec<Rgb> = vec![[255, 255, 255]; sites.len()];
    let image = composite(&grid, &sites, &colors, 1).unwrap();
    for site in &sites {
        let center = voronoi_core::denormalize(*site, 100);
        assert_eq!(image.get_pixel(center.col, center.row).0, MARKER_COLOR);
    }
}
