//! The set of sites that own Voronoi regions.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Point, Result, VoronoiError};

/// Ordered collection of distinct sites in the unit square.
///
/// A site's identity is its index. Iteration order is insertion order and
/// decides ties during nearest-site search. Duplicate coordinates collapse
/// onto the first occurrence, so a set built from `n` points may hold fewer.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSet {
    sites: Vec<Point>,
}

impl SiteSet {
    /// Build from explicit points, dropping exact duplicates.
    ///
    /// Fails if no points remain or any coordinate lies outside `[0, 1]`.
    pub fn new(points: impl IntoIterator<Item = Point>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut sites = Vec::new();
        for p in points {
            if !p.in_unit_square() {
                return Err(VoronoiError::invalid(format!(
                    "site ({}, {}) outside the unit square",
                    p.x, p.y
                )));
            }
            if seen.insert(key(&p)) {
                sites.push(p);
            }
        }
        if sites.is_empty() {
            return Err(VoronoiError::invalid("site set is empty"));
        }
        Ok(Self { sites })
    }

    /// Draw `count` points uniformly from `[0, 1) x [0, 1)`.
    ///
    /// Each point consumes two draws (x then y) from `rng`. Requested `count`
    /// is an upper bound on the resulting size.
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Self> {
        if count == 0 {
            return Err(VoronoiError::invalid("site count must be at least 1"));
        }
        let points: Vec<Point> = (0..count)
            .map(|_| {
                let x = rng.gen::<f64>();
                let y = rng.gen::<f64>();
                Point::new(x, y)
            })
            .collect();
        Self::new(points)
    }

    /// Generate sites from a fresh ChaCha8 stream seeded with `seed`
    pub fn random(count: usize, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::generate(count, &mut rng)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.sites.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.sites.iter()
    }

    /// Positions as a slice, in identity order
    pub fn positions(&self) -> &[Point] {
        &self.sites
    }
}

impl<'a> IntoIterator for &'a SiteSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Bit pattern used for exact equality; `-0.0` folds onto `0.0`.
fn key(p: &Point) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}
