//! Points in the unit domain, raster pixels, and distance metrics.

/// A position in the normalized domain `[0, 1] x [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite and inside `[0, 1]`
    pub fn in_unit_square(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Squared distance to another point
    pub fn dist_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to another point
    pub fn dist(&self, other: &Point) -> f64 {
        self.dist_sq(other).sqrt()
    }

    /// Manhattan (L1) distance to another point
    pub fn dist_l1(&self, other: &Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Integer raster coordinate; row 0 is the top of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub col: u32,
    pub row: u32,
}

impl Pixel {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Distance used to rank sites. Only the ordering of values matters, so
/// `Euclidean` reports the squared distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    #[default]
    Euclidean,
    Manhattan,
}

impl Metric {
    #[inline]
    pub fn distance(self, a: &Point, b: &Point) -> f64 {
        match self {
            Metric::Euclidean => a.dist_sq(b),
            Metric::Manhattan => a.dist_l1(b),
        }
    }
}

/// Map a pixel to the point at its top-left corner (`pixel / resolution`).
pub fn normalize(pixel: Pixel, resolution: u32) -> Point {
    let r = resolution as f64;
    Point::new(pixel.col as f64 / r, pixel.row as f64 / r)
}

/// Map a point to the pixel containing it, truncating toward zero.
///
/// Exact inverse of [`normalize`] on grid lines: a point produced by
/// `normalize(p, r)` always maps back to `p`, even where `c / r * r`
/// rounds just below `c` in floating point. Results are clamped to
/// `[0, resolution)`.
pub fn denormalize(point: Point, resolution: u32) -> Pixel {
    Pixel::new(
        denormalize_axis(point.x, resolution),
        denormalize_axis(point.y, resolution),
    )
}

/// Distance between two points under `metric`.
pub fn distance(metric: Metric, p1: &Point, p2: &Point) -> f64 {
    metric.distance(p1, p2)
}

/// Pixel coordinates of the cell containing `point`, without clamping.
///
/// A coordinate of exactly 1.0 lands on `resolution`, one past the last
/// pixel; callers drawing around the point clip instead of shifting it.
pub(crate) fn denormalize_unclamped(point: Point, resolution: u32) -> (i64, i64) {
    (axis_index(point.x, resolution), axis_index(point.y, resolution))
}

fn denormalize_axis(v: f64, resolution: u32) -> u32 {
    let max = resolution.saturating_sub(1) as i64;
    axis_index(v, resolution).clamp(0, max) as u32
}

fn axis_index(v: f64, resolution: u32) -> i64 {
    let r = resolution as f64;
    let mut c = (v * r) as i64;

    // v * r is off by at most one ulp; nudge to the largest c with c / r <= v
    if (c + 1) as f64 / r <= v {
        c += 1;
    } else if c > 0 && c as f64 / r > v {
        c -= 1;
    }
    c
}
