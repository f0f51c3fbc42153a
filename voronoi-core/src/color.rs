//! Site color mappings.
//!
//! A [`Mapping`] turns a site position into an RGB color. Mappings are
//! evaluated once per site to build a color table; pixels are then colored
//! by looking up their owning site in that table.

use std::f64::consts::TAU;

use rand::Rng;

use crate::{Point, Rgb, SiteSet};

/// Strategy for coloring a site from its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mapping {
    /// Independent random color per site; ignores position
    Random,
    /// Red from x, green from y
    PositionRg,
    /// Hue from x, value from y, full saturation
    HsvByPosition,
    /// Hue from the angle around the center, value from the distance to it
    PolarHsv,
}

impl Mapping {
    /// Every mapping, in rendering order
    pub const ALL: [Mapping; 4] = [
        Mapping::Random,
        Mapping::PositionRg,
        Mapping::HsvByPosition,
        Mapping::PolarHsv,
    ];

    /// Short kebab-case name, used in output file names
    pub fn name(self) -> &'static str {
        match self {
            Mapping::Random => "random",
            Mapping::PositionRg => "position-rg",
            Mapping::HsvByPosition => "hsv-by-position",
            Mapping::PolarHsv => "polar-hsv",
        }
    }

    /// Color for a single point. Only [`Mapping::Random`] touches `rng`.
    pub fn color<R: Rng + ?Sized>(self, p: &Point, rng: &mut R) -> Rgb {
        match self {
            Mapping::Random => [
                rng.gen_range(0..=255),
                rng.gen_range(0..=255),
                rng.gen_range(0..=255),
            ],
            Mapping::PositionRg => scale([p.x, p.y, 0.0]),
            Mapping::HsvByPosition => scale(hsv_to_rgb(p.x, 1.0, p.y)),
            Mapping::PolarHsv => {
                let dx = p.x - 0.5;
                let dy = p.y - 0.5;
                let r = (dx * dx + dy * dy).sqrt();
                let angle = dy.atan2(dx).rem_euclid(TAU) / TAU;
                scale(hsv_to_rgb(angle, 1.0, r))
            }
        }
    }

    /// One color per site, indexed by site identity
    pub fn color_table<R: Rng + ?Sized>(self, sites: &SiteSet, rng: &mut R) -> Vec<Rgb> {
        sites.iter().map(|p| self.color(p, rng)).collect()
    }
}

/// Scale float channels in `[0, 1]` to bytes, truncating toward zero.
///
/// Out-of-range inputs saturate at 0 and 255.
pub fn scale(c: [f64; 3]) -> Rgb {
    [
        (c[0] * 255.0) as u8,
        (c[1] * 255.0) as u8,
        (c[2] * 255.0) as u8,
    ]
}

/// Standard HSV to RGB conversion, all components in `[0, 1]`.
///
/// Hue wraps, so `h` and `h + 1.0` give the same color.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    if s == 0.0 {
        return [v, v, v];
    }
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u8 % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}
