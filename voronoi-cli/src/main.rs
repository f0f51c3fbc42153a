//! Voronoi diagram CLI
//!
//! Scatters seeded random sites over a square raster, assigns every pixel
//! to its nearest site once, then renders the diagram under each selected
//! color mapping.
//!
//! ## YAML config file
//!
//! ```yaml
//! resolution: 512
//! sites: 32
//! seed: 0
//! metric: euclidean     # or manhattan
//! marker_radius: 2      # 0 disables site markers
//! mappings: [random, position-rg, hsv-by-position, polar-hsv]
//! ```
//!
//! Run with: `voronoi -o out/diagram.png --config diagram.yaml`
//!
//! Command-line flags override values from the file.
//!
//! ## Output
//!
//! `png` writes one file per mapping (`out/diagram-random.png`, ...).
//! `gif` writes a single looping GIF with one frame per mapping.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use voronoi_core::{ComputeBackend, CpuBackend, Mapping, Metric, SiteSet, VoronoiComputer};

const DEFAULT_RESOLUTION: u32 = 512;
const DEFAULT_SITES: usize = 32;
const DEFAULT_MARKER_RADIUS: u32 = 2;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Png,
    Gif,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum MetricArg {
    Euclidean,
    Manhattan,
}

impl From<MetricArg> for Metric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Euclidean => Metric::Euclidean,
            MetricArg::Manhattan => Metric::Manhattan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum MappingArg {
    Random,
    PositionRg,
    HsvByPosition,
    PolarHsv,
}

impl From<MappingArg> for Mapping {
    fn from(m: MappingArg) -> Self {
        match m {
            MappingArg::Random => Mapping::Random,
            MappingArg::PositionRg => Mapping::PositionRg,
            MappingArg::HsvByPosition => Mapping::HsvByPosition,
            MappingArg::PolarHsv => Mapping::PolarHsv,
        }
    }
}

/// YAML config file format; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DiagramSpec {
    #[serde(default)]
    resolution: Option<u32>,
    #[serde(default)]
    sites: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    metric: Option<MetricArg>,
    #[serde(default)]
    marker_radius: Option<u32>,
    #[serde(default)]
    mappings: Option<Vec<MappingArg>>,
}

fn load_spec(path: &PathBuf) -> anyhow::Result<DiagramSpec> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {:?}", path))
}

#[derive(Parser, Debug)]
#[command(name = "voronoi")]
#[command(about = "Render Voronoi diagrams under several color mappings", long_about = None)]
struct Args {
    /// Output file path (PNG outputs get a per-mapping suffix)
    #[arg(short, long, default_value = "voronoi.png")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "png")]
    format: OutputFormat,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image width and height in pixels [default: 512]
    #[arg(short, long)]
    resolution: Option<u32>,

    /// Number of sites to scatter (duplicates collapse) [default: 32]
    #[arg(short = 'n', long)]
    sites: Option<usize>,

    /// Random seed for reproducibility [default: 0]
    #[arg(long)]
    seed: Option<u64>,

    /// Distance metric [default: euclidean]
    #[arg(long, value_enum)]
    metric: Option<MetricArg>,

    /// Site marker radius in pixels (0 disables) [default: 2]
    #[arg(long)]
    marker_radius: Option<u32>,

    /// Color mapping to render; repeat for several [default: all]
    #[arg(short, long = "mapping", value_enum)]
    mapping: Vec<MappingArg>,

    /// GIF frame delay in hundredths of a second
    #[arg(long, default_value = "100")]
    frame_delay: u16,

    /// Assign pixels on a single thread
    #[arg(long)]
    sequential: bool,

    /// Time sequential vs parallel grid construction instead of rendering
    #[arg(long)]
    benchmark: bool,

    /// Number of timed grid builds per backend in benchmark mode
    #[arg(long, default_value = "5")]
    bench_runs: usize,
}

/// Fully resolved rendering parameters
#[derive(Debug)]
struct Settings {
    resolution: u32,
    sites: usize,
    seed: u64,
    metric: Metric,
    marker_radius: u32,
    mappings: Vec<Mapping>,
}

/// CLI args take precedence over the config file, which overrides defaults.
fn resolve_settings(args: &Args, spec: &DiagramSpec) -> Settings {
    let mappings: Vec<Mapping> = if !args.mapping.is_empty() {
        args.mapping.iter().copied().map(Mapping::from).collect()
    } else if let Some(m) = &spec.mappings {
        m.iter().copied().map(Mapping::from).collect()
    } else {
        Mapping::ALL.to_vec()
    };

    Settings {
        resolution: args.resolution.or(spec.resolution).unwrap_or(DEFAULT_RESOLUTION),
        sites: args.sites.or(spec.sites).unwrap_or(DEFAULT_SITES),
        seed: args.seed.or(spec.seed).unwrap_or(0),
        metric: args.metric.or(spec.metric).map(Metric::from).unwrap_or_default(),
        marker_radius: args
            .marker_radius
            .or(spec.marker_radius)
            .unwrap_or(DEFAULT_MARKER_RADIUS),
        mappings,
    }
}

/// Path for one mapping's PNG: `dir/stem-<mapping>.png`
fn mapping_output_path(output: &Path, mapping: Mapping) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("voronoi");
    output.with_file_name(format!("{}-{}.png", stem, mapping.name()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let spec = match &args.config {
        Some(path) => load_spec(path)?,
        None => DiagramSpec::default(),
    };
    let settings = resolve_settings(&args, &spec);

    if settings.mappings.is_empty() {
        anyhow::bail!("config lists no mappings to render");
    }

    // One stream feeds site generation, then the random mapping
    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
    let sites = SiteSet::generate(settings.sites, &mut rng)?;
    println!("Using seed: {}", settings.seed);
    if sites.len() < settings.sites {
        eprintln!(
            "Warning: {} duplicate site(s) dropped, {} remain",
            settings.sites - sites.len(),
            sites.len()
        );
    }

    if args.benchmark {
        return run_benchmark(&sites, &settings, args.bench_runs);
    }

    let backend = if args.sequential {
        println!("Using CPU backend (sequential)");
        CpuBackend::new_sequential()
    } else {
        println!("Using CPU backend (Rayon)");
        CpuBackend::new()
    };
    let mut computer = VoronoiComputer::new(backend);

    println!(
        "Assigning {}x{} pixels to {} sites ({:?} metric)",
        settings.resolution,
        settings.resolution,
        sites.len(),
        settings.metric
    );
    let grid_start = Instant::now();
    let grid = computer.compute(&sites, settings.metric, settings.resolution)?;
    println!("Grid built in {:.1} ms", grid_start.elapsed().as_secs_f64() * 1000.0);

    let progress = ProgressBar::new(settings.mappings.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
    );

    let mut gif_encoder = match args.format {
        OutputFormat::Gif => Some(GifWriter::create(
            &args.output,
            settings.resolution,
            args.frame_delay,
        )?),
        OutputFormat::Png => None,
    };

    for &mapping in &settings.mappings {
        progress.set_message(mapping.name());
        let image = computer.render(&grid, &sites, mapping, settings.marker_radius, &mut rng)?;

        match gif_encoder.as_mut() {
            Some(encoder) => encoder.write_frame(image.as_raw())?,
            None => {
                let path = mapping_output_path(&args.output, mapping);
                image
                    .save(&path)
                    .with_context(|| format!("failed to write {:?}", path))?;
                progress.println(format!("Output saved to: {:?}", path));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if gif_encoder.is_some() {
        println!("Output saved to: {:?}", args.output);
    }
    println!("Rendered {} mapping(s)", settings.mappings.len());
    Ok(())
}

/// Compare sequential and Rayon grid construction
fn run_benchmark(sites: &SiteSet, settings: &Settings, runs: usize) -> anyhow::Result<()> {
    let runs = runs.max(1);
    println!("\n=== Voronoi Benchmark ===");
    println!("Resolution: {}x{}", settings.resolution, settings.resolution);
    println!("Sites: {}", sites.len());
    println!("Metric: {:?}", settings.metric);
    println!("Runs: {}", runs);
    println!();

    println!("Benchmarking CPU (sequential)...");
    let sequential = benchmark_backend(&mut CpuBackend::new_sequential(), sites, settings, runs)?;
    println!("  {:.1} ms/grid", per_run_ms(sequential, runs));

    println!("Benchmarking CPU (Rayon)...");
    let parallel = benchmark_backend(&mut CpuBackend::new(), sites, settings, runs)?;
    println!("  {:.1} ms/grid", per_run_ms(parallel, runs));

    println!();
    println!("=== Summary ===");
    let speedup = sequential.as_secs_f64() / parallel.as_secs_f64().max(f64::EPSILON);
    println!("Rayon is {:.2}x the speed of sequential", speedup);
    Ok(())
}

fn per_run_ms(total: Duration, runs: usize) -> f64 {
    total.as_secs_f64() * 1000.0 / runs as f64
}

/// Benchmark a single backend
fn benchmark_backend(
    backend: &mut dyn ComputeBackend,
    sites: &SiteSet,
    settings: &Settings,
    runs: usize,
) -> anyhow::Result<Duration> {
    // Warmup (spins up the Rayon pool)
    let _ = backend.compute(sites, settings.metric, settings.resolution)?;

    let start = Instant::now();
    for _ in 0..runs {
        let _ = backend.compute(sites, settings.metric, settings.resolution)?;
    }
    Ok(start.elapsed())
}

/// Streaming GIF writer: one palette-indexed frame per mapping
struct GifWriter {
    encoder: gif::Encoder<std::fs::File>,
    size: u16,
    frame_delay: u16,
}

impl GifWriter {
    fn create(output: &Path, resolution: u32, frame_delay: u16) -> anyhow::Result<Self> {
        use gif::{Encoder, Repeat};
        let size = u16::try_from(resolution)
            .with_context(|| format!("resolution {} too large for GIF", resolution))?;
        let file = std::fs::File::create(output)
            .with_context(|| format!("failed to create {:?}", output))?;
        let mut encoder = Encoder::new(file, size, size, &[])?;
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(Self { encoder, size, frame_delay })
    }

    /// Write one frame's raw RGB pixel data
    fn write_frame(&mut self, rgb_data: &[u8]) -> anyhow::Result<()> {
        let (pixels, palette) = quantize(rgb_data);
        let mut frame =
            gif::Frame::from_palette_pixels(self.size, self.size, pixels, palette, None);
        frame.delay = self.frame_delay;
        self.encoder.write_frame(&frame)?;
        Ok(())
    }
}

/// Index RGB pixels against a palette of at most 256 colors.
///
/// Region images hold one color per site plus the marker color; past 256
/// distinct colors, pixels snap to the nearest palette entry.
fn quantize(rgb_data: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut pixels: Vec<u8> = Vec::with_capacity(rgb_data.len() / 3);
    let mut palette: Vec<[u8; 3]> = Vec::new();

    for chunk in rgb_data.chunks_exact(3) {
        let rgb = [chunk[0], chunk[1], chunk[2]];
        let idx = palette.iter().position(|&c| c == rgb).unwrap_or_else(|| {
            if palette.len() < 256 {
                palette.push(rgb);
                palette.len() - 1
            } else {
                palette
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, c)| {
                        let dr = c[0] as i32 - rgb[0] as i32;
                        let dg = c[1] as i32 - rgb[1] as i32;
                        let db = c[2] as i32 - rgb[2] as i32;
                        dr * dr + dg * dg + db * db
                    })
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            }
        });
        pixels.push(idx as u8);
    }

    while palette.len() < 256 {
        palette.push([0, 0, 0]);
    }
    let flat_palette = palette.iter().flat_map(|c| c.iter().copied()).collect();
    (pixels, flat_palette)
}
