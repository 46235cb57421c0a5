//! Command line front end for the office map generator.
//!
//! Generates one map from a seed, prints it as text or JSON, and can
//! write it to a map file. Caller-side configuration mistakes exit
//! non-zero; generation-quality warnings go to stderr and do not.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use strum::IntoEnumIterator;

use og_core::{rasterize, GenerationConfig, Generator, RoomClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Text rendering of the tile grid
    Ascii,
    /// The full map as JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "ogmap", about = "Generate procedural office maps")]
struct Cli {
    /// Generation seed; the same seed always yields the same map
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Map width in tiles
    #[arg(long, default_value_t = 100)]
    width: i32,

    /// Map height in tiles
    #[arg(long, default_value_t = 100)]
    height: i32,

    /// Minimum partition side length
    #[arg(long)]
    min_partition_size: Option<i32>,

    /// Maximum partition depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Primary corridor width
    #[arg(long)]
    primary_width: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,

    /// Write the generated map to this file
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print per-class room counts and corridor stats
    #[arg(long)]
    stats: bool,

    /// Suppress the map rendering (useful with --out)
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> GenerationConfig {
        let mut config = GenerationConfig::new(self.width, self.height, self.seed);
        if let Some(min) = self.min_partition_size {
            config.bsp.min_partition_size = min;
        }
        if let Some(depth) = self.max_depth {
            config.bsp.max_depth = depth;
        }
        if let Some(width) = self.primary_width {
            config.corridors.primary_width = width;
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let generator = Generator::new(cli.config());
    let generated = generator.generate().map_err(|e| e.to_string())?;

    for warning in &generated.warnings {
        eprintln!("warning: {warning}");
    }
    if !generated.report.fully_connected {
        eprintln!(
            "warning: map is not fully connected; unreachable rooms: {:?}",
            generated.report.unreachable
        );
    }

    if !cli.quiet {
        match cli.format {
            OutputFormat::Ascii => print!("{}", rasterize(&generated.map).to_ascii()),
            OutputFormat::Json => {
                let json =
                    serde_json::to_string_pretty(&generated.map).map_err(|e| e.to_string())?;
                println!("{json}");
            }
        }
    }

    if cli.stats {
        print_stats(&generated);
    }

    if let Some(path) = &cli.out {
        og_save::save_map(&generated.map, path).map_err(|e| e.to_string())?;
    }

    Ok(())
}

fn print_stats(generated: &og_core::Generated) {
    let map = &generated.map;
    println!("seed: {}", map.seed);
    println!("rooms: {}", map.room_count());
    for class in RoomClass::iter() {
        let count = map.rooms.iter().filter(|r| r.class == class).count();
        if count > 0 {
            println!("  {class}: {count}");
        }
    }
    println!("corridors: {}", map.corridors.len());
    println!(
        "corridor tiles: {}",
        og_core::corridors::total_length(map)
    );
    println!("warnings: {}", generated.warnings.len());
}
