use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fxtrace_renderer::RenderConfig;
use log::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render the built-in box scene with the fixed-point path tracer.
#[derive(Debug, Parser)]
#[command(name = "fxtrace", version)]
pub struct Args {
    /// JSON render configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Path segments per sample
    #[arg(short, long)]
    pub bounces: Option<u32>,

    /// Generator seed (0 selects the default)
    #[arg(long)]
    pub seed: Option<u32>,

    /// Render buckets on all cores with per-pixel random streams
    #[arg(short, long)]
    pub parallel: bool,

    /// Bucket edge length in pixels for --parallel
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Output file (.ppm or .png)
    #[arg(short, long, default_value = "render.ppm")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply flag overrides on top of `config`.
    pub fn apply(&self, config: &mut RenderConfig) {
        let overrides = [
            (self.width, &mut config.width),
            (self.height, &mut config.height),
            (self.samples, &mut config.samples_per_pixel),
            (self.bounces, &mut config.max_bounces),
            (self.seed, &mut config.seed),
            (self.bucket_size, &mut config.bucket_size),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}
