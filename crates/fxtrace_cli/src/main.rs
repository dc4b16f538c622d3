mod cli;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use fxtrace_core::cornell_box;
use fxtrace_renderer::{render, render_parallel, save_image, RenderConfig};

use crate::cli::Args;

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate().context("Invalid render configuration")?;
    log::debug!("{:?}", config);

    let scene = cornell_box().context("Failed to build scene")?;

    let image = if args.parallel {
        render_parallel(&scene, &config)?
    } else {
        render(&scene, &config)?
    };

    save_image(&image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
