use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;
use rand::Rng;

use stampgen::config::GenConfig;
use stampgen::dict::load_dictionary;
use stampgen::fonts::FontCatalog;
use stampgen::pipeline::{BatchOptions, run_batch};
use stampgen::preview::PreviewRenderer;
use stampgen::render::RenderSettings;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FontStyle {
    Industrial,
    Monospace,
    Default,
}

impl FontStyle {
    fn as_str(self) -> &'static str {
        match self {
            FontStyle::Industrial => "industrial",
            FontStyle::Monospace => "monospace",
            FontStyle::Default => "default",
        }
    }
}

/// Generates synthetic images of debossed text on gas cylinders, paired with
/// ground-truth label files, for OCR training.
#[derive(Parser, Debug)]
#[command(name = "stampgen", version)]
struct Args {
    /// Number of images to generate.
    #[arg(long, default_value_t = 100)]
    count: u32,

    /// Path to the label dictionary, one label per line.
    #[arg(long)]
    dict: PathBuf,

    /// Output directory; gets images/, labels/ and manifest.jsonl.
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Output image dimensions.
    #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [512u32, 256])]
    resolution: Vec<u32>,

    /// Render quality samples.
    #[arg(long, default_value_t = 64)]
    samples: u32,

    /// Random seed; drawn at random (and logged) when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory containing per-style font subdirectories.
    #[arg(long, default_value = "fonts")]
    font_dir: PathBuf,

    /// Font style preference.
    #[arg(long, value_enum, default_value_t = FontStyle::Industrial)]
    font_style: FontStyle,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let labels = load_dictionary(&args.dict)?;
    info!("loaded {} labels from {}", labels.len(), args.dict.display());

    let master_seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!("master seed: {master_seed}");

    let fonts = FontCatalog::discover(&args.font_dir, args.font_style.as_str());
    info!("using {} discovered font(s), style {}", fonts.len(), args.font_style.as_str());

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::Release))
            .context("failed to install interrupt handler")?;
    }

    let opts = BatchOptions {
        count: args.count,
        output_dir: args.output.clone(),
        master_seed,
        render: RenderSettings {
            width: args.resolution[0],
            height: args.resolution[1],
            samples: args.samples,
        },
    };

    let mut renderer = PreviewRenderer::new();
    let summary =
        run_batch(&mut renderer, &labels, &fonts, &GenConfig::default(), &opts, &stop)?;

    info!(
        "done: {}/{} samples under {}{}",
        summary.completed,
        summary.requested,
        args.output.display(),
        if summary.interrupted { " (interrupted)" } else { "" },
    );
    Ok(())
}
