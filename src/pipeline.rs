//! Batch orchestration.
//!
//! One iteration = pick label, build cylinder / placement / scene
//! descriptions, hand them to the renderer, persist image + label +
//! manifest line. Strictly sequential: the renderer owns one scene at a
//! time and every iteration clears and rebuilds it. Any error aborts the
//! whole batch; the stop flag, checked between iterations, ends it
//! gracefully with a partial count.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{error, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::SplitMix64;

use crate::config::GenConfig;
use crate::error::{ConfigError, PipelineError};
use crate::fonts::{FontCatalog, FontChoice};
use crate::geometry::build_cylinder;
use crate::placement::place_text;
use crate::record::SampleRecord;
use crate::render::{RenderSettings, Renderer};
use crate::scene::randomize_scene;

#[derive(Clone, Debug)]
pub struct BatchOptions {
    pub count: u32,
    pub output_dir: PathBuf,
    pub master_seed: u64,
    pub render: RenderSettings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSummary {
    pub requested: u32,
    pub completed: u32,
    pub interrupted: bool,
}

/// Runs the full generation batch. Labels are drawn uniformly with
/// replacement; the zero-padded global iteration index keeps filenames
/// collision-free regardless of label repetition. Per-iteration seeds come
/// from a `SplitMix64` stream over the master seed, so a fixed seed
/// reproduces the entire run.
pub fn run_batch(
    renderer: &mut dyn Renderer,
    labels: &[String],
    fonts: &FontCatalog,
    cfg: &GenConfig,
    opts: &BatchOptions,
    stop: &AtomicBool,
) -> Result<BatchSummary, PipelineError> {
    if labels.is_empty() {
        return Err(ConfigError::NoLabels.into());
    }
    if labels.len() == 1 {
        warn!("dictionary has a single entry, every sample will carry the same label");
    }

    let images_dir = opts.output_dir.join("images");
    let labels_dir = opts.output_dir.join("labels");
    fs::create_dir_all(&images_dir)?;
    fs::create_dir_all(&labels_dir)?;
    let mut manifest = BufWriter::with_capacity(
        1 << 20,
        File::create(opts.output_dir.join("manifest.jsonl"))?,
    );

    let mut stream = SplitMix64::seed_from_u64(opts.master_seed);
    let started = Instant::now();
    let mut completed = 0u32;
    let mut interrupted = false;

    for i in 1..=opts.count {
        if stop.load(Ordering::Acquire) {
            warn!("generation interrupted, {completed}/{} samples done", opts.count);
            interrupted = true;
            break;
        }

        let seed = stream.next_u64();
        let mut rng = SmallRng::seed_from_u64(seed);

        let label = &labels[rng.random_range(0..labels.len())];
        let cylinder = build_cylinder(&mut rng, cfg, None, None, None);
        let placement = place_text(&mut rng, cfg, &cylinder, label, fonts);
        let scene = randomize_scene(&mut rng, cfg);

        let stem = format!("{label}_{i:03}");
        let image_rel = format!("images/{stem}.png");
        let label_rel = format!("labels/{stem}.txt");

        let staged = (|| {
            renderer.clear_scene()?;
            renderer.stage_cylinder(&cylinder)?;
            renderer.deboss_text(&placement)?;
            renderer.stage_scene(&scene)?;
            renderer.render(&opts.output_dir.join(&image_rel), &opts.render)
        })();
        if let Err(source) = staged {
            error!("sample {i} ({label:?}) failed: {source}");
            return Err(PipelineError::Render { index: i, label: label.clone(), source });
        }

        // Label integrity: file content is exactly the label bytes.
        fs::write(labels_dir.join(format!("{stem}.txt")), label.as_bytes())?;

        let record = SampleRecord {
            schema: SampleRecord::SCHEMA,
            image: image_rel,
            label_file: label_rel,
            label,
            seed,
            size_class: cylinder.size_class,
            height: cylinder.height,
            radius: cylinder.radius,
            azimuth: placement.side.name(),
            font: match &placement.font {
                FontChoice::File(path) => {
                    path.file_name().map(|n| n.to_string_lossy().into_owned())
                }
                FontChoice::Builtin => None,
            },
        };
        writeln!(manifest, "{}", serde_json::to_string(&record)?)?;

        completed += 1;
        if completed % 10 == 0 {
            let elapsed = started.elapsed().as_secs_f64();
            let remaining = elapsed / completed as f64 * (opts.count - completed) as f64;
            info!(
                "progress: {completed}/{} ({} elapsed, ~{} left)",
                opts.count,
                format_duration(elapsed),
                format_duration(remaining),
            );
        }
    }

    manifest.into_inner().map_err(|e| e.into_error())?.sync_all()?;

    info!(
        "generation complete: {completed}/{} samples in {}",
        opts.count,
        format_duration(started.elapsed().as_secs_f64()),
    );

    Ok(BatchSummary { requested: opts.count, completed, interrupted })
}

/// Human-readable duration, e.g. `2h 30m 45s`.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{seconds:.1}s")
    } else if seconds < 3600.0 {
        format!("{}m {}s", (seconds / 60.0) as u64, (seconds % 60.0) as u64)
    } else {
        format!(
            "{}h {}m {}s",
            (seconds / 3600.0) as u64,
            ((seconds % 3600.0) / 60.0) as u64,
            (seconds % 60.0) as u64,
        )
    }
}
