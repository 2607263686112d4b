//! End-to-end orchestrator tests against a scripted renderer.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use stampgen::config::GenConfig;
use stampgen::error::{ConfigError, PipelineError, RenderError};
use stampgen::fonts::FontCatalog;
use stampgen::geometry::CylinderSpec;
use stampgen::pipeline::{BatchOptions, run_batch};
use stampgen::placement::TextPlacement;
use stampgen::render::{RenderSettings, Renderer};
use stampgen::scene::SceneLighting;

/// Records the call sequence and writes placeholder image bytes, optionally
/// failing the n-th render call.
#[derive(Default)]
struct ScriptedRenderer {
    renders: u32,
    clears: u32,
    fail_on_render: Option<u32>,
    staged_labels: Vec<String>,
}

impl Renderer for ScriptedRenderer {
    fn clear_scene(&mut self) -> Result<(), RenderError> {
        self.clears += 1;
        Ok(())
    }

    fn stage_cylinder(&mut self, _cylinder: &CylinderSpec) -> Result<(), RenderError> {
        Ok(())
    }

    fn deboss_text(&mut self, placement: &TextPlacement) -> Result<(), RenderError> {
        self.staged_labels.push(placement.text.clone());
        Ok(())
    }

    fn stage_scene(&mut self, _scene: &SceneLighting) -> Result<(), RenderError> {
        Ok(())
    }

    fn render(&mut self, path: &Path, _settings: &RenderSettings) -> Result<(), RenderError> {
        self.renders += 1;
        if self.fail_on_render == Some(self.renders) {
            return Err(RenderError::Failed("scripted failure".into()));
        }
        fs::write(path, b"png")?;
        Ok(())
    }
}

fn temp_out(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stampgen-batch-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn opts(out: &Path, count: u32, seed: u64) -> BatchOptions {
    BatchOptions {
        count,
        output_dir: out.to_path_buf(),
        master_seed: seed,
        render: RenderSettings::default(),
    }
}

fn builtin_fonts() -> FontCatalog {
    FontCatalog::discover(Path::new("/nonexistent"), "industrial")
}

fn sorted_stems(dir: &Path) -> Vec<String> {
    let mut stems: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path().file_stem().unwrap().to_string_lossy().into_owned())
        .collect();
    stems.sort();
    stems
}

#[test]
fn batch_produces_matched_image_label_pairs() {
    let out = temp_out("pairs");
    let labels = vec!["AB12".to_string(), "XY9".to_string()];
    let mut renderer = ScriptedRenderer::default();
    let stop = AtomicBool::new(false);

    let summary = run_batch(
        &mut renderer,
        &labels,
        &builtin_fonts(),
        &GenConfig::default(),
        &opts(&out, 3, 42),
        &stop,
    )
    .unwrap();

    assert_eq!(summary.completed, 3);
    assert_eq!(summary.requested, 3);
    assert!(!summary.interrupted);
    assert_eq!(renderer.clears, 3);

    let image_stems = sorted_stems(&out.join("images"));
    let label_stems = sorted_stems(&out.join("labels"));
    assert_eq!(image_stems.len(), 3);
    assert_eq!(image_stems, label_stems);

    // Index suffixes cover 001..003 and each label file holds exactly the
    // label embedded in its filename, no trailing newline.
    let mut indices: Vec<&str> =
        image_stems.iter().map(|s| s.rsplit_once('_').unwrap().1).collect();
    indices.sort();
    assert_eq!(indices, vec!["001", "002", "003"]);

    for stem in &label_stems {
        let (label, _) = stem.rsplit_once('_').unwrap();
        let content = fs::read_to_string(out.join("labels").join(format!("{stem}.txt"))).unwrap();
        assert_eq!(content, label);
        assert!(labels.iter().any(|l| l == label));
    }

    // Manifest: one line per sample, labels matching the staged placements.
    let manifest = fs::read_to_string(out.join("manifest.jsonl")).unwrap();
    let lines: Vec<&str> = manifest.lines().collect();
    assert_eq!(lines.len(), 3);
    for (line, staged) in lines.iter().zip(&renderer.staged_labels) {
        let v: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(v["schema"], "v1");
        assert_eq!(v["label"], staged.as_str());
    }

    fs::remove_dir_all(&out).unwrap();
}

#[test]
fn same_seed_reproduces_the_label_sequence() {
    let labels = vec!["AB12".to_string(), "XY9".to_string(), "CO2-55".to_string()];
    let mut runs = Vec::new();
    for run in 0..2 {
        let out = temp_out(&format!("seed-{run}"));
        let mut renderer = ScriptedRenderer::default();
        let stop = AtomicBool::new(false);
        run_batch(
            &mut renderer,
            &labels,
            &builtin_fonts(),
            &GenConfig::default(),
            &opts(&out, 8, 42),
            &stop,
        )
        .unwrap();
        runs.push((renderer.staged_labels.clone(), sorted_stems(&out.join("images"))));
        fs::remove_dir_all(&out).unwrap();
    }
    assert_eq!(runs[0], runs[1]);
}

#[test]
fn different_seeds_do_not_share_a_sequence() {
    // Not guaranteed for tiny batches in principle, but 16 draws over three
    // labels colliding across seeds would be a broken stream.
    let labels = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let mut sequences = Vec::new();
    for seed in [1u64, 2u64] {
        let out = temp_out(&format!("diverge-{seed}"));
        let mut renderer = ScriptedRenderer::default();
        let stop = AtomicBool::new(false);
        run_batch(
            &mut renderer,
            &labels,
            &builtin_fonts(),
            &GenConfig::default(),
            &opts(&out, 16, seed),
            &stop,
        )
        .unwrap();
        sequences.push(renderer.staged_labels.clone());
        fs::remove_dir_all(&out).unwrap();
    }
    assert_ne!(sequences[0], sequences[1]);
}

#[test]
fn empty_label_set_is_rejected_before_any_write() {
    let out = temp_out("empty");
    let mut renderer = ScriptedRenderer::default();
    let stop = AtomicBool::new(false);

    let err = run_batch(
        &mut renderer,
        &[],
        &builtin_fonts(),
        &GenConfig::default(),
        &opts(&out, 5, 1),
        &stop,
    )
    .unwrap_err();

    assert!(matches!(err, PipelineError::Config(ConfigError::NoLabels)));
    assert_eq!(renderer.renders, 0);
    assert!(!out.exists());
}

#[test]
fn render_failure_aborts_with_index_and_label() {
    let out = temp_out("fail");
    let labels = vec!["AB12".to_string()];
    let mut renderer = ScriptedRenderer { fail_on_render: Some(2), ..Default::default() };
    let stop = AtomicBool::new(false);

    let err = run_batch(
        &mut renderer,
        &labels,
        &builtin_fonts(),
        &GenConfig::default(),
        &opts(&out, 5, 7),
        &stop,
    )
    .unwrap_err();

    match err {
        PipelineError::Render { index, label, .. } => {
            assert_eq!(index, 2);
            assert_eq!(label, "AB12");
        }
        other => panic!("unexpected error: {other}"),
    }

    // The first sample was flushed before the failure; nothing after it.
    assert_eq!(sorted_stems(&out.join("labels")), vec!["AB12_001".to_string()]);
    fs::remove_dir_all(&out).unwrap();
}

#[test]
fn stop_flag_ends_the_batch_gracefully() {
    let out = temp_out("stop");
    let labels = vec!["AB12".to_string(), "XY9".to_string()];
    let mut renderer = ScriptedRenderer::default();
    let stop = AtomicBool::new(true);

    let summary = run_batch(
        &mut renderer,
        &labels,
        &builtin_fonts(),
        &GenConfig::default(),
        &opts(&out, 5, 3),
        &stop,
    )
    .unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.completed, 0);
    assert_eq!(renderer.renders, 0);
    assert!(sorted_stems(&out.join("images")).is_empty());
    fs::remove_dir_all(&out).unwrap();
}

#[test]
fn single_label_batch_reuses_it_for_every_sample() {
    let out = temp_out("single");
    let labels = vec!["N2".to_string()];
    let mut renderer = ScriptedRenderer::default();
    let stop = AtomicBool::new(false);

    let summary = run_batch(
        &mut renderer,
        &labels,
        &builtin_fonts(),
        &GenConfig::default(),
        &opts(&out, 4, 11),
        &stop,
    )
    .unwrap();

    assert_eq!(summary.completed, 4);
    assert_eq!(
        sorted_stems(&out.join("images")),
        vec!["N2_001", "N2_002", "N2_003", "N2_004"]
    );
    fs::remove_dir_all(&out).unwrap();
}
