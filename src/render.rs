//! The external renderer contract.
//!
//! The pipeline only ever asks a renderer for this capability set: clear the
//! scene, instantiate a cylinder from its description, boolean-subtract the
//! glyph mesh per a placement, set up camera and lights, render a PNG. Any
//! engine satisfying this trait can back the pipeline; the bundled
//! [`crate::preview::PreviewRenderer`] is one such implementation.
//!
//! The host scene graph is process-wide mutable state: exactly one scene
//! exists at a time, so the orchestrator holds a single renderer for the
//! whole batch and clears-and-rebuilds it each iteration.

use std::path::Path;

use crate::error::RenderError;
use crate::geometry::CylinderSpec;
use crate::placement::TextPlacement;
use crate::scene::SceneLighting;

#[derive(Clone, Copy, Debug)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Render quality samples; meaningful to ray-traced backends.
    pub samples: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { width: 512, height: 256, samples: 64 }
    }
}

pub trait Renderer {
    /// Drops everything staged so far.
    fn clear_scene(&mut self) -> Result<(), RenderError>;

    /// Instantiates the cylinder mesh + material.
    fn stage_cylinder(&mut self, cylinder: &CylinderSpec) -> Result<(), RenderError>;

    /// Builds the glyph mesh per the placement and boolean-subtracts it from
    /// the staged cylinder.
    fn deboss_text(&mut self, placement: &TextPlacement) -> Result<(), RenderError>;

    /// Instantiates camera, light rig and background.
    fn stage_scene(&mut self, scene: &SceneLighting) -> Result<(), RenderError>;

    /// Renders the staged scene to a PNG at `path`.
    fn render(&mut self, path: &Path, settings: &RenderSettings) -> Result<(), RenderError>;
}
