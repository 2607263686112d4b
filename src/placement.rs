//! Text placement planning.
//!
//! Decides where and how a label is stamped into a cylinder: height within
//! the middle band, which of the two opposing faces it sits on, glyph size,
//! font, and how deep the boolean subtraction cuts.

use std::f64::consts::PI;

use rand::{Rng, rngs::SmallRng};

use crate::config::GenConfig;
use crate::fonts::{FontCatalog, FontChoice};
use crate::geometry::CylinderSpec;

/// Which of the two opposing cylinder faces carries the text. Text must face
/// outward and be legible from a single viewpoint, so the side is a binary
/// choice rather than a continuous angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AzimuthSide {
    Front,
    Back,
}

impl AzimuthSide {
    pub fn name(&self) -> &'static str {
        match self {
            AzimuthSide::Front => "front",
            AzimuthSide::Back => "back",
        }
    }

    /// Yaw applied to the glyph mesh so it faces away from the axis.
    pub fn yaw(&self) -> f64 {
        match self {
            AzimuthSide::Front => 0.0,
            AzimuthSide::Back => PI,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TextPlacement {
    pub text: String,
    pub font: FontChoice,
    /// Glyph height in scene units.
    pub size: f64,
    /// Height on the cylinder axis, within the middle band.
    pub height: f64,
    pub side: AzimuthSide,
    /// Distance from the axis to the glyph face.
    pub radial_offset: f64,
    /// Deboss cut depth.
    pub depth: f64,
}

/// Plans one stamp for `text` on `cylinder`. Never fails: the font pick
/// degrades to the built-in face and every numeric draw is bounded.
pub fn place_text(
    rng: &mut SmallRng,
    cfg: &GenConfig,
    cylinder: &CylinderSpec,
    text: &str,
    fonts: &FontCatalog,
) -> TextPlacement {
    let p = &cfg.placement;
    let band_lo = cylinder.height * p.band_margin;
    let band_hi = cylinder.height * (1.0 - p.band_margin);

    TextPlacement {
        text: text.to_owned(),
        font: fonts.pick(rng),
        size: p.text_size.sample(rng),
        height: rng.random_range(band_lo..band_hi),
        side: if rng.random_bool(0.5) { AzimuthSide::Front } else { AzimuthSide::Back },
        radial_offset: cylinder.radius + p.surface_clearance,
        depth: p.deboss_depth.sample(rng),
    }
}
