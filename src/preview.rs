//! CPU raster preview backend.
//!
//! `PreviewRenderer` implements the [`Renderer`] contract without a host 3D
//! engine: the tank becomes a Lambert-shaded silhouette, the deboss becomes
//! darkened glyphs at the planned height. Good enough to exercise the whole
//! pipeline end to end and to eyeball placements; not a substitute for the
//! ray-traced backend. `samples` is ignored here.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use log::warn;

use crate::error::RenderError;
use crate::fonts::FontChoice;
use crate::geometry::CylinderSpec;
use crate::placement::{AzimuthSide, TextPlacement};
use crate::render::{RenderSettings, Renderer};
use crate::scene::{Background, SceneLighting};

// Tank occupies this fraction of the frame height.
const FRAME_FILL: f64 = 0.72;

#[derive(Default)]
pub struct PreviewRenderer {
    cylinder: Option<CylinderSpec>,
    text: Option<TextPlacement>,
    scene: Option<SceneLighting>,
    // Asset cache, survives clear_scene.
    fonts: HashMap<PathBuf, FontArc>,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn font(&mut self, path: &Path) -> Option<FontArc> {
        if let Some(font) = self.fonts.get(path) {
            return Some(font.clone());
        }
        let font = fs::read(path).ok().and_then(|bytes| FontArc::try_from_vec(bytes).ok())?;
        self.fonts.insert(path.to_path_buf(), font.clone());
        Some(font)
    }
}

impl Renderer for PreviewRenderer {
    fn clear_scene(&mut self) -> Result<(), RenderError> {
        self.cylinder = None;
        self.text = None;
        self.scene = None;
        Ok(())
    }

    fn stage_cylinder(&mut self, cylinder: &CylinderSpec) -> Result<(), RenderError> {
        self.cylinder = Some(cylinder.clone());
        Ok(())
    }

    fn deboss_text(&mut self, placement: &TextPlacement) -> Result<(), RenderError> {
        if self.cylinder.is_none() {
            return Err(RenderError::Failed("deboss_text before stage_cylinder".into()));
        }
        self.text = Some(placement.clone());
        Ok(())
    }

    fn stage_scene(&mut self, scene: &SceneLighting) -> Result<(), RenderError> {
        self.scene = Some(scene.clone());
        Ok(())
    }

    fn render(&mut self, path: &Path, settings: &RenderSettings) -> Result<(), RenderError> {
        let cylinder =
            self.cylinder.clone().ok_or_else(|| RenderError::Failed("no cylinder staged".into()))?;
        let scene =
            self.scene.clone().ok_or_else(|| RenderError::Failed("no scene staged".into()))?;

        let (w, h) = (settings.width, settings.height);
        let mut img = RgbaImage::new(w, h);
        paint_background(&mut img, &scene.background);

        let frame = Frame::fit(&cylinder, w, h);
        paint_tank(&mut img, &cylinder, &scene, &frame);

        if let Some(text) = self.text.clone() {
            if text.side == AzimuthSide::Front {
                self.paint_deboss(&mut img, &cylinder, &text, &frame);
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        img.save(path)?;
        Ok(())
    }
}

/// Pixel-space layout of the tank silhouette.
struct Frame {
    px_per_unit: f64,
    center_x: f64,
    body_top: f64,
    body_bottom: f64,
}

impl Frame {
    fn fit(cylinder: &CylinderSpec, w: u32, h: u32) -> Self {
        let total = cylinder.height + cylinder.top_cap.height + cylinder.bottom_cap.height;
        let px_per_unit = FRAME_FILL * h as f64 / total;
        let top = (h as f64 - total * px_per_unit) / 2.0;
        let body_top = top + cylinder.top_cap.height * px_per_unit;
        Self {
            px_per_unit,
            center_x: w as f64 / 2.0,
            body_top,
            body_bottom: body_top + cylinder.height * px_per_unit,
        }
    }
}

fn luma(g: f64, strength: f64) -> u8 {
    ((g * (0.5 + strength)).clamp(0.0, 1.0) * 255.0) as u8
}

fn paint_background(img: &mut RgbaImage, background: &Background) {
    let h = img.height().max(1);
    for y in 0..img.height() {
        let v = match background {
            Background::Flat { gray, strength } => luma(*gray, *strength),
            Background::VerticalGradient { top, bottom, strength } => {
                let t = y as f64 / (h - 1).max(1) as f64;
                luma(top + (bottom - top) * t, *strength)
            }
        };
        for x in 0..img.width() {
            img.put_pixel(x, y, Rgba([v, v, v, 255]));
        }
    }
}

// Value noise for the wear layers; cheap and deterministic per pixel.
fn wear_noise(x: f64, y: f64, scale: f64) -> f64 {
    let v = ((x / scale * 12.9898 + y / scale * 78.233).sin() * 43758.5453).abs();
    v - v.floor()
}

fn paint_tank(img: &mut RgbaImage, cylinder: &CylinderSpec, scene: &SceneLighting, frame: &Frame) {
    let key = scene.light("key");
    let gain = key.map_or(1.0, |k| 0.55 + 0.45 * (k.intensity / 800.0).min(1.0));
    // Where the key highlight lands across the barrel, relative to the camera.
    let highlight = key.map_or(0.0, |k| {
        let key_az = k.position[1].atan2(k.position[0]);
        ((key_az - scene.camera.azimuth).sin() * 0.6).clamp(-0.8, 0.8)
    });

    let spans = [
        (frame.body_top - cylinder.top_cap.height * frame.px_per_unit, frame.body_top,
         cylinder.top_cap.radius, 0.75),
        (frame.body_top, frame.body_bottom, cylinder.radius, 1.0),
        (frame.body_bottom, frame.body_bottom + cylinder.bottom_cap.height * frame.px_per_unit,
         cylinder.bottom_cap.radius, 0.75),
    ];

    let mat = &cylinder.material;
    for (y0, y1, radius, tint) in spans {
        let r_px = radius * frame.px_per_unit;
        let y0 = y0.max(0.0) as u32;
        let y1 = (y1.min(img.height() as f64)) as u32;
        let x0 = (frame.center_x - r_px).max(0.0) as u32;
        let x1 = ((frame.center_x + r_px) as u32).min(img.width());
        for y in y0..y1 {
            for x in x0..x1 {
                let u = (x as f64 - frame.center_x) / r_px;
                let lambert = (1.0 - u * u).max(0.0).sqrt();
                let spot = 1.0 + 0.25 * (1.0 - (u - highlight).abs()).max(0.0) * (1.0 - mat.roughness);
                let mut shade = (0.25 + 0.75 * lambert) * gain * spot * tint;
                for layer in &mat.wear {
                    let n = wear_noise(x as f64, y as f64, layer.noise_scale);
                    shade *= 1.0 + (n - 0.5) * 2.0 * layer.amplitude;
                }
                let shade = shade.clamp(0.0, 1.3);
                let px = [
                    (mat.base_color[0] * shade * 255.0).min(255.0) as u8,
                    (mat.base_color[1] * shade * 255.0).min(255.0) as u8,
                    (mat.base_color[2] * shade * 255.0).min(255.0) as u8,
                    255,
                ];
                img.put_pixel(x, y, Rgba(px));
            }
        }
    }
}

impl PreviewRenderer {
    fn paint_deboss(
        &mut self,
        img: &mut RgbaImage,
        cylinder: &CylinderSpec,
        text: &TextPlacement,
        frame: &Frame,
    ) {
        let size_px = (text.size * frame.px_per_unit).max(4.0);
        let y_center = frame.body_bottom - text.height * frame.px_per_unit;
        // Deeper cuts read darker.
        let shade = (1.0 - text.depth * 120.0).clamp(0.3, 0.9);
        let mat = &cylinder.material;
        let color = Rgba([
            (mat.base_color[0] * shade * 0.5 * 255.0) as u8,
            (mat.base_color[1] * shade * 0.5 * 255.0) as u8,
            (mat.base_color[2] * shade * 0.5 * 255.0) as u8,
            255,
        ]);

        let font = match &text.font {
            FontChoice::File(path) => {
                let loaded = self.font(path);
                if loaded.is_none() {
                    warn!("preview: failed to load font {}, using glyph blocks", path.display());
                }
                loaded
            }
            FontChoice::Builtin => None,
        };

        match font {
            Some(font) => {
                let scale = PxScale::from(size_px as f32);
                let (tw, th) = text_size(scale, &font, &text.text);
                let x = (frame.center_x - tw as f64 / 2.0) as i32;
                let y = (y_center - th as f64 / 2.0) as i32;
                draw_text_mut(img, color, x, y, scale, &font, &text.text);
            }
            None => {
                // No real face available: one filled block per glyph.
                let glyph_w = size_px * 0.55;
                let gap = size_px * 0.25;
                let n = text.text.chars().count() as f64;
                let total = n * glyph_w + (n - 1.0).max(0.0) * gap;
                let mut x = frame.center_x - total / 2.0;
                let y = (y_center - size_px * 0.4) as i32;
                for _ in text.text.chars() {
                    draw_filled_rect_mut(
                        img,
                        Rect::at(x as i32, y).of_size(glyph_w.max(1.0) as u32, (size_px * 0.8) as u32),
                        color,
                    );
                    x += glyph_w + gap;
                }
            }
        }
    }
}
