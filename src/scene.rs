//! Camera and light rig randomization.
//!
//! One shot's scene is a camera pose in spherical coordinates around a fixed
//! look-at target, a four-light rig (key / fill / rim / ambient), and a
//! neutral background. The fill light is always placed in the half-circle
//! opposite the key light so every shot keeps directional contrast.

use std::f64::consts::TAU;

use rand::{Rng, rngs::SmallRng};

use crate::config::GenConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Directional,
    Area { size: f64 },
    Spot { cone_angle: f64, blend: f64 },
}

#[derive(Clone, Debug)]
pub struct LightDescriptor {
    pub name: &'static str,
    pub kind: LightKind,
    pub intensity: f64,
    pub color: [f64; 3],
    pub position: [f64; 3],
    /// Point the light is aimed at after positioning.
    pub target: [f64; 3],
}

#[derive(Clone, Debug)]
pub struct CameraPose {
    pub distance: f64,
    /// Radians.
    pub elevation: f64,
    /// Radians, wrapped to [0, TAU).
    pub azimuth: f64,
    pub focal_mm: f64,
    pub position: [f64; 3],
    pub target: [f64; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Background {
    Flat { gray: f64, strength: f64 },
    /// Two-stop vertical gradient, light at the top.
    VerticalGradient { top: f64, bottom: f64, strength: f64 },
}

#[derive(Clone, Debug)]
pub struct SceneLighting {
    pub camera: CameraPose,
    pub lights: Vec<LightDescriptor>,
    pub background: Background,
}

impl SceneLighting {
    pub fn light(&self, name: &str) -> Option<&LightDescriptor> {
        self.lights.iter().find(|l| l.name == name)
    }
}

fn spherical(distance: f64, elevation: f64, azimuth: f64, z_offset: f64) -> [f64; 3] {
    [
        distance * elevation.cos() * azimuth.cos(),
        distance * elevation.cos() * azimuth.sin(),
        distance * elevation.sin() + z_offset,
    ]
}

/// Smallest angular separation between two azimuths, in radians.
pub fn azimuth_separation(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

pub fn randomize_scene(rng: &mut SmallRng, cfg: &GenConfig) -> SceneLighting {
    let camera = randomize_camera(rng, cfg);
    let target = cfg.camera.target;

    // Key: directional sun, warm jitter.
    let k = &cfg.lights.key;
    let key_elevation = k.elevation_deg.sample(rng).to_radians();
    let key_azimuth = rng.random_range(0.0..TAU);
    let warmth = k.warmth.sample(rng);
    let key = LightDescriptor {
        name: "key",
        kind: LightKind::Directional,
        intensity: k.intensity.sample(rng),
        color: [1.0, warmth, warmth * 0.8],
        position: spherical(k.distance, key_elevation, key_azimuth, 0.0),
        target,
    };

    // Fill: soft area light, constrained to the opposite half-circle.
    let f = &cfg.lights.fill;
    let fill_azimuth =
        (key_azimuth + f.azimuth_offset_deg.sample(rng).to_radians()).rem_euclid(TAU);
    let fill = LightDescriptor {
        name: "fill",
        kind: LightKind::Area { size: f.size.sample(rng) },
        intensity: f.intensity.sample(rng),
        color: [0.9, 0.95, 1.0],
        position: spherical(
            f.distance.sample(rng),
            f.elevation_deg.sample(rng).to_radians(),
            fill_azimuth,
            0.0,
        ),
        target,
    };

    // Rim: focused spot from above and behind.
    let r = &cfg.lights.rim;
    let rim = LightDescriptor {
        name: "rim",
        kind: LightKind::Spot { cone_angle: r.cone_deg.to_radians(), blend: r.blend },
        intensity: r.intensity.sample(rng),
        color: [1.0, 0.95, 0.8],
        position: spherical(
            r.distance.sample(rng),
            r.elevation_deg.sample(rng).to_radians(),
            r.azimuth_deg.sample(rng).to_radians(),
            0.0,
        ),
        target: [target[0], target[1], target[2] + 0.5],
    };

    // Ambient: broad overhead area fill, fixed.
    let a = &cfg.lights.ambient;
    let ambient = LightDescriptor {
        name: "ambient",
        kind: LightKind::Area { size: a.size },
        intensity: a.intensity,
        color: [1.0, 1.0, 1.0],
        position: [0.0, 0.0, a.height],
        target: [0.0, 0.0, 0.0],
    };

    SceneLighting {
        camera,
        lights: vec![key, fill, rim, ambient],
        background: randomize_background(rng, cfg),
    }
}

fn randomize_camera(rng: &mut SmallRng, cfg: &GenConfig) -> CameraPose {
    let c = &cfg.camera;
    let distance = c.distance.sample(rng);
    let elevation = c.elevation_deg.sample(rng).to_radians();
    let azimuth = c.azimuth_deg.sample(rng).to_radians().rem_euclid(TAU);

    CameraPose {
        distance,
        elevation,
        azimuth,
        focal_mm: c.focal_mm.sample(rng),
        position: spherical(distance, elevation, azimuth, c.target[2]),
        target: c.target,
    }
}

fn randomize_background(rng: &mut SmallRng, cfg: &GenConfig) -> Background {
    let b = &cfg.background;
    if rng.random_bool(b.gradient_probability) {
        Background::VerticalGradient {
            top: b.gradient_top,
            bottom: b.gradient_bottom,
            strength: b.strength,
        }
    } else {
        Background::Flat { gray: b.flat_gray.sample(rng), strength: b.strength }
    }
}
