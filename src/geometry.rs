//! Parametric gas cylinder descriptions.
//!
//! Nothing here touches the renderer: a `CylinderSpec` is the declarative
//! shape + material the renderer instantiates as a mesh.

use rand::{Rng, rngs::SmallRng};
use serde::Serialize;

use crate::config::GenConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    Industrial,
}

impl SizeClass {
    pub const ALL: [SizeClass; 4] =
        [SizeClass::Small, SizeClass::Medium, SizeClass::Large, SizeClass::Industrial];

    pub fn name(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
            SizeClass::Industrial => "industrial",
        }
    }
}

/// One procedural noise field perturbing the surface normal.
#[derive(Clone, Copy, Debug)]
pub struct WearLayer {
    pub noise_scale: f64,
    pub amplitude: f64,
}

#[derive(Clone, Debug)]
pub struct MaterialSpec {
    pub base_color: [f64; 3],
    pub roughness: f64,
    pub metallic: f64,
    pub wear: Vec<WearLayer>,
}

/// Valve cap (top) or base ring (bottom) welded onto the body.
#[derive(Clone, Copy, Debug)]
pub struct CapSpec {
    pub radius: f64,
    pub height: f64,
}

#[derive(Clone, Debug)]
pub struct CylinderSpec {
    pub size_class: SizeClass,
    pub height: f64,
    pub radius: f64,
    pub top_cap: CapSpec,
    pub bottom_cap: CapSpec,
    pub material: MaterialSpec,
}

// Cap proportions relative to the body, from real tank silhouettes.
const TOP_CAP_RADIUS_RATIO: f64 = 0.9;
const TOP_CAP_HEIGHT: f64 = 0.1;
const BOTTOM_CAP_RADIUS_RATIO: f64 = 0.95;
const BOTTOM_CAP_HEIGHT: f64 = 0.05;

/// Builds one cylinder description. With `size_class` omitted the class is a
/// uniform draw; explicit overrides replace the table dimensions. There are
/// no failure modes: every sampled value is bounded by its interval.
pub fn build_cylinder(
    rng: &mut SmallRng,
    cfg: &GenConfig,
    size_class: Option<SizeClass>,
    height_override: Option<f64>,
    radius_override: Option<f64>,
) -> CylinderSpec {
    let class = size_class
        .unwrap_or_else(|| SizeClass::ALL[rng.random_range(0..SizeClass::ALL.len())]);
    let dims = cfg.sizes.dims(class);
    let height = height_override.unwrap_or(dims.height);
    let radius = radius_override.unwrap_or(dims.radius);

    CylinderSpec {
        size_class: class,
        height,
        radius,
        top_cap: CapSpec { radius: radius * TOP_CAP_RADIUS_RATIO, height: TOP_CAP_HEIGHT },
        bottom_cap: CapSpec {
            radius: radius * BOTTOM_CAP_RADIUS_RATIO,
            height: BOTTOM_CAP_HEIGHT,
        },
        material: build_material(rng, cfg),
    }
}

fn build_material(rng: &mut SmallRng, cfg: &GenConfig) -> MaterialSpec {
    let m = &cfg.material;
    let wear = if rng.random_bool(m.wear_probability) {
        let layers = rng.random_range(1..=m.wear_layers_max.max(1));
        (0..layers)
            .map(|_| WearLayer {
                noise_scale: m.wear_noise_scale.sample(rng),
                amplitude: m.wear_amplitude.sample(rng),
            })
            .collect()
    } else {
        Vec::new()
    };

    MaterialSpec {
        base_color: m.base_color,
        roughness: m.roughness.sample(rng),
        metallic: m.metallic.sample(rng),
        wear,
    }
}
