//! Sampling configuration for the whole pipeline.
//!
//! Every randomized attribute is a draw from a closed interval or a finite
//! set, and all the bounds live here in one table. Nothing downstream
//! validates ranges after the fact: values are in range by construction.

use rand::{Rng, rngs::SmallRng};

use crate::geometry::SizeClass;

/// Inclusive interval of `f64`. `new` orders its endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b { Self { lo: a, hi: b } } else { Self { lo: b, hi: a } }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn sample(&self, rng: &mut SmallRng) -> f64 {
        rng.random_range(self.lo..=self.hi)
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TankDims {
    pub height: f64,
    pub radius: f64,
}

/// Canonical (height, radius) per size class, in scene units.
#[derive(Clone, Copy, Debug)]
pub struct SizeTable {
    pub small: TankDims,
    pub medium: TankDims,
    pub large: TankDims,
    pub industrial: TankDims,
}

impl SizeTable {
    pub fn dims(&self, class: SizeClass) -> TankDims {
        match class {
            SizeClass::Small => self.small,
            SizeClass::Medium => self.medium,
            SizeClass::Large => self.large,
            SizeClass::Industrial => self.industrial,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MaterialConfig {
    /// Fixed teal-green tank paint, RGB in 0..1.
    pub base_color: [f64; 3],
    pub roughness: Interval,
    pub metallic: Interval,
    /// Chance that the surface gets procedural wear layers at all.
    pub wear_probability: f64,
    pub wear_layers_max: u32,
    pub wear_noise_scale: Interval,
    pub wear_amplitude: Interval,
}

#[derive(Clone, Debug)]
pub struct PlacementConfig {
    /// Fraction of cylinder height excluded at each end of the text band.
    pub band_margin: f64,
    /// Glyph height in scene units.
    pub text_size: Interval,
    /// How deep the stamp cuts into the surface, scene units.
    pub deboss_depth: Interval,
    /// Gap between glyph face and cylinder wall before subtraction.
    pub surface_clearance: f64,
}

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub distance: Interval,
    pub elevation_deg: Interval,
    pub azimuth_deg: Interval,
    pub focal_mm: Interval,
    /// Fixed look-at point; the camera is re-aimed here after positioning.
    pub target: [f64; 3],
}

#[derive(Clone, Debug)]
pub struct KeyLightConfig {
    pub intensity: Interval,
    pub elevation_deg: Interval,
    pub distance: f64,
    /// Warm/cool jitter factor applied to the G channel (B gets 0.8x of it).
    pub warmth: Interval,
}

#[derive(Clone, Debug)]
pub struct FillLightConfig {
    pub intensity: Interval,
    pub size: Interval,
    pub distance: Interval,
    pub elevation_deg: Interval,
    /// Offset from the key light's azimuth. Kept within [90, 270] so the
    /// fill always sits in the opposite half-circle.
    pub azimuth_offset_deg: Interval,
}

#[derive(Clone, Debug)]
pub struct RimLightConfig {
    pub intensity: Interval,
    pub elevation_deg: Interval,
    pub azimuth_deg: Interval,
    pub distance: Interval,
    pub cone_deg: f64,
    pub blend: f64,
}

#[derive(Clone, Debug)]
pub struct AmbientLightConfig {
    pub intensity: f64,
    pub size: f64,
    pub height: f64,
}

#[derive(Clone, Debug)]
pub struct LightRigConfig {
    pub key: KeyLightConfig,
    pub fill: FillLightConfig,
    pub rim: RimLightConfig,
    pub ambient: AmbientLightConfig,
}

#[derive(Clone, Debug)]
pub struct BackgroundConfig {
    /// Chance of a vertical gradient instead of a flat gray.
    pub gradient_probability: f64,
    pub flat_gray: Interval,
    pub gradient_top: f64,
    pub gradient_bottom: f64,
    pub strength: f64,
}

#[derive(Clone, Debug)]
pub struct GenConfig {
    pub sizes: SizeTable,
    pub material: MaterialConfig,
    pub placement: PlacementConfig,
    pub camera: CameraConfig,
    pub lights: LightRigConfig,
    pub background: BackgroundConfig,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            sizes: SizeTable {
                small: TankDims { height: 2.0, radius: 0.6 },
                medium: TankDims { height: 3.0, radius: 0.8 },
                large: TankDims { height: 4.0, radius: 1.0 },
                industrial: TankDims { height: 5.0, radius: 1.2 },
            },
            material: MaterialConfig {
                base_color: [0.10, 0.45, 0.40],
                roughness: Interval::new(0.2, 0.8),
                metallic: Interval::new(0.7, 1.0),
                wear_probability: 0.6,
                wear_layers_max: 2,
                wear_noise_scale: Interval::new(5.0, 25.0),
                wear_amplitude: Interval::new(0.02, 0.12),
            },
            placement: PlacementConfig {
                band_margin: 0.2,
                text_size: Interval::new(0.15, 0.25),
                deboss_depth: Interval::new(0.001, 0.005),
                surface_clearance: 0.01,
            },
            camera: CameraConfig {
                distance: Interval::new(3.0, 6.0),
                elevation_deg: Interval::new(-30.0, 30.0),
                azimuth_deg: Interval::new(0.0, 360.0),
                focal_mm: Interval::new(35.0, 85.0),
                target: [0.0, 0.0, 1.5],
            },
            lights: LightRigConfig {
                key: KeyLightConfig {
                    intensity: Interval::new(300.0, 800.0),
                    elevation_deg: Interval::new(30.0, 70.0),
                    distance: 8.0,
                    warmth: Interval::new(0.8, 1.2),
                },
                fill: FillLightConfig {
                    intensity: Interval::new(150.0, 400.0),
                    size: Interval::new(2.0, 4.0),
                    distance: Interval::new(4.0, 7.0),
                    elevation_deg: Interval::new(10.0, 40.0),
                    azimuth_offset_deg: Interval::new(90.0, 270.0),
                },
                rim: RimLightConfig {
                    intensity: Interval::new(200.0, 600.0),
                    elevation_deg: Interval::new(45.0, 80.0),
                    azimuth_deg: Interval::new(180.0, 360.0),
                    distance: Interval::new(3.0, 5.0),
                    cone_deg: 45.0,
                    blend: 0.3,
                },
                ambient: AmbientLightConfig {
                    intensity: 200.0,
                    size: 8.0,
                    height: 8.0,
                },
            },
            background: BackgroundConfig {
                gradient_probability: 0.5,
                flat_gray: Interval::new(0.1, 0.3),
                gradient_top: 0.8,
                gradient_bottom: 0.3,
                strength: 0.5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn interval_orders_endpoints() {
        let iv = Interval::new(5.0, 1.0);
        assert_eq!(iv.lo(), 1.0);
        assert_eq!(iv.hi(), 5.0);
    }

    #[test]
    fn interval_samples_stay_in_bounds() {
        let iv = Interval::new(0.001, 0.005);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(iv.contains(iv.sample(&mut rng)));
        }
    }

    #[test]
    fn degenerate_interval_yields_its_point() {
        let iv = Interval::new(0.3, 0.3);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(iv.sample(&mut rng), 0.3);
    }

    #[test]
    fn size_table_lookup() {
        let cfg = GenConfig::default();
        let d = cfg.sizes.dims(SizeClass::Industrial);
        assert_eq!(d.height, 5.0);
        assert_eq!(d.radius, 1.2);
    }
}
