#![deny(unsafe_code)]
//! Volumetric light-ray background.
//!
//! A light source anchored just outside one edge of the surface throws two
//! interfering, slowly sweeping beams into the frame. The beams can lean
//! toward a smoothed copy of the pointer, are roughened with a hash grain and
//! tinted so the frame darkens toward the bottom. Each step evaluates every
//! pixel on the CPU and overwrites the surface.

mod origin;

use glam::DVec2;
use hero_field_core::error::FieldError;
use hero_field_core::params::{param_bool, param_f64_in, param_string};
use hero_field_core::{Engine, PointerState, Rgba, Srgb, Surface};
use serde_json::{json, Value};

pub use origin::RayOrigin;

const DEFAULT_COLOR: &str = "#ffffff";
const DEFAULT_SPEED: f64 = 1.5;
const DEFAULT_LIGHT_SPREAD: f64 = 0.8;
const DEFAULT_RAY_LENGTH: f64 = 1.2;
const DEFAULT_FOLLOW_MOUSE: bool = true;
const DEFAULT_MOUSE_INFLUENCE: f64 = 0.1;
const DEFAULT_NOISE_AMOUNT: f64 = 0.1;
const DEFAULT_DISTORTION: f64 = 0.05;
const DEFAULT_FADE_DISTANCE: f64 = 1.0;
const DEFAULT_SATURATION: f64 = 1.0;
const DEFAULT_PULSATING: bool = false;
const DEFAULT_FRAME_SECONDS: f64 = 1.0 / 60.0;

/// Weight of the previous smoothed pointer per step.
const MOUSE_SMOOTHING: f64 = 0.92;

/// Angular seeds and relative speed of one beam.
struct Beam {
    seed_a: f64,
    seed_b: f64,
    speed: f64,
    weight: f64,
}

const BEAMS: [Beam; 2] = [
    Beam {
        seed_a: 36.2214,
        seed_b: 21.11349,
        speed: 1.5,
        weight: 0.5,
    },
    Beam {
        seed_a: 22.3991,
        seed_b: 18.0234,
        speed: 1.1,
        weight: 0.4,
    },
];

/// Parameters of the light-ray background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRaysParams {
    pub origin: RayOrigin,
    /// Tint multiplied into every pixel.
    pub color: Srgb,
    /// Sweep speed of the beams.
    pub speed: f64,
    /// Angular width; larger spreads the light wider.
    pub light_spread: f64,
    /// Reach of the beams as a multiple of the surface width.
    pub ray_length: f64,
    pub follow_mouse: bool,
    /// How far the beam direction leans toward the pointer, in [0, 1].
    pub mouse_influence: f64,
    pub noise_amount: f64,
    pub distortion: f64,
    /// Distance (multiple of width) over which the beams fade to half strength.
    pub fade_distance: f64,
    pub saturation: f64,
    pub pulsating: bool,
    /// Simulated seconds per step.
    pub frame_seconds: f64,
}

impl Default for LightRaysParams {
    fn default() -> Self {
        Self {
            origin: RayOrigin::default(),
            color: Srgb::WHITE,
            speed: DEFAULT_SPEED,
            light_spread: DEFAULT_LIGHT_SPREAD,
            ray_length: DEFAULT_RAY_LENGTH,
            follow_mouse: DEFAULT_FOLLOW_MOUSE,
            mouse_influence: DEFAULT_MOUSE_INFLUENCE,
            noise_amount: DEFAULT_NOISE_AMOUNT,
            distortion: DEFAULT_DISTORTION,
            fade_distance: DEFAULT_FADE_DISTANCE,
            saturation: DEFAULT_SATURATION,
            pulsating: DEFAULT_PULSATING,
            frame_seconds: DEFAULT_FRAME_SECONDS,
        }
    }
}

impl LightRaysParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// An unrecognized `origin` falls back to top-center; an unparsable
    /// `color` is an error.
    pub fn from_json(params: &Value) -> Result<Self, FieldError> {
        let origin_name = param_string(params, "origin", RayOrigin::default().name());
        let origin = RayOrigin::from_name(&origin_name).unwrap_or_else(|| {
            log::warn!("unknown ray origin {origin_name:?}, using top-center");
            RayOrigin::default()
        });
        let color = Srgb::parse(&param_string(params, "color", DEFAULT_COLOR))?;
        Ok(Self {
            origin,
            color,
            speed: param_f64_in(params, "speed", DEFAULT_SPEED, 0.0, 20.0),
            light_spread: param_f64_in(params, "light_spread", DEFAULT_LIGHT_SPREAD, 0.0, 10.0),
            ray_length: param_f64_in(params, "ray_length", DEFAULT_RAY_LENGTH, 0.0, 10.0),
            follow_mouse: param_bool(params, "follow_mouse", DEFAULT_FOLLOW_MOUSE),
            mouse_influence: param_f64_in(params, "mouse_influence", DEFAULT_MOUSE_INFLUENCE, 0.0, 1.0),
            noise_amount: param_f64_in(params, "noise_amount", DEFAULT_NOISE_AMOUNT, 0.0, 1.0),
            distortion: param_f64_in(params, "distortion", DEFAULT_DISTORTION, 0.0, 1.0),
            fade_distance: param_f64_in(params, "fade_distance", DEFAULT_FADE_DISTANCE, 0.0, 10.0),
            saturation: param_f64_in(params, "saturation", DEFAULT_SATURATION, 0.0, 2.0),
            pulsating: param_bool(params, "pulsating", DEFAULT_PULSATING),
            frame_seconds: param_f64_in(params, "frame_seconds", DEFAULT_FRAME_SECONDS, 0.0, 1.0),
        })
    }
}

/// The light-ray engine.
pub struct LightRays {
    params: LightRaysParams,
    surface: Surface,
    pointer: PointerState,
    /// Pointer after exponential smoothing, in surface pixels.
    smoothed: DVec2,
    /// Seconds of simulated time.
    time: f64,
}

impl LightRays {
    /// Creates the engine. Zero-sized surfaces are accepted and stay blank.
    pub fn new(width: usize, height: usize, params: LightRaysParams) -> Result<Self, FieldError> {
        let surface = Surface::new(width, height)?;
        let pointer = PointerState::centered(width, height);
        log::debug!(
            "light rays {width}x{height} from {} (follow_mouse={})",
            params.origin,
            params.follow_mouse
        );
        Ok(Self {
            params,
            surface,
            pointer,
            smoothed: pointer.position(),
            time: 0.0,
        })
    }

    /// Builds the engine from a JSON params object.
    pub fn from_json(width: usize, height: usize, params: &Value) -> Result<Self, FieldError> {
        Self::new(width, height, LightRaysParams::from_json(params)?)
    }

    /// Returns the parameters in effect.
    pub fn config(&self) -> &LightRaysParams {
        &self.params
    }

    /// Returns the elapsed shader time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns the eased pointer the beam leans toward.
    pub fn smoothed_pointer(&self) -> DVec2 {
        self.smoothed
    }

    /// Beam direction for this frame, leaning toward the smoothed pointer.
    pub fn beam_direction(&self) -> DVec2 {
        let (w, h) = self.size();
        let (anchor, base) = self.params.origin.anchor(w, h);
        if !self.params.follow_mouse || self.params.mouse_influence <= 0.0 {
            return base;
        }
        let to_mouse = (self.smoothed - anchor).normalize_or_zero();
        base.lerp(to_mouse, self.params.mouse_influence)
            .try_normalize()
            .unwrap_or(base)
    }

    fn size(&self) -> (f64, f64) {
        (self.surface.width() as f64, self.surface.height() as f64)
    }

    fn render(&mut self) {
        if self.surface.is_empty() {
            return;
        }
        let (w, h) = self.size();
        let shader = FrameShader {
            params: &self.params,
            time: self.time,
            width: w,
            height: h,
            anchor: self.params.origin.anchor(w, h).0,
            dir: self.beam_direction(),
        };
        let (width, height) = (self.surface.width(), self.surface.height());
        for y in 0..height {
            for x in 0..width {
                let coord = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                self.surface.set(x, y, shader.shade(coord));
            }
        }
    }
}

/// Everything one frame's pixels share, borrowed while the surface is written.
struct FrameShader<'a> {
    params: &'a LightRaysParams,
    time: f64,
    width: f64,
    height: f64,
    anchor: DVec2,
    dir: DVec2,
}

impl FrameShader<'_> {
    /// Strength of one beam at `coord`, in [0, 1].
    fn beam_strength(&self, beam: &Beam, coord: DVec2) -> f64 {
        let p = self.params;
        let t = self.time;
        let width = self.width;
        let offset = coord - self.anchor;
        let distance = offset.length();
        let cos_angle = offset.normalize_or_zero().dot(self.dir);
        let angle = cos_angle + p.distortion * (t * 2.0 + distance * 0.01).sin() * 0.2;
        let spread = angle.max(0.0).powf(1.0 / p.light_spread.max(0.001));

        let reach = width * p.ray_length;
        let length_falloff = if reach > 0.0 {
            ((reach - distance) / reach).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let fade = width * p.fade_distance;
        let fade_falloff = if fade > 0.0 {
            ((fade - distance) / fade).clamp(0.5, 1.0)
        } else {
            0.5
        };

        let speed = p.speed * beam.speed;
        let pulse = if p.pulsating {
            0.8 + 0.2 * (t * speed * 3.0).sin()
        } else {
            1.0
        };
        let base = (0.45 + 0.15 * (angle * beam.seed_a + t * speed).sin()
            + 0.3
            + 0.2 * (-angle * beam.seed_b + t * speed).cos())
        .clamp(0.0, 1.0);

        base * length_falloff * fade_falloff * spread * pulse
    }

    /// Color of one pixel for the current frame.
    fn shade(&self, coord: DVec2) -> Rgba {
        let p = self.params;
        let strength: f64 = BEAMS
            .iter()
            .map(|beam| beam.weight * self.beam_strength(beam, coord))
            .sum();
        let mut rgb = [strength; 3];

        if p.noise_amount > 0.0 {
            let grain = hash(coord * 0.01 + DVec2::splat(self.time * 0.1));
            let k = 1.0 - p.noise_amount + p.noise_amount * grain;
            rgb.iter_mut().for_each(|c| *c *= k);
        }

        let brightness = 1.0 - coord.y / self.height;
        rgb[0] *= 0.1 + brightness * 0.8;
        rgb[1] *= 0.3 + brightness * 0.6;
        rgb[2] *= 0.5 + brightness * 0.5;

        if p.saturation != 1.0 {
            let gray = 0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2];
            rgb.iter_mut()
                .for_each(|c| *c = gray + (*c - gray) * p.saturation);
        }

        Rgba::new(
            (rgb[0] * p.color.r).clamp(0.0, 1.0),
            (rgb[1] * p.color.g).clamp(0.0, 1.0),
            (rgb[2] * p.color.b).clamp(0.0, 1.0),
            strength.clamp(0.0, 1.0),
        )
    }
}

impl Engine for LightRays {
    fn set_pointer(&mut self, pointer: PointerState) {
        self.pointer = pointer;
    }

    fn step(&mut self) {
        self.time += self.params.frame_seconds;
        if self.params.follow_mouse {
            self.smoothed =
                self.smoothed * MOUSE_SMOOTHING + self.pointer.position() * (1.0 - MOUSE_SMOOTHING);
        }
        self.render();
        log::trace!("light rays t={:.3}", self.time);
    }

    fn resize(&mut self, width: usize, height: usize) {
        if self.surface.resize(width, height).is_err() {
            log::warn!("ignoring resize to {width}x{height}: dimensions overflow");
            return;
        }
        log::debug!("light rays resized to {width}x{height}");
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "origin": p.origin.name(),
            "color": p.color.to_hex(),
            "speed": p.speed,
            "light_spread": p.light_spread,
            "ray_length": p.ray_length,
            "follow_mouse": p.follow_mouse,
            "mouse_influence": p.mouse_influence,
            "noise_amount": p.noise_amount,
            "distortion": p.distortion,
            "fade_distance": p.fade_distance,
            "saturation": p.saturation,
            "pulsating": p.pulsating,
            "frame_seconds": p.frame_seconds,
        })
    }

    fn param_schema(&self) -> Value {
        let origins: Vec<&str> = RayOrigin::ALL.iter().map(|o| o.name()).collect();
        json!({
            "origin": {
                "type": "string",
                "default": RayOrigin::default().name(),
                "enum": origins,
                "description": "Edge or corner the light enters from"
            },
            "color": {
                "type": "string",
                "default": DEFAULT_COLOR,
                "description": "Tint as #rrggbb"
            },
            "speed": {
                "type": "number",
                "default": DEFAULT_SPEED,
                "min": 0.0,
                "max": 20.0,
                "description": "Sweep speed of the beams"
            },
            "light_spread": {
                "type": "number",
                "default": DEFAULT_LIGHT_SPREAD,
                "min": 0.0,
                "max": 10.0,
                "description": "Angular width of the light"
            },
            "ray_length": {
                "type": "number",
                "default": DEFAULT_RAY_LENGTH,
                "min": 0.0,
                "max": 10.0,
                "description": "Beam reach as a multiple of the surface width"
            },
            "follow_mouse": {
                "type": "boolean",
                "default": DEFAULT_FOLLOW_MOUSE,
                "description": "Lean the beams toward the pointer"
            },
            "mouse_influence": {
                "type": "number",
                "default": DEFAULT_MOUSE_INFLUENCE,
                "min": 0.0,
                "max": 1.0,
                "description": "How far the beams lean toward the pointer"
            },
            "noise_amount": {
                "type": "number",
                "default": DEFAULT_NOISE_AMOUNT,
                "min": 0.0,
                "max": 1.0,
                "description": "Strength of the film grain"
            },
            "distortion": {
                "type": "number",
                "default": DEFAULT_DISTORTION,
                "min": 0.0,
                "max": 1.0,
                "description": "Wobble of the beam edges"
            },
            "fade_distance": {
                "type": "number",
                "default": DEFAULT_FADE_DISTANCE,
                "min": 0.0,
                "max": 10.0,
                "description": "Distance over which beams fade, as a multiple of width"
            },
            "saturation": {
                "type": "number",
                "default": DEFAULT_SATURATION,
                "min": 0.0,
                "max": 2.0,
                "description": "Color saturation, 1 leaves colors unchanged"
            },
            "pulsating": {
                "type": "boolean",
                "default": DEFAULT_PULSATING,
                "description": "Breathe the beam intensity"
            },
            "frame_seconds": {
                "type": "number",
                "default": DEFAULT_FRAME_SECONDS,
                "min": 0.0,
                "max": 1.0,
                "description": "Simulated seconds per step"
            }
        })
    }
}

/// Cheap sine hash in [0, 1].
fn hash(st: DVec2) -> f64 {
    (st.dot(DVec2::new(12.9898, 78.233)).sin() * 43758.5453).rem_euclid(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rays(width: usize, height: usize) -> LightRays {
        LightRays::new(width, height, LightRaysParams::default()).unwrap()
    }

    fn alpha_at(engine: &LightRays, x: usize, y: usize) -> f64 {
        engine.surface().get(x, y).unwrap().a
    }

    #[test]
    fn from_empty_json_is_default() {
        assert_eq!(LightRaysParams::from_json(&json!({})).unwrap(), LightRaysParams::default());
    }

    #[test]
    fn from_json_reads_values() {
        let p = LightRaysParams::from_json(&json!({
            "origin": "left",
            "color": "#ff8000",
            "speed": 3,
            "follow_mouse": false,
            "pulsating": true,
            "mouse_influence": 4.0,
        }))
        .unwrap();
        assert_eq!(p.origin, RayOrigin::Left);
        assert_eq!(p.color.to_hex(), "#ff8000");
        assert_eq!(p.speed, 3.0);
        assert!(!p.follow_mouse);
        assert!(p.pulsating);
        assert_eq!(p.mouse_influence, 1.0);
    }

    #[test]
    fn unknown_origin_falls_back_to_top_center() {
        let p = LightRaysParams::from_json(&json!({"origin": "nowhere"})).unwrap();
        assert_eq!(p.origin, RayOrigin::TopCenter);
    }

    #[test]
    fn bad_color_is_an_error() {
        let err = LightRaysParams::from_json(&json!({"color": "#zzz"})).unwrap_err();
        assert!(matches!(err, FieldError::InvalidColor(_)));
    }

    #[test]
    fn step_advances_time() {
        let mut r = rays(8, 8);
        r.step();
        r.step();
        assert!((r.time() - 2.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn zero_size_surface_steps_without_panicking() {
        let mut r = rays(0, 0);
        r.step();
        assert!(r.surface().is_empty());
    }

    #[test]
    fn pixels_are_finite_and_in_unit_range() {
        let mut r = rays(48, 32);
        for _ in 0..5 {
            r.step();
        }
        for px in r.surface().pixels() {
            for c in px {
                assert!(c.is_finite() && (0.0..=1.0).contains(c), "{px:?}");
            }
        }
    }

    #[test]
    fn each_pixel_is_shaded_at_its_own_coordinate() {
        let mut r = rays(13, 5);
        r.step();
        let (w, h) = r.size();
        let shader = FrameShader {
            params: &r.params,
            time: r.time,
            width: w,
            height: h,
            anchor: r.params.origin.anchor(w, h).0,
            dir: r.beam_direction(),
        };
        for (x, y) in [(0, 0), (12, 0), (3, 4), (12, 4)] {
            let expected = shader.shade(DVec2::new(x as f64 + 0.5, y as f64 + 0.5));
            assert!((alpha_at(&r, x, y) - expected.a).abs() < 1e-6, "({x}, {y})");
        }
    }

    #[test]
    fn light_is_brighter_below_the_source_than_off_to_the_side() {
        let params = LightRaysParams {
            light_spread: 0.3,
            noise_amount: 0.0,
            follow_mouse: false,
            ..LightRaysParams::default()
        };
        let mut r = LightRays::new(200, 100, params).unwrap();
        r.step();
        assert!(alpha_at(&r, 100, 10) > alpha_at(&r, 2, 99));
    }

    #[test]
    fn smoothed_pointer_eases_toward_target() {
        let mut r = rays(100, 100);
        r.set_pointer(PointerState::new(100.0, 50.0, false));
        r.step();
        let s = r.smoothed_pointer();
        assert!((s.x - (50.0 * 0.92 + 100.0 * 0.08)).abs() < 1e-9);
        for _ in 0..300 {
            r.step();
        }
        assert!((r.smoothed_pointer().x - 100.0).abs() < 1e-6);
    }

    #[test]
    fn pointer_ignored_when_not_following() {
        let params = LightRaysParams {
            follow_mouse: false,
            ..LightRaysParams::default()
        };
        let mut r = LightRays::new(100, 100, params).unwrap();
        r.set_pointer(PointerState::new(0.0, 0.0, false));
        r.step();
        assert_eq!(r.smoothed_pointer(), DVec2::new(50.0, 50.0));
        assert_eq!(r.beam_direction(), DVec2::Y);
    }

    #[test]
    fn beam_leans_toward_pointer() {
        let params = LightRaysParams {
            mouse_influence: 0.5,
            ..LightRaysParams::default()
        };
        let mut r = LightRays::new(100, 100, params).unwrap();
        r.set_pointer(PointerState::new(100.0, 50.0, false));
        for _ in 0..200 {
            r.step();
        }
        let dir = r.beam_direction();
        assert!(dir.x > 0.0, "{dir:?}");
        assert!((dir.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn saturation_zero_is_gray() {
        let params = LightRaysParams {
            saturation: 0.0,
            ..LightRaysParams::default()
        };
        let mut r = LightRays::new(32, 32, params).unwrap();
        r.step();
        let c = r.surface().get(16, 20).unwrap();
        assert!((c.r - c.g).abs() < 1e-4 && (c.g - c.b).abs() < 1e-4, "{c:?}");
    }

    #[test]
    fn black_tint_gives_black_rays() {
        let params = LightRaysParams {
            color: Srgb::BLACK,
            ..LightRaysParams::default()
        };
        let mut r = LightRays::new(16, 16, params).unwrap();
        r.step();
        let c = r.surface().get(8, 4).unwrap();
        assert_eq!((c.r, c.g, c.b), (0.0, 0.0, 0.0));
    }

    #[test]
    fn resize_changes_surface() {
        let mut r = rays(10, 10);
        r.resize(20, 5);
        r.step();
        assert_eq!((r.surface().width(), r.surface().height()), (20, 5));
    }

    #[test]
    fn params_round_trip_through_from_json() {
        let r = rays(4, 4);
        let back = LightRaysParams::from_json(&r.params()).unwrap();
        assert_eq!(&back, r.config());
    }

    #[test]
    fn schema_covers_every_param() {
        let r = rays(4, 4);
        let schema = r.param_schema();
        for key in r.params().as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "missing {key}");
        }
        assert_eq!(schema["origin"]["enum"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn hash_is_in_unit_interval() {
        for i in 0..1000 {
            let v = hash(DVec2::new(i as f64 * 0.37, i as f64 * 1.3));
            assert!((0.0..=1.0).contains(&v));
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(24))]

            #[test]
            fn output_stays_in_range(
                origin in 0usize..8,
                spread in 0.0f64..3.0,
                saturation in 0.0f64..2.0,
                pulsating in any::<bool>(),
                px in -200.0f64..200.0,
                py in -200.0f64..200.0,
            ) {
                let params = LightRaysParams {
                    origin: RayOrigin::ALL[origin],
                    light_spread: spread,
                    saturation,
                    pulsating,
                    ..LightRaysParams::default()
                };
                let mut r = LightRays::new(24, 16, params).unwrap();
                r.set_pointer(PointerState::new(px, py, false));
                r.step();
                for px in r.surface().pixels() {
                    for c in px {
                        prop_assert!(c.is_finite() && (0.0..=1.0).contains(c));
                    }
                }
            }
        }
    }
}
