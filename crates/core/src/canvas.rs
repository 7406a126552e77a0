//! Layer stack that composites engine surfaces into one opaque frame.
//!
//! A [`Canvas`] holds output dimensions, a background color, and an ordered
//! stack of [`Layer`]s identified by unique names. Layers are composited
//! bottom-to-top (index 0 = bottom), each from the [`Surface`] supplied under
//! its name.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::FieldError;
use crate::surface::Surface;

/// How a layer's colors combine with what is already on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
    Multiply,
    Screen,
    Overlay,
}

impl BlendMode {
    /// Every mode, in the order `list` prints them.
    pub const ALL: [BlendMode; 5] = [
        BlendMode::Normal,
        BlendMode::Additive,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
    ];

    /// Returns the lowercase name used in JSON and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Additive => "additive",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
        }
    }

    /// Looks a mode up by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Blends one straight source channel `s` with alpha `a` onto an opaque
    /// backdrop channel `b`.
    fn apply(self, b: f64, s: f64, a: f64) -> f64 {
        let mixed = match self {
            BlendMode::Normal => s,
            BlendMode::Additive => return (b + s * a).min(1.0),
            BlendMode::Multiply => b * s,
            BlendMode::Screen => b + s - b * s,
            BlendMode::Overlay => {
                if b <= 0.5 {
                    2.0 * b * s
                } else {
                    1.0 - 2.0 * (1.0 - b) * (1.0 - s)
                }
            }
        };
        b * (1.0 - a) + mixed * a
    }
}

/// A single named layer in the canvas stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    name: String,
    blend_mode: BlendMode,
    opacity: f64,
}

impl Layer {
    /// Creates a fully opaque layer with `BlendMode::Normal`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blend_mode: BlendMode::Normal,
            opacity: 1.0,
        }
    }

    /// Returns the layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the blend mode.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Returns the opacity in [0, 1].
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Sets the blend mode.
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    /// Sets the opacity, clamped to [0, 1].
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

/// Output dimensions, background color and a bottom-to-top layer stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    background: Srgb,
    layers: Vec<Layer>,
}

impl Canvas {
    /// Returns `FieldError::InvalidDimensions` if either dimension is zero or
    /// their product overflows.
    pub fn new(width: usize, height: usize, background: Srgb) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        width
            .checked_mul(height)
            .ok_or(FieldError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            background,
            layers: Vec::new(),
        })
    }

    /// Returns the canvas width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the canvas height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the background color.
    pub fn background(&self) -> Srgb {
        self.background
    }

    /// All layers, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Pushes a layer on top. Names must be unique.
    pub fn add_layer(&mut self, layer: Layer) -> Result<(), FieldError> {
        if self.layers.iter().any(|l| l.name == layer.name) {
            return Err(FieldError::DuplicateLayerName(layer.name));
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Composites every layer over the background into a new opaque surface.
    ///
    /// `sources` maps layer names to the surfaces holding their pixels. Layers
    /// at zero opacity are skipped and need no source. Errors with
    /// `LayerNotFound` when any other layer has no source and `DimensionMismatch` when a source is not the
    /// canvas size.
    pub fn composite(&self, sources: &[(&str, &Surface)]) -> Result<Surface, FieldError> {
        let bg = self.background;
        let mut out = vec![[bg.r, bg.g, bg.b]; self.width * self.height];

        for layer in self.layers.iter().filter(|l| l.opacity > 0.0) {
            let surface = sources
                .iter()
                .find(|(name, _)| *name == layer.name)
                .map(|(_, s)| *s)
                .ok_or_else(|| FieldError::LayerNotFound(layer.name.clone()))?;
            if surface.width() != self.width || surface.height() != self.height {
                return Err(FieldError::DimensionMismatch {
                    lhs_w: self.width,
                    lhs_h: self.height,
                    rhs_w: surface.width(),
                    rhs_h: surface.height(),
                });
            }
            for (dst, src) in out.iter_mut().zip(surface.pixels()) {
                let a = src[3] as f64;
                if a <= 0.0 {
                    continue;
                }
                let alpha = a * layer.opacity;
                for c in 0..3 {
                    let straight = (src[c] as f64 / a).clamp(0.0, 1.0);
                    dst[c] = layer.blend_mode.apply(dst[c], straight, alpha);
                }
            }
        }

        let mut result = Surface::new(self.width, self.height)?;
        for (px, [r, g, b]) in result.pixels_mut().iter_mut().zip(out) {
            *px = [r as f32, g as f32, b as f32, 1.0];
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn canvas() -> Canvas {
        Canvas::new(4, 4, Srgb::BLACK).unwrap()
    }

    fn names(canvas: &Canvas) -> Vec<&str> {
        canvas.layers().iter().map(|l| l.name()).collect()
    }

    fn grey(v: f64, a: f64) -> Rgba {
        Rgba {
            r: v,
            g: v,
            b: v,
            a,
        }
    }

    // ── BlendMode ──────────────────────────────────────────────────

    #[test]
    fn blend_mode_default_is_normal() {
        assert_eq!(BlendMode::default(), BlendMode::Normal);
    }

    #[test]
    fn blend_mode_names_round_trip() {
        for mode in BlendMode::ALL {
            assert_eq!(BlendMode::from_name(mode.name()), Some(mode));
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.name()));
        }
        assert_eq!(BlendMode::from_name("dodge"), None);
    }

    #[test]
    fn blend_formulas_at_full_alpha() {
        assert!((BlendMode::Normal.apply(0.2, 0.6, 1.0) - 0.6).abs() < 1e-12);
        assert!((BlendMode::Additive.apply(0.7, 0.6, 1.0) - 1.0).abs() < 1e-12);
        assert!((BlendMode::Multiply.apply(0.5, 0.5, 1.0) - 0.25).abs() < 1e-12);
        assert!((BlendMode::Screen.apply(0.5, 0.5, 1.0) - 0.75).abs() < 1e-12);
        assert!((BlendMode::Overlay.apply(0.25, 0.5, 1.0) - 0.25).abs() < 1e-12);
        assert!((BlendMode::Overlay.apply(0.75, 0.5, 1.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn zero_alpha_leaves_backdrop() {
        for mode in BlendMode::ALL {
            assert!((mode.apply(0.4, 0.9, 0.0) - 0.4).abs() < 1e-12, "{mode:?}");
        }
    }

    // ── Layer ──────────────────────────────────────────────────────

    #[test]
    fn layer_defaults_and_builders() {
        let layer = Layer::new("dust")
            .with_blend_mode(BlendMode::Screen)
            .with_opacity(3.0);
        assert_eq!(layer.name(), "dust");
        assert_eq!(layer.blend_mode(), BlendMode::Screen);
        assert_eq!(layer.opacity(), 1.0);
        assert_eq!(Layer::new("x").opacity(), 1.0);
    }

    #[test]
    fn layer_serde_round_trip() {
        let layer = Layer::new("rays").with_opacity(0.8);
        let json = serde_json::to_string(&layer).unwrap();
        let back: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(layer, back);
    }

    // ── Canvas stack ───────────────────────────────────────────────

    #[test]
    fn canvas_rejects_zero_and_overflowing_dimensions() {
        assert!(matches!(
            Canvas::new(0, 4, Srgb::BLACK),
            Err(FieldError::InvalidDimensions)
        ));
        assert!(matches!(
            Canvas::new(usize::MAX, 2, Srgb::BLACK),
            Err(FieldError::InvalidDimensions)
        ));
    }

    #[test]
    fn duplicate_layer_names_are_rejected() {
        let mut c = canvas();
        c.add_layer(Layer::new("rays")).unwrap();
        c.add_layer(Layer::new("particles")).unwrap();
        assert!(matches!(
            c.add_layer(Layer::new("rays")),
            Err(FieldError::DuplicateLayerName(_))
        ));
        assert_eq!(names(&c), vec!["rays", "particles"]);
    }

    // ── Compositing ────────────────────────────────────────────────

    #[test]
    fn composite_without_layers_is_background() {
        let c = Canvas::new(2, 2, Srgb::from_hex("#336699").unwrap()).unwrap();
        let out = c.composite(&[]).unwrap();
        let px = out.get(1, 1).unwrap();
        assert!((px.b - 0.6).abs() < 1e-6);
        assert_eq!(px.a, 1.0);
    }

    #[test]
    fn composite_normal_over_black() {
        let mut c = canvas();
        c.add_layer(Layer::new("top")).unwrap();
        let top = Surface::filled(4, 4, grey(1.0, 0.5)).unwrap();
        let out = c.composite(&[("top", &top)]).unwrap();
        assert!((out.get(0, 0).unwrap().r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn composite_respects_order_and_opacity() {
        let mut c = canvas();
        c.add_layer(Layer::new("bottom")).unwrap();
        c.add_layer(Layer::new("top").with_opacity(0.5)).unwrap();
        let bottom = Surface::filled(4, 4, grey(1.0, 1.0)).unwrap();
        let top = Surface::filled(4, 4, grey(0.0, 1.0)).unwrap();
        let out = c.composite(&[("top", &top), ("bottom", &bottom)]).unwrap();
        assert!((out.get(2, 2).unwrap().g - 0.5).abs() < 1e-6);
    }

    #[test]
    fn composite_screen_brightens() {
        let mut c = Canvas::new(1, 1, Srgb::from_hex("#808080").unwrap()).unwrap();
        c.add_layer(Layer::new("p").with_blend_mode(BlendMode::Screen))
            .unwrap();
        let s = Surface::filled(1, 1, grey(0.5, 1.0)).unwrap();
        let out = c.composite(&[("p", &s)]).unwrap();
        assert!(out.get(0, 0).unwrap().r > 0.5);
    }

    #[test]
    fn composite_skips_transparent_layers_without_source() {
        let mut c = canvas();
        c.add_layer(Layer::new("ghost").with_opacity(0.0)).unwrap();
        assert!(c.composite(&[]).is_ok());
    }

    #[test]
    fn composite_errors_on_missing_source_and_size_mismatch() {
        let mut c = canvas();
        c.add_layer(Layer::new("rays")).unwrap();
        assert!(matches!(
            c.composite(&[]),
            Err(FieldError::LayerNotFound(_))
        ));
        let small = Surface::new(2, 2).unwrap();
        assert!(matches!(
            c.composite(&[("rays", &small)]),
            Err(FieldError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn canvas_serde_round_trip() {
        let mut c = Canvas::new(64, 32, Srgb::from_hex("#020210").unwrap()).unwrap();
        c.add_layer(Layer::new("rays").with_blend_mode(BlendMode::Additive))
            .unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let back: Canvas = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["background"], "#020210");
        assert_eq!(v["layers"][0]["blend_mode"], "additive");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn blend_mode() -> impl Strategy<Value = BlendMode> {
            prop::sample::select(BlendMode::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn blended_channels_stay_in_unit_interval(
                mode in blend_mode(),
                b in 0.0_f64..=1.0,
                s in 0.0_f64..=1.0,
                a in 0.0_f64..=1.0,
            ) {
                let v = mode.apply(b, s, a);
                prop_assert!((-1e-12..=1.0 + 1e-12).contains(&v), "{mode:?} gave {v}");
            }

            #[test]
            fn opacity_always_clamped(value in -10.0_f64..=10.0) {
                let layer = Layer::new("l").with_opacity(value);
                prop_assert!((0.0..=1.0).contains(&layer.opacity()));
            }
        }
    }
}
