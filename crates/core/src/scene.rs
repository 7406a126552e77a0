//! Reproducible description of an offline render.
//!
//! A [`Scene`] captures everything needed to recreate a frame: the
//! engine stack, dimensions, per-engine parameters, PRNG seed, frame count,
//! scripted pointer motion, how upper layers blend and how opaque each layer is. Two identical scenes
//! produce bit-identical output.

use serde::{Deserialize, Serialize};

use crate::canvas::BlendMode;
use crate::error::FieldError;
use crate::pointer::PointerPath;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    /// Engine names, bottom layer first.
    pub engines: Vec<String>,
    pub width: usize,
    pub height: usize,
    /// Parameter objects keyed by engine name.
    #[serde(default = "empty_object")]
    pub params: serde_json::Value,
    pub seed: u64,
    pub frames: usize,
    pub pointer: PointerPath,
    /// Blend mode for every layer above the bottom one.
    #[serde(default = "default_blend")]
    pub blend: BlendMode,
    /// Per-layer opacity, bottom first. Layers past the end are opaque.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opacity: Vec<f64>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn default_blend() -> BlendMode {
    BlendMode::Screen
}

impl Scene {
    /// A scene with no params, zero frames, the pointer idle at the center
    /// and upper layers screened over lower ones.
    pub fn new(engines: &[&str], width: usize, height: usize, seed: u64) -> Self {
        Self {
            engines: engines.iter().map(|e| e.to_string()).collect(),
            width,
            height,
            params: empty_object(),
            seed,
            frames: 0,
            pointer: PointerPath::centered(width, height, false),
            blend: default_blend(),
            opacity: Vec::new(),
        }
    }

    /// Parameter object for one engine, or an empty object.
    pub fn params_for(&self, engine: &str) -> serde_json::Value {
        self.params.get(engine).cloned().unwrap_or_else(empty_object)
    }

    /// Opacity of layer `index`; 1 when the scene does not list one.
    pub fn layer_opacity(&self, index: usize) -> f64 {
        self.opacity.get(index).copied().unwrap_or(1.0)
    }

    /// Rejects zero or overflowing dimensions, an empty engine stack and
    /// non-finite layer opacities.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.width == 0 || self.height == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(FieldError::InvalidDimensions)?;
        if self.engines.is_empty() {
            return Err(FieldError::NoEngines);
        }
        if let Some(i) = self.opacity.iter().position(|o| !o.is_finite()) {
            return Err(FieldError::InvalidOpacity(i));
        }
        Ok(())
    }
}
