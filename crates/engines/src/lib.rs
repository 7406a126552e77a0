#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations, renders whole
//! scenes and converts surfaces to bytes and PNG files.
//!
//! This crate sits between `hero-field-core` (which defines the `Engine` trait)
//! and the individual engine crates (`hero-field-particles`,
//! `hero-field-light-rays`). Both the CLI and the WASM bindings depend on it
//! so dispatch lives in one place.

pub mod pixel;
pub mod scene;

#[cfg(feature = "png")]
pub mod snapshot;

use hero_field_core::error::FieldError;
use hero_field_core::{Engine, PointerState, Surface};
use hero_field_light_rays::LightRays;
use hero_field_particles::ParticleField;
use serde_json::Value;

pub use scene::render_scene;

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["particles", "light-rays"];

/// Every engine this build knows about.
///
/// Wraps each implementation and delegates the `Engine` trait.
/// Use [`EngineKind::from_name`] for string-based construction (CLI, WASM).
pub enum EngineKind {
    /// Pointer-reactive particle field.
    Particles(ParticleField),
    /// Light-ray background.
    LightRays(LightRays),
}

impl EngineKind {
    /// Constructs an engine by name.
    ///
    /// Returns `FieldError::UnknownEngine` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FieldError> {
        match name {
            "particles" => Ok(EngineKind::Particles(ParticleField::from_json(
                width, height, seed, params,
            )?)),
            "light-rays" => Ok(EngineKind::LightRays(LightRays::from_json(
                width, height, params,
            )?)),
            _ => Err(FieldError::UnknownEngine(name.to_string())),
        }
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    /// Returns the registry name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Particles(_) => "particles",
            EngineKind::LightRays(_) => "light-rays",
        }
    }

    fn inner(&self) -> &dyn Engine {
        match self {
            EngineKind::Particles(e) => e,
            EngineKind::LightRays(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Engine {
        match self {
            EngineKind::Particles(e) => e,
            EngineKind::LightRays(e) => e,
        }
    }
}

impl Engine for EngineKind {
    fn set_pointer(&mut self, pointer: PointerState) {
        self.inner_mut().set_pointer(pointer);
    }

    fn step(&mut self) {
        self.inner_mut().step();
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.inner_mut().resize(width, height);
    }

    fn surface(&self) -> &Surface {
        self.inner().surface()
    }

    fn params(&self) -> Value {
        self.inner().params()
    }

    fn param_schema(&self) -> Value {
        self.inner().param_schema()
    }
}
