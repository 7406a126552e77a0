#![deny(unsafe_code)]
//! Interactive particle field.
//!
//! A fixed population of glowing particles drifts over the surface and reacts
//! to the pointer. While the pointer hovers the hero title, particles close to
//! it are repelled, a middle ring orbits it and the outer ring is pulled in;
//! otherwise the pointer gently pushes particles away. Particles near the
//! pointer grow, brighten and shift hue, then relax back once released.
//!
//! Each step paints a translucent black wash (leaving trails), connecting
//! lines between nearby particles and a radial-gradient disc per particle.

mod params;
mod particle;

use hero_field_core::error::FieldError;
use hero_field_core::params::param_usize;
use hero_field_core::{Engine, Hsla, PointerState, Rgba, Surface, Xorshift64};
use serde_json::{json, Value};

pub use params::ParticleParams;
pub use particle::Particle;

/// Particle count used when none is given.
pub const DEFAULT_COUNT: usize = 300;

const SATURATION: f64 = 0.7;
const LINE_LIGHTNESS: f64 = 0.8;
const CORE_LIGHTNESS: f64 = 0.9;
const RIM_LIGHTNESS: f64 = 0.6;
/// Rim alpha relative to the particle's opacity.
const RIM_ALPHA: f64 = 0.3;

/// The particle engine. Owns its particles, pointer snapshot and raster.
pub struct ParticleField {
    particles: Vec<Particle>,
    width: usize,
    height: usize,
    pointer: PointerState,
    config: ParticleParams,
    rng: Xorshift64,
    surface: Surface,
}

impl ParticleField {
    /// Spawns `count` particles inside a `width` x `height` surface.
    ///
    /// Zero-sized surfaces are accepted (all particles spawn at the origin
    /// and nothing is drawn). Returns `InvalidParticleCount` for `count == 0`.
    pub fn new(
        width: usize,
        height: usize,
        count: usize,
        seed: u64,
        config: ParticleParams,
    ) -> Result<Self, FieldError> {
        if count == 0 {
            return Err(FieldError::InvalidParticleCount);
        }
        let surface = Surface::new(width, height)?;
        let mut rng = Xorshift64::new(seed);
        let particles = (0..count)
            .map(|_| Particle::spawn(width, height, &config, &mut rng))
            .collect();
        log::debug!("particle field {width}x{height}: {count} particles, seed {seed}");
        Ok(Self {
            particles,
            width,
            height,
            pointer: PointerState::centered(width, height),
            config,
            rng,
            surface,
        })
    }

    /// Builds a field from a JSON params object. `count` selects the
    /// population size; every other key is a [`ParticleParams`] field.
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FieldError> {
        let count = param_usize(params, "count", DEFAULT_COUNT);
        Self::new(width, height, count, seed, ParticleParams::from_json(params))
    }

    /// Particles in spawn order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for hosts that place particles themselves.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Returns the tunables in effect.
    pub fn config(&self) -> &ParticleParams {
        &self.config
    }

    /// Returns the pointer read by the next step.
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Returns the field width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the field height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Re-randomizes every particle in place and clears the raster.
    ///
    /// The generator keeps running, so a reset field differs from a fresh
    /// one built with the same seed.
    pub fn reset(&mut self) {
        let (w, h) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.reset(w, h, &self.config, &mut self.rng);
        }
        self.surface.fill(Rgba::TRANSPARENT);
        log::debug!("particle field reset: {} particles", self.particles.len());
    }

    fn update_particles(&mut self) {
        let (w, h) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.update(self.pointer, w, h, &self.config, &mut self.rng);
        }
    }

    fn draw(&mut self) {
        if self.surface.is_empty() {
            return;
        }
        let config = &self.config;
        self.surface
            .fill_over(Rgba::new(0.0, 0.0, 0.0, config.trail_alpha));
        draw_connections(&mut self.surface, &self.particles, config);
        for p in &self.particles {
            let core = Hsla::new(p.hue(), SATURATION, CORE_LIGHTNESS, p.opacity()).to_rgba();
            let rim = Hsla::new(p.hue(), SATURATION, RIM_LIGHTNESS, RIM_ALPHA * p.opacity()).to_rgba();
            self.surface.fill_circle_gradient(
                p.position(),
                p.rendered_radius(config),
                core,
                rim,
                p.opacity(),
            );
        }
    }
}

impl Engine for ParticleField {
    fn set_pointer(&mut self, pointer: PointerState) {
        self.pointer = pointer;
    }

    fn step(&mut self) {
        self.update_particles();
        self.draw();
    }

    fn resize(&mut self, width: usize, height: usize) {
        if self.surface.resize(width, height).is_err() {
            log::warn!("ignoring resize to {width}x{height}: dimensions overflow");
            return;
        }
        self.width = width;
        self.height = height;
        log::debug!("particle field resized to {width}x{height}");
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn params(&self) -> Value {
        let mut values = self.config.to_json();
        values["count"] = json!(self.particles.len());
        values
    }

    fn param_schema(&self) -> Value {
        let mut schema = ParticleParams::schema();
        schema["count"] = json!({
            "type": "integer",
            "default": DEFAULT_COUNT,
            "min": 1,
            "description": "Number of particles, fixed for the field's lifetime"
        });
        schema
    }
}

/// Strokes a line between every pair closer than the connection distance,
/// fading with length. Quadratic in the particle count.
fn draw_connections(surface: &mut Surface, particles: &[Particle], config: &ParticleParams) {
    let max = config.connection_distance;
    if max <= 0.0 {
        return;
    }
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let distance = a.position().distance(b.position());
            if distance >= max {
                continue;
            }
            let alpha = (1.0 - distance / max) * config.connection_opacity;
            let hue = (a.hue() + b.hue()) / 2.0;
            let color = Hsla::new(hue, SATURATION, LINE_LIGHTNESS, alpha).to_rgba();
            surface.stroke_line(a.position(), b.position(), config.line_width, color);
        }
    }
}
