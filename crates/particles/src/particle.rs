//! A single particle and its per-frame update rule.

use std::f64::consts::TAU;

use glam::DVec2;
use hero_field_core::{PointerState, Xorshift64};

use crate::params::ParticleParams;

/// Magnetic force left on a particle caught in the hover orbit band, per unit force.
const ORBIT_MAGNETISM: f64 = 0.5;
/// Magnetic force (negative: pushed away) while idle, per unit force.
const IDLE_MAGNETISM: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: DVec2,
    velocity: DVec2,
    size: f64,
    original_size: f64,
    opacity: f64,
    original_opacity: f64,
    hue: f64,
    /// Positive while attracted to the pointer, negative while pushed away.
    magnetic_force: f64,
    pulse_phase: f64,
}

impl Particle {
    /// Spawns a particle somewhere inside a `width` x `height` surface.
    pub fn spawn(width: usize, height: usize, config: &ParticleParams, rng: &mut Xorshift64) -> Self {
        let mut particle = Self {
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            size: 0.0,
            original_size: 0.0,
            opacity: 0.0,
            original_opacity: 0.0,
            hue: 0.0,
            magnetic_force: 0.0,
            pulse_phase: 0.0,
        };
        particle.reset(width, height, config, rng);
        particle.hue = rng.next_f64() * config.hue_spread;
        particle.pulse_phase = rng.next_f64() * TAU;
        particle
    }

    /// Re-randomizes position, velocity, size and opacity, and snapshots the
    /// new size and opacity as the relaxation targets. Hue, pulse phase and
    /// magnetic force are left as they are.
    pub fn reset(&mut self, width: usize, height: usize, config: &ParticleParams, rng: &mut Xorshift64) {
        self.position = DVec2::new(
            rng.next_f64() * width as f64,
            rng.next_f64() * height as f64,
        );
        self.velocity = DVec2::new(
            rng.next_signed(config.initial_speed),
            rng.next_signed(config.initial_speed),
        );
        self.size = rng.next_range(config.size_min, config.size_max);
        self.original_size = self.size;
        self.opacity = rng.next_range(config.opacity_min, config.opacity_max);
        self.original_opacity = self.opacity;
    }

    /// Returns the position in surface pixels.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Returns the velocity in pixels per frame.
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Returns the current (unpulsed) size.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Returns the size that `size` relaxes toward.
    pub fn original_size(&self) -> f64 {
        self.original_size
    }

    /// Returns the current opacity.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Returns the opacity that `opacity` relaxes toward.
    pub fn original_opacity(&self) -> f64 {
        self.original_opacity
    }

    /// Hue in degrees.
    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// Signed pointer pull: positive when attracted, negative when repelled.
    pub fn magnetic_force(&self) -> f64 {
        self.magnetic_force
    }

    /// Returns the pulse phase in [0, 2*pi).
    pub fn pulse_phase(&self) -> f64 {
        self.pulse_phase
    }

    /// Moves the particle without touching its velocity.
    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    /// Replaces the velocity.
    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }

    /// Radius actually painted: `size` swung by the breathing pulse.
    ///
    /// The pulse is applied here rather than to `size` so that a particle
    /// left alone settles exactly on its original size.
    pub fn rendered_radius(&self, config: &ParticleParams) -> f64 {
        self.size * (1.0 + config.pulse_amplitude * self.pulse_phase.sin())
    }

    /// Advances the particle by one frame.
    ///
    /// The surface size only matters for wrap-around; a zero-sized surface
    /// is fine.
    pub fn update(
        &mut self,
        pointer: PointerState,
        width: usize,
        height: usize,
        config: &ParticleParams,
        rng: &mut Xorshift64,
    ) {
        self.pulse_phase = (self.pulse_phase + config.pulse_rate) % TAU;

        let delta = pointer.position() - self.position;
        let distance = delta.length();
        let radius = config.radius(pointer.hovering);

        if distance > 0.0 && distance < radius {
            let force = (radius - distance) / radius;
            let dir = delta / distance;
            if pointer.hovering {
                self.react_hovering(dir, distance, force, config);
            } else {
                self.react_idle(dir, force, config);
            }
        } else {
            self.relax(config);
        }

        self.position += self.velocity;

        let damping = if self.magnetic_force > 0.0 {
            config.attracted_damping
        } else {
            config.free_damping
        };
        self.velocity *= damping;
        self.velocity += DVec2::new(rng.next_signed(config.jitter), rng.next_signed(config.jitter));

        self.wrap(width as f64, height as f64, config.wrap_margin);

        let max = config.max_speed(pointer.hovering);
        self.velocity = self.velocity.clamp(DVec2::splat(-max), DVec2::splat(max));
    }

    fn react_hovering(&mut self, dir: DVec2, distance: f64, force: f64, config: &ParticleParams) {
        if distance < config.repel_band {
            self.velocity -= dir * force * config.repel_strength;
            self.magnetic_force = -force;
        } else if distance < config.orbit_band {
            self.velocity += dir.perp() * force * config.orbit_strength;
            self.magnetic_force = force * ORBIT_MAGNETISM;
        } else {
            self.velocity += dir * force * config.attract_strength;
            self.magnetic_force = force;
        }
        self.size = self.original_size * (1.0 + force * config.hover_size_gain);
        self.opacity = (self.original_opacity * (1.0 + force * config.hover_opacity_gain)).min(1.0);
        self.hue = config.hover_hue_base + force * config.hover_hue_gain;
    }

    fn react_idle(&mut self, dir: DVec2, force: f64, config: &ParticleParams) {
        self.velocity -= dir * force * config.idle_repel_strength;
        self.magnetic_force = -force * IDLE_MAGNETISM;
        self.size = self.original_size * (1.0 + force * config.idle_size_gain);
        self.opacity = (self.original_opacity * (1.0 + force * config.idle_opacity_gain)).min(1.0);
        self.hue = force * config.idle_hue_gain;
    }

    fn relax(&mut self, config: &ParticleParams) {
        self.size += (self.original_size - self.size) * config.relax_rate;
        self.opacity += (self.original_opacity - self.opacity) * config.relax_rate;
        self.hue -= self.hue * config.hue_relax_rate;
        self.magnetic_force *= config.magnetic_decay;
    }

    /// Teleports to the opposite edge once `margin` pixels past one.
    fn wrap(&mut self, width: f64, height: f64, margin: f64) {
        if self.position.x < -margin {
            self.position.x = width + margin;
        }
        if self.position.x > width + margin {
            self.position.x = -margin;
        }
        if self.position.y < -margin {
            self.position.y = height + margin;
        }
        if self.position.y > height + margin {
            self.position.y = -margin;
        }
    }
}
