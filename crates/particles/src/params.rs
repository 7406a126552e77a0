//! Tunable constants of the particle field.
//!
//! Every knob is an `f64` with a default, an accepted range and a one-line
//! description. The `tunables!` table below generates the struct, its
//! `Default`, JSON extraction (clamped into range), JSON export and the
//! parameter schema from a single list so the four never drift apart.

use hero_field_core::params::param_f64_in;
use serde_json::{json, Map, Value};

macro_rules! tunables {
    ($( $(#[$doc:meta])* $field:ident = $default:expr, [$min:expr, $max:expr], $desc:literal; )*) => {
        /// Simulation and styling parameters for a [`ParticleField`](crate::ParticleField).
        ///
        /// Defaults reproduce the hero section's richest particle behavior.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct ParticleParams {
            $( $(#[$doc])* pub $field: f64, )*
        }

        impl Default for ParticleParams {
            fn default() -> Self {
                Self { $( $field: $default, )* }
            }
        }

        impl ParticleParams {
            /// Reads every parameter from `params`, falling back to defaults
            /// and clamping into the accepted range.
            pub fn from_json(params: &Value) -> Self {
                Self {
                    $( $field: param_f64_in(params, stringify!($field), $default, $min, $max), )*
                }
            }

            /// Current values as a flat JSON object.
            pub fn to_json(&self) -> Value {
                let mut map = Map::new();
                $( map.insert(stringify!($field).to_string(), json!(self.$field)); )*
                Value::Object(map)
            }

            /// Type, default, range and description of every parameter.
            pub fn schema() -> Value {
                let mut map = Map::new();
                $(
                    map.insert(
                        stringify!($field).to_string(),
                        json!({
                            "type": "number",
                            "default": $default,
                            "min": $min,
                            "max": $max,
                            "description": $desc,
                        }),
                    );
                )*
                Value::Object(map)
            }
        }
    };
}

tunables! {
    /// Half-width of the initial per-axis velocity range.
    initial_speed = 0.2, [0.0, 10.0], "Initial velocity range (±) per axis";
    size_min = 0.5, [0.0, 50.0], "Smallest spawn radius in pixels";
    size_max = 2.5, [0.0, 50.0], "Largest spawn radius in pixels";
    opacity_min = 0.2, [0.0, 1.0], "Lowest spawn opacity";
    opacity_max = 0.8, [0.0, 1.0], "Highest spawn opacity";
    /// Spawn hues are drawn from `[0, hue_spread)` degrees.
    hue_spread = 60.0, [0.0, 360.0], "Range of spawn hues in degrees";

    hover_radius = 250.0, [0.0, 4000.0], "Interaction radius while hovering the title";
    idle_radius = 150.0, [0.0, 4000.0], "Interaction radius while idle";
    /// Hovering: closer than this the pointer repels strongly.
    repel_band = 60.0, [0.0, 4000.0], "Hover distance below which particles are repelled";
    /// Hovering: between `repel_band` and this, particles orbit.
    orbit_band = 120.0, [0.0, 4000.0], "Hover distance below which particles orbit";
    repel_strength = 3.0, [0.0, 100.0], "Hover repulsion impulse at full force";
    orbit_strength = 1.5, [0.0, 100.0], "Hover orbital impulse at full force";
    attract_strength = 1.2, [0.0, 100.0], "Hover attraction impulse at full force";
    idle_repel_strength = 1.2, [0.0, 100.0], "Idle repulsion impulse at full force";

    hover_size_gain = 2.0, [0.0, 50.0], "Size growth per unit force while hovering";
    hover_opacity_gain = 3.0, [0.0, 50.0], "Opacity growth per unit force while hovering";
    idle_size_gain = 0.8, [0.0, 50.0], "Size growth per unit force while idle";
    idle_opacity_gain = 1.5, [0.0, 50.0], "Opacity growth per unit force while idle";
    hover_hue_base = 60.0, [0.0, 360.0], "Hue of a hovered particle at the radius edge";
    hover_hue_gain = 140.0, [0.0, 360.0], "Hue shift per unit force while hovering";
    idle_hue_gain = 40.0, [0.0, 360.0], "Hue shift per unit force while idle";

    /// Exponential smoothing rate for size and opacity outside the radius.
    relax_rate = 0.1, [0.0, 1.0], "Per-frame relaxation of size and opacity";
    hue_relax_rate = 0.05, [0.0, 1.0], "Per-frame relaxation of hue toward 0";
    magnetic_decay = 0.95, [0.0, 1.0], "Per-frame decay of the magnetic force";
    attracted_damping = 0.88, [0.0, 1.0], "Velocity damping while attracted";
    free_damping = 0.94, [0.0, 1.0], "Velocity damping otherwise";
    /// Half-width of the per-frame random velocity nudge.
    jitter = 0.025, [0.0, 5.0], "Random velocity jitter (±) per axis per frame";
    wrap_margin = 10.0, [0.0, 1000.0], "Distance past an edge before wrapping";
    hover_max_speed = 12.0, [0.0, 1000.0], "Per-axis speed cap while hovering";
    idle_max_speed = 6.0, [0.0, 1000.0], "Per-axis speed cap while idle";

    connection_distance = 120.0, [0.0, 4000.0], "Maximum length of a connecting line";
    connection_opacity = 0.3, [0.0, 1.0], "Opacity of a zero-length connecting line";
    line_width = 0.5, [0.0, 10.0], "Connecting line width in pixels";
    /// Alpha of the black wash painted each frame; lower leaves longer trails.
    trail_alpha = 0.05, [0.0, 1.0], "Per-frame fade toward black";
    pulse_rate = 0.02, [0.0, 10.0], "Pulse phase advance per frame in radians";
    pulse_amplitude = 0.2, [0.0, 0.9], "Relative radius swing of the pulse";
}

impl ParticleParams {
    /// Interaction radius for the given hover state.
    pub fn radius(&self, hovering: bool) -> f64 {
        if hovering {
            self.hover_radius
        } else {
            self.idle_radius
        }
    }

    /// Per-axis velocity cap for the given hover state.
    pub fn max_speed(&self, hovering: bool) -> f64 {
        if hovering {
            self.hover_max_speed
        } else {
            self.idle_max_speed
        }
    }
}
