//! Error types for the hero-field core.
//!
//! Stepping a field never fails; errors only come from construction,
//! configuration parsing, layer compositing and output.

use thiserror::Error;

/// Errors produced by field construction, compositing and output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Zero-sized output canvas, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero and their product must not overflow")]
    InvalidDimensions,

    /// A particle field was requested with zero particles.
    #[error("invalid particle count: a field needs at least one particle")]
    InvalidParticleCount,

    /// A scene listed no engines to render.
    #[error("scene has no engines")]
    NoEngines,

    /// A scene gave a layer an opacity that is not a finite number.
    #[error("invalid opacity for layer {0}")]
    InvalidOpacity(usize),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// No engine is registered under the requested name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// A layer with this name already exists in the canvas.
    #[error("duplicate layer name: {0}")]
    DuplicateLayerName(String),

    /// No layer (or no layer source) with this name exists.
    #[error("layer not found: {0}")]
    LayerNotFound(String),

    /// Two surfaces had incompatible dimensions for compositing.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// Writing output failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_mentions_width_and_height() {
        let msg = FieldError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_particle_count_is_readable() {
        let msg = FieldError::InvalidParticleCount.to_string();
        assert!(msg.contains("particle"), "got: {msg}");
    }

    #[test]
    fn no_engines_is_readable() {
        assert!(FieldError::NoEngines.to_string().contains("engines"));
    }

    #[test]
    fn unknown_engine_includes_name() {
        let msg = FieldError::UnknownEngine("starfield".into()).to_string();
        assert!(msg.contains("starfield"), "got: {msg}");
    }

    #[test]
    fn layer_errors_include_name() {
        let dup = FieldError::DuplicateLayerName("rays".into()).to_string();
        let missing = FieldError::LayerNotFound("dust".into()).to_string();
        assert!(dup.contains("rays"), "got: {dup}");
        assert!(missing.contains("dust"), "got: {missing}");
    }

    #[test]
    fn dimension_mismatch_includes_all_dimensions() {
        let err = FieldError::DimensionMismatch {
            lhs_w: 10,
            lhs_h: 20,
            rhs_w: 30,
            rhs_h: 40,
        };
        let msg = err.to_string();
        for n in ["10", "20", "30", "40"] {
            assert!(msg.contains(n), "missing {n} in: {msg}");
        }
    }

    #[test]
    fn invalid_color_and_io_include_message() {
        assert!(FieldError::InvalidColor("bad hex".into())
            .to_string()
            .contains("bad hex"));
        assert!(FieldError::Io("disk full".into())
            .to_string()
            .contains("disk full"));
    }

    #[test]
    fn field_error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<FieldError>();
    }
}
