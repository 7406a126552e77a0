//! PNG output of a [`Surface`].
//!
//! Feature-gated behind `png` (default on) so that WASM builds can depend on
//! the `engines` crate without pulling in the `image` crate. The byte
//! conversion itself lives in [`crate::pixel`].

use std::path::Path;

use hero_field_core::error::FieldError;
use hero_field_core::Surface;

use crate::pixel::surface_to_rgba;

/// Writes a surface as an RGBA PNG.
///
/// Returns `FieldError::InvalidDimensions` for an empty surface or one whose
/// dimensions overflow `u32`, and `FieldError::Io` on write failure.
pub fn write_png(surface: &Surface, path: &Path) -> Result<(), FieldError> {
    if surface.is_empty() {
        return Err(FieldError::InvalidDimensions);
    }
    let w = u32::try_from(surface.width()).map_err(|_| FieldError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| FieldError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface_to_rgba(surface))
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))?;
    log::debug!("wrote {w}x{h} png to {}", path.display());
    Ok(())
}
