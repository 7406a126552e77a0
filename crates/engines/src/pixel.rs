//! Byte conversion of a [`Surface`].
//!
//! Always available (no feature gate) so that both the `png` snapshot path
//! and the WASM `ImageData` path share the same conversion.

use hero_field_core::Surface;

/// Converts a premultiplied surface to straight-alpha RGBA8, row-major.
///
/// The buffer length is `width * height * 4`.
pub fn surface_to_rgba(surface: &Surface) -> Vec<u8> {
    surface
        .pixels()
        .iter()
        .flat_map(|&[r, g, b, a]| {
            if a <= 0.0 {
                return [0, 0, 0, 0];
            }
            [to_byte(r / a), to_byte(g / a), to_byte(b / a), to_byte(a)]
        })
        .collect()
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_field_core::Rgba;

    #[test]
    fn correct_length() {
        let surface = Surface::new(8, 4).unwrap();
        assert_eq!(surface_to_rgba(&surface).len(), 8 * 4 * 4);
    }

    #[test]
    fn empty_surface_gives_empty_buffer() {
        assert!(surface_to_rgba(&Surface::new(0, 5).unwrap()).is_empty());
    }

    #[test]
    fn transparent_pixels_are_zero() {
        let buf = surface_to_rgba(&Surface::new(2, 2).unwrap());
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn translucent_color_is_unpremultiplied() {
        let surface = Surface::filled(1, 1, Rgba::new(1.0, 0.5, 0.0, 0.5)).unwrap();
        assert_eq!(surface_to_rgba(&surface), vec![255, 128, 0, 128]);
    }

    #[test]
    fn opaque_white() {
        let surface = Surface::filled(3, 1, Rgba::new(1.0, 1.0, 1.0, 1.0)).unwrap();
        assert!(surface_to_rgba(&surface).iter().all(|&b| b == 255));
    }
}
