//! Software RGBA raster that engines paint into.
//!
//! Pixels are stored premultiplied in `f32`, row-major, origin at the top-left.
//! All painting uses source-over compositing, matching a 2D canvas context.
//! A surface may be 0x0; every drawing call on it is a no-op.

use glam::DVec2;

use crate::color::Rgba;
use crate::error::FieldError;

/// A premultiplied RGBA raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 4]>,
}

impl Surface {
    /// Creates a fully transparent surface.
    ///
    /// Zero width or height is allowed. Returns `FieldError::InvalidDimensions`
    /// only if `width * height` overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, FieldError> {
        let len = width
            .checked_mul(height)
            .ok_or(FieldError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![[0.0; 4]; len],
        })
    }

    /// Creates a surface filled with `color`.
    pub fn filled(width: usize, height: usize, color: Rgba) -> Result<Self, FieldError> {
        let mut surface = Self::new(width, height)?;
        surface.fill(color);
        Ok(surface)
    }

    /// Returns the surface width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the surface height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true for a 0-area surface.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Raw premultiplied pixels.
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Mutable access to the premultiplied pixels.
    pub fn pixels_mut(&mut self) -> &mut [[f32; 4]] {
        &mut self.pixels
    }

    /// Reallocates to the new size. Contents are discarded (transparent),
    /// the same as resizing an HTML canvas.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), FieldError> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Reads a pixel as straight-alpha color, or `None` outside the surface.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b, a] = self.pixels[y * self.width + x];
        if a <= 0.0 {
            return Some(Rgba::TRANSPARENT);
        }
        Some(Rgba {
            r: (r / a) as f64,
            g: (g / a) as f64,
            b: (b / a) as f64,
            a: a as f64,
        })
    }

    /// Overwrites a pixel (no blending). Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = premultiply(color, 1.0);
        }
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        let p = premultiply(color, 1.0);
        self.pixels.fill(p);
    }

    /// Paints `color` over the entire surface with source-over.
    ///
    /// With a translucent black this is the "partial clear" that leaves
    /// motion trails behind moving particles.
    pub fn fill_over(&mut self, color: Rgba) {
        let src = premultiply(color, 1.0);
        for dst in &mut self.pixels {
            *dst = source_over(src, *dst);
        }
    }

    /// Blends `color` into one pixel with the given coverage in [0, 1].
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba, coverage: f64) {
        if x < 0 || y < 0 || coverage <= 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        let src = premultiply(color, coverage.min(1.0));
        self.pixels[idx] = source_over(src, self.pixels[idx]);
    }

    /// Fills a disc with a radial gradient from `inner` (center) to `outer`
    /// (rim), multiplied by `global_alpha`.
    ///
    /// Edges are anti-aliased over one pixel; sub-pixel discs fade out
    /// proportionally to their diameter.
    pub fn fill_circle_gradient(
        &mut self,
        center: DVec2,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
        global_alpha: f64,
    ) {
        if self.is_empty() || !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip_box(center - radius - 1.0, center + radius + 1.0)
        else {
            return;
        };
        let small = (2.0 * radius).min(1.0);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = pixel_center.distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0) * small;
                if coverage <= 0.0 {
                    continue;
                }
                let color = inner.lerp(outer, d / radius);
                self.blend_pixel(x, y, color, coverage * global_alpha);
            }
        }
    }

    /// Strokes a straight line using Wu-style two-pixel coverage.
    ///
    /// `width` below one pixel scales the coverage down instead of thinning
    /// the raster footprint.
    pub fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        if self.is_empty() || !from.is_finite() || !to.is_finite() || width <= 0.0 {
            return;
        }
        let weight = width.min(1.0);
        let delta = to - from;
        let steep = delta.y.abs() > delta.x.abs();
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = from + delta * (i as f64 / steps as f64);
            if steep {
                let x = p.x - 0.5;
                let x0 = x.floor();
                let frac = x - x0;
                let y = p.y.floor() as i64;
                self.blend_pixel(x0 as i64, y, color, (1.0 - frac) * weight);
                self.blend_pixel(x0 as i64 + 1, y, color, frac * weight);
            } else {
                let y = p.y - 0.5;
                let y0 = y.floor();
                let frac = y - y0;
                let x = p.x.floor() as i64;
                self.blend_pixel(x, y0 as i64, color, (1.0 - frac) * weight);
                self.blend_pixel(x, y0 as i64 + 1, color, frac * weight);
            }
        }
    }

    /// Intersects a float rectangle with the surface bounds.
    fn clip_box(&self, min: DVec2, max: DVec2) -> Option<(i64, i64, i64, i64)> {
        let x0 = min.x.floor().max(0.0) as i64;
        let y0 = min.y.floor().max(0.0) as i64;
        let x1 = max.x.ceil().min(self.width as f64 - 1.0) as i64;
        let y1 = max.y.ceil().min(self.height as f64 - 1.0) as i64;
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }
}

/// Converts a straight-alpha color to premultiplied `f32`, scaling alpha by `coverage`.
fn premultiply(c: Rgba, coverage: f64) -> [f32; 4] {
    let a = (c.a * coverage).clamp(0.0, 1.0);
    [
        (c.r.clamp(0.0, 1.0) * a) as f32,
        (c.g.clamp(0.0, 1.0) * a) as f32,
        (c.b.clamp(0.0, 1.0) * a) as f32,
        a as f32,
    ]
}

/// Porter-Duff source-over on premultiplied pixels.
fn source_over(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let k = 1.0 - src[3];
    [
        src[0] + dst[0] * k,
        src[1] + dst[1] * k,
        src[2] + dst[2] * k,
        src[3] + dst[3] * k,
    ]
}
