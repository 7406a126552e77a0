use std::fmt;

use glam::DVec2;

/// Where the light source sits relative to the surface.
///
/// The source is anchored 20% of the surface size outside the named edge so
/// the beams enter the frame already spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RayOrigin {
    #[default]
    TopCenter,
    TopLeft,
    TopRight,
    Left,
    Right,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

const OUTSIDE: f64 = 0.2;

impl RayOrigin {
    pub const ALL: [RayOrigin; 8] = [
        RayOrigin::TopCenter,
        RayOrigin::TopLeft,
        RayOrigin::TopRight,
        RayOrigin::Left,
        RayOrigin::Right,
        RayOrigin::BottomLeft,
        RayOrigin::BottomCenter,
        RayOrigin::BottomRight,
    ];

    /// Returns the kebab-case name used in params.
    pub fn name(self) -> &'static str {
        match self {
            RayOrigin::TopCenter => "top-center",
            RayOrigin::TopLeft => "top-left",
            RayOrigin::TopRight => "top-right",
            RayOrigin::Left => "left",
            RayOrigin::Right => "right",
            RayOrigin::BottomLeft => "bottom-left",
            RayOrigin::BottomCenter => "bottom-center",
            RayOrigin::BottomRight => "bottom-right",
        }
    }

    /// Looks an origin up by its kebab-case name.
    pub fn from_name(name: &str) -> Option<RayOrigin> {
        Self::ALL.into_iter().find(|o| o.name() == name)
    }

    /// Anchor point (surface pixels, y down) and unit beam direction.
    pub fn anchor(self, width: f64, height: f64) -> (DVec2, DVec2) {
        let above = -OUTSIDE * height;
        let below = (1.0 + OUTSIDE) * height;
        let down = DVec2::Y;
        let up = DVec2::NEG_Y;
        match self {
            RayOrigin::TopCenter => (DVec2::new(0.5 * width, above), down),
            RayOrigin::TopLeft => (DVec2::new(0.0, above), down),
            RayOrigin::TopRight => (DVec2::new(width, above), down),
            RayOrigin::Left => (DVec2::new(-OUTSIDE * width, 0.5 * height), DVec2::X),
            RayOrigin::Right => (DVec2::new((1.0 + OUTSIDE) * width, 0.5 * height), DVec2::NEG_X),
            RayOrigin::BottomLeft => (DVec2::new(0.0, below), up),
            RayOrigin::BottomCenter => (DVec2::new(0.5 * width, below), up),
            RayOrigin::BottomRight => (DVec2::new(width, below), up),
        }
    }
}

impl fmt::Display for RayOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for origin in RayOrigin::ALL {
            assert_eq!(RayOrigin::from_name(origin.name()), Some(origin));
        }
        assert_eq!(RayOrigin::from_name("center"), None);
    }

    #[test]
    fn anchors_sit_outside_the_surface() {
        let (w, h) = (200.0, 100.0);
        for origin in RayOrigin::ALL {
            let (anchor, dir) = origin.anchor(w, h);
            let inside = (0.0..=w).contains(&anchor.x) && (0.0..=h).contains(&anchor.y);
            let on_top_or_bottom = anchor.y < 0.0 || anchor.y > h;
            assert!(!inside || on_top_or_bottom, "{origin}: {anchor:?}");
            assert!((dir.length() - 1.0).abs() < 1e-12);
            // The beam points into the surface.
            let center = DVec2::new(w / 2.0, h / 2.0);
            assert!(dir.dot(center - anchor) > 0.0, "{origin}");
        }
    }

    #[test]
    fn top_center_is_above_the_middle() {
        let (anchor, dir) = RayOrigin::TopCenter.anchor(200.0, 100.0);
        assert_eq!(anchor, DVec2::new(100.0, -20.0));
        assert_eq!(dir, DVec2::Y);
    }
}
