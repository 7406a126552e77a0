//! Pointer input fed to engines between frames.
//!
//! [`PointerState`] is the per-frame snapshot an engine reads. Input handlers
//! on the same thread simply overwrite it; [`SharedPointer`] publishes it across
//! threads as one unit so a frame never observes `x` from one event and `y`
//! from the next. [`PointerPath`] scripts the pointer for offline renders.

use std::f64::consts::TAU;
use std::sync::{Arc, Mutex, PoisonError};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Last known pointer position in surface pixels plus the hover flag.
///
/// Coordinates are unconstrained; a pointer outside the surface is treated
/// like any other position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerState {
    pub x: f64,
    pub y: f64,
    /// True while the pointer is over the reactive element (the hero title).
    pub hovering: bool,
}

impl PointerState {
    /// Creates a pointer snapshot.
    pub fn new(x: f64, y: f64, hovering: bool) -> Self {
        Self { x, y, hovering }
    }

    /// The pointer parked at the center of a `width` x `height` surface, not hovering.
    pub fn centered(width: usize, height: usize) -> Self {
        Self::new(width as f64 / 2.0, height as f64 / 2.0, false)
    }

    /// Returns the position as a vector.
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// Thread-safe pointer cell. Writers replace the whole triple, readers copy it.
#[derive(Debug, Clone, Default)]
pub struct SharedPointer {
    inner: Arc<Mutex<PointerState>>,
}

impl SharedPointer {
    /// Creates a cell holding `initial`.
    pub fn new(initial: PointerState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Replaces the whole snapshot at once.
    pub fn publish(&self, state: PointerState) {
        // A poisoned lock still holds a complete Copy value.
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Moves the pointer, keeping the hover flag.
    pub fn move_to(&self, x: f64, y: f64) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.x = x;
        guard.y = y;
    }

    /// Sets the hover flag, keeping the position.
    pub fn set_hovering(&self, hovering: bool) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .hovering = hovering;
    }

    /// Copies out the current snapshot.
    pub fn snapshot(&self) -> PointerState {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scripted pointer motion for offline renders, evaluated per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerPath {
    /// The pointer rests at one spot.
    Fixed { x: f64, y: f64, hovering: bool },
    /// The pointer circles `(cx, cy)`, completing a lap every `period` frames.
    Orbit {
        cx: f64,
        cy: f64,
        radius: f64,
        period: f64,
        hovering: bool,
    },
}

impl PointerPath {
    /// A fixed pointer at the center of the surface.
    pub fn centered(width: usize, height: usize, hovering: bool) -> Self {
        let p = PointerState::centered(width, height);
        PointerPath::Fixed {
            x: p.x,
            y: p.y,
            hovering,
        }
    }

    /// Pointer state on frame `frame`.
    pub fn at(&self, frame: u64) -> PointerState {
        match *self {
            PointerPath::Fixed { x, y, hovering } => PointerState::new(x, y, hovering),
            PointerPath::Orbit {
                cx,
                cy,
                radius,
                period,
                hovering,
            } => {
                let angle = if period > 0.0 {
                    TAU * frame as f64 / period
                } else {
                    0.0
                };
                PointerState::new(
                    cx + radius * angle.cos(),
                    cy + radius * angle.sin(),
                    hovering,
                )
            }
        }
    }
}
