//! The `Engine` trait implemented by every animated surface.
//!
//! The trait is object-safe so hosts can drive `Box<dyn Engine>` without
//! knowing which effect they hold.

use crate::pointer::PointerState;
use crate::surface::Surface;
use serde_json::Value;

/// A per-frame animated effect that paints into its own [`Surface`].
///
/// Hosts call [`set_pointer`](Engine::set_pointer) from input handlers and
/// [`step`](Engine::step) exactly once per display refresh. Stepping is
/// infallible: an engine tolerates any pointer value and a 0x0 surface.
pub trait Engine {
    /// Stores the pointer snapshot read by the next step.
    fn set_pointer(&mut self, pointer: PointerState);

    /// Advances the simulation one frame and repaints the surface.
    fn step(&mut self);

    /// Adopts new surface dimensions. Content is not preserved.
    fn resize(&mut self, width: usize, height: usize);

    /// The engine's current frame.
    fn surface(&self) -> &Surface;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema of all parameters: type, default, range and description.
    fn param_schema(&self) -> Value;
}
