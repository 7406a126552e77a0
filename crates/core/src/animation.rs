//! Start/stop controller for the display-refresh loop.
//!
//! A [`FrameLoop`] owns an engine and, while running, the host's frame
//! subscription (a `requestAnimationFrame` handle in the browser, nothing at
//! all for offline renders). Stopping or dropping the loop cancels the
//! subscription, so no callback can outlive the surface it paints.

use log::{debug, trace};

use crate::engine::Engine;
use crate::pointer::PointerState;

/// A host-side registration that keeps frames coming until cancelled.
pub trait FrameSubscription {
    /// Stops further frame callbacks. Called at most once per subscription.
    fn cancel(&mut self);
}

/// Subscription for hosts that pump frames themselves (CLI renders, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualFrames;

impl FrameSubscription for ManualFrames {
    fn cancel(&mut self) {}
}

/// Owns an engine and its frame subscription.
pub struct FrameLoop<E: Engine, S: FrameSubscription> {
    engine: E,
    subscription: Option<S>,
    frames: u64,
}

impl<E: Engine, S: FrameSubscription> FrameLoop<E, S> {
    /// Wraps an engine in a stopped loop.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            subscription: None,
            frames: 0,
        }
    }

    /// Starts running with `subscription`, cancelling any previous one first.
    pub fn start(&mut self, subscription: S) {
        self.stop();
        debug!("frame loop started at frame {}", self.frames);
        self.subscription = Some(subscription);
    }

    /// Cancels and releases the subscription. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut sub) = self.subscription.take() {
            sub.cancel();
            debug!("frame loop stopped after {} frames", self.frames);
        }
    }

    /// Whether a subscription is active.
    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    /// Runs one frame if the loop is running. Returns whether it did.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.engine.step();
        self.frames += 1;
        trace!("frame {}", self.frames);
        true
    }

    /// Forwards pointer input; takes effect on the next tick.
    pub fn set_pointer(&mut self, pointer: PointerState) {
        self.engine.set_pointer(pointer);
    }

    /// Resizes the engine's surface.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.engine.resize(width, height);
    }

    /// Frames stepped since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the driven engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Returns the driven engine mutably.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

impl<E: Engine, S: FrameSubscription> Drop for FrameLoop<E, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;
    use serde_json::{json, Value};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Ticker {
        surface: Surface,
        steps: usize,
        pointer: PointerState,
    }

    impl Engine for Ticker {
        fn set_pointer(&mut self, pointer: PointerState) {
            self.pointer = pointer;
        }
        fn step(&mut self) {
            self.steps += 1;
        }
        fn resize(&mut self, width: usize, height: usize) {
            self.surface = Surface::new(width, height).unwrap();
        }
        fn surface(&self) -> &Surface {
            &self.surface
        }
        fn params(&self) -> Value {
            json!({})
        }
        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    fn ticker() -> Ticker {
        Ticker {
            surface: Surface::new(2, 2).unwrap(),
            steps: 0,
            pointer: PointerState::default(),
        }
    }

    /// Records how many times it was cancelled.
    struct Probe(Rc<Cell<u32>>);

    impl FrameSubscription for Probe {
        fn cancel(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn stopped_loop_does_not_step() {
        let mut fl: FrameLoop<_, ManualFrames> = FrameLoop::new(ticker());
        assert!(!fl.is_running());
        assert!(!fl.tick());
        assert_eq!(fl.engine().steps, 0);
        assert_eq!(fl.frames(), 0);
    }

    #[test]
    fn running_loop_steps_each_tick() {
        let mut fl = FrameLoop::new(ticker());
        fl.start(ManualFrames);
        for _ in 0..5 {
            assert!(fl.tick());
        }
        assert_eq!(fl.engine().steps, 5);
        assert_eq!(fl.frames(), 5);
        fl.stop();
        assert!(!fl.tick());
        assert_eq!(fl.frames(), 5);
    }

    #[test]
    fn stop_cancels_exactly_once() {
        let cancels = Rc::new(Cell::new(0));
        let mut fl = FrameLoop::new(ticker());
        fl.start(Probe(cancels.clone()));
        fl.stop();
        fl.stop();
        assert_eq!(cancels.get(), 1);
    }

    #[test]
    fn restart_cancels_previous_subscription() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut fl = FrameLoop::new(ticker());
        fl.start(Probe(first.clone()));
        fl.start(Probe(second.clone()));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        assert!(fl.is_running());
    }

    #[test]
    fn drop_releases_subscription() {
        let cancels = Rc::new(Cell::new(0));
        {
            let mut fl = FrameLoop::new(ticker());
            fl.start(Probe(cancels.clone()));
            fl.tick();
        }
        assert_eq!(cancels.get(), 1);
    }

    #[test]
    fn pointer_and_resize_are_forwarded() {
        let mut fl: FrameLoop<_, ManualFrames> = FrameLoop::new(ticker());
        fl.set_pointer(PointerState::new(9.0, 8.0, true));
        fl.resize(5, 6);
        assert_eq!(fl.engine().pointer, PointerState::new(9.0, 8.0, true));
        assert_eq!(fl.engine().surface().width(), 5);
        fl.engine_mut().steps = 42;
        assert_eq!(fl.engine().steps, 42);
    }
}
