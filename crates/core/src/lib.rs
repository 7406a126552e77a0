#![deny(unsafe_code)]
//! Core types and traits for the hero-field animated background.
//!
//! Provides the `Engine` trait, the `Surface` software raster, `Canvas`/
//! `Layer`/`BlendMode` compositing, color types (`Srgb`, `Rgba`, `Hsla`),
//! the `Xorshift64` PRNG, pointer input (`PointerState`, `SharedPointer`,
//! `PointerPath`), the `FrameLoop` start/stop controller, `Scene`, and
//! JSON parameter helpers.

pub mod animation;
pub mod canvas;
pub mod color;
pub mod engine;
pub mod error;
pub mod params;
pub mod pointer;
pub mod prng;
pub mod scene;
pub mod surface;

pub use animation::{FrameLoop, FrameSubscription, ManualFrames};
pub use canvas::{BlendMode, Canvas, Layer};
pub use color::{Hsla, Rgba, Srgb};
pub use engine::Engine;
pub use error::FieldError;
pub use pointer::{PointerPath, PointerState, SharedPointer};
pub use prng::Xorshift64;
pub use scene::Scene;
pub use surface::Surface;
