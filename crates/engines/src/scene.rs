//! Offline rendering of a [`Scene`] into a single composited frame.

use hero_field_core::error::FieldError;
use hero_field_core::{
    BlendMode, Canvas, Engine, FrameLoop, Layer, ManualFrames, Scene, Srgb, Surface,
};

use crate::EngineKind;

/// Builds every engine in the scene, runs `scene.frames` steps driven by the
/// scripted pointer and composites the last frame over a black background.
///
/// The first engine is the bottom layer and is painted normally; every later
/// one is blended with `scene.blend`, each at `scene.layer_opacity(i)`. Engine `i` is seeded with `seed + i` so
/// repeated engines do not paint identical layers.
pub fn render_scene(scene: &Scene) -> Result<Surface, FieldError> {
    scene.validate()?;
    let mut loops = scene
        .engines
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let seed = scene.seed.wrapping_add(i as u64);
            let engine =
                EngineKind::from_name(name, scene.width, scene.height, seed, &scene.params_for(name))?;
            let mut frames: FrameLoop<EngineKind, ManualFrames> = FrameLoop::new(engine);
            frames.start(ManualFrames);
            Ok(frames)
        })
        .collect::<Result<Vec<_>, FieldError>>()?;

    let mut canvas = Canvas::new(scene.width, scene.height, Srgb::BLACK)?;
    let layer_names: Vec<String> = loops
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{i}:{}", l.engine().name()))
        .collect();
    for (i, name) in layer_names.iter().enumerate() {
        let mode = if i == 0 { BlendMode::Normal } else { scene.blend };
        let layer = Layer::new(name.as_str())
            .with_blend_mode(mode)
            .with_opacity(scene.layer_opacity(i));
        canvas.add_layer(layer)?;
    }

    log::info!(
        "rendering {} frame(s) of [{}] at {}x{}",
        scene.frames,
        scene.engines.join(", "),
        scene.width,
        scene.height
    );
    for frame in 0..scene.frames {
        let pointer = scene.pointer.at(frame as u64);
        for frames in &mut loops {
            frames.set_pointer(pointer);
            frames.tick();
        }
    }

    let sources: Vec<(&str, &Surface)> = layer_names
        .iter()
        .map(String::as_str)
        .zip(loops.iter().map(|l| l.engine().surface()))
        .collect();
    canvas.composite(&sources)
}
