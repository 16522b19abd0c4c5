//! Demo scenes.
//!
//! A scene keeps its own state, advances once per rendered frame and draws
//! into a freshly cleared canvas.

mod bounce;
mod shapes;
mod text;

pub use bounce::BounceScene;
pub use shapes::ShapesScene;
pub use text::TextScene;

use anyhow::{bail, Result};
use monoframe_core::{Buttons, Canvas};

/// Trait for playable scenes.
pub trait Scene: Send {
    /// Returns the name of the scene.
    fn name(&self) -> &str;

    /// Advances the scene to `frame` with the given buttons held.
    fn update(&mut self, frame: u64, buttons: Buttons);

    /// Draws the current state. The canvas is already cleared.
    fn render(&self, canvas: &mut Canvas);
}

/// Creates a scene by name.
pub fn create_scene(name: &str) -> Result<Box<dyn Scene>> {
    let scene: Box<dyn Scene> = match name.to_lowercase().as_str() {
        "shapes" => Box::new(ShapesScene::new()),
        "text" => Box::new(TextScene::new()),
        "bounce" => Box::new(BounceScene::new()?),
        _ => bail!(
            "Unknown scene '{}' (available: {})",
            name,
            available_scenes().join(", ")
        ),
    };
    Ok(scene)
}

/// Returns a list of available scene names.
pub fn available_scenes() -> Vec<&'static str> {
    vec!["shapes", "text", "bounce"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_scene_draws_something() {
        for name in available_scenes() {
            let mut scene = create_scene(name).unwrap();
            assert_eq!(scene.name(), name);
            for frame in 0..90 {
                scene.update(frame, Buttons::NONE);
                let mut canvas = Canvas::new();
                scene.render(&mut canvas);
                assert!(canvas.framebuffer().count_on() > 0, "{name} frame {frame}");
            }
        }
    }

    #[test]
    fn test_unknown_scene() {
        assert!(create_scene("missing").is_err());
        assert!(create_scene("Shapes").is_ok());
    }
}
