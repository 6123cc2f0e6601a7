//! Scene loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use super::Scene;

/// Error type for scene files
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid scene item {index}: {reason}")]
    Invalid { index: usize, reason: String },
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let scene = load_scene_from_str(&contents)?;
    info!(path = %path.display(), items = scene.items.len(), "scene loaded");
    Ok(scene)
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    let scene: Scene = ron::from_str(s)?;
    scene.validate()?;
    Ok(scene)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneItem, Shading};

    #[test]
    fn test_bundled_scenes_parse() {
        for (name, text) in [
            ("cube", include_str!("../../scenes/cube.ron")),
            ("triangles", include_str!("../../scenes/triangles.ron")),
            ("bezier", include_str!("../../scenes/bezier.ron")),
        ] {
            let scene = load_scene_from_str(text);
            assert!(scene.is_ok(), "{name}: {:?}", scene.err());
        }
    }

    #[test]
    fn test_save_and_reload() {
        let scene = load_scene_from_str(include_str!("../../scenes/cube.ron")).unwrap();
        let path = std::env::temp_dir().join(format!("softpipe-scene-{}.ron", std::process::id()));
        save_scene(&scene, &path).unwrap();
        let back = load_scene(&path).unwrap();
        assert_eq!(back.items.len(), scene.items.len());
        assert_eq!(back.view, scene.view);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_parse_error_reported() {
        assert!(matches!(load_scene_from_str("(items: [Nope])"), Err(SceneError::Parse(_))));
    }

    #[test]
    fn test_wrong_point_count_rejected() {
        let text = r#"(
            items: [
                Triangle(
                    vertices: [(x: 0.0, y: 0.0, z: 0.0), (x: 1.0, y: 0.0, z: 0.0)],
                    color: (x: 1.0, y: 1.0, z: 1.0),
                    shading: Flat,
                ),
            ],
        )"#;
        match load_scene_from_str(text) {
            Err(SceneError::Invalid { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected Invalid, got {other:?}"),
        }
        // Sanity: the same item with three vertices is fine
        let ok = text.replace(
            "(x: 1.0, y: 0.0, z: 0.0)]",
            "(x: 1.0, y: 0.0, z: 0.0), (x: 0.0, y: 1.0, z: 0.0)]",
        );
        let scene = load_scene_from_str(&ok).unwrap();
        assert!(matches!(scene.items[0], SceneItem::Triangle { shading: Shading::Flat, .. }));
    }
}
