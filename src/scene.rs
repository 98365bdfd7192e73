//! Scene files: TOML stack descriptions turned into `AvatarStack`s

use std::path::{Path, PathBuf};
use std::sync::Arc;

use avatar_stack_core::{
    AvatarStack, ImageRef, Initials, Renderable, ResolvedImage, SourceSlots, StackError,
};
use avatar_stack_overlay::{ImageError, load_file};
use avatar_stack_types::{FontWeight, ImageSourceKind, SceneConfig, TextStyle, stack_colors};
use thiserror::Error;

/// Initials are drawn at this fraction of the avatar radius
const INITIALS_SCALE: f32 = 0.8;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load provider image {path}")]
    Provider {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("invalid stack in scene {path}")]
    Stack {
        path: PathBuf,
        #[source]
        source: StackError,
    },
}

/// A parsed scene together with the directory relative paths resolve against
#[derive(Debug, Clone)]
pub struct Scene {
    pub path: PathBuf,
    pub config: SceneConfig,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self, SceneError> {
        let config = toml::from_str(content).map_err(|source| SceneError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Directory relative image and provider paths resolve against
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// File stem used to name rendered output
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scene".to_string())
    }

    /// Build the stack this scene describes.
    ///
    /// Provider images are decoded here, before the stack exists.
    pub fn build_stack(&self) -> Result<AvatarStack, SceneError> {
        let slots = self.slots()?;
        let scene = &self.config;

        AvatarStack::from_slots(slots, scene.total_count)
            .with_show_overflow_badge(scene.show_overflow_badge)
            .with_counter_mode(scene.counter_mode)
            .with_background_color(scene.background_color)
            .with_overlay_text_style(scene.overlay_text_style)
            .build()
            .map_err(|source| SceneError::Stack {
                path: self.path.clone(),
                source,
            })
    }

    fn slots(&self) -> Result<SourceSlots, SceneError> {
        let scene = &self.config;
        let mut slots = SourceSlots::default();

        if let Some(images) = &scene.images {
            slots.images = images
                .list
                .iter()
                .map(|locator| ImageRef::new(self.locate(locator, images.source), images.source))
                .collect();
            slots.image_config = images.item;
        }

        if let Some(widgets) = &scene.widgets {
            let style = TextStyle {
                font_size: widgets.item.radius * INITIALS_SCALE,
                weight: FontWeight::SemiBold,
                color: stack_colors::WHITE,
            };
            slots.renderables = widgets
                .list
                .iter()
                .map(|entry| {
                    let initials = Initials::new(entry.initials.clone(), entry.color);
                    Renderable::new(initials.with_style(style))
                })
                .collect();
            slots.widget_config = widgets.item;
        }

        if let Some(providers) = &scene.providers {
            if !providers.list.is_empty() {
                slots.resolved_images = providers
                    .list
                    .iter()
                    .map(|file| self.decode_provider(file))
                    .collect::<Result<_, _>>()?;
                slots.image_config = providers.item;
            }
        }

        Ok(slots)
    }

    /// Local files resolve relative to the scene; other locators pass through
    fn locate(&self, locator: &str, kind: ImageSourceKind) -> String {
        match kind {
            ImageSourceKind::LocalFile if Path::new(locator).is_relative() => self
                .base_dir()
                .join(locator)
                .to_string_lossy()
                .into_owned(),
            _ => locator.to_string(),
        }
    }

    fn decode_provider(&self, file: &str) -> Result<Arc<ResolvedImage>, SceneError> {
        let path = self.base_dir().join(file);
        load_file(&path)
            .map(Arc::new)
            .map_err(|source| SceneError::Provider { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatar_stack_core::SourceKind;
    use avatar_stack_types::CounterMode;

    fn scene(content: &str) -> Scene {
        Scene::parse(Path::new("/scenes/team.toml"), content).expect("scene should parse")
    }

    #[test]
    fn test_image_scene_builds_stack() {
        let scene = scene(
            r#"
            total_count = 10
            counter_mode = "on_image"

            [images]
            count = 5
            list = ["https://example.com/a.png", "https://example.com/b.png"]
            "#,
        );
        let stack = scene.build_stack().expect("valid stack");

        assert_eq!(stack.source().map(|s| s.kind()), Some(SourceKind::Images));
        assert_eq!(stack.counter_mode(), CounterMode::OnImage);
        assert_eq!(stack.effective_count(), 2);
        assert_eq!(stack.overflow().map(|o| o.label()), Some("+5".to_string()));
        assert_eq!(scene.name(), "team");
    }

    #[test]
    fn test_relative_local_files_resolve_against_scene_dir() {
        let scene = scene(
            r#"
            total_count = 1

            [images]
            source = "local_file"
            list = ["faces/a.png", "/abs/b.png"]
            "#,
        );
        let slots = scene.slots().expect("slots");
        let expected = Path::new("/scenes").join("faces/a.png");
        assert_eq!(slots.images[0].locator, expected.to_string_lossy());
        assert_eq!(slots.images[1].locator, "/abs/b.png");
    }

    #[test]
    fn test_widget_scene_uses_widget_config() {
        let scene = scene(
            r#"
            total_count = 4

            [widgets]
            radius = 20.0
            count = 2
            list = [{ initials = "AB" }, { initials = "CD" }, { initials = "EF" }]
            "#,
        );
        let stack = scene.build_stack().expect("valid stack");
        let source = stack.source().expect("source");
        assert_eq!(source.kind(), SourceKind::Renderables);
        assert_eq!(source.config().radius, 20.0);
        assert_eq!(stack.effective_count(), 2);
        assert_eq!(stack.overflow().map(|o| o.value), Some(2));
    }

    #[test]
    fn test_multiple_tables_are_rejected() {
        let scene = scene(
            r#"
            total_count = 4

            [images]
            list = ["https://example.com/a.png"]

            [widgets]
            list = [{ initials = "AB" }]
            "#,
        );
        let err = scene.build_stack().expect_err("two sources must fail");
        assert!(matches!(
            err,
            SceneError::Stack {
                source: StackError::MultipleSources { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_item_config_is_rejected() {
        let scene = scene(
            r#"
            total_count = 4

            [images]
            radius = -3.0
            list = ["https://example.com/a.png"]
            "#,
        );
        assert!(matches!(
            scene.build_stack(),
            Err(SceneError::Stack {
                source: StackError::InvalidItemConfig { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_missing_provider_file_fails() {
        let scene = scene(
            r#"
            total_count = 1

            [providers]
            list = ["missing.png"]
            "#,
        );
        assert!(matches!(scene.build_stack(), Err(SceneError::Provider { .. })));
    }

    #[test]
    fn test_missing_total_count_is_a_parse_error() {
        let result = Scene::parse(Path::new("bad.toml"), "[images]\nlist = []");
        assert!(matches!(result, Err(SceneError::Parse { .. })));
    }

    #[test]
    fn test_empty_scene_renders_nothing() {
        let stack = scene("total_count = 3").build_stack().expect("valid stack");
        assert!(stack.source().is_none());
        assert!(stack.compose().is_empty());
    }
}
