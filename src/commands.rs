//! Preview CLI commands

use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use avatar_stack_core::{AvatarStack, ContentSource};
use avatar_stack_overlay::{AvatarStackWidget, DiskImageLoader, ImageLoader, RasterError, Renderer};
use avatar_stack_types::{Color, ImageSourceKind, PreviewConfig};
use rayon::prelude::*;
use thiserror::Error;

use crate::preferences::{self, ConfigError};
use crate::scene::{Scene, SceneError};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("failed to render {path}")]
    Render {
        path: PathBuf,
        #[source]
        source: RasterError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to format preferences")]
    Format(#[from] toml::ser::Error),

    #[error("failed to read scene directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} scenes failed to render")]
    BatchFailed { failed: usize, total: usize },
}

/// Canvas settings shared by `render` and `batch`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub scale: f32,
    pub padding: f32,
    pub canvas_color: Color,
}

impl RenderOptions {
    /// Preferences with an optional command-line scale override
    pub fn from_preferences(prefs: &PreviewConfig, scale: Option<f32>) -> Self {
        Self {
            scale: scale.unwrap_or(prefs.scale),
            padding: prefs.padding,
            canvas_color: prefs.canvas_color,
        }
    }
}

pub fn image_loader(prefs: &PreviewConfig) -> Arc<dyn ImageLoader> {
    Arc::new(DiskImageLoader::new(
        prefs.asset_dir.as_ref().map(PathBuf::from),
        prefs.image_cache_size,
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Render
// ─────────────────────────────────────────────────────────────────────────────

pub fn render(
    scene_path: &Path,
    output: &Path,
    options: &RenderOptions,
    images: Arc<dyn ImageLoader>,
) -> Result<(), CommandError> {
    let mut renderer = Renderer::new();
    render_scene(&mut renderer, images, scene_path, output, options)
}

/// Render one scene with a caller-owned renderer
pub fn render_scene(
    renderer: &mut Renderer,
    images: Arc<dyn ImageLoader>,
    scene_path: &Path,
    output: &Path,
    options: &RenderOptions,
) -> Result<(), CommandError> {
    let scene = Scene::load(scene_path)?;
    let stack = scene.build_stack()?;
    let network = network_image_count(&stack);
    if network > 0 {
        tracing::warn!(
            scene = %scene_path.display(),
            images = network,
            "{NETWORK_IMAGES_NOTE}"
        );
    }

    let widget = AvatarStackWidget::new(&stack)
        .with_padding(options.padding)
        .with_background(options.canvas_color);
    let to_render_error = |source| CommandError::Render {
        path: output.to_path_buf(),
        source,
    };
    let canvas = widget
        .rasterize(renderer, images, options.scale)
        .map_err(to_render_error)?;
    canvas.save_png(output).map_err(to_render_error)?;

    tracing::info!(
        scene = %scene_path.display(),
        output = %output.display(),
        width = canvas.width(),
        height = canvas.height(),
        "rendered scene"
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Describe
// ─────────────────────────────────────────────────────────────────────────────

pub fn describe(scene_path: &Path) -> Result<String, CommandError> {
    let scene = Scene::load(scene_path)?;
    let stack = scene.build_stack()?;
    Ok(describe_stack(&stack))
}

/// Shown when a scene points at remote images the preview cannot load
pub const NETWORK_IMAGES_NOTE: &str = "network images are not fetched by the preview renderer; \
     use source = \"local_file\" or \"bundled_asset\"";

/// Image references in `stack` that only a network loader could resolve
fn network_image_count(stack: &AvatarStack) -> usize {
    match stack.source() {
        Some(ContentSource::Images { items, .. }) => items
            .iter()
            .filter(|image| image.kind == ImageSourceKind::Network)
            .count(),
        _ => 0,
    }
}

/// Text summary of a stack's arrangement and overflow
pub fn describe_stack(stack: &AvatarStack) -> String {
    let Some(source) = stack.source() else {
        return format!("source: none\ntotal: {}\nnothing to render", stack.total_count());
    };
    let config = source.config();
    let tree = stack.compose();

    let mut lines = vec![
        format!("source: {} ({} items)", source.kind(), source.len()),
        format!(
            "radius: {}, max visible: {}, border: {} {:?}",
            config.radius, config.max_visible, config.border_width, config.border_color
        ),
        format!(
            "total: {}, rendered: {}",
            stack.total_count(),
            stack.effective_count()
        ),
    ];

    let mut avatars: Vec<_> = tree.avatars().collect();
    avatars.sort_by_key(|avatar| avatar.display_index);
    for avatar in avatars {
        let mut line = format!(
            "  #{} offset {} z {}",
            avatar.display_index,
            avatar.circle.left(),
            avatar.z_index
        );
        if let Some(label) = &avatar.label {
            line.push_str(&format!(" label {}", label.text));
        }
        lines.push(line);
    }

    if let Some(overflow) = stack.overflow() {
        lines.push(format!(
            "overflow ({}): {}, {}",
            overflow.mode.as_str(),
            overflow.value,
            if overflow.visible { "shown" } else { "hidden" }
        ));
    }
    lines.push(format!("size: {}x{}", tree.width, tree.height));
    if network_image_count(stack) > 0 {
        lines.push(format!("note: {NETWORK_IMAGES_NOTE}"));
    }
    lines.join("\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a batch run; failed scenes do not stop the others
#[derive(Debug, Default)]
pub struct BatchReport {
    pub rendered: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, CommandError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.rendered.len() + self.failed.len()
    }
}

/// `*.toml` files in `dir`, sorted by path
pub fn scene_files(dir: &Path) -> Result<Vec<PathBuf>, CommandError> {
    let read_dir_error = |source| CommandError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Render every scene in `dir` into `out_dir` in parallel.
///
/// Each worker thread owns its own renderer; the image loader is shared.
pub fn batch(
    dir: &Path,
    out_dir: &Path,
    options: &RenderOptions,
    images: Arc<dyn ImageLoader>,
) -> Result<BatchReport, CommandError> {
    let scenes = scene_files(dir)?;
    std::fs::create_dir_all(out_dir).map_err(|source| CommandError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let results: Vec<(PathBuf, Result<PathBuf, CommandError>)> = scenes
        .par_iter()
        .map_init(Renderer::new, |renderer, scene_path| {
            let stem = scene_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scene".to_string());
            let output = out_dir.join(format!("{stem}.png"));
            let result = render_scene(renderer, Arc::clone(&images), scene_path, &output, options)
                .map(|()| output);
            (scene_path.clone(), result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (scene_path, result) in results {
        match result {
            Ok(output) => report.rendered.push(output),
            Err(err) => {
                tracing::warn!(
                    scene = %scene_path.display(),
                    error = %error_chain(&err),
                    "scene failed to render"
                );
                report.failed.push((scene_path, err));
            }
        }
    }

    tracing::info!(
        rendered = report.rendered.len(),
        failed = report.failed.len(),
        "batch complete"
    );
    Ok(report)
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

pub fn show_config(prefs: &PreviewConfig) -> Result<String, CommandError> {
    let location = match preferences::config_path() {
        Ok(path) => path.display().to_string(),
        Err(_) => "unknown".to_string(),
    };
    Ok(format!("# {location}\n{}", toml::to_string_pretty(prefs)?))
}

pub fn reset_config() -> Result<String, CommandError> {
    let prefs = preferences::reset()?;
    show_config(&prefs)
}

/// Error message followed by each source, joined with ": "
pub fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
