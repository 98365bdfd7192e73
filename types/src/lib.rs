//! Shared configuration types for avatar stacks
//!
//! This crate contains serializable configuration types shared between the
//! layout core (avatar-stack-core), the rasterizer (avatar-stack-overlay) and
//! the preview CLI. Scene files and persisted preferences deserialize into
//! these types; all defaults live here so every consumer agrees on them.

use serde::{Deserialize, Serialize};

/// RGBA color, serialized as a 4-element array
pub type Color = [u8; 4];

// ─────────────────────────────────────────────────────────────────────────────
// Default Color Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default colors for avatar stacks
pub mod stack_colors {
    use super::Color;

    pub const WHITE: Color = [255, 255, 255, 255];
    pub const BLACK: Color = [0, 0, 0, 255];
    pub const GRAY: Color = [158, 158, 158, 255]; // Neutral border gray
    pub const ON_IMAGE_TINT: Color = [0, 0, 0, 138]; // Dark translucent tint behind "+N"
    pub const TRANSPARENT: Color = [0, 0, 0, 0];
}

/// Per-item defaults shared by every content source family
pub const DEFAULT_RADIUS: f32 = 25.0;
pub const DEFAULT_MAX_VISIBLE: usize = 3;
pub const DEFAULT_BORDER_WIDTH: f32 = 2.0;
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

// ─────────────────────────────────────────────────────────────────────────────
// Enums
// ─────────────────────────────────────────────────────────────────────────────

/// Where an image reference should be resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSourceKind {
    /// Asset bundled with the host application
    BundledAsset,
    /// Remote URL
    #[default]
    Network,
    /// Path on the local filesystem
    LocalFile,
}

impl ImageSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BundledAsset => "bundled_asset",
            Self::Network => "network",
            Self::LocalFile => "local_file",
        }
    }
}

/// How the overflow count is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterMode {
    /// Circular badge placed after the stack
    #[default]
    Separate,
    /// "+N" label over a tinted first avatar
    OnImage,
}

impl CounterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Separate => "separate",
            Self::OnImage => "on_image",
        }
    }
}

/// Font weight for overlay and badge text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Regular,
    #[default]
    SemiBold,
    Bold,
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde Default Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_radius() -> f32 {
    DEFAULT_RADIUS
}
fn default_max_visible() -> usize {
    DEFAULT_MAX_VISIBLE
}
fn default_border_width() -> f32 {
    DEFAULT_BORDER_WIDTH
}
fn default_border_color() -> Color {
    stack_colors::GRAY
}
fn default_background_color() -> Color {
    stack_colors::WHITE
}
fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}
fn default_text_color() -> Color {
    stack_colors::BLACK
}

// ─────────────────────────────────────────────────────────────────────────────
// Styling
// ─────────────────────────────────────────────────────────────────────────────

/// Text style for the "+N" overlay and the overflow badge.
///
/// Opaque to the layout core: it is copied into the output tree untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default = "default_text_color")]
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            weight: FontWeight::SemiBold,
            color: stack_colors::BLACK,
        }
    }
}

/// Per-item configuration of one content source family.
///
/// The image family (image references and resolved images) and the widget
/// family (renderable content) each carry their own record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    /// Avatar radius in logical pixels
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Maximum number of avatars drawn
    #[serde(default = "default_max_visible", rename = "count")]
    pub max_visible: usize,
    #[serde(default = "default_border_width")]
    pub border_width: f32,
    #[serde(default = "default_border_color")]
    pub border_color: Color,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            max_visible: DEFAULT_MAX_VISIBLE,
            border_width: DEFAULT_BORDER_WIDTH,
            border_color: stack_colors::GRAY,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scene Files
// ─────────────────────────────────────────────────────────────────────────────

/// `[images]` table: image references resolved by the host's image loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSceneSource {
    pub list: Vec<String>,
    #[serde(default)]
    pub source: ImageSourceKind,
    #[serde(flatten)]
    pub item: ItemConfig,
}

/// One entry of a `[widgets]` list, drawn as initials on a colored disc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialsEntry {
    pub initials: String,
    #[serde(default = "default_border_color")]
    pub color: Color,
}

/// `[widgets]` table: renderable content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSceneSource {
    pub list: Vec<InitialsEntry>,
    #[serde(flatten)]
    pub item: ItemConfig,
}

/// `[providers]` table: image files decoded before the stack is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSceneSource {
    pub list: Vec<String>,
    #[serde(flatten)]
    pub item: ItemConfig,
}

/// A complete avatar stack description as stored in a scene file.
///
/// Exactly one of `images`, `widgets` or `providers` is expected; the layout
/// core rejects scenes that populate more than one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Logical number of participants, may exceed the supplied list
    pub total_count: usize,
    #[serde(default = "default_true")]
    pub show_overflow_badge: bool,
    #[serde(default)]
    pub counter_mode: CounterMode,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default)]
    pub overlay_text_style: TextStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageSceneSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets: Option<WidgetSceneSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<ProviderSceneSource>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Preferences
// ─────────────────────────────────────────────────────────────────────────────

fn default_padding() -> f32 {
    8.0
}
fn default_scale() -> f32 {
    2.0
}
fn default_image_cache_size() -> usize {
    64
}
fn default_canvas_color() -> Color {
    stack_colors::TRANSPARENT
}

/// Persisted preferences for the preview CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Empty space around the stack, in logical pixels
    #[serde(default = "default_padding")]
    pub padding: f32,
    /// Canvas fill behind the stack
    #[serde(default = "default_canvas_color")]
    pub canvas_color: Color,
    /// Device pixels per logical pixel
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Directory searched for bundled assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_dir: Option<String>,
    /// Maximum decoded images kept by the image loader
    #[serde(default = "default_image_cache_size")]
    pub image_cache_size: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            canvas_color: stack_colors::TRANSPARENT,
            scale: default_scale(),
            asset_dir: None,
            image_cache_size: default_image_cache_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_defaults() {
        let scene: SceneConfig = toml::from_str(
            r#"
            total_count = 10

            [images]
            list = ["a.png", "b.png"]
            "#,
        )
        .expect("scene should parse");

        assert_eq!(scene.total_count, 10);
        assert!(scene.show_overflow_badge);
        assert_eq!(scene.counter_mode, CounterMode::Separate);
        assert_eq!(scene.background_color, stack_colors::WHITE);
        assert_eq!(scene.overlay_text_style, TextStyle::default());

        let images = scene.images.expect("images table");
        assert_eq!(images.source, ImageSourceKind::Network);
        assert_eq!(images.item, ItemConfig::default());
        assert!(scene.widgets.is_none());
        assert!(scene.providers.is_none());
    }

    #[test]
    fn test_scene_overrides() {
        let scene: SceneConfig = toml::from_str(
            r#"
            total_count = 4
            counter_mode = "on_image"
            show_overflow_badge = false

            [overlay_text_style]
            font_size = 18.0
            weight = "bold"

            [widgets]
            count = 5
            radius = 16.0
            border_color = [10, 20, 30, 255]
            list = [{ initials = "AB", color = [200, 0, 0, 255] }, { initials = "CD" }]
            "#,
        )
        .expect("scene should parse");

        assert_eq!(scene.counter_mode, CounterMode::OnImage);
        assert!(!scene.show_overflow_badge);
        assert_eq!(scene.overlay_text_style.font_size, 18.0);
        assert_eq!(scene.overlay_text_style.weight, FontWeight::Bold);
        assert_eq!(scene.overlay_text_style.color, stack_colors::BLACK);

        let widgets = scene.widgets.expect("widgets table");
        assert_eq!(widgets.item.max_visible, 5);
        assert_eq!(widgets.item.radius, 16.0);
        assert_eq!(widgets.item.border_width, DEFAULT_BORDER_WIDTH);
        assert_eq!(widgets.item.border_color, [10, 20, 30, 255]);
        assert_eq!(widgets.list[1].color, stack_colors::GRAY);
    }

    #[test]
    fn test_image_source_kind_names() {
        let images: ImageSceneSource =
            toml::from_str("list = []\nsource = \"local_file\"").expect("should parse");
        assert_eq!(images.source, ImageSourceKind::LocalFile);
        assert_eq!(images.source.as_str(), "local_file");
    }

    #[test]
    fn test_preview_config_defaults() {
        let config: PreviewConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(config, PreviewConfig::default());
        assert_eq!(config.canvas_color, stack_colors::TRANSPARENT);
    }
}
