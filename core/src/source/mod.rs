//! Content sources for an avatar stack
//!
//! A stack is fed by exactly one of three families: image references the
//! host resolves on its own, opaque renderable content, or images the caller
//! already decoded. Each family carries its own per-item configuration.

mod initials;
mod selector;

pub use initials::Initials;
pub use selector::SourceSlots;

use std::fmt;
use std::sync::Arc;

use avatar_stack_types::{Color, ImageSourceKind, ItemConfig};

use crate::error::StackError;
use crate::render::Drawable;

// ─────────────────────────────────────────────────────────────────────────────
// Items
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque locator for an image, tagged with where it comes from.
///
/// The core never loads it; the host's image loader does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    pub locator: String,
    pub kind: ImageSourceKind,
}

impl ImageRef {
    pub fn new(locator: impl Into<String>, kind: ImageSourceKind) -> Self {
        Self {
            locator: locator.into(),
            kind,
        }
    }

    pub fn network(url: impl Into<String>) -> Self {
        Self::new(url, ImageSourceKind::Network)
    }

    pub fn local_file(path: impl Into<String>) -> Self {
        Self::new(path, ImageSourceKind::LocalFile)
    }

    pub fn bundled(name: impl Into<String>) -> Self {
        Self::new(name, ImageSourceKind::BundledAsset)
    }
}

/// Decoded RGBA image (straight alpha, 4 bytes per pixel)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ResolvedImage {
    /// Wrap raw pixels, rejecting buffers that don't match the dimensions
    pub fn new(rgba: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if width == 0 || height == 0 || rgba.len() != expected {
            return None;
        }
        Some(Self {
            rgba,
            width,
            height,
        })
    }

    /// Single-color image, handy for placeholders supplied by the caller
    pub fn solid(width: u32, height: u32, color: Color) -> Option<Self> {
        let pixels = (width as usize).checked_mul(height as usize)?;
        Self::new(color.repeat(pixels), width, height)
    }
}

/// Shared handle to caller-supplied drawable content.
///
/// Two handles are equal only when they point at the same drawable.
#[derive(Clone)]
pub struct Renderable(Arc<dyn Drawable>);

impl Renderable {
    pub fn new(drawable: impl Drawable + 'static) -> Self {
        Self(Arc::new(drawable))
    }

    pub fn drawable(&self) -> &dyn Drawable {
        self.0.as_ref()
    }
}

impl From<Arc<dyn Drawable>> for Renderable {
    fn from(drawable: Arc<dyn Drawable>) -> Self {
        Self(drawable)
    }
}

impl PartialEq for Renderable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Renderable").field(&self.0).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content Source
// ─────────────────────────────────────────────────────────────────────────────

/// Which family a content source belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Images,
    Renderables,
    ResolvedImages,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Renderables => "renderables",
            Self::ResolvedImages => "resolved_images",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single active content source of a stack, with its item config
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    Images {
        items: Vec<ImageRef>,
        config: ItemConfig,
    },
    Renderables {
        items: Vec<Renderable>,
        config: ItemConfig,
    },
    ResolvedImages {
        items: Vec<Arc<ResolvedImage>>,
        config: ItemConfig,
    },
}

impl ContentSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Images { .. } => SourceKind::Images,
            Self::Renderables { .. } => SourceKind::Renderables,
            Self::ResolvedImages { .. } => SourceKind::ResolvedImages,
        }
    }

    pub fn config(&self) -> &ItemConfig {
        match self {
            Self::Images { config, .. }
            | Self::Renderables { config, .. }
            | Self::ResolvedImages { config, .. } => config,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Images { items, .. } => items.len(),
            Self::Renderables { items, .. } => items.len(),
            Self::ResolvedImages { items, .. } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the item config before any item of this source is arranged
    pub fn validate(&self) -> Result<(), StackError> {
        validate_item_config(self.kind(), self.config())
    }
}

/// Reject configs that would otherwise collapse into zero-sized or
/// inside-out avatars.
fn validate_item_config(kind: SourceKind, config: &ItemConfig) -> Result<(), StackError> {
    let invalid = |field: &'static str, reason: String| StackError::InvalidItemConfig {
        kind,
        field,
        reason,
    };

    if !config.radius.is_finite() || config.radius <= 0.0 {
        return Err(invalid(
            "radius",
            format!("must be a positive number, got {}", config.radius),
        ));
    }
    if !config.border_width.is_finite() || config.border_width < 0.0 {
        return Err(invalid(
            "border_width",
            format!("must be zero or positive, got {}", config.border_width),
        ));
    }
    if config.border_width >= config.radius {
        return Err(invalid(
            "border_width",
            format!(
                "{} leaves no room inside a radius of {}",
                config.border_width, config.radius
            ),
        ));
    }
    Ok(())
}
