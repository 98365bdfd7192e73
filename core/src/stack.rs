//! Avatar stack definition and its builder
//!
//! Three mutually exclusive entry points feed a stack:
//!
//! ```
//! use avatar_stack_core::AvatarStack;
//!
//! let stack = AvatarStack::images(["a.png", "b.png", "c.png", "d.png"], 10)
//!     .with_max_visible(3)
//!     .build()
//!     .expect("valid stack");
//!
//! let tree = stack.compose();
//! assert_eq!(tree.avatars().count(), 3);
//! assert_eq!(tree.badge().map(|b| b.label.text.as_str()), Some("7"));
//! ```

use std::sync::Arc;

use avatar_stack_types::{
    Color, CounterMode, ImageSourceKind, ItemConfig, TextStyle, stack_colors,
};

use crate::error::StackError;
use crate::layout::{OverflowCalculator, OverflowIndicator, StackArranger};
use crate::render::{RenderTree, compose};
use crate::source::{ContentSource, ImageRef, Renderable, ResolvedImage, SourceSlots};

/// A validated avatar stack, ready to compose.
///
/// Immutable: composing never changes it, and holds no state between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarStack {
    source: Option<ContentSource>,
    total_count: usize,
    show_overflow_badge: bool,
    counter_mode: CounterMode,
    overlay_text_style: TextStyle,
    background_color: Color,
}

impl AvatarStack {
    /// Stack of image references, tagged [`ImageSourceKind::Network`] unless
    /// changed with [`AvatarStackBuilder::with_image_source`].
    pub fn images<I, S>(list: I, total_count: usize) -> AvatarStackBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let images = list
            .into_iter()
            .map(|locator| ImageRef::new(locator, ImageSourceKind::default()))
            .collect();
        AvatarStackBuilder::new(
            SourceSlots {
                images,
                ..Default::default()
            },
            ConfigFamily::Image,
            total_count,
        )
    }

    /// Stack of caller-supplied drawable content
    pub fn renderables(children: Vec<Renderable>, total_count: usize) -> AvatarStackBuilder {
        AvatarStackBuilder::new(
            SourceSlots {
                renderables: children,
                ..Default::default()
            },
            ConfigFamily::Widget,
            total_count,
        )
    }

    /// Stack of images the caller already resolved
    pub fn resolved_images(
        providers: Vec<Arc<ResolvedImage>>,
        total_count: usize,
    ) -> AvatarStackBuilder {
        AvatarStackBuilder::new(
            SourceSlots {
                resolved_images: providers,
                ..Default::default()
            },
            ConfigFamily::Image,
            total_count,
        )
    }

    /// Stack from raw slots, e.g. deserialized from a scene file.
    ///
    /// `build()` rejects slots with more than one populated source.
    pub fn from_slots(slots: SourceSlots, total_count: usize) -> AvatarStackBuilder {
        let family = if slots.images.is_empty()
            && slots.resolved_images.is_empty()
            && !slots.renderables.is_empty()
        {
            ConfigFamily::Widget
        } else {
            ConfigFamily::Image
        };
        AvatarStackBuilder::new(slots, family, total_count)
    }

    pub fn source(&self) -> Option<&ContentSource> {
        self.source.as_ref()
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn show_overflow_badge(&self) -> bool {
        self.show_overflow_badge
    }

    pub fn counter_mode(&self) -> CounterMode {
        self.counter_mode
    }

    pub fn overlay_text_style(&self) -> &TextStyle {
        &self.overlay_text_style
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    /// Number of avatars a composition draws
    pub fn effective_count(&self) -> usize {
        self.source.as_ref().map_or(0, |source| {
            StackArranger::from_config(source.config()).effective_count(source.len())
        })
    }

    /// Overflow indicator as composed for this stack.
    ///
    /// `None` when there is no content source at all.
    pub fn overflow(&self) -> Option<OverflowIndicator> {
        let source = self.source.as_ref()?;
        Some(
            OverflowCalculator::new(self.counter_mode, self.show_overflow_badge).compute(
                self.total_count,
                self.effective_count(),
                source.config().max_visible,
            ),
        )
    }

    /// Compose into a render tree
    pub fn compose(&self) -> RenderTree {
        compose(self)
    }
}

/// Which per-item config the builder's setters edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFamily {
    Image,
    Widget,
}

/// Builder returned by the [`AvatarStack`] entry points
#[derive(Debug, Clone)]
pub struct AvatarStackBuilder {
    slots: SourceSlots,
    family: ConfigFamily,
    total_count: usize,
    show_overflow_badge: bool,
    counter_mode: CounterMode,
    overlay_text_style: TextStyle,
    background_color: Color,
}

impl AvatarStackBuilder {
    fn new(slots: SourceSlots, family: ConfigFamily, total_count: usize) -> Self {
        Self {
            slots,
            family,
            total_count,
            show_overflow_badge: true,
            counter_mode: CounterMode::default(),
            overlay_text_style: TextStyle::default(),
            background_color: stack_colors::WHITE,
        }
    }

    fn item_config_mut(&mut self) -> &mut ItemConfig {
        match self.family {
            ConfigFamily::Image => &mut self.slots.image_config,
            ConfigFamily::Widget => &mut self.slots.widget_config,
        }
    }

    /// Replace the whole per-item config of this stack's family
    pub fn with_item_config(mut self, config: ItemConfig) -> Self {
        *self.item_config_mut() = config;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.item_config_mut().radius = radius;
        self
    }

    /// Maximum number of avatars drawn
    pub fn with_max_visible(mut self, count: usize) -> Self {
        self.item_config_mut().max_visible = count;
        self
    }

    pub fn with_border_width(mut self, width: f32) -> Self {
        self.item_config_mut().border_width = width;
        self
    }

    pub fn with_border_color(mut self, color: Color) -> Self {
        self.item_config_mut().border_color = color;
        self
    }

    /// Tag every image reference with `kind`
    pub fn with_image_source(mut self, kind: ImageSourceKind) -> Self {
        for image in &mut self.slots.images {
            image.kind = kind;
        }
        self
    }

    pub fn with_show_overflow_badge(mut self, show: bool) -> Self {
        self.show_overflow_badge = show;
        self
    }

    pub fn with_counter_mode(mut self, mode: CounterMode) -> Self {
        self.counter_mode = mode;
        self
    }

    pub fn with_overlay_text_style(mut self, style: TextStyle) -> Self {
        self.overlay_text_style = style;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Select the active source and validate its config
    pub fn build(self) -> Result<AvatarStack, StackError> {
        let source = self.slots.into_source()?;
        Ok(AvatarStack {
            source,
            total_count: self.total_count,
            show_overflow_badge: self.show_overflow_badge,
            counter_mode: self.counter_mode,
            overlay_text_style: self.overlay_text_style,
            background_color: self.background_color,
        })
    }
}
