//! Drawing primitive boundary implemented by rendering hosts

use std::fmt;

use avatar_stack_types::{Color, TextStyle};

use crate::geometry::{Circle, Point};
use crate::source::{ImageRef, ResolvedImage};

/// Drawing primitives a host rendering framework provides.
///
/// Coordinates are logical pixels relative to the stack origin; the host
/// maps them onto its surface.
pub trait Painter {
    fn fill_circle(&mut self, circle: Circle, color: Color);

    /// Stroke a ring of `width` centered on the circle's outline
    fn stroke_circle(&mut self, circle: Circle, width: f32, color: Color);

    /// Resolve `image` through the host's image loader and draw it clipped to `clip`.
    /// Unresolvable images leave the area untouched.
    fn draw_image_ref(&mut self, image: &ImageRef, clip: Circle);

    /// Draw already decoded pixels clipped to `clip`
    fn draw_resolved_image(&mut self, image: &ResolvedImage, clip: Circle);

    fn draw_centered_text(&mut self, text: &str, center: Point, style: &TextStyle);

    /// Restrict subsequent drawing to `circle`, intersected with any clip
    /// already active. Every push is matched by a [`Painter::pop_clip`].
    fn push_clip(&mut self, circle: Circle);

    /// Drop the most recently pushed clip
    fn pop_clip(&mut self);
}

/// Opaque avatar content supplied by the caller
pub trait Drawable: fmt::Debug + Send + Sync {
    /// Paint the content inside `clip`
    fn paint(&self, painter: &mut dyn Painter, clip: Circle);
}
