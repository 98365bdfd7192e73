//! Composition of an avatar stack into a paintable tree
//!
//! [`compose`] turns an [`AvatarStack`](crate::AvatarStack) into a
//! [`RenderTree`]; [`RenderTree::paint`] replays that tree through a host's
//! [`Painter`], which owns the actual clipping, stroking and text drawing.

mod compose;
mod painter;
mod tree;


pub use compose::compose;
pub use painter::{Drawable, Painter};
pub use tree::{AvatarNode, BadgeNode, Border, NodeContent, RenderNode, RenderTree, TextLabel};

#[cfg(test)]
pub(crate) use painter::recording::{PaintOp, RecordingPainter};
