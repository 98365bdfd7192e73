//! Avatar stack layout core
//!
//! Resolves an overlapping stack of circular avatars ("A, B, +7") from one of
//! three content sources into a [`RenderTree`]:
//!
//! ```text
//! SourceSlots ──▶ ContentSource ──▶ StackArranger ──▶ OverflowCalculator ──▶ RenderTree
//!  (selection)     (active source)   (count, offsets,    (badge / "+N")        (paint via
//!                                     z-order)                                  Painter)
//! ```
//!
//! Everything here is pure and synchronous. Image loading, clipping and text
//! rasterization belong to the host, reached through [`Painter`].

pub mod error;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod source;
pub mod stack;

pub use avatar_stack_types as types;

pub use error::StackError;
pub use geometry::{Circle, Point};
pub use layout::{
    ArrangedItem, Arrangement, OVERLAP_FACTOR, OverflowCalculator, OverflowIndicator,
    StackArranger,
};
pub use render::{
    AvatarNode, BadgeNode, Border, Drawable, NodeContent, Painter, RenderNode, RenderTree,
    TextLabel, compose,
};
pub use source::{
    ContentSource, ImageRef, Initials, Renderable, ResolvedImage, SourceKind, SourceSlots,
};
pub use stack::{AvatarStack, AvatarStackBuilder};
