//! Reusable widgets built on the stack canvas
//!
//! # Available Widgets
//!
//! - [`AvatarStackWidget`] - A composed avatar stack with padding and background

mod avatar_stack;

pub use avatar_stack::AvatarStackWidget;
