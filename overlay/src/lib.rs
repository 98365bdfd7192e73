//! Avatar Stack Overlay Library
//!
//! CPU rasterizer hosting the avatar stack core.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    widgets/                          │
//! │                 AvatarStackWidget                    │
//! │       (composed stack + padding + background)        │
//! ├─────────────────────────────────────────────────────┤
//! │                     canvas                           │
//! │                   StackCanvas                        │
//! │   (Painter impl: logical → device, PNG output)       │
//! ├──────────────────────────┬──────────────────────────┤
//! │         renderer         │          images           │
//! │  tiny-skia + cosmic-text │  ImageLoader, PNG decode  │
//! │   (drawing primitives)   │  (bounded decode cache)   │
//! └──────────────────────────┴──────────────────────────┘
//! ```

pub mod canvas;
pub mod error;
pub mod images;
pub mod renderer;
pub mod utils;
pub mod widgets;

// Re-export commonly used types
pub use canvas::{MAX_CANVAS_SIDE, StackCanvas};
pub use error::{ImageError, RasterError};
pub use images::{DiskImageLoader, ImageLoader, decode_png, load_file};
pub use renderer::{Renderer, circle_mask};
pub use widgets::AvatarStackWidget;

// Re-export tiny_skia types for external use
pub use tiny_skia::{Color, Pixmap};
