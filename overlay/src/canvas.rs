//! Raster canvas implementing the stack's drawing primitives
//!
//! `StackCanvas` owns a pixel buffer, maps logical stack coordinates onto it
//! (origin offset, then scale) and forwards every primitive to a borrowed
//! [`Renderer`]. Image references are resolved through an [`ImageLoader`].
//! Clips pushed through [`Painter::push_clip`] become anti-aliased masks that
//! every primitive is drawn through.

use std::path::Path;
use std::sync::Arc;

use avatar_stack_core::{Circle, ImageRef, Painter, Point, ResolvedImage};
use avatar_stack_types::{Color, TextStyle};
use tiny_skia::{IntSize, Mask, Pixmap};

use crate::error::RasterError;
use crate::images::ImageLoader;
use crate::renderer::{circle_mask, Renderer};
use crate::utils::{color_from_rgba, demultiply, rgba_len};

/// Largest canvas side, in device pixels
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// A drawing surface for one rendered stack
pub struct StackCanvas<'r> {
    renderer: &'r mut Renderer,
    images: Arc<dyn ImageLoader>,
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    /// Logical position of the stack origin on the canvas
    origin: Point,
    /// Device pixels per logical pixel
    scale: f32,
    /// Active clip masks, innermost last
    clips: Vec<Option<Mask>>,
}

impl<'r> StackCanvas<'r> {
    /// Create a transparent canvas of `logical_width` x `logical_height`
    /// logical pixels, rasterized at `scale`.
    ///
    /// Fails with [`RasterError::InvalidCanvasSize`] when either device side
    /// is zero or exceeds [`MAX_CANVAS_SIDE`].
    pub fn new(
        renderer: &'r mut Renderer,
        images: Arc<dyn ImageLoader>,
        logical_width: f32,
        logical_height: f32,
        scale: f32,
    ) -> Result<Self, RasterError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RasterError::InvalidScale(scale));
        }
        let invalid = || RasterError::InvalidCanvasSize {
            width: logical_width,
            height: logical_height,
        };
        if !logical_width.is_finite() || !logical_height.is_finite() {
            return Err(invalid());
        }
        let (device_width, device_height) = (logical_width * scale, logical_height * scale);
        let limit = MAX_CANVAS_SIDE as f32;
        if !(device_width > 0.0 && device_width <= limit)
            || !(device_height > 0.0 && device_height <= limit)
        {
            return Err(invalid());
        }
        let width = device_width.ceil() as u32;
        let height = device_height.ceil() as u32;
        if IntSize::from_wh(width, height).is_none() {
            return Err(invalid());
        }
        let buffer = Renderer::create_buffer(width, height).ok_or_else(invalid)?;

        Ok(Self {
            renderer,
            images,
            buffer,
            width,
            height,
            origin: Point::default(),
            scale,
            clips: Vec::new(),
        })
    }

    /// Offset every subsequent primitive by (`x`, `y`) logical pixels
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.origin = Point::new(x, y);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn clear(&mut self, color: Color) {
        self.renderer
            .clear(&mut self.buffer, self.width, self.height, color_from_rgba(color));
    }

    /// Premultiplied RGBA at device pixel (`x`, `y`)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = rgba_len(self.width, y)?;
        let i = row.checked_add(x as usize * 4)?;
        let px = self.buffer.get(i..i.checked_add(4)?)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn to_device(&self, point: Point) -> (f32, f32) {
        (
            (self.origin.x + point.x) * self.scale,
            (self.origin.y + point.y) * self.scale,
        )
    }

    /// Consume the canvas, returning the rendered pixmap
    pub fn into_pixmap(self) -> Result<Pixmap, RasterError> {
        let (width, height) = (self.width, self.height);
        let invalid = || RasterError::InvalidCanvasSize {
            width: width as f32,
            height: height as f32,
        };
        let size = IntSize::from_wh(width, height).ok_or_else(invalid)?;
        Pixmap::from_vec(self.buffer, size).ok_or_else(invalid)
    }

    /// Encode the canvas as a straight-alpha RGBA PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().map_err(RasterError::Encode)?;
            writer
                .write_image_data(&demultiply(&self.buffer))
                .map_err(RasterError::Encode)?;
            writer.finish().map_err(RasterError::Encode)?;
        }
        Ok(out)
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RasterError> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).map_err(|source| RasterError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Painter for StackCanvas<'_> {
    fn fill_circle(&mut self, circle: Circle, color: Color) {
        let (cx, cy) = self.to_device(circle.center);
        self.renderer.fill_circle(
            &mut self.buffer,
            self.width,
            self.height,
            cx,
            cy,
            circle.radius * self.scale,
            color_from_rgba(color),
            self.clips.last().and_then(Option::as_ref),
        );
    }

    fn stroke_circle(&mut self, circle: Circle, width: f32, color: Color) {
        let (cx, cy) = self.to_device(circle.center);
        self.renderer.stroke_circle(
            &mut self.buffer,
            self.width,
            self.height,
            cx,
            cy,
            circle.radius * self.scale,
            width * self.scale,
            color_from_rgba(color),
            self.clips.last().and_then(Option::as_ref),
        );
    }

    fn draw_image_ref(&mut self, image: &ImageRef, clip: Circle) {
        // Unresolved images keep the background fill
        if let Some(resolved) = self.images.load(image) {
            self.draw_resolved_image(&resolved, clip);
        }
    }

    fn draw_resolved_image(&mut self, image: &ResolvedImage, clip: Circle) {
        let (cx, cy) = self.to_device(clip.center);
        self.renderer.fill_circle_with_image(
            &mut self.buffer,
            self.width,
            self.height,
            cx,
            cy,
            clip.radius * self.scale,
            &image.rgba,
            image.width,
            image.height,
            self.clips.last().and_then(Option::as_ref),
        );
    }

    fn draw_centered_text(&mut self, text: &str, center: Point, style: &TextStyle) {
        let font_size = style.font_size * self.scale;
        if text.is_empty() || !font_size.is_finite() || font_size <= 0.0 {
            return;
        }
        let (cx, cy) = self.to_device(center);
        let (text_width, _) = self.renderer.measure_text(text, font_size, style.weight);
        let x = cx - text_width / 2.0;
        let baseline = cy + font_size / 3.0;
        self.renderer.draw_text(
            &mut self.buffer,
            self.width,
            self.height,
            text,
            x,
            baseline,
            font_size,
            style.weight,
            color_from_rgba(style.color),
            self.clips.last().and_then(Option::as_ref),
        );
    }

    fn push_clip(&mut self, circle: Circle) {
        let (cx, cy) = self.to_device(circle.center);
        let outer = self.clips.last().and_then(Option::as_ref);
        let mask = circle_mask(
            self.width,
            self.height,
            cx,
            cy,
            circle.radius * self.scale,
            outer,
        );
        self.clips.push(mask);
    }

    fn pop_clip(&mut self) {
        self.clips.pop();
    }
}
