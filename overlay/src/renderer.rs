//! Software renderer using tiny-skia and cosmic-text
//!
//! This provides cross-platform 2D rendering for avatar stacks.
//! All rendering is done on the CPU and produces an RGBA pixel buffer
//! (premultiplied, as tiny-skia stores it).
#![allow(clippy::too_many_arguments)]
use std::collections::HashMap;

use avatar_stack_types::FontWeight;
use cosmic_text::{
    Attrs, Buffer, Color as CosmicColor, Family, FontSystem, LayoutGlyph, Metrics, Shaping,
    SwashCache, Weight,
};
use tiny_skia::{
    Color, FillRule, FilterQuality, IntSize, Mask, Paint, PathBuilder, Pattern, Pixmap,
    PixmapMut, SpreadMode, Stroke, Transform,
};

use crate::utils::{premultiply, rgba_len};

/// Maximum entries in the text shaping cache (LRU eviction when exceeded)
const TEXT_CACHE_MAX_ENTRIES: usize = 512;

/// Cached result of text shaping
struct CachedText {
    /// Pre-shaped glyphs ready for rendering
    glyphs: Vec<LayoutGlyph>,
    width: f32,
    height: f32,
    /// LRU tracking: incremented on each access
    last_used: u64,
}

/// Key for text cache: (text content, font size rounded to tenths, weight)
type TextCacheKey = (String, u32, FontWeight);

/// A software renderer for avatar stacks
pub struct Renderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    /// Cache of shaped text so repeated labels are shaped once
    text_cache: HashMap<TextCacheKey, CachedText>,
    /// Counter for LRU tracking
    cache_access_counter: u64,
}

impl Renderer {
    /// Create a new renderer
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            text_cache: HashMap::with_capacity(64),
            cache_access_counter: 0,
        }
    }

    /// Evict least recently used entries if cache is too large
    fn evict_lru_if_needed(&mut self) {
        if self.text_cache.len() <= TEXT_CACHE_MAX_ENTRIES {
            return;
        }

        // Remove ~25% of cache, oldest first
        let target_size = TEXT_CACHE_MAX_ENTRIES * 3 / 4;
        let mut entries: Vec<_> = self
            .text_cache
            .iter()
            .map(|(k, v)| (k.clone(), v.last_used))
            .collect();
        entries.sort_by_key(|(_, last_used)| *last_used);

        for (key, _) in entries
            .into_iter()
            .take(self.text_cache.len() - target_size)
        {
            self.text_cache.remove(&key);
        }
    }

    /// Find cached entry by borrowed key (avoids String allocation on hit)
    fn find_cached(
        &mut self,
        text: &str,
        font_size_key: u32,
        weight: FontWeight,
    ) -> Option<&mut CachedText> {
        // Stacks only ever show a handful of distinct labels
        self.text_cache
            .iter_mut()
            .find(|(k, _)| k.0 == text && k.1 == font_size_key && k.2 == weight)
            .map(|(_, v)| v)
    }

    /// Ensure text is cached, shaping if needed. Returns (width, height).
    fn ensure_cached(&mut self, text: &str, font_size: f32, weight: FontWeight) -> (f32, f32) {
        let font_size_key = (font_size * 10.0).round() as u32;

        self.cache_access_counter += 1;
        let current_access = self.cache_access_counter;

        if let Some(cached) = self.find_cached(text, font_size_key, weight) {
            cached.last_used = current_access;
            return (cached.width, cached.height);
        }

        // Cache miss - shape the text
        let metrics = Metrics::new(font_size, font_size * 1.2);
        let mut text_buffer = Buffer::new(&mut self.font_system, metrics);

        let attrs = Attrs::new()
            .family(Family::SansSerif)
            .weight(cosmic_weight(weight));
        text_buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        text_buffer.shape_until_scroll(&mut self.font_system, false);

        let mut glyphs = Vec::new();
        let mut width = 0.0f32;
        let mut height = 0.0f32;

        for run in text_buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
            glyphs.extend(run.glyphs.iter().cloned());
        }

        let cached = CachedText {
            glyphs,
            width,
            height,
            last_used: current_access,
        };

        self.text_cache
            .insert((text.to_string(), font_size_key, weight), cached);
        self.evict_lru_if_needed();

        (width, height)
    }

    /// Get cached glyphs for drawing. Must call ensure_cached first.
    fn get_cached_glyphs(
        &mut self,
        text: &str,
        font_size: f32,
        weight: FontWeight,
    ) -> Vec<LayoutGlyph> {
        let font_size_key = (font_size * 10.0).round() as u32;
        self.find_cached(text, font_size_key, weight)
            .map(|c| c.glyphs.clone())
            .unwrap_or_default()
    }

    /// Number of shaped strings currently cached
    pub fn cached_text_count(&self) -> usize {
        self.text_cache.len()
    }

    /// Create a new transparent pixel buffer (RGBA format), `None` if the
    /// byte length does not fit in memory addressing
    pub fn create_buffer(width: u32, height: u32) -> Option<Vec<u8>> {
        Some(vec![0u8; rgba_len(width, height)?])
    }

    /// Clear a pixel buffer with a color
    pub fn clear(&self, buffer: &mut [u8], width: u32, height: u32, color: Color) {
        if let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) {
            pixmap.fill(color);
        }
    }

    /// Draw a filled circle
    pub fn fill_circle(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
        mask: Option<&Mask>,
    ) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            return;
        };
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
    }

    /// Draw a circle outline centered on the given radius
    pub fn stroke_circle(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        cx: f32,
        cy: f32,
        radius: f32,
        stroke_width: f32,
        color: Color,
        mask: Option<&Mask>,
    ) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            return;
        };
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: stroke_width,
            ..Default::default()
        };

        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), mask);
    }

    /// Fill a circle with a straight-alpha RGBA image scaled to cover it
    pub fn fill_circle_with_image(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        cx: f32,
        cy: f32,
        radius: f32,
        rgba: &[u8],
        img_width: u32,
        img_height: u32,
        mask: Option<&Mask>,
    ) {
        if img_width == 0 || img_height == 0 || rgba_len(img_width, img_height) != Some(rgba.len())
        {
            return;
        }
        let Some(size) = IntSize::from_wh(img_width, img_height) else {
            return;
        };
        let Some(image) = Pixmap::from_vec(premultiply(rgba), size) else {
            return;
        };
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            return;
        };
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };

        // Cover: scale the shorter side to the diameter, center the overflow
        let diameter = radius * 2.0;
        let scale = (diameter / img_width as f32).max(diameter / img_height as f32);
        if !scale.is_finite() {
            return;
        }
        let tx = cx - img_width as f32 * scale / 2.0;
        let ty = cy - img_height as f32 * scale / 2.0;

        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            image.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            1.0,
            Transform::from_row(scale, 0.0, 0.0, scale, tx, ty),
        );
        paint.anti_alias = true;

        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
    }

    /// Draw text with its baseline at `y` (uses shaping cache)
    pub fn draw_text(
        &mut self,
        buffer: &mut [u8],
        buf_width: u32,
        buf_height: u32,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        weight: FontWeight,
        color: Color,
        mask: Option<&Mask>,
    ) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, buf_width, buf_height) else {
            return;
        };

        let _ = self.ensure_cached(text, font_size, weight);

        // Cloned because swash_cache needs &mut self while drawing
        let glyphs = self.get_cached_glyphs(text, font_size, weight);

        let text_color = CosmicColor::rgba(
            (color.red() * 255.0) as u8,
            (color.green() * 255.0) as u8,
            (color.blue() * 255.0) as u8,
            (color.alpha() * 255.0) as u8,
        );

        for glyph in &glyphs {
            let physical_glyph = glyph.physical((x, y), 1.0);

            if let Some(image) = self
                .swash_cache
                .get_image(&mut self.font_system, physical_glyph.cache_key)
            {
                let glyph_x = physical_glyph.x + image.placement.left;
                let glyph_y = physical_glyph.y - image.placement.top;

                draw_glyph_to_pixmap(
                    &mut pixmap,
                    &image.data,
                    image.placement.width,
                    image.placement.height,
                    glyph_x,
                    glyph_y,
                    text_color,
                    mask,
                );
            }
        }
    }

    /// Measure text dimensions (uses shaping cache, no glyph clone)
    pub fn measure_text(&mut self, text: &str, font_size: f32, weight: FontWeight) -> (f32, f32) {
        self.ensure_cached(text, font_size, weight)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Anti-aliased circular clip mask for a `width` x `height` surface.
///
/// Intersected with `within` when given. A degenerate circle yields a mask
/// that hides everything; `None` only for a zero-sized surface.
pub fn circle_mask(
    width: u32,
    height: u32,
    cx: f32,
    cy: f32,
    radius: f32,
    within: Option<&Mask>,
) -> Option<Mask> {
    let mut mask = match within {
        Some(outer) => outer.clone(),
        None => Mask::new(width, height)?,
    };
    let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
        return Mask::new(width, height);
    };
    match within {
        Some(_) => mask.intersect_path(&path, FillRule::Winding, true, Transform::identity()),
        None => mask.fill_path(&path, FillRule::Winding, true, Transform::identity()),
    }
    Some(mask)
}

fn cosmic_weight(weight: FontWeight) -> Weight {
    match weight {
        FontWeight::Regular => Weight::NORMAL,
        FontWeight::SemiBold => Weight::SEMIBOLD,
        FontWeight::Bold => Weight::BOLD,
    }
}

/// Draw a glyph coverage mask onto a premultiplied pixmap
fn draw_glyph_to_pixmap(
    pixmap: &mut PixmapMut,
    glyph_data: &[u8],
    glyph_width: u32,
    glyph_height: u32,
    dest_x: i32,
    dest_y: i32,
    color: CosmicColor,
    mask: Option<&Mask>,
) {
    let pixmap_width = pixmap.width() as i32;
    let pixmap_height = pixmap.height() as i32;
    let data = pixmap.data_mut();

    for gy in 0..glyph_height as i32 {
        let py = dest_y + gy;
        if py < 0 || py >= pixmap_height {
            continue;
        }

        for gx in 0..glyph_width as i32 {
            let px = dest_x + gx;
            if px < 0 || px >= pixmap_width {
                continue;
            }

            let glyph_idx = (gy as u32 * glyph_width + gx as u32) as usize;
            let Some(&coverage) = glyph_data.get(glyph_idx) else {
                continue;
            };
            let offset = py as usize * pixmap_width as usize + px as usize;
            let alpha = match mask {
                Some(mask) => {
                    let clip = mask.data().get(offset).copied().unwrap_or(0);
                    (coverage as u32 * clip as u32 / 255) as u8
                }
                None => coverage,
            };
            if alpha == 0 {
                continue;
            }

            let pixel_idx = offset * 4;
            if pixel_idx + 3 >= data.len() {
                continue;
            }

            // Source-over in premultiplied space
            let src_a = (alpha as u32 * color.a() as u32) / 255;
            let inv_a = 255 - src_a;

            data[pixel_idx] =
                ((color.r() as u32 * src_a + data[pixel_idx] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 1] =
                ((color.g() as u32 * src_a + data[pixel_idx + 1] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 2] =
                ((color.b() as u32 * src_a + data[pixel_idx + 2] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 3] = (src_a + (data[pixel_idx + 3] as u32 * inv_a) / 255) as u8;
        }
    }
}
