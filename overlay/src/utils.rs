//! Common utility functions for stack rendering

use tiny_skia::Color;

/// Convert [u8; 4] RGBA array to tiny_skia Color
#[inline]
pub fn color_from_rgba(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Byte length of a `width` x `height` RGBA buffer, `None` on overflow
#[inline]
pub fn rgba_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(4)
}

/// Convert straight-alpha RGBA bytes to the premultiplied layout tiny-skia expects
pub fn premultiply(rgba: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(rgba.len());
    for pixel in rgba.chunks_exact(4) {
        let alpha = pixel[3] as f32 / 255.0;
        data.push((pixel[0] as f32 * alpha).round() as u8);
        data.push((pixel[1] as f32 * alpha).round() as u8);
        data.push((pixel[2] as f32 * alpha).round() as u8);
        data.push(pixel[3]);
    }
    data
}

/// Convert premultiplied RGBA bytes back to straight alpha (for PNG output)
pub fn demultiply(data: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(data.len());
    for pixel in data.chunks_exact(4) {
        let a = pixel[3];
        if a == 0 {
            rgba.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let unscale = |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
        rgba.extend_from_slice(&[unscale(pixel[0]), unscale(pixel[1]), unscale(pixel[2]), a]);
    }
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_rgba() {
        let color = color_from_rgba([255, 0, 0, 255]);
        assert_eq!(color.red(), 1.0);
        assert_eq!(color.green(), 0.0);
        assert_eq!(color.alpha(), 1.0);
    }

    #[test]
    fn test_rgba_len() {
        assert_eq!(rgba_len(3, 2), Some(24));
        assert_eq!(rgba_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_premultiply() {
        assert_eq!(premultiply(&[200, 100, 50, 255]), vec![200, 100, 50, 255]);
        assert_eq!(premultiply(&[200, 100, 50, 0]), vec![0, 0, 0, 0]);
        assert_eq!(premultiply(&[200, 100, 50, 128]), vec![100, 50, 25, 128]);
    }

    #[test]
    fn test_demultiply_restores_opaque_and_clears_transparent() {
        assert_eq!(demultiply(&[10, 20, 30, 255]), vec![10, 20, 30, 255]);
        assert_eq!(demultiply(&[10, 20, 30, 0]), vec![0, 0, 0, 0]);
        assert_eq!(demultiply(&[100, 50, 25, 128]), vec![199, 100, 50, 128]);
    }
}
