//! Image loading and caching for image-reference avatars
//!
//! Bundled assets and local files are decoded from PNG on demand and cached
//! as straight-alpha RGBA. Network references are not fetched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use avatar_stack_core::{ImageRef, ResolvedImage};
use avatar_stack_types::ImageSourceKind;

use crate::error::ImageError;

/// Host image-loading subsystem used to resolve image references
pub trait ImageLoader: Send + Sync {
    /// Resolve `image` to decoded pixels, or `None` if it cannot be loaded
    fn load(&self, image: &ImageRef) -> Option<Arc<ResolvedImage>>;
}

/// Loader for bundled assets and local files, with a bounded cache
pub struct DiskImageLoader {
    /// Directory bundled asset names are resolved against
    asset_dir: Option<PathBuf>,
    /// Cached decoded images
    cache: Mutex<HashMap<ImageRef, Arc<ResolvedImage>>>,
    /// Maximum cache size
    max_cache_size: usize,
}

impl DiskImageLoader {
    pub fn new(asset_dir: Option<PathBuf>, max_cache_size: usize) -> Self {
        Self {
            asset_dir,
            cache: Mutex::new(HashMap::new()),
            max_cache_size,
        }
    }

    /// Filesystem path an image reference resolves to, if any
    pub fn resolve_path(&self, image: &ImageRef) -> Option<PathBuf> {
        match image.kind {
            ImageSourceKind::LocalFile => Some(PathBuf::from(&image.locator)),
            ImageSourceKind::BundledAsset => {
                let path = self.asset_dir.as_ref()?.join(&image.locator);
                if path.extension().is_none() {
                    Some(path.with_extension("png"))
                } else {
                    Some(path)
                }
            }
            ImageSourceKind::Network => None,
        }
    }

    pub fn cached_count(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}

impl ImageLoader for DiskImageLoader {
    fn load(&self, image: &ImageRef) -> Option<Arc<ResolvedImage>> {
        // Check cache first
        {
            let cache = self.cache.lock().ok()?;
            if let Some(data) = cache.get(image) {
                return Some(Arc::clone(data));
            }
        }

        let Some(path) = self.resolve_path(image) else {
            tracing::warn!(
                locator = %image.locator,
                kind = image.kind.as_str(),
                "image reference cannot be resolved by the disk loader"
            );
            return None;
        };

        let data = match load_file(&path) {
            Ok(data) => Arc::new(data),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to load avatar image");
                return None;
            }
        };
        tracing::debug!(
            path = %path.display(),
            width = data.width,
            height = data.height,
            "decoded avatar image"
        );

        // Cache it (with simple eviction if full)
        {
            let mut cache = self.cache.lock().ok()?;
            if cache.len() >= self.max_cache_size {
                if let Some(key) = cache.keys().next().cloned() {
                    cache.remove(&key);
                }
            }
            if self.max_cache_size > 0 {
                cache.insert(image.clone(), Arc::clone(&data));
            }
        }

        Some(data)
    }
}

/// Read and decode a PNG file
pub fn load_file(path: &Path) -> Result<ResolvedImage, ImageError> {
    let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_png(&bytes)
}

/// Decode PNG data to straight-alpha RGBA
pub fn decode_png(data: &[u8]) -> Result<ResolvedImage, ImageError> {
    let decoder = png::Decoder::new(data);
    let mut reader = decoder.read_info().map_err(ImageError::Decode)?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(ImageError::Decode)?;

    let width = info.width;
    let height = info.height;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::UnsupportedFormat {
            color_type: info.color_type,
            bit_depth: info.bit_depth,
        });
    }

    let pixels = &buf[..info.buffer_size()];
    let rgba = match info.color_type {
        png::ColorType::Rgba => pixels.to_vec(),
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity((width * height * 4) as usize);
            for chunk in pixels.chunks(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(255);
            }
            rgba
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgba = Vec::with_capacity((width * height * 4) as usize);
            for chunk in pixels.chunks(2) {
                let gray = chunk[0];
                let alpha = chunk[1];
                rgba.extend_from_slice(&[gray, gray, gray, alpha]);
            }
            rgba
        }
        png::ColorType::Grayscale => {
            let mut rgba = Vec::with_capacity((width * height * 4) as usize);
            for &gray in pixels {
                rgba.extend_from_slice(&[gray, gray, gray, 255]);
            }
            rgba
        }
        png::ColorType::Indexed => {
            return Err(ImageError::UnsupportedFormat {
                color_type: info.color_type,
                bit_depth: info.bit_depth,
            });
        }
    };

    ResolvedImage::new(rgba, width, height).ok_or(ImageError::Malformed { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            if color == png::ColorType::Indexed {
                encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
            }
            let mut writer = encoder.write_header().expect("header");
            writer.write_image_data(data).expect("image data");
        }
        out
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir_name = format!("avatar-stack-images-{}-{name}", std::process::id());
        let dir = std::env::temp_dir().join(dir_name);
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn test_decode_rgb_and_gray() {
        let rgb = decode_png(&encode(1, 1, png::ColorType::Rgb, &[10, 20, 30])).expect("rgb");
        assert_eq!(rgb.rgba, vec![10, 20, 30, 255]);

        let gray = decode_png(&encode(2, 1, png::ColorType::Grayscale, &[7, 9])).expect("gray");
        assert_eq!(gray.rgba, vec![7, 7, 7, 255, 9, 9, 9, 255]);

        let ga = decode_png(&encode(1, 1, png::ColorType::GrayscaleAlpha, &[50, 128])).expect("ga");
        assert_eq!(ga.rgba, vec![50, 50, 50, 128]);
        assert_eq!((ga.width, ga.height), (1, 1));
    }

    #[test]
    fn test_decode_rejects_indexed() {
        let err = decode_png(&encode(2, 1, png::ColorType::Indexed, &[0, 1]))
            .expect_err("indexed should be rejected");
        assert!(matches!(
            err,
            ImageError::UnsupportedFormat {
                color_type: png::ColorType::Indexed,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(decode_png(b"not a png"), Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_local_file_is_loaded_and_cached() {
        let dir = temp_dir("local");
        let path = dir.join("avatar.png");
        std::fs::write(&path, encode(2, 2, png::ColorType::Rgba, &[200; 16])).expect("write png");

        let loader = DiskImageLoader::new(None, 8);
        let image = ImageRef::local_file(path.to_string_lossy());
        let first = loader.load(&image).expect("local file should load");
        let second = loader.load(&image).expect("cached load");

        assert_eq!((first.width, first.height), (2, 2));
        assert!(Arc::ptr_eq(&first, &second), "second load should hit the cache");
        assert_eq!(loader.cached_count(), 1);

        loader.clear_cache();
        assert_eq!(loader.cached_count(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bundled_asset_resolves_against_asset_dir() {
        let dir = temp_dir("bundled");
        std::fs::write(dir.join("alice.png"), encode(1, 1, png::ColorType::Rgb, &[1, 2, 3]))
            .expect("write png");

        let loader = DiskImageLoader::new(Some(dir.clone()), 8);
        assert_eq!(
            loader.resolve_path(&ImageRef::bundled("alice")),
            Some(dir.join("alice.png"))
        );
        let image = loader.load(&ImageRef::bundled("alice")).expect("bundled asset");
        assert_eq!(image.rgba, vec![1, 2, 3, 255]);

        let without_dir = DiskImageLoader::new(None, 8);
        assert!(without_dir.load(&ImageRef::bundled("alice")).is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_network_and_missing_files_resolve_to_none() {
        let loader = DiskImageLoader::new(None, 8);
        assert!(loader.load(&ImageRef::network("https://example.com/a.png")).is_none());
        assert!(loader.load(&ImageRef::local_file("/nonexistent/avatar.png")).is_none());
        assert_eq!(loader.cached_count(), 0);
    }

    #[test]
    fn test_cache_is_bounded() {
        let dir = temp_dir("bounded");
        let loader = DiskImageLoader::new(None, 2);
        for i in 0..4 {
            let path = dir.join(format!("{i}.png"));
            let bytes = encode(1, 1, png::ColorType::Rgb, &[i, i, i]);
            std::fs::write(&path, bytes).expect("write png");
            assert!(loader.load(&ImageRef::local_file(path.to_string_lossy())).is_some());
        }
        assert_eq!(loader.cached_count(), 2);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
