//! Image decoding for the thumbnail area.

use image::imageops::FilterType;

const PLACEHOLDER_PNG: &[u8] = include_bytes!("../assets/placeholder.png");
pub const THUMBNAIL_MAX_WIDTH: f32 = 150.0;
const THUMBNAIL_MAX_WIDTH_PX: u32 = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl PreviewImage {
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.rgba)
    }

    /// Display size scaled down to fit the thumbnail width.
    pub fn display_size(&self) -> egui::Vec2 {
        let width = self.width.max(1) as f32;
        let height = self.height as f32;
        let scale = (THUMBNAIL_MAX_WIDTH / width).min(1.0);
        egui::vec2(width * scale, height * scale)
    }
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    // Only wide images are shrunk; small ones keep their pixels.
    let resized = if dynamic.width() > THUMBNAIL_MAX_WIDTH_PX {
        dynamic.resize(THUMBNAIL_MAX_WIDTH_PX, u32::MAX, FilterType::Triangle)
    } else {
        dynamic
    }
    .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

pub fn placeholder_image() -> Result<PreviewImage, String> {
    decode_preview_image(PLACEHOLDER_PNG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_placeholder_decodes() {
        let placeholder = placeholder_image().expect("placeholder");
        assert_eq!((placeholder.width, placeholder.height), (150, 150));
        assert_eq!(placeholder.rgba.len(), 150 * 150 * 4);
    }

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbaImage::new(width, height)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn small_images_are_not_upscaled() {
        let image = decode_preview_image(&encode_png(40, 20)).expect("decode");
        assert_eq!((image.width, image.height), (40, 20));
        assert_eq!(image.rgba.len(), 40 * 20 * 4);
    }

    #[test]
    fn wide_images_are_decoded_at_thumbnail_width() {
        let image = decode_preview_image(&encode_png(600, 200)).expect("decode");
        assert_eq!((image.width, image.height), (150, 50));
    }

    #[test]
    fn wide_images_are_scaled_to_thumbnail_width() {
        let image = PreviewImage {
            width: 300,
            height: 100,
            rgba: vec![0; 300 * 100 * 4],
        };
        assert_eq!(image.display_size(), egui::vec2(150.0, 50.0));
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert!(decode_preview_image(b"not an image").is_err());
    }
}
