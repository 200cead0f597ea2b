/// Pixel format of a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
}

/// A decoded texture image with raw pixel data.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: TextureFormat,
}

impl TextureAsset {
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
            format: TextureFormat::Rgba8,
        }
    }

    /// Build from tightly packed RGB pixels, padding alpha to 255.
    pub fn from_rgb8(width: u32, height: u32, pixels: &[u8]) -> Self {
        let mut rgba = Vec::with_capacity(pixels.len() / 3 * 4);
        for chunk in pixels.chunks(3) {
            rgba.extend_from_slice(chunk);
            rgba.push(255);
        }
        Self::from_rgba8(width, height, rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_gains_opaque_alpha() {
        let tex = TextureAsset::from_rgb8(2, 1, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(tex.data, vec![1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(tex.format, TextureFormat::Rgba8);
    }
}
