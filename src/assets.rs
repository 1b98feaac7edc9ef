//! Sprite manifest and PNG decoding
//!
//! All sprites are fetched before the first frame. Any failure is fatal: the
//! game stays on the loading screen and the error is shown.

use thiserror::Error;

use crate::tuning::CharacterKind;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch {path}: {message}")]
    Fetch { path: &'static str, message: String },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: &'static str,
        #[source]
        source: image::ImageError,
    },
}

/// Every image the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Buddy,
    Neet,
    Pipe,
    Cloud,
}

impl Sprite {
    pub const ALL: [Sprite; 4] = [Sprite::Buddy, Sprite::Neet, Sprite::Pipe, Sprite::Cloud];

    /// Path relative to the page
    pub fn path(&self) -> &'static str {
        match self {
            Sprite::Buddy => "assets/sprites/buddy.png",
            Sprite::Neet => "assets/sprites/neet.png",
            Sprite::Pipe => "assets/sprites/pipe.png",
            Sprite::Cloud => "assets/sprites/cloud.png",
        }
    }

    pub fn for_character(kind: CharacterKind) -> Self {
        match kind {
            CharacterKind::Buddy => Sprite::Buddy,
            CharacterKind::Neet => Sprite::Neet,
        }
    }

    /// Dense index for texture tables
    pub fn index(&self) -> usize {
        match self {
            Sprite::Buddy => 0,
            Sprite::Neet => 1,
            Sprite::Pipe => 2,
            Sprite::Cloud => 3,
        }
    }
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone)]
pub struct SpriteImage {
    pub sprite: Sprite,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub fn decode_png(sprite: Sprite, bytes: &[u8]) -> Result<SpriteImage, AssetError> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|source| AssetError::Decode {
            path: sprite.path(),
            source,
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(SpriteImage {
        sprite,
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Fetch and decode every sprite
#[cfg(target_arch = "wasm32")]
pub async fn load_all() -> Result<Vec<SpriteImage>, AssetError> {
    use gloo::net::http::Request;

    let mut images = Vec::with_capacity(Sprite::ALL.len());
    for sprite in Sprite::ALL {
        let path = sprite.path();
        let fetch_error = |message: String| AssetError::Fetch { path, message };

        let response = Request::get(path)
            .build()
            .map_err(|e| fetch_error(e.to_string()))?
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if !response.ok() {
            return Err(fetch_error(format!("HTTP {}", response.status())));
        }
        let bytes = response
            .binary()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let image = decode_png(sprite, &bytes)?;
        log::info!("Loaded {path} ({}x{})", image.width, image.height);
        images.push(image);
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([x as u8 * 10, y as u8 * 10, 0, 255])
        });
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, image::ImageOutputFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let image = decode_png(Sprite::Pipe, &encode_png(4, 3)).unwrap();
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(image.rgba.len(), 4 * 3 * 4);
        // Pixel (1, 2)
        let offset = (2 * 4 + 1) * 4;
        assert_eq!(&image.rgba[offset..offset + 4], &[10, 20, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_names_sprite() {
        let err = decode_png(Sprite::Cloud, b"not a png").unwrap_err();
        assert!(err.to_string().contains("assets/sprites/cloud.png"));
    }

    #[test]
    fn test_sprite_indices_dense() {
        for (i, sprite) in Sprite::ALL.iter().enumerate() {
            assert_eq!(sprite.index(), i);
        }
        assert_eq!(Sprite::for_character(CharacterKind::Neet), Sprite::Neet);
    }
}
