use color_eyre::{
    Result,
    eyre::{WrapErr, bail},
};
use image::{Rgba, RgbaImage};
use std::path::Path;

use crate::settings::Settings;

/// Pixels with less alpha than this are treated as transparent
const ALPHA_CUTOFF: u8 = 128;

/// A decoded sprite image. Its pixel size is the size of the entity it draws.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: RgbaImage,
}

impl Sprite {
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .wrap_err_with(|| format!("failed to load sprite {}", path.display()))?
            .to_rgba8();

        if image.width() == 0 || image.height() == 0 {
            bail!("sprite {} has no pixels", path.display());
        }

        Ok(Self { image })
    }

    /// A fully opaque rectangle of one color
    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> Self {
        let [r, g, b] = color;
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Nearest-neighbour lookup at normalised coordinates in `[0, 1)`.
    /// Returns `None` for transparent pixels.
    pub fn sample(&self, u: f32, v: f32) -> Option<[u8; 3]> {
        if self.width() == 0 || self.height() == 0 {
            return None;
        }
        let x = ((u * self.width() as f32) as u32).min(self.width() - 1);
        let y = ((v * self.height() as f32) as u32).min(self.height() - 1);
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        (a >= ALPHA_CUTOFF).then_some([r, g, b])
    }
}

/// The images every entity is drawn with
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub ship: Sprite,
    pub alien: Sprite,
}

impl SpriteSheet {
    pub fn new(ship: Sprite, alien: Sprite) -> Self {
        Self { ship, alien }
    }

    pub fn load(settings: &Settings) -> Result<Self> {
        let ship = Sprite::load(&settings.ship_image_path())?;
        let alien = Sprite::load(&settings.alien_image_path())?;
        Ok(Self::new(ship, alien))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_sprite_size_and_color() {
        let sprite = Sprite::solid(6, 4, [1, 2, 3]);
        assert_eq!(sprite.width(), 6);
        assert_eq!(sprite.height(), 4);
        assert_eq!(sprite.sample(0.0, 0.0), Some([1, 2, 3]));
        assert_eq!(sprite.sample(0.99, 0.99), Some([1, 2, 3]));
    }

    #[test]
    fn test_sample_clamps_to_last_pixel() {
        let sprite = Sprite::solid(2, 2, [9, 9, 9]);
        assert_eq!(sprite.sample(1.0, 1.0), Some([9, 9, 9]));
    }

    #[test]
    fn test_transparent_pixels_are_skipped() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([200, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let sprite = Sprite { image };

        assert_eq!(sprite.sample(0.25, 0.5), Some([200, 0, 0]));
        assert_eq!(sprite.sample(0.75, 0.5), None);
    }

    #[test]
    fn test_missing_sprite_is_an_error() {
        let err = Sprite::load(Path::new("does/not/exist.png")).unwrap_err();
        assert!(format!("{err:?}").contains("does/not/exist.png"));
    }

    #[test]
    fn test_bundled_assets_load() {
        let settings = Settings {
            assets_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
            ..Settings::default()
        };
        let sheet = SpriteSheet::load(&settings).unwrap();
        assert!(sheet.ship.width() > 0);
        assert!(sheet.alien.height() > 0);
    }
}
