use super::hitbox::{Body, Hitbox};
use super::ship::Ship;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct Bullet {
    pub x: i32,
    /// Exact vertical position; the hitbox floors it
    pub y: f32,
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
}

impl Bullet {
    /// Spawns a bullet at the ship's nose (horizontal midpoint, top edge)
    pub fn new(ship: &Ship, settings: &Settings) -> Self {
        let ship_rect = ship.rect();
        let width = settings.bullet_width;

        Self {
            x: ship_rect.center_x() - (width / 2) as i32,
            y: ship_rect.top() as f32,
            width,
            height: settings.bullet_height,
            color: settings.bullet_color,
        }
    }

    pub fn update(&mut self, settings: &Settings) {
        self.y -= settings.bullet_speed;
    }

    /// True once the whole bullet is above the top of the screen
    pub fn is_off_screen(&self) -> bool {
        self.y + self.height as f32 <= 0.0
    }
}

impl Body for Bullet {
    fn rect(&self) -> Hitbox {
        Hitbox::new(self.x, self.y.floor() as i32, self.width, self.height)
    }
}
